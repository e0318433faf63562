//! Cycle detection over the direct implication graph.
//!
//! Runs before closure: closing a cyclic graph would fold every node on
//! the cycle into mutual equivalence and hide the configuration mistake
//! (two roles inheriting each other, or a hierarchy where `read` implies
//! `delete`).
//!
//! Depth-first search with two markers per node:
//! - **Active**: on the current DFS path
//! - **Done**: fully explored
//!
//! An edge into an active node closes a cycle. Every catalog member is a
//! starting point, so isolated components are covered too. The traversal
//! keeps an explicit stack instead of recursing, and visits successors in
//! index order so the reported cycle is deterministic.

use crate::catalog::Catalog;
use crate::error::{GraphError, GraphResult};
use crate::graph::ImplicationGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

struct Frame {
    node: usize,
    successors: Vec<usize>,
    next: usize,
}

impl Frame {
    fn new(graph: &ImplicationGraph, node: usize) -> Self {
        let mut successors: Vec<usize> = graph.implied(node).collect();
        successors.sort_unstable();
        Self {
            node,
            successors,
            next: 0,
        }
    }
}

/// Verify the graph is acyclic.
///
/// # Errors
///
/// [`GraphError::CircularDependency`] naming the first node found to close
/// a cycle, with the cycle path from that node back to itself.
pub(crate) fn ensure_acyclic(graph: &ImplicationGraph, catalog: &Catalog) -> GraphResult<()> {
    match find_cycle(graph) {
        None => Ok(()),
        Some(cycle) => {
            let path: Vec<String> = cycle
                .iter()
                .map(|&i| catalog.name(i).unwrap_or("?").to_string())
                .collect();
            Err(GraphError::CircularDependency {
                node: path[0].clone(),
                path,
            })
        }
    }
}

/// Find one cycle, returned as node indices starting and ending at the
/// same node.
pub(crate) fn find_cycle(graph: &ImplicationGraph) -> Option<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; graph.node_count()];

    for start in 0..graph.node_count() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        marks[start] = Mark::Active;
        let mut stack = vec![Frame::new(graph, start)];

        while let Some(frame) = stack.last_mut() {
            let Some(&next) = frame.successors.get(frame.next) else {
                marks[frame.node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.next += 1;

            match marks[next] {
                Mark::Done => {}
                Mark::Active => {
                    let from = stack
                        .iter()
                        .position(|f| f.node == next)
                        .unwrap_or_default();
                    let mut cycle: Vec<usize> = stack[from..].iter().map(|f| f.node).collect();
                    cycle.push(next);
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    marks[next] = Mark::Active;
                    stack.push(Frame::new(graph, next));
                }
            }
        }
    }

    None
}
