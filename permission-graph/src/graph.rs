//! Implication graph storage and transitive closure.
//!
//! Nodes are catalog indices. Two adjacency tables are kept in lockstep:
//! `forward[a]` holds every node `a` implies and `reverse[b]` every node
//! that implies `b`. All writes go through [`ImplicationGraph::add_edge`],
//! which mirrors each edge into both tables.

use std::collections::HashSet;

/// Directed "holding A implies holding B" relation over catalog indices.
#[derive(Debug, Clone, Default)]
pub(crate) struct ImplicationGraph {
    forward: Vec<HashSet<usize>>,
    reverse: Vec<HashSet<usize>>,
}

impl ImplicationGraph {
    /// Create a graph with `nodes` nodes and no edges.
    pub(crate) fn new(nodes: usize) -> Self {
        Self {
            forward: vec![HashSet::new(); nodes],
            reverse: vec![HashSet::new(); nodes],
        }
    }

    /// Number of nodes.
    pub(crate) fn node_count(&self) -> usize {
        self.forward.len()
    }

    /// Insert the edge `from -> to`.
    ///
    /// Idempotent: returns `false` if the edge was already present (or if
    /// either endpoint is out of range).
    pub(crate) fn add_edge(&mut self, from: usize, to: usize) -> bool {
        if from >= self.forward.len() || to >= self.reverse.len() {
            return false;
        }
        let inserted = self.forward[from].insert(to);
        if inserted {
            self.reverse[to].insert(from);
        }
        inserted
    }

    /// Check if `from -> to` is an edge.
    pub(crate) fn has_edge(&self, from: usize, to: usize) -> bool {
        self.forward
            .get(from)
            .map_or(false, |targets| targets.contains(&to))
    }

    /// Nodes implied by `node`.
    pub(crate) fn implied(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.forward.get(node).into_iter().flatten().copied()
    }

    /// Nodes that imply `node`.
    pub(crate) fn implying(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.reverse.get(node).into_iter().flatten().copied()
    }

    /// Total number of edges.
    pub(crate) fn edge_count(&self) -> usize {
        self.forward.iter().map(HashSet::len).sum()
    }

    /// Expand the graph to its transitive closure.
    ///
    /// Each node `k` is taken once as the intermediate: every predecessor
    /// of `k` gets an edge to every successor of `k`. With `k` as the
    /// outermost loop a single pass reaches the fixed point. Running it on
    /// an already closed graph adds nothing.
    ///
    /// The graph must be acyclic; otherwise strongly connected nodes end up
    /// implying each other (and themselves).
    ///
    /// Returns the number of edges added.
    pub(crate) fn close(&mut self) -> usize {
        let mut added = 0;

        for k in 0..self.forward.len() {
            if self.forward[k].is_empty() || self.reverse[k].is_empty() {
                continue;
            }
            let predecessors: Vec<usize> = self.reverse[k].iter().copied().collect();
            let successors: Vec<usize> = self.forward[k].iter().copied().collect();

            for &i in &predecessors {
                for &j in &successors {
                    if self.add_edge(i, j) {
                        added += 1;
                    }
                }
            }
        }

        added
    }

    /// Check the forward and reverse tables mirror each other exactly.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let forward_ok = self
            .forward
            .iter()
            .enumerate()
            .all(|(from, targets)| targets.iter().all(|&to| self.reverse[to].contains(&from)));
        let reverse_ok = self
            .reverse
            .iter()
            .enumerate()
            .all(|(to, sources)| sources.iter().all(|&from| self.forward[from].contains(&to)));
        forward_ok && reverse_ok
    }
}
