//! # Actions
//!
//! The action hierarchy: which actions imply which others.
//!
//! The default hierarchy is the CRUD chain:
//!
//! ```text
//! delete -> update, create, read
//! update -> create, read
//! create -> read
//! read   -> (nothing)
//! ```
//!
//! A configuration may replace it with any DAG over action labels. Every
//! label that appears, as a key or as an implied action, is a known action;
//! labels that only appear on the implied side are leaves.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::GraphResult;

/// Read action of the default hierarchy.
pub const READ: &str = "read";
/// Create action of the default hierarchy.
pub const CREATE: &str = "create";
/// Update action of the default hierarchy.
pub const UPDATE: &str = "update";
/// Delete action of the default hierarchy.
pub const DELETE: &str = "delete";

/// Mapping from an action label to the actions it directly implies.
///
/// # Example
///
/// ```
/// use permission_graph::actions::ActionHierarchy;
///
/// let crud = ActionHierarchy::crud();
/// assert!(crud.implies("delete", "read"));
/// assert!(crud.implies("update", "create"));
/// assert!(!crud.implies("read", "update"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, BTreeSet<String>>", into = "BTreeMap<String, BTreeSet<String>>")]
pub struct ActionHierarchy {
    implies: BTreeMap<String, BTreeSet<String>>,
}

impl From<BTreeMap<String, BTreeSet<String>>> for ActionHierarchy {
    fn from(mut implies: BTreeMap<String, BTreeSet<String>>) -> Self {
        let leaves: Vec<String> = implies
            .values()
            .flatten()
            .filter(|action| !implies.contains_key(action.as_str()))
            .cloned()
            .collect();
        for leaf in leaves {
            implies.entry(leaf).or_default();
        }
        Self { implies }
    }
}

impl From<ActionHierarchy> for BTreeMap<String, BTreeSet<String>> {
    fn from(hierarchy: ActionHierarchy) -> Self {
        hierarchy.implies
    }
}

impl Default for ActionHierarchy {
    fn default() -> Self {
        Self::crud()
    }
}

impl ActionHierarchy {
    /// The default `delete > update > create > read` chain.
    pub fn crud() -> Self {
        Self::from_pairs([
            (DELETE, vec![UPDATE, CREATE, READ]),
            (UPDATE, vec![CREATE, READ]),
            (CREATE, vec![READ]),
            (READ, vec![]),
        ])
    }

    /// Build a hierarchy from `(action, implied actions)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use permission_graph::actions::ActionHierarchy;
    ///
    /// let approval = ActionHierarchy::from_pairs([
    ///     ("delete", vec!["update", "approve"]),
    ///     ("approve", vec!["update"]),
    ///     ("update", vec!["create", "read"]),
    /// ]);
    /// assert!(approval.implies("approve", "read"));
    /// assert!(approval.contains("create"));
    /// ```
    pub fn from_pairs<I, A, V, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let implies: BTreeMap<String, BTreeSet<String>> = pairs
            .into_iter()
            .map(|(action, implied)| {
                (
                    action.into(),
                    implied.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self::from(implies)
    }

    /// Iterate over every known action, sorted.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.implies.keys().map(String::as_str)
    }

    /// Check if `action` is a known action.
    pub fn contains(&self, action: &str) -> bool {
        self.implies.contains_key(action)
    }

    /// Iterate over the actions `action` directly implies.
    pub fn implied(&self, action: &str) -> impl Iterator<Item = &str> {
        self.implies
            .get(action)
            .into_iter()
            .flat_map(|implied| implied.iter().map(String::as_str))
    }

    /// Check if `action` implies `other`, directly or through intermediate
    /// actions. An action does not imply itself here.
    pub fn implies(&self, action: &str, other: &str) -> bool {
        let mut seen = BTreeSet::new();
        let mut pending: Vec<&str> = self.implied(action).collect();

        while let Some(next) = pending.pop() {
            if next == other {
                return true;
            }
            if seen.insert(next) {
                pending.extend(self.implied(next));
            }
        }
        false
    }

    /// Number of known actions.
    pub fn len(&self) -> usize {
        self.implies.len()
    }

    /// Check if no actions are declared.
    pub fn is_empty(&self) -> bool {
        self.implies.is_empty()
    }

    /// Check every action label.
    ///
    /// Cycles between actions are not checked here; they surface as a
    /// circular dependency once the graph is wired.
    pub(crate) fn validate(&self) -> GraphResult<()> {
        self.actions()
            .try_for_each(|action| crate::config::check_name("action", action))
    }
}
