//! Invariant checking for deterministic simulation testing.
//!
//! Structural checks run against a snapshot, so they see exactly what a
//! renderer would see. Model checks compare the engine with a `BTreeSet`.

use std::collections::BTreeSet;

use crate::btree::{BTree, Key, NodeView};

/// An invariant violation detected during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violation.
    pub description: String,
    /// Operation index where it was detected.
    pub operation_index: usize,
    /// Additional context.
    pub context: String,
}

/// Checker for B-tree invariants.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    /// Detected violations.
    violations: Vec<InvariantViolation>,
}

impl InvariantChecker {
    /// Create a new invariant checker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        &self.violations
    }

    /// Check if any violations were detected.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Clear all recorded violations.
    pub fn clear(&mut self) {
        self.violations.clear();
    }

    /// Add a violation.
    pub fn add_violation(&mut self, violation: InvariantViolation) {
        self.violations.push(violation);
    }

    fn violation(&mut self, description: &str, operation_index: usize, context: String) {
        self.violations.push(InvariantViolation {
            description: description.to_string(),
            operation_index,
            context,
        });
    }

    /// Check every structural invariant of `tree`.
    pub fn check_tree(&mut self, tree: &BTree, operation_index: usize) {
        self.check_structure(tree.snapshot().as_ref(), tree.min_degree(), operation_index);
    }

    /// Check every structural invariant of a snapshot.
    ///
    /// `None` is the empty tree and is always valid.
    pub fn check_structure(
        &mut self,
        root: Option<&NodeView>,
        min_degree: usize,
        operation_index: usize,
    ) {
        let Some(root) = root else {
            return;
        };

        if root.keys.is_empty() {
            self.violation(
                "Non-empty tree has a key-less root",
                operation_index,
                format!("children: {}", root.children.len()),
            );
        }

        let mut walk = StructureWalk {
            min_degree,
            operation_index,
            leaf_depth: None,
            checker: self,
        };
        walk.visit(root, true, None, None, 0);
    }

    /// Compare the engine against the set of keys it should hold.
    pub fn check_against_model(
        &mut self,
        tree: &BTree,
        model: &BTreeSet<Key>,
        operation_index: usize,
    ) {
        if tree.total_keys() != model.len() {
            self.violation(
                "Total key count differs from model",
                operation_index,
                format!("engine: {}, model: {}", tree.total_keys(), model.len()),
            );
        }

        if tree.is_empty() != model.is_empty() {
            self.violation(
                "Emptiness differs from model",
                operation_index,
                format!("engine empty: {}, model empty: {}", tree.is_empty(), model.is_empty()),
            );
        }

        if tree.height().is_none() != model.is_empty() {
            self.violation(
                "Empty-tree height sentinel mismatch",
                operation_index,
                format!("height: {:?}, model keys: {}", tree.height(), model.len()),
            );
        }

        if !tree.iter().eq(model.iter().copied()) {
            self.violation(
                "In-order keys differ from model",
                operation_index,
                format!("engine: [{tree}]"),
            );
        }

        if let Some(missing) = model.iter().find(|&&key| !tree.search(key)) {
            self.violation(
                "Search misses a stored key",
                operation_index,
                format!("key: {missing}"),
            );
        }
    }
}

/// Recursive structure validation state.
struct StructureWalk<'a> {
    min_degree: usize,
    operation_index: usize,
    /// Depth of the first leaf reached; every other leaf must match it.
    leaf_depth: Option<usize>,
    checker: &'a mut InvariantChecker,
}

impl StructureWalk<'_> {
    /// Validate `node`, whose keys must all lie strictly between `lower` and `upper`.
    fn visit(
        &mut self,
        node: &NodeView,
        is_root: bool,
        lower: Option<Key>,
        upper: Option<Key>,
        depth: usize,
    ) {
        let max_keys = self.min_degree.saturating_mul(2).saturating_sub(1);
        let min_keys = if is_root { 0 } else { self.min_degree.saturating_sub(1) };

        if node.keys.len() < min_keys || node.keys.len() > max_keys {
            self.report(
                "Node key count out of bounds",
                format!(
                    "depth {depth}: {} keys, allowed {min_keys}..={max_keys}",
                    node.keys.len()
                ),
            );
        }

        if !node.keys.windows(2).all(|pair| pair[0] < pair[1]) {
            self.report(
                "Node keys not strictly increasing",
                format!("depth {depth}: {:?}", node.keys),
            );
        }

        let below_lower = lower.is_some_and(|bound| node.keys.iter().any(|&key| key <= bound));
        let above_upper = upper.is_some_and(|bound| node.keys.iter().any(|&key| key >= bound));
        if below_lower || above_upper {
            self.report(
                "Key outside separator range",
                format!("depth {depth}: {:?} not within ({lower:?}, {upper:?})", node.keys),
            );
        }

        if node.is_leaf != node.children.is_empty() {
            self.report(
                "Leaf flag disagrees with children",
                format!(
                    "depth {depth}: is_leaf {}, {} children",
                    node.is_leaf,
                    node.children.len()
                ),
            );
        }

        if node.children.is_empty() {
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => self.report(
                    "Leaves at different depths",
                    format!("expected {expected}, found {depth}"),
                ),
                Some(_) => {}
            }
            return;
        }

        if node.children.len() != node.keys.len() + 1 {
            self.report(
                "Child count is not key count + 1",
                format!(
                    "depth {depth}: {} keys, {} children",
                    node.keys.len(),
                    node.children.len()
                ),
            );
            return;
        }

        for (i, child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(node.keys[i - 1]) };
            let child_upper = node.keys.get(i).copied().or(upper);
            self.visit(child, false, child_lower, child_upper, depth + 1);
        }
    }

    fn report(&mut self, description: &str, context: String) {
        self.checker
            .violation(description, self.operation_index, context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(root: &NodeView, min_degree: usize) -> Vec<InvariantViolation> {
        let mut checker = InvariantChecker::new();
        checker.check_structure(Some(root), min_degree, 0);
        checker.violations().to_vec()
    }

    fn descriptions(violations: &[InvariantViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.description.as_str()).collect()
    }

    #[test]
    fn test_valid_tree_passes() {
        let root = NodeView::internal(
            vec![10, 20],
            vec![
                NodeView::leaf(vec![1, 5]),
                NodeView::leaf(vec![12, 15]),
                NodeView::leaf(vec![25, 30]),
            ],
        );
        assert!(check(&root, 3).is_empty());
    }

    #[test]
    fn test_empty_tree_passes() {
        let mut checker = InvariantChecker::new();
        checker.check_structure(None, 3, 0);
        assert!(!checker.has_violations());
    }

    #[test]
    fn test_detects_underfull_node() {
        let root = NodeView::internal(
            vec![10],
            vec![NodeView::leaf(vec![1]), NodeView::leaf(vec![12, 15])],
        );
        assert_eq!(
            descriptions(&check(&root, 3)),
            vec!["Node key count out of bounds"]
        );
    }

    #[test]
    fn test_detects_overfull_root() {
        let root = NodeView::leaf(vec![1, 2, 3, 4]);
        assert_eq!(
            descriptions(&check(&root, 2)),
            vec!["Node key count out of bounds"]
        );
    }

    #[test]
    fn test_detects_unsorted_keys() {
        let root = NodeView::leaf(vec![3, 1, 2]);
        assert_eq!(
            descriptions(&check(&root, 3)),
            vec!["Node keys not strictly increasing"]
        );
    }

    #[test]
    fn test_detects_separator_violation() {
        let root = NodeView::internal(
            vec![10],
            vec![NodeView::leaf(vec![1, 11]), NodeView::leaf(vec![12, 15])],
        );
        assert_eq!(
            descriptions(&check(&root, 2)),
            vec!["Key outside separator range"]
        );
    }

    #[test]
    fn test_detects_uneven_leaf_depth() {
        let root = NodeView::internal(
            vec![10],
            vec![
                NodeView::leaf(vec![1]),
                NodeView::internal(
                    vec![15],
                    vec![NodeView::leaf(vec![12]), NodeView::leaf(vec![20])],
                ),
            ],
        );
        let violations = check(&root, 2);
        assert!(!violations.is_empty());
        assert!(
            descriptions(&violations)
                .iter()
                .all(|d| *d == "Leaves at different depths")
        );
    }

    #[test]
    fn test_detects_wrong_child_count() {
        let root = NodeView::internal(vec![10, 20], vec![NodeView::leaf(vec![1])]);
        assert!(descriptions(&check(&root, 2)).contains(&"Child count is not key count + 1"));
    }

    #[test]
    fn test_detects_keyless_root() {
        let root = NodeView::internal(vec![], vec![NodeView::leaf(vec![1])]);
        assert!(descriptions(&check(&root, 2)).contains(&"Non-empty tree has a key-less root"));
    }

    #[test]
    fn test_model_comparison() {
        let mut tree = BTree::new(2).expect("create tree");
        for key in [5, 1, 9] {
            tree.insert(key);
        }

        let mut checker = InvariantChecker::new();
        checker.check_against_model(&tree, &BTreeSet::from([1, 5, 9]), 0);
        assert!(!checker.has_violations());

        checker.check_against_model(&tree, &BTreeSet::from([1, 5]), 1);
        assert_eq!(
            descriptions(checker.violations()),
            vec![
                "Total key count differs from model",
                "In-order keys differ from model"
            ]
        );
        assert!(checker.violations().iter().all(|v| v.operation_index == 1));

        checker.clear();
        assert!(!checker.has_violations());
    }
}
