use std::fmt;

/// Zero-based column index of the feature an internal node tests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a new feature index from a zero-based column position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based column index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gini impurity value.
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd,
    serde::Serialize, serde::Deserialize,
)]
pub struct Impurity(f64);

impl Impurity {
    /// Create a new impurity value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw impurity value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return `true` if the impurity is exactly zero.
    #[must_use]
    pub fn is_pure(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// A node of a fitted decision tree.
///
/// Internal nodes own their two children outright, so a tree is a plain
/// recursive value with no arena and no parent links. Traversal only ever
/// moves from the root downwards.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Node {
    /// An interior split node.
    Internal {
        /// Column tested by this node.
        feature: FeatureIndex,
        /// Rows with `row[feature] < threshold` go left, all others go right.
        threshold: f64,
        /// Weighted Gini impurity of the partition this split produced.
        score: Impurity,
        /// Subtree for rows below the threshold.
        left: Box<Node>,
        /// Subtree for rows at or above the threshold.
        right: Box<Node>,
    },
    /// A terminal node.
    Leaf {
        /// Predicted class label.
        value: f64,
    },
}

impl Node {
    pub(crate) fn leaf(value: f64) -> Self {
        Node::Leaf { value }
    }

    pub(crate) fn internal(
        feature: FeatureIndex,
        threshold: f64,
        score: Impurity,
        left: Node,
        right: Node,
    ) -> Self {
        Node::Internal {
            feature,
            threshold,
            score,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the leaf label, or `None` for an internal node.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Node::Leaf { value } => Some(*value),
            Node::Internal { .. } => None,
        }
    }

    /// Return the left child of an internal node.
    #[must_use]
    pub fn left(&self) -> Option<&Node> {
        match self {
            Node::Internal { left, .. } => Some(left),
            Node::Leaf { .. } => None,
        }
    }

    /// Return the right child of an internal node.
    #[must_use]
    pub fn right(&self) -> Option<&Node> {
        match self {
            Node::Internal { right, .. } => Some(right),
            Node::Leaf { .. } => None,
        }
    }

    /// Follow the split rules from this node down to a leaf and return its label.
    ///
    /// The caller guarantees `row` is long enough for every feature tested.
    pub(crate) fn descend(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if row[feature.index()] < *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Return the number of nodes in this subtree.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => 1 + left.n_nodes() + right.n_nodes(),
        }
    }

    /// Return the number of leaves in this subtree.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }

    /// Return the depth of this subtree. A lone leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Return the highest feature column tested anywhere in this subtree.
    #[must_use]
    pub fn max_feature_index(&self) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal {
                feature, left, right, ..
            } => [Some(feature.index()), left.max_feature_index(), right.max_feature_index()]
                .into_iter()
                .flatten()
                .max(),
        }
    }
}
