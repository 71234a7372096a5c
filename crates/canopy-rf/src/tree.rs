use canopy_table::{LabelColumn, Table};
use tracing::{debug, instrument};

use crate::{
    RfError,
    impurity::class_set,
    node::Node,
    split::{Partition, Split, find_best_split},
    vote::majority,
};

/// Configuration for a single CART decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter            | Default |
/// |----------------------|---------|
/// | `max_depth`          | 10      |
/// | `min_partition_size` | 1       |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTreeConfig {
    pub(crate) max_depth: usize,
    pub(crate) min_partition_size: usize,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: 10,
            min_partition_size: 1,
        }
    }

    /// Set the maximum tree depth.
    ///
    /// The root split sits at depth 1; a split made at `max_depth` gets leaf
    /// children unconditionally, so `1` grows a single-split stump.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the partition size a side must exceed to be split further.
    #[must_use]
    pub fn with_min_partition_size(mut self, min_partition_size: usize) -> Self {
        self.min_partition_size = min_partition_size;
        self
    }

    // --- Getters ---

    /// Return the maximum tree depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum partition size.
    #[must_use]
    pub fn min_partition_size(&self) -> usize {
        self.min_partition_size
    }

    /// Grow a decision tree on `table`, predicting the column at `label_col`.
    ///
    /// Every other column is a candidate feature. Feature indices recorded in
    /// the tree are column indices of `table`, so prediction rows use the same
    /// layout.
    ///
    /// # Errors
    ///
    /// | Variant                         | When                                   |
    /// |---------------------------------|----------------------------------------|
    /// | [`RfError::EmptyDataset`]       | `table` has zero rows                  |
    /// | [`RfError::TooFewColumns`]      | `table` has fewer than 2 columns       |
    /// | [`RfError::Table`]              | `label_col` is out of range            |
    /// | [`RfError::InvalidMaxDepth`]    | `max_depth` is 0                       |
    #[instrument(skip(self, table), fields(n_rows = table.n_rows(), n_cols = table.n_cols()))]
    pub fn fit(&self, table: &Table, label_col: LabelColumn) -> Result<DecisionTree, RfError> {
        let label = validate_training_table(table, label_col)?;
        if self.max_depth == 0 {
            return Err(RfError::InvalidMaxDepth { max_depth: 0 });
        }

        let classes = class_set(&table.column(label));
        let root = grow(table, label, &classes, self, 1);
        let tree = DecisionTree::new(root, label, table.n_cols(), classes);

        debug!(
            n_nodes = tree.n_nodes(),
            depth = tree.depth(),
            n_classes = tree.classes.len(),
            "decision tree built"
        );

        Ok(tree)
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a training table and resolve its label column.
pub(crate) fn validate_training_table(
    table: &Table,
    label_col: LabelColumn,
) -> Result<usize, RfError> {
    if table.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    if table.n_cols() < 2 {
        return Err(RfError::TooFewColumns {
            n_cols: table.n_cols(),
        });
    }
    Ok(label_col.resolve(table.n_cols())?)
}

/// Most frequent label among the rows of `table`.
fn leaf_for(table: &Table, label: usize) -> Node {
    // Tables reaching a leaf always hold at least one row.
    Node::leaf(majority(&table.column(label)).unwrap_or_default())
}

/// Recursively grow the subtree for `table` at `depth` (root is 1).
fn grow(
    table: &Table,
    label: usize,
    classes: &[f64],
    config: &DecisionTreeConfig,
    depth: usize,
) -> Node {
    match find_best_split(table, label, classes) {
        Some(split) => node_from_split(split, label, classes, config, depth),
        None => leaf_for(table, label),
    }
}

/// Turn a chosen split into an internal node, recursing where allowed.
fn node_from_split(
    split: Split,
    label: usize,
    classes: &[f64],
    config: &DecisionTreeConfig,
    depth: usize,
) -> Node {
    let Split {
        feature,
        threshold,
        score,
        partition,
    } = split;

    let (left, right) = match partition {
        // Nothing left to divide: both branches predict the whole group.
        Partition::OneSided(rows) => (leaf_for(&rows, label), leaf_for(&rows, label)),
        Partition::TwoSided { left, right } if depth >= config.max_depth => {
            (leaf_for(&left, label), leaf_for(&right, label))
        }
        Partition::TwoSided { left, right } => {
            let child = |side: &Table| {
                if side.n_rows() > config.min_partition_size && !score.is_pure() {
                    grow(side, label, classes, config, depth + 1)
                } else {
                    leaf_for(side, label)
                }
            };
            (child(&left), child(&right))
        }
    };

    Node::internal(feature, threshold, score, left, right)
}

/// A fitted CART decision tree.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecisionTree {
    root: Node,
    label: usize,
    n_cols: usize,
    classes: Vec<f64>,
    required_len: usize,
}

impl DecisionTree {
    fn new(root: Node, label: usize, n_cols: usize, classes: Vec<f64>) -> Self {
        let required_len = root.max_feature_index().map_or(0, |max| max + 1);
        Self {
            root,
            label,
            n_cols,
            classes,
            required_len,
        }
    }

    /// Predict the class label for one row.
    ///
    /// Starting at the root, goes left when `row[feature] < threshold` and
    /// right otherwise, returning the label of the leaf reached. The row uses
    /// the training table's column layout; the label cell is never read.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::RowTooShort`] when `row` lacks a column the tree tests.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, RfError> {
        self.check_len(row.len())?;
        Ok(self.root.descend(row))
    }

    /// Predict every row of `table`, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::RowTooShort`] when `table` lacks a column the tree tests.
    pub fn predict(&self, table: &Table) -> Result<Vec<f64>, RfError> {
        self.check_len(table.n_cols())?;
        Ok(table.rows().map(|row| self.root.descend(row)).collect())
    }

    fn check_len(&self, got: usize) -> Result<(), RfError> {
        if got < self.required_len {
            return Err(RfError::RowTooShort {
                required: self.required_len - 1,
                got,
            });
        }
        Ok(())
    }

    /// Borrow the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Return the resolved label column of the training table.
    #[must_use]
    pub fn label_index(&self) -> usize {
        self.label
    }

    /// Return the column count of the training table.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Return the sorted distinct labels seen during training.
    #[must_use]
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Return the total number of nodes (internal and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.root.n_nodes()
    }

    /// Return the number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Return the number of split levels. A lone leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}
