use canopy_table::TableError;

/// Errors from tree induction, ensemble training, prediction and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    /// Returned when a training table has zero rows.
    #[error("training table has zero rows")]
    EmptyDataset,

    /// Returned when a training table has no feature column besides the label.
    #[error("training table needs at least 2 columns (features + label), got {n_cols}")]
    TooFewColumns {
        /// The number of columns in the table.
        n_cols: usize,
    },

    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// Returned when n_estimators is zero.
    #[error("n_estimators must be at least 1, got {n_estimators}")]
    InvalidEstimatorCount {
        /// The invalid n_estimators value provided.
        n_estimators: usize,
    },

    /// Returned when the per-estimator feature subset resolves to 0 or exceeds the pool.
    #[error("feature subset resolved to {n_selected}, but must be in [1, {n_features}]")]
    InvalidFeatureSubset {
        /// The resolved subset size.
        n_selected: usize,
        /// The number of feature columns available.
        n_features: usize,
    },

    /// Returned when n_folds is less than 2.
    #[error("n_folds must be at least 2, got {n_folds}")]
    InvalidFoldCount {
        /// The invalid n_folds value provided.
        n_folds: usize,
    },

    /// Returned when there are fewer rows than folds.
    #[error("{n_rows} rows cannot fill {n_folds} folds")]
    TooFewRowsForFolds {
        /// The number of rows in the table.
        n_rows: usize,
        /// The requested number of folds.
        n_folds: usize,
    },

    /// Returned when a fold index is outside `1..=n_folds`.
    #[error("fold {fold} out of range 1..={n_folds}")]
    FoldOutOfRange {
        /// The requested 1-based fold.
        fold: usize,
        /// The configured number of folds.
        n_folds: usize,
    },

    /// Returned when a query row is too short for the columns a model reads.
    #[error("prediction row has {got} values, model reads column {required}")]
    RowTooShort {
        /// Highest zero-based column index the model reads.
        required: usize,
        /// The length of the row provided.
        got: usize,
    },

    /// Returned when a forest with no estimators is asked to predict.
    #[error("random forest has no estimators")]
    EmptyEnsemble,

    /// Returned when metric inputs differ in length.
    #[error("actual has {actual} labels, predicted has {predicted}")]
    LengthMismatch {
        /// Length of the actual label vector.
        actual: usize,
        /// Length of the predicted label vector.
        predicted: usize,
    },

    /// Returned when a metric is asked to score zero labels.
    #[error("cannot score an empty label vector")]
    EmptyInput,

    /// Wraps a table construction or reshaping error.
    #[error("table error: {0}")]
    Table(#[from] TableError),
}
