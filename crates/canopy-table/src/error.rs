//! Error types for table construction and reshaping.

/// Errors from building or reshaping a [`Table`](crate::Table).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// Returned when a table is built from zero rows.
    #[error("table must have at least one row")]
    NoRows,

    /// Returned when a table is built with zero columns.
    #[error("table must have at least one column")]
    NoColumns,

    /// Returned when a row has a different width than the first row.
    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        got: usize,
    },

    /// Returned when a cell is NaN or infinite.
    #[error("non-finite value at row {row}, column {col}")]
    NonFiniteValue {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        col: usize,
    },

    /// Returned when a flat buffer does not match the declared shape.
    #[error("flat buffer holds {got} cells, shape requires {expected}")]
    ShapeMismatch {
        /// `n_rows * n_cols`.
        expected: usize,
        /// Length of the buffer provided.
        got: usize,
    },

    /// Returned when a row range reaches past the end of the table.
    #[error("row range {start}..{end} out of bounds for {n_rows} rows")]
    RowRangeOutOfBounds {
        /// Start of the requested range.
        start: usize,
        /// End of the requested range.
        end: usize,
        /// Number of rows in the table.
        n_rows: usize,
    },

    /// Returned when a gathered row index does not exist.
    #[error("row {row} out of bounds for {n_rows} rows")]
    RowOutOfBounds {
        /// The requested row index.
        row: usize,
        /// Number of rows in the table.
        n_rows: usize,
    },

    /// Returned when a column index (including a label column) does not exist.
    #[error("column {col} out of bounds for {n_cols} columns")]
    ColumnOutOfBounds {
        /// The requested column index.
        col: usize,
        /// Number of columns in the table.
        n_cols: usize,
    },

    /// Returned when stacking two tables of different widths.
    #[error("cannot stack a {got}-column table under a {expected}-column table")]
    WidthMismatch {
        /// Width of the upper table.
        expected: usize,
        /// Width of the lower table.
        got: usize,
    },
}
