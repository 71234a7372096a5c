use std::fmt;

use crate::error::TableError;

/// Position of the class-label column within a table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
    serde::Serialize, serde::Deserialize,
)]
pub enum LabelColumn {
    /// A fixed zero-based column index.
    Index(usize),
    /// The last column of whatever table the label is resolved against.
    #[default]
    Last,
}

impl LabelColumn {
    /// Resolve to a concrete column index for a table with `n_cols` columns.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TableError::NoColumns`] | `n_cols` is zero |
    /// | [`TableError::ColumnOutOfBounds`] | `Index(i)` with `i >= n_cols` |
    pub fn resolve(self, n_cols: usize) -> Result<usize, TableError> {
        match self {
            _ if n_cols == 0 => Err(TableError::NoColumns),
            LabelColumn::Last => Ok(n_cols - 1),
            LabelColumn::Index(col) if col < n_cols => Ok(col),
            LabelColumn::Index(col) => Err(TableError::ColumnOutOfBounds { col, n_cols }),
        }
    }
}

impl From<usize> for LabelColumn {
    fn from(index: usize) -> Self {
        LabelColumn::Index(index)
    }
}

impl fmt::Display for LabelColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelColumn::Index(col) => write!(f, "{col}"),
            LabelColumn::Last => write!(f, "last"),
        }
    }
}
