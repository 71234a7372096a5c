//! Immutable row-major numeric table.

use std::ops::{Index, Range};

use crate::error::TableError;

/// Iterator over the rows of a [`Table`], each yielded as a slice.
pub type Rows<'a> = std::slice::ChunksExact<'a, f64>;

/// Rectangular grid of finite `f64` values stored row-major.
///
/// A table always has at least one column. It may have zero rows when it is
/// produced by a reshaping operation (for example an empty partition), but
/// [`Table::new`] itself requires at least one row.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Table {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl Table {
    /// Build a table from a list of rows.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TableError::NoRows`] | `rows` is empty |
    /// | [`TableError::NoColumns`] | the first row is empty |
    /// | [`TableError::RaggedRow`] | a row differs in width from the first |
    /// | [`TableError::NonFiniteValue`] | any cell is NaN or infinite |
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let n_cols = rows.first().ok_or(TableError::NoRows)?.len();
        if n_cols == 0 {
            return Err(TableError::NoColumns);
        }
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n_cols {
                return Err(TableError::RaggedRow {
                    row,
                    expected: n_cols,
                    got: values.len(),
                });
            }
            if let Some(col) = values.iter().position(|v| !v.is_finite()) {
                return Err(TableError::NonFiniteValue { row, col });
            }
            data.extend(values);
        }
        Ok(Self { n_rows, n_cols, data })
    }

    /// Build a table from a row-major flat buffer.
    ///
    /// Zero rows are accepted, giving an empty table of known width.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TableError::NoColumns`] | `n_cols` is zero |
    /// | [`TableError::ShapeMismatch`] | `data.len() != n_rows * n_cols` |
    /// | [`TableError::NonFiniteValue`] | any cell is NaN or infinite |
    pub fn from_flat(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self, TableError> {
        if n_cols == 0 {
            return Err(TableError::NoColumns);
        }
        if data.len() != n_rows * n_cols {
            return Err(TableError::ShapeMismatch {
                expected: n_rows * n_cols,
                got: data.len(),
            });
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(TableError::NonFiniteValue {
                row: pos / n_cols,
                col: pos % n_cols,
            });
        }
        Ok(Self { n_rows, n_cols, data })
    }

    /// Build a table from cells already known to be valid.
    fn from_validated(n_cols: usize, data: Vec<f64>) -> Self {
        debug_assert!(n_cols > 0);
        debug_assert_eq!(data.len() % n_cols, 0);
        Self {
            n_rows: data.len() / n_cols,
            n_cols,
            data,
        }
    }

    /// Return the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Return the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Return true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Return the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows` or `col >= n_cols`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    /// Borrow row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.n_rows, "row {i} out of bounds for {} rows", self.n_rows);
        &self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// Iterate over all rows in order.
    pub fn rows(&self) -> Rows<'_> {
        self.data.chunks_exact(self.n_cols)
    }

    /// Copy column `j` into a vector, in row order.
    ///
    /// # Panics
    ///
    /// Panics if `j >= n_cols`.
    #[must_use]
    pub fn column(&self, j: usize) -> Vec<f64> {
        assert!(j < self.n_cols, "column {j} out of bounds for {} columns", self.n_cols);
        self.rows().map(|row| row[j]).collect()
    }

    /// Copy the contiguous row range `range` into a new table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RowRangeOutOfBounds`] if the range is inverted or
    /// ends past the last row.
    pub fn slice_rows(&self, range: Range<usize>) -> Result<Self, TableError> {
        if range.start > range.end || range.end > self.n_rows {
            return Err(TableError::RowRangeOutOfBounds {
                start: range.start,
                end: range.end,
                n_rows: self.n_rows,
            });
        }
        let cells = range.start * self.n_cols..range.end * self.n_cols;
        Ok(Self::from_validated(self.n_cols, self.data[cells].to_vec()))
    }

    /// Stack `other` below `self`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::WidthMismatch`] if the tables differ in width.
    pub fn vstack(&self, other: &Table) -> Result<Self, TableError> {
        if self.n_cols != other.n_cols {
            return Err(TableError::WidthMismatch {
                expected: self.n_cols,
                got: other.n_cols,
            });
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(Self::from_validated(self.n_cols, data))
    }

    /// Gather `rows` (repeats allowed) restricted to `cols`, both in the order given.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TableError::NoColumns`] | `cols` is empty |
    /// | [`TableError::ColumnOutOfBounds`] | a column index does not exist |
    /// | [`TableError::RowOutOfBounds`] | a row index does not exist |
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self, TableError> {
        if cols.is_empty() {
            return Err(TableError::NoColumns);
        }
        if let Some(&col) = cols.iter().find(|&&c| c >= self.n_cols) {
            return Err(TableError::ColumnOutOfBounds {
                col,
                n_cols: self.n_cols,
            });
        }
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for &r in rows {
            if r >= self.n_rows {
                return Err(TableError::RowOutOfBounds {
                    row: r,
                    n_rows: self.n_rows,
                });
            }
            let row = self.row(r);
            data.extend(cols.iter().map(|&c| row[c]));
        }
        Ok(Self::from_validated(cols.len(), data))
    }

    /// Split rows into `(matching, rest)` by `predicate`, preserving row order.
    ///
    /// Either side may come back empty.
    #[must_use]
    pub fn partition_rows<P>(&self, mut predicate: P) -> (Self, Self)
    where
        P: FnMut(&[f64]) -> bool,
    {
        let mut matching = Vec::new();
        let mut rest = Vec::new();
        for row in self.rows() {
            if predicate(row) {
                matching.extend_from_slice(row);
            } else {
                rest.extend_from_slice(row);
            }
        }
        (
            Self::from_validated(self.n_cols, matching),
            Self::from_validated(self.n_cols, rest),
        )
    }

    /// Borrow the row-major cell buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for Table {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < self.n_rows, "row {row} out of bounds for {} rows", self.n_rows);
        assert!(col < self.n_cols, "column {col} out of bounds for {} columns", self.n_cols);
        &self.data[row * self.n_cols + col]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Table {
    type Error = TableError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> Table {
        Table::new(vec![
            vec![1.0, 10.0, 0.0],
            vec![2.0, 20.0, 1.0],
            vec![3.0, 30.0, 0.0],
            vec![4.0, 40.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn shape() {
        let t = make_table();
        assert_eq!(t.n_rows(), 4);
        assert_eq!(t.n_cols(), 3);
        assert!(!t.is_empty());
    }

    #[test]
    fn rejects_no_rows() {
        assert_eq!(Table::new(vec![]).unwrap_err(), TableError::NoRows);
    }

    #[test]
    fn rejects_no_columns() {
        assert_eq!(Table::new(vec![vec![]]).unwrap_err(), TableError::NoColumns);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Table::new(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedRow {
                row: 1,
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn rejects_nan() {
        let err = Table::new(vec![vec![1.0, 2.0], vec![3.0, f64::NAN]]).unwrap_err();
        assert_eq!(err, TableError::NonFiniteValue { row: 1, col: 1 });
    }

    #[test]
    fn from_flat_shape_mismatch() {
        let err = Table::from_flat(2, 2, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, TableError::ShapeMismatch { expected: 4, got: 3 });
    }

    #[test]
    fn from_flat_locates_non_finite_cell() {
        let err = Table::from_flat(2, 2, vec![1.0, 2.0, f64::INFINITY, 3.0]).unwrap_err();
        assert_eq!(err, TableError::NonFiniteValue { row: 1, col: 0 });
    }

    #[test]
    fn from_flat_allows_zero_rows() {
        let t = Table::from_flat(0, 3, vec![]).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.n_cols(), 3);
        assert_eq!(t.rows().count(), 0);
    }

    #[test]
    fn cell_row_and_column_access() {
        let t = make_table();
        assert_eq!(t.get(2, 1), 30.0);
        assert_eq!(t[(3, 0)], 4.0);
        assert_eq!(t.row(1), &[2.0, 20.0, 1.0]);
        assert_eq!(t.column(2), vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn rows_iterates_in_order() {
        let t = make_table();
        let firsts: Vec<f64> = t.rows().map(|r| r[0]).collect();
        assert_eq!(firsts, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn slice_rows_copies_range() {
        let t = make_table();
        let s = t.slice_rows(1..3).unwrap();
        assert_eq!(s.n_rows(), 2);
        assert_eq!(s.row(0), t.row(1));
        assert_eq!(s.row(1), t.row(2));
    }

    #[test]
    fn slice_rows_out_of_bounds() {
        let t = make_table();
        assert!(matches!(
            t.slice_rows(2..5),
            Err(TableError::RowRangeOutOfBounds { start: 2, end: 5, n_rows: 4 })
        ));
    }

    #[test]
    fn vstack_appends_rows() {
        let t = make_table();
        let top = t.slice_rows(0..1).unwrap();
        let bottom = t.slice_rows(3..4).unwrap();
        let stacked = top.vstack(&bottom).unwrap();
        assert_eq!(stacked.n_rows(), 2);
        assert_eq!(stacked.row(0), t.row(0));
        assert_eq!(stacked.row(1), t.row(3));
    }

    #[test]
    fn vstack_width_mismatch() {
        let a = Table::new(vec![vec![1.0, 2.0]]).unwrap();
        let b = Table::new(vec![vec![1.0]]).unwrap();
        assert_eq!(
            a.vstack(&b).unwrap_err(),
            TableError::WidthMismatch { expected: 2, got: 1 }
        );
    }

    #[test]
    fn select_gathers_with_repeats_and_reorders_columns() {
        let t = make_table();
        let s = t.select(&[3, 0, 3], &[2, 0]).unwrap();
        assert_eq!(s.n_rows(), 3);
        assert_eq!(s.n_cols(), 2);
        assert_eq!(s.row(0), &[1.0, 4.0]);
        assert_eq!(s.row(1), &[0.0, 1.0]);
        assert_eq!(s.row(2), &[1.0, 4.0]);
    }

    #[test]
    fn select_rejects_bad_indices() {
        let t = make_table();
        assert!(matches!(
            t.select(&[0], &[3]),
            Err(TableError::ColumnOutOfBounds { col: 3, n_cols: 3 })
        ));
        assert!(matches!(
            t.select(&[4], &[0]),
            Err(TableError::RowOutOfBounds { row: 4, n_rows: 4 })
        ));
    }

    #[test]
    fn partition_rows_preserves_order() {
        let t = make_table();
        let (low, high) = t.partition_rows(|row| row[0] < 3.0);
        assert_eq!(low.column(0), vec![1.0, 2.0]);
        assert_eq!(high.column(0), vec![3.0, 4.0]);
    }

    #[test]
    fn partition_rows_can_leave_a_side_empty() {
        let t = make_table();
        let (none, all) = t.partition_rows(|_| false);
        assert!(none.is_empty());
        assert_eq!(none.n_cols(), 3);
        assert_eq!(all, t);
    }
}
