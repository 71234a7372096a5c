use canopy_table::Table;

use crate::error::RfError;
use crate::forest::RandomForest;
use crate::tree::DecisionTree;

/// A fitted classifier that labels rows of a table.
///
/// Rows always use the column layout of the table the model was trained on.
pub trait Model {
    /// Predict one label per row of `table`, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::RowTooShort`] when `table` lacks a column the model reads.
    fn predict(&self, table: &Table) -> Result<Vec<f64>, RfError>;

    /// Predict the label of a single row.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::RowTooShort`] when `row` lacks a column the model reads.
    fn predict_row(&self, row: &[f64]) -> Result<f64, RfError>;

    /// Return `true` if the model is ready to predict.
    fn is_fitted(&self) -> bool;
}

impl Model for DecisionTree {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, RfError> {
        DecisionTree::predict(self, table)
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, RfError> {
        DecisionTree::predict_row(self, row)
    }

    // A tree only exists once induction has produced its root.
    fn is_fitted(&self) -> bool {
        true
    }
}

impl Model for RandomForest {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, RfError> {
        RandomForest::predict(self, table)
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, RfError> {
        RandomForest::predict_row(self, row)
    }

    fn is_fitted(&self) -> bool {
        RandomForest::is_fitted(self)
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, RfError> {
        (**self).predict(table)
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, RfError> {
        (**self).predict_row(row)
    }

    fn is_fitted(&self) -> bool {
        (**self).is_fitted()
    }
}
