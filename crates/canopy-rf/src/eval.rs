//! Contiguous k-fold cross-validation.

use std::ops::Range;

use canopy_table::{LabelColumn, Table};
use tracing::{info, instrument};

use crate::error::RfError;
use crate::metrics::accuracy;
use crate::model::Model;

/// Cross-validation configuration.
///
/// Folds are contiguous row ranges taken in table order, with no shuffling,
/// so a given table always produces the same folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossValidation {
    n_folds: usize,
}

/// Results of k-fold cross-validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidationResult {
    /// Accuracy percentage for each fold, in fold order.
    pub fold_accuracies: Vec<f64>,
    /// Mean accuracy across folds.
    pub mean_accuracy: f64,
    /// Population standard deviation of fold accuracies.
    pub std_accuracy: f64,
    /// Number of folds.
    pub n_folds: usize,
    /// Total number of rows.
    pub n_rows: usize,
}

impl CrossValidation {
    /// Create a new cross-validation config with the given number of folds.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidFoldCount`] if `n_folds` < 2.
    pub fn new(n_folds: usize) -> Result<Self, RfError> {
        if n_folds < 2 {
            return Err(RfError::InvalidFoldCount { n_folds });
        }
        Ok(Self { n_folds })
    }

    /// Return the number of folds.
    #[must_use]
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// Row range held out by the 1-based `fold` over a table of `n_rows`.
    ///
    /// Every fold spans `n_rows / n_folds` rows; the last one also takes the
    /// remainder.
    ///
    /// # Errors
    ///
    /// | Variant                            | When                          |
    /// |------------------------------------|-------------------------------|
    /// | [`RfError::FoldOutOfRange`]        | `fold` is not in `1..=n_folds` |
    /// | [`RfError::TooFewRowsForFolds`]    | `n_rows < n_folds`            |
    pub fn fold_range(&self, n_rows: usize, fold: usize) -> Result<Range<usize>, RfError> {
        if fold == 0 || fold > self.n_folds {
            return Err(RfError::FoldOutOfRange {
                fold,
                n_folds: self.n_folds,
            });
        }
        if n_rows < self.n_folds {
            return Err(RfError::TooFewRowsForFolds {
                n_rows,
                n_folds: self.n_folds,
            });
        }
        let fold_size = n_rows / self.n_folds;
        let start = (fold - 1) * fold_size;
        let end = if fold == self.n_folds {
            n_rows
        } else {
            fold * fold_size
        };
        Ok(start..end)
    }

    /// Split `table` into `(train, test)` for the 1-based `fold`.
    ///
    /// `test` is the fold's row range; `train` is every other fold stacked in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// Same as [`CrossValidation::fold_range`].
    pub fn split(&self, table: &Table, fold: usize) -> Result<(Table, Table), RfError> {
        let n_rows = table.n_rows();
        let test = table.slice_rows(self.fold_range(n_rows, fold)?)?;

        let mut train: Option<Table> = None;
        for other in (1..=self.n_folds).filter(|&f| f != fold) {
            let part = table.slice_rows(self.fold_range(n_rows, other)?)?;
            train = Some(match train {
                Some(acc) => acc.vstack(&part)?,
                None => part,
            });
        }
        // n_folds >= 2 guarantees at least one training fold.
        let train = train.ok_or(RfError::InvalidFoldCount {
            n_folds: self.n_folds,
        })?;
        Ok((train, test))
    }

    /// Run k-fold cross-validation.
    ///
    /// For each fold in order, `fit` trains a model on the training rows
    /// (with the same `label_col`), the model predicts the held-out rows, and
    /// the fold's accuracy is recorded. Hyperparameters travel inside `fit`.
    ///
    /// # Errors
    ///
    /// | Variant                          | Condition                         |
    /// |----------------------------------|-----------------------------------|
    /// | [`RfError::EmptyDataset`]        | zero rows                         |
    /// | [`RfError::Table`]               | `label_col` is out of range       |
    /// | [`RfError::TooFewRowsForFolds`]  | fewer rows than folds             |
    /// | Other errors                     | returned by `fit` or prediction   |
    #[instrument(skip_all, fields(n_folds = self.n_folds, n_rows = table.n_rows()))]
    pub fn evaluate<M, F>(
        &self,
        table: &Table,
        label_col: LabelColumn,
        mut fit: F,
    ) -> Result<CrossValidationResult, RfError>
    where
        M: Model,
        F: FnMut(&Table, LabelColumn) -> Result<M, RfError>,
    {
        if table.is_empty() {
            return Err(RfError::EmptyDataset);
        }
        let label = label_col.resolve(table.n_cols())?;
        let n_rows = table.n_rows();

        let mut fold_accuracies = Vec::with_capacity(self.n_folds);
        for fold in 1..=self.n_folds {
            let (train, test) = self.split(table, fold)?;
            let model = fit(&train, label_col)?;
            let predicted = model.predict(&test)?;
            let fold_accuracy = accuracy(&test.column(label), &predicted)?;
            fold_accuracies.push(fold_accuracy);

            info!(fold, accuracy = fold_accuracy, "fold completed");
        }

        let mean_accuracy = fold_accuracies.iter().sum::<f64>() / self.n_folds as f64;
        let std_accuracy = {
            let variance = fold_accuracies
                .iter()
                .map(|&a| (a - mean_accuracy).powi(2))
                .sum::<f64>()
                / self.n_folds as f64;
            variance.sqrt()
        };

        info!(mean_accuracy, std_accuracy, "cross-validation complete");

        Ok(CrossValidationResult {
            fold_accuracies,
            mean_accuracy,
            std_accuracy,
            n_folds: self.n_folds,
            n_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeatureSubset, RandomForestConfig};
    use crate::tree::DecisionTreeConfig;

    /// Predicts 0 for every row.
    struct AlwaysZero;

    impl Model for AlwaysZero {
        fn predict(&self, table: &Table) -> Result<Vec<f64>, RfError> {
            Ok(vec![0.0; table.n_rows()])
        }

        fn predict_row(&self, _row: &[f64]) -> Result<f64, RfError> {
            Ok(0.0)
        }

        fn is_fitted(&self) -> bool {
            true
        }
    }

    fn numbered(n: usize) -> Table {
        Table::new((1..=n).map(|i| vec![i as f64]).collect()).unwrap()
    }

    fn make_separable_table() -> Table {
        let mut rows = Vec::new();
        for (class, offset) in [(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)] {
            for i in 0..30 {
                rows.push(vec![offset + i as f64 * 0.1, 0.5, class]);
            }
        }
        Table::new(rows).unwrap()
    }

    #[test]
    fn constant_model_fold_accuracies() {
        let labels = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let table = Table::new(labels.iter().map(|&l| vec![0.0, l]).collect()).unwrap();
        let cv = CrossValidation::new(5).unwrap();
        let result = cv
            .evaluate(&table, LabelColumn::Index(1), |_, _| Ok(AlwaysZero))
            .unwrap();

        assert_eq!(result.fold_accuracies, vec![0.0, 0.0, 0.0, 50.0, 100.0]);
        assert_eq!(result.mean_accuracy, 30.0);
        assert_eq!(result.n_folds, 5);
        assert_eq!(result.n_rows, 10);
    }

    #[test]
    fn split_last_and_middle_folds() {
        let cv = CrossValidation::new(5).unwrap();
        let table = numbered(10);

        let (train, test) = cv.split(&table, 5).unwrap();
        assert_eq!(train.column(0), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(test.column(0), vec![9.0, 10.0]);

        let (train, test) = cv.split(&table, 2).unwrap();
        assert_eq!(train.column(0), vec![1.0, 2.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(test.column(0), vec![3.0, 4.0]);
    }

    #[test]
    fn last_fold_takes_remainder() {
        let cv = CrossValidation::new(5).unwrap();
        let (train, test) = cv.split(&numbered(11), 5).unwrap();
        assert_eq!(test.column(0), vec![9.0, 10.0, 11.0]);
        assert_eq!(train.n_rows(), 8);
    }

    #[test]
    fn folds_cover_every_row_once() {
        for (n_rows, n_folds) in [(10, 2), (11, 3), (7, 7), (100, 9)] {
            let cv = CrossValidation::new(n_folds).unwrap();
            let mut next = 0;
            for fold in 1..=n_folds {
                let range = cv.fold_range(n_rows, fold).unwrap();
                assert_eq!(range.start, next);
                assert!(!range.is_empty());
                next = range.end;
            }
            assert_eq!(next, n_rows);
        }
    }

    #[test]
    fn invalid_fold_count() {
        assert!(matches!(
            CrossValidation::new(0),
            Err(RfError::InvalidFoldCount { n_folds: 0 })
        ));
        assert!(CrossValidation::new(1).is_err());
    }

    #[test]
    fn fold_out_of_range() {
        let cv = CrossValidation::new(3).unwrap();
        assert!(matches!(
            cv.fold_range(9, 0),
            Err(RfError::FoldOutOfRange { fold: 0, n_folds: 3 })
        ));
        assert!(cv.fold_range(9, 4).is_err());
    }

    #[test]
    fn too_few_rows_for_folds() {
        let cv = CrossValidation::new(5).unwrap();
        let err = cv
            .evaluate(&numbered(4), LabelColumn::Last, |_, _| Ok(AlwaysZero))
            .unwrap_err();
        assert!(matches!(
            err,
            RfError::TooFewRowsForFolds {
                n_rows: 4,
                n_folds: 5
            }
        ));
    }

    #[test]
    fn fit_errors_propagate() {
        let cv = CrossValidation::new(2).unwrap();
        let err = cv
            .evaluate(&numbered(4), LabelColumn::Last, |train, label_col| {
                DecisionTreeConfig::new().fit(train, label_col)
            })
            .unwrap_err();
        assert!(matches!(err, RfError::TooFewColumns { n_cols: 1 }));
    }

    #[test]
    fn decision_tree_cross_validation() {
        // Contiguous folds of a class-sorted table hold out whole classes,
        // so interleave the rows first.
        let table = make_separable_table();
        let order: Vec<usize> = (0..30).flat_map(|i| [i, 30 + i, 60 + i]).collect();
        let table = table.select(&order, &[0, 1, 2]).unwrap();

        let config = DecisionTreeConfig::new().with_max_depth(5);
        let result = CrossValidation::new(5)
            .unwrap()
            .evaluate(&table, LabelColumn::Last, |train, label_col| {
                config.fit(train, label_col)
            })
            .unwrap();
        assert_eq!(result.fold_accuracies.len(), 5);
        assert!(result.mean_accuracy > 90.0, "mean = {}", result.mean_accuracy);
    }

    #[test]
    fn random_forest_cross_validation() {
        let table = make_separable_table();
        let order: Vec<usize> = (0..30).flat_map(|i| [i, 30 + i, 60 + i]).collect();
        let table = table.select(&order, &[0, 1, 2]).unwrap();

        let config = RandomForestConfig::new(15)
            .unwrap()
            .with_feature_subset(FeatureSubset::All)
            .with_seed(42);
        let result = CrossValidation::new(3)
            .unwrap()
            .evaluate(&table, LabelColumn::Last, |train, label_col| {
                config.fit(train, label_col)
            })
            .unwrap();
        assert_eq!(result.fold_accuracies.len(), 3);
        assert!(result.mean_accuracy > 80.0, "mean = {}", result.mean_accuracy);
        assert!(result.std_accuracy >= 0.0);
    }
}
