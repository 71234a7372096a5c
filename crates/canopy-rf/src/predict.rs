//! Prediction methods for the random forest ensemble.

use canopy_table::Table;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::RfError;
use crate::forest::{Estimator, RandomForest};
use crate::vote::majority;

impl Estimator {
    /// Predict one full-layout row with this member's tree.
    ///
    /// The row is projected onto `feature_map` before descending, so it uses
    /// the column layout of the table the forest was trained on.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::RowTooShort`] when `row` lacks a mapped column.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, RfError> {
        let projected = self
            .feature_map
            .iter()
            .map(|&col| row.get(col).copied())
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| RfError::RowTooShort {
                required: self.feature_map.iter().copied().max().unwrap_or_default(),
                got: row.len(),
            })?;
        self.tree.predict_row(&projected)
    }
}

impl RandomForest {
    /// Predict the class label for a single row by majority vote.
    ///
    /// Each estimator votes with its tree's prediction on the row projected
    /// onto its columns. The most common vote wins; ties go to the label
    /// first voted, in estimator order.
    ///
    /// # Errors
    ///
    /// | Variant                     | When                                       |
    /// |-----------------------------|--------------------------------------------|
    /// | [`RfError::RowTooShort`]    | `row` lacks a column some estimator reads  |
    /// | [`RfError::EmptyEnsemble`]  | the forest holds no estimators             |
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, RfError> {
        let votes = self
            .estimators
            .iter()
            .map(|estimator| estimator.predict_row(row))
            .collect::<Result<Vec<f64>, RfError>>()?;
        majority(&votes).ok_or(RfError::EmptyEnsemble)
    }

    /// Predict class labels for every row of `table` in parallel, in row order.
    ///
    /// # Errors
    ///
    /// Same as [`RandomForest::predict_row`], for the first failing row.
    pub fn predict(&self, table: &Table) -> Result<Vec<f64>, RfError> {
        let rows: Vec<&[f64]> = table.rows().collect();
        rows.into_par_iter()
            .map(|row| self.predict_row(row))
            .collect()
    }

    /// Return `true` once the forest holds estimators and a non-negative score.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.estimators.is_empty() && self.score >= 0.0
    }

    /// Return the externally recorded score (0.0 until set).
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Record a score, typically a cross-validated accuracy.
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// Return the number of estimators in the ensemble.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.estimators.len()
    }

    /// Borrow the estimators in training order.
    #[must_use]
    pub fn estimators(&self) -> &[Estimator] {
        &self.estimators
    }

    /// Return the column count of the training table.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Return the resolved label column of the training table.
    #[must_use]
    pub fn label_index(&self) -> usize {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use canopy_table::{LabelColumn, Table};

    use crate::config::RandomForestConfig;
    use crate::error::RfError;
    use crate::forest::{Estimator, RandomForest};
    use crate::tree::DecisionTreeConfig;

    /// A tree that predicts `label` everywhere, reading column 0 of its input.
    fn constant_estimator(label: f64, feature_map: Vec<usize>) -> Estimator {
        let table = Table::new(vec![vec![0.0, label], vec![1.0, label]]).unwrap();
        let tree = DecisionTreeConfig::new().fit(&table, LabelColumn::Last).unwrap();
        Estimator { tree, feature_map }
    }

    fn forest_of(labels: &[f64]) -> RandomForest {
        RandomForest {
            estimators: labels
                .iter()
                .map(|&l| constant_estimator(l, vec![0]))
                .collect(),
            n_cols: 2,
            label: 1,
            score: 0.0,
        }
    }

    #[test]
    fn majority_of_votes_wins() {
        let forest = forest_of(&[1.0, 0.0, 1.0, 2.0, 1.0]);
        assert_eq!(forest.predict_row(&[0.5, 0.0]).unwrap(), 1.0);
    }

    #[test]
    fn tied_votes_go_to_first_voted() {
        let forest = forest_of(&[2.0, 0.0, 0.0, 2.0]);
        assert_eq!(forest.predict_row(&[0.5, 0.0]).unwrap(), 2.0);
    }

    #[test]
    fn projection_reads_mapped_columns() {
        // Trained on [x, label]; mapped to column 3 of a wider layout.
        let table = Table::new(vec![vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
        let tree = DecisionTreeConfig::new().fit(&table, LabelColumn::Last).unwrap();
        let estimator = Estimator {
            tree,
            feature_map: vec![3],
        };
        assert_eq!(estimator.predict_row(&[9.0, 9.0, 9.0, 0.0]).unwrap(), 0.0);
        assert_eq!(estimator.predict_row(&[0.0, 0.0, 0.0, 1.0]).unwrap(), 1.0);
        let err = estimator.predict_row(&[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, RfError::RowTooShort { required: 3, got: 2 }));
    }

    #[test]
    fn batch_matches_individual() {
        let table = Table::new(
            (0..30)
                .map(|i| vec![i as f64, (i % 7) as f64, f64::from(i >= 15)])
                .collect(),
        )
        .unwrap();
        let forest = RandomForestConfig::new(8)
            .unwrap()
            .with_seed(3)
            .fit(&table, LabelColumn::Last)
            .unwrap();

        let batch = forest.predict(&table).unwrap();
        for (i, row) in table.rows().enumerate() {
            assert_eq!(batch[i], forest.predict_row(row).unwrap());
        }
    }

    #[test]
    fn score_and_fitted_state() {
        let mut forest = forest_of(&[1.0]);
        assert!(forest.is_fitted());
        assert_eq!(forest.score(), 0.0);

        forest.set_score(87.5);
        assert_eq!(forest.score(), 87.5);

        forest.set_score(-1.0);
        assert!(!forest.is_fitted());

        let empty = RandomForest {
            estimators: Vec::new(),
            n_cols: 2,
            label: 1,
            score: 0.0,
        };
        assert!(!empty.is_fitted());
        assert!(matches!(
            empty.predict_row(&[0.0, 0.0]),
            Err(RfError::EmptyEnsemble)
        ));
    }
}
