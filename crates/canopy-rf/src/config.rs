//! Configuration builder for random forest training.

use canopy_table::{LabelColumn, Table};

use crate::error::RfError;
use crate::forest::RandomForest;

/// Strategy for sizing the feature subset each estimator is trained on.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FeatureSubset {
    /// `floor(round(1/√p, 1) · p)` of the `p` feature columns, roughly `√p`.
    SqrtFraction,
    /// `ceil(f · p)` of the `p` feature columns; `f` must be in (0.0, 1.0].
    Fraction(f64),
    /// A fixed count.
    Fixed(usize),
    /// Every feature column.
    All,
}

impl FeatureSubset {
    /// Resolve to a concrete subset size for a pool of `n_features` columns.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidFeatureSubset`] when the size resolves to 0 or
    /// exceeds `n_features`.
    pub fn resolve(self, n_features: usize) -> Result<usize, RfError> {
        let p = n_features as f64;
        let n_selected = match self {
            FeatureSubset::SqrtFraction => {
                let fraction = (10.0 / p.sqrt()).round() / 10.0;
                (fraction * p) as usize
            }
            FeatureSubset::Fraction(f) => (f * p).ceil() as usize,
            FeatureSubset::Fixed(n) => n,
            FeatureSubset::All => n_features,
        };
        let fraction_ok = match self {
            FeatureSubset::Fraction(f) => f > 0.0 && f <= 1.0,
            _ => true,
        };
        if !fraction_ok || n_selected == 0 || n_selected > n_features {
            return Err(RfError::InvalidFeatureSubset {
                n_selected,
                n_features,
            });
        }
        Ok(n_selected)
    }
}

/// Configuration for random forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter            | Default        |
/// |----------------------|----------------|
/// | `max_depth`          | 10             |
/// | `min_partition_size` | 1              |
/// | `seed`               | 42             |
/// | `feature_subset`     | `SqrtFraction` |
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestConfig {
    pub(crate) n_estimators: usize,
    pub(crate) max_depth: usize,
    pub(crate) min_partition_size: usize,
    pub(crate) seed: u64,
    pub(crate) feature_subset: FeatureSubset,
}

impl RandomForestConfig {
    /// Create a new config with the given number of estimators.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidEstimatorCount`] if `n_estimators` is zero.
    pub fn new(n_estimators: usize) -> Result<Self, RfError> {
        if n_estimators == 0 {
            return Err(RfError::InvalidEstimatorCount { n_estimators });
        }
        Ok(Self {
            n_estimators,
            max_depth: 10,
            min_partition_size: 1,
            seed: 42,
            feature_subset: FeatureSubset::SqrtFraction,
        })
    }

    // --- Setters ---

    /// Set the maximum depth of every estimator.
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

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the per-estimator feature subset strategy.
    #[must_use]
    pub fn with_feature_subset(mut self, feature_subset: FeatureSubset) -> Self {
        self.feature_subset = feature_subset;
        self
    }

    // --- Getters ---

    /// Return the number of estimators.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Return the maximum depth of every estimator.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum partition size.
    #[must_use]
    pub fn min_partition_size(&self) -> usize {
        self.min_partition_size
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the feature subset strategy.
    #[must_use]
    pub fn feature_subset(&self) -> FeatureSubset {
        self.feature_subset
    }

    /// Train a random forest on `table`, predicting the column at `label_col`.
    ///
    /// # Errors
    ///
    /// | Variant                            | When                                              |
    /// |------------------------------------|---------------------------------------------------|
    /// | [`RfError::EmptyDataset`]          | `table` has zero rows                             |
    /// | [`RfError::TooFewColumns`]         | `table` has fewer than 2 columns                  |
    /// | [`RfError::Table`]                 | `label_col` is out of range                       |
    /// | [`RfError::InvalidMaxDepth`]       | `max_depth` is 0                                  |
    /// | [`RfError::InvalidFeatureSubset`]  | the subset resolves outside [1, n_features]       |
    pub fn fit(&self, table: &Table, label_col: LabelColumn) -> Result<RandomForest, RfError> {
        crate::forest::train(self, table, label_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_fraction_sizes() {
        let s = FeatureSubset::SqrtFraction;
        assert_eq!(s.resolve(1).unwrap(), 1);
        assert_eq!(s.resolve(2).unwrap(), 1);
        assert_eq!(s.resolve(4).unwrap(), 2);
        assert_eq!(s.resolve(9).unwrap(), 2);
        assert_eq!(s.resolve(16).unwrap(), 4);
        assert_eq!(s.resolve(100).unwrap(), 10);
    }

    #[test]
    fn sqrt_fraction_rounds_to_zero_for_wide_tables() {
        let err = FeatureSubset::SqrtFraction.resolve(500).unwrap_err();
        assert!(matches!(
            err,
            RfError::InvalidFeatureSubset { n_selected: 0, n_features: 500 }
        ));
    }

    #[test]
    fn fraction_fixed_all() {
        assert_eq!(FeatureSubset::Fraction(0.5).resolve(5).unwrap(), 3);
        assert_eq!(FeatureSubset::Fixed(3).resolve(5).unwrap(), 3);
        assert_eq!(FeatureSubset::All.resolve(5).unwrap(), 5);
    }

    #[test]
    fn invalid_subsets() {
        assert!(FeatureSubset::Fraction(0.0).resolve(5).is_err());
        assert!(FeatureSubset::Fraction(1.5).resolve(5).is_err());
        assert!(FeatureSubset::Fraction(f64::NAN).resolve(5).is_err());
        assert!(FeatureSubset::Fixed(0).resolve(5).is_err());
        assert!(FeatureSubset::Fixed(6).resolve(5).is_err());
    }

    #[test]
    fn invalid_estimator_count() {
        assert!(matches!(
            RandomForestConfig::new(0),
            Err(RfError::InvalidEstimatorCount { n_estimators: 0 })
        ));
    }

    #[test]
    fn builder_roundtrip() {
        let config = RandomForestConfig::new(7)
            .unwrap()
            .with_max_depth(3)
            .with_min_partition_size(4)
            .with_seed(9)
            .with_feature_subset(FeatureSubset::All);
        assert_eq!(config.n_estimators(), 7);
        assert_eq!(config.max_depth(), 3);
        assert_eq!(config.min_partition_size(), 4);
        assert_eq!(config.seed(), 9);
        assert_eq!(config.feature_subset(), FeatureSubset::All);
    }
}
