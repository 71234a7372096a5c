//! CART decision trees, bagged random forests and k-fold cross-validation.
//!
//! Trees are grown greedily on weighted Gini impurity over a numeric
//! [`Table`] with one label column. A random forest trains one tree per
//! estimator on a bootstrap sample of rows and a random subset of feature
//! columns, in parallel via rayon, and predicts by majority vote.
//! [`CrossValidation`] scores any [`Model`] over contiguous folds.

mod config;
mod error;
mod eval;
mod forest;
mod impurity;
mod metrics;
mod model;
mod node;
mod predict;
mod split;
mod tree;
mod vote;

pub use canopy_table::{LabelColumn, Table, TableError};
pub use config::{FeatureSubset, RandomForestConfig};
pub use error::RfError;
pub use eval::{CrossValidation, CrossValidationResult};
pub use forest::{Estimator, RandomForest};
pub use impurity::{class_set, gini, node_impurity};
pub use metrics::accuracy;
pub use model::Model;
pub use node::{FeatureIndex, Impurity, Node};
pub use split::{Partition, Split, best_split};
pub use tree::{DecisionTree, DecisionTreeConfig};
pub use vote::majority;
