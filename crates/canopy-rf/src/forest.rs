//! Random forest training with parallel tree construction.

use canopy_table::{LabelColumn, Table};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::RandomForestConfig;
use crate::error::RfError;
use crate::tree::{DecisionTree, DecisionTreeConfig, validate_training_table};

/// One member of a forest: a tree and the columns it was trained on.
///
/// The tree was fitted on a sub-table whose columns were
/// `feature_map ++ [label]`, so its feature `i` is column `feature_map[i]`
/// of the original table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Estimator {
    pub(crate) tree: DecisionTree,
    pub(crate) feature_map: Vec<usize>,
}

impl Estimator {
    /// Borrow the fitted tree.
    #[must_use]
    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Original-table column index for each of the tree's feature positions.
    #[must_use]
    pub fn feature_map(&self) -> &[usize] {
        &self.feature_map
    }
}

/// A fitted random forest ensemble.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RandomForest {
    pub(crate) estimators: Vec<Estimator>,
    pub(crate) n_cols: usize,
    pub(crate) label: usize,
    pub(crate) score: f64,
}

/// Random draws for one estimator.
struct Draw {
    columns: Vec<usize>,
    rows: Vec<usize>,
}

/// Every column of an `n_cols`-wide table except the label.
pub(crate) fn feature_pool(n_cols: usize, label: usize) -> Vec<usize> {
    (0..n_cols).filter(|&j| j != label).collect()
}

/// Draw `k` distinct columns from `pool` without replacement, sorted ascending.
pub(crate) fn draw_columns(pool: &[usize], k: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut columns: Vec<usize> = rand::seq::index::sample(rng, pool.len(), k)
        .into_iter()
        .map(|i| pool[i])
        .collect();
    columns.sort_unstable();
    columns
}

/// Draw `n_rows` row indices uniformly with replacement.
pub(crate) fn bootstrap_rows(n_rows: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect()
}

/// Train the random forest ensemble.
///
/// All random draws come from one generator seeded with `config.seed`, taken
/// sequentially per estimator (columns, then rows), so the result does not
/// depend on how the inductions are scheduled.
#[instrument(skip_all, fields(n_estimators = config.n_estimators, n_rows = table.n_rows()))]
pub(crate) fn train(
    config: &RandomForestConfig,
    table: &Table,
    label_col: LabelColumn,
) -> Result<RandomForest, RfError> {
    // --- Validate inputs ---
    let label = validate_training_table(table, label_col)?;
    if config.n_estimators == 0 {
        return Err(RfError::InvalidEstimatorCount { n_estimators: 0 });
    }
    if config.max_depth == 0 {
        return Err(RfError::InvalidMaxDepth { max_depth: 0 });
    }

    let n_rows = table.n_rows();
    let pool = feature_pool(table.n_cols(), label);
    let n_selected = config.feature_subset.resolve(pool.len())?;

    info!(
        n_estimators = config.n_estimators,
        n_rows,
        n_features = pool.len(),
        n_selected,
        "training random forest"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let draws: Vec<Draw> = (0..config.n_estimators)
        .map(|_| {
            let columns = draw_columns(&pool, n_selected, &mut rng);
            let rows = bootstrap_rows(n_rows, &mut rng);
            Draw { columns, rows }
        })
        .collect();

    let tree_config = DecisionTreeConfig::new()
        .with_max_depth(config.max_depth)
        .with_min_partition_size(config.min_partition_size);

    // Parallel tree training; collect keeps estimator order.
    let estimators: Vec<Estimator> = draws
        .into_par_iter()
        .map(|Draw { columns, rows }| {
            let mut selected = columns.clone();
            selected.push(label);
            let sub_table = table.select(&rows, &selected)?;
            let tree = tree_config.fit(&sub_table, LabelColumn::Last)?;
            Ok(Estimator {
                tree,
                feature_map: columns,
            })
        })
        .collect::<Result<_, RfError>>()?;

    debug!(n_trained = estimators.len(), "tree training complete");

    Ok(RandomForest {
        estimators,
        n_cols: table.n_cols(),
        label,
        score: 0.0,
    })
}
