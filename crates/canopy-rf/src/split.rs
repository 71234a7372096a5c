use canopy_table::{LabelColumn, Table};

use crate::error::RfError;
use crate::impurity::{class_position, class_set, partition_gini};
use crate::node::{FeatureIndex, Impurity};

/// Rows of a table divided by a split rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Partition {
    /// Both sides received at least one row.
    TwoSided {
        /// Rows with `row[feature] < threshold`, in input order.
        left: Table,
        /// Rows with `row[feature] >= threshold`, in input order.
        right: Table,
    },
    /// Every row landed on the same side; holds those rows.
    ///
    /// [`best_split`] never returns this: it only scores candidates that
    /// leave both sides non-empty. Tree induction still handles it as a
    /// degenerate split.
    OneSided(Table),
}

impl Partition {
    /// Return the left table when the partition is two-sided.
    #[must_use]
    pub fn left(&self) -> Option<&Table> {
        match self {
            Partition::TwoSided { left, .. } => Some(left),
            Partition::OneSided(_) => None,
        }
    }

    /// Return the right table when the partition is two-sided.
    #[must_use]
    pub fn right(&self) -> Option<&Table> {
        match self {
            Partition::TwoSided { right, .. } => Some(right),
            Partition::OneSided(_) => None,
        }
    }
}

/// The lowest-impurity split found over a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Column the split tests.
    pub feature: FeatureIndex,
    /// Observed value used as the threshold.
    pub threshold: f64,
    /// Weighted Gini impurity of the resulting partition.
    pub score: Impurity,
    /// The rows on each side.
    pub partition: Partition,
}

/// Divide `table` on `row[feature] < threshold`.
pub(crate) fn partition(table: &Table, feature: usize, threshold: f64) -> Partition {
    let (left, right) = table.partition_rows(|row| row[feature] < threshold);
    match (left.is_empty(), right.is_empty()) {
        (false, false) => Partition::TwoSided { left, right },
        (true, _) => Partition::OneSided(right),
        (false, true) => Partition::OneSided(left),
    }
}

/// Find the split with the lowest weighted Gini impurity.
///
/// Every non-label column is tried against every value observed in it:
/// rows strictly below the value go left, the rest go right. Candidates
/// leaving a side empty are skipped. The first candidate with the lowest
/// score wins, visiting columns in order and, within a column, thresholds
/// in the order their first row appears. The search stops at the first
/// perfect (zero-impurity) split.
///
/// Impurity is counted over the distinct labels of `table`'s label column.
///
/// Returns `Ok(None)` when no column yields a two-sided partition, for
/// example when every row is identical.
///
/// # Errors
///
/// Returns [`RfError::Table`] if `label_col` does not exist in `table`.
pub fn best_split(table: &Table, label_col: LabelColumn) -> Result<Option<Split>, RfError> {
    let label = label_col.resolve(table.n_cols())?;
    let classes = class_set(&table.column(label));
    Ok(find_best_split(table, label, &classes))
}

/// A threshold candidate within one column.
struct Candidate {
    first_row: usize,
    threshold: f64,
    score: Impurity,
}

/// Search with a class set fixed by the caller, which must contain every
/// label in `table`. Induction passes the root's set down to every subtree.
pub(crate) fn find_best_split(table: &Table, label: usize, classes: &[f64]) -> Option<Split> {
    let n_rows = table.n_rows();
    if n_rows < 2 {
        return None;
    }

    let row_class: Vec<Option<usize>> = table
        .rows()
        .map(|row| class_position(classes, row[label]))
        .collect();
    let mut parent_counts = vec![0usize; classes.len()];
    for c in row_class.iter().flatten() {
        parent_counts[*c] += 1;
    }

    let mut best: Option<(usize, f64, Impurity)> = None;

    'columns: for feature in (0..table.n_cols()).filter(|&j| j != label) {
        for candidate in column_candidates(table, feature, &row_class, &parent_counts) {
            if best.is_none_or(|(_, _, score)| candidate.score < score) {
                best = Some((feature, candidate.threshold, candidate.score));
            }
            if best.is_some_and(|(_, _, score)| score.is_pure()) {
                break 'columns;
            }
        }
    }

    let (feature, threshold, score) = best?;
    Some(Split {
        feature: FeatureIndex::new(feature),
        threshold,
        score,
        partition: partition(table, feature, threshold),
    })
}

/// Score every usable threshold of one column.
///
/// Sorts the column once and sweeps it with running class counts, then
/// returns the candidates ordered by the first row holding each threshold
/// value, which is the order an exhaustive row-by-row scan would meet them.
fn column_candidates(
    table: &Table,
    feature: usize,
    row_class: &[Option<usize>],
    parent_counts: &[usize],
) -> Vec<Candidate> {
    let n_rows = table.n_rows();
    let mut sorted: Vec<(f64, usize)> = table
        .rows()
        .enumerate()
        .map(|(i, row)| (row[feature], i))
        .collect();
    sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut left_counts = vec![0usize; parent_counts.len()];
    let mut right_counts = parent_counts.to_vec();
    let mut candidates = Vec::new();

    let mut start = 0;
    while start < n_rows {
        let value = sorted[start].0;
        let end = start
            + sorted[start..]
                .iter()
                .take_while(|(v, _)| *v == value)
                .count();

        // Rows in `sorted[..start]` are strictly below `value`.
        if start > 0 {
            let first_row = sorted[start..end]
                .iter()
                .map(|&(_, i)| i)
                .min()
                .unwrap_or(sorted[start].1);
            candidates.push(Candidate {
                first_row,
                threshold: value,
                score: partition_gini(&left_counts, start, &right_counts, n_rows - start),
            });
        }

        for &(_, i) in &sorted[start..end] {
            if let Some(c) = row_class[i] {
                left_counts[c] += 1;
                right_counts[c] -= 1;
            }
        }
        start = end;
    }

    candidates.sort_unstable_by_key(|c| c.first_row);
    candidates
}
