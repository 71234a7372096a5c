//! Gini impurity of labels and of binary partitions.
//!
//! Class membership is counted against a class set (the sorted distinct
//! labels of the whole induction), so a partition's impurity accounts for
//! every class, not just the ones that happen to be present. Labels are
//! compared numerically: `-0.0` and `0.0` are the same class.

use std::cmp::Ordering;

use crate::node::Impurity;

/// Map `-0.0` onto `0.0` so ordering agrees with `==`.
fn normalize(label: f64) -> f64 {
    label + 0.0
}

/// Return the sorted distinct label values in `labels`.
#[must_use]
pub fn class_set(labels: &[f64]) -> Vec<f64> {
    let mut classes: Vec<f64> = labels.iter().map(|&l| normalize(l)).collect();
    classes.sort_unstable_by(f64::total_cmp);
    classes.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
    classes
}

/// Position of `label` in the sorted class set, if it is a known class.
pub(crate) fn class_position(classes: &[f64], label: f64) -> Option<usize> {
    let label = normalize(label);
    classes.binary_search_by(|c| c.total_cmp(&label)).ok()
}

/// Count how many labels fall in each class of `classes`.
///
/// Labels outside the class set are not counted.
pub(crate) fn class_counts(labels: &[f64], classes: &[f64]) -> Vec<usize> {
    let mut counts = vec![0usize; classes.len()];
    for &label in labels {
        if let Some(c) = class_position(classes, label) {
            counts[c] += 1;
        }
    }
    counts
}

/// `1 - Σ p_c²` over the class counts of one group of `n` rows.
fn group_gini(counts: &[usize], n: usize) -> f64 {
    let size = n as f64;
    let score: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / size;
            p * p
        })
        .sum();
    1.0 - score
}

/// Size-weighted Gini of a two-group partition given each side's class counts.
///
/// Empty sides contribute nothing. Every row of both sides must be counted
/// in exactly one class.
pub(crate) fn partition_gini(
    left_counts: &[usize],
    n_left: usize,
    right_counts: &[usize],
    n_right: usize,
) -> Impurity {
    let total = (n_left + n_right) as f64;
    let mut gini = 0.0;
    for (counts, n) in [(left_counts, n_left), (right_counts, n_right)] {
        if n == 0 {
            continue;
        }
        gini += group_gini(counts, n) * (n as f64 / total);
    }
    Impurity::new(gini)
}

/// Weighted Gini impurity of splitting labels into `left` and `right`.
///
/// Each non-empty side contributes `(1 - Σ p_c²) · |side| / (|left| + |right|)`
/// where `p_c` runs over every class seen on either side. The result is zero
/// exactly when each side is single-class. Returns zero when both sides are
/// empty.
#[must_use]
pub fn gini(left: &[f64], right: &[f64]) -> Impurity {
    if left.is_empty() && right.is_empty() {
        return Impurity::new(0.0);
    }
    let mut labels = left.to_vec();
    labels.extend_from_slice(right);
    let classes = class_set(&labels);
    partition_gini(
        &class_counts(left, &classes),
        left.len(),
        &class_counts(right, &classes),
        right.len(),
    )
}

/// Gini impurity of a single unsplit group of labels.
#[must_use]
pub fn node_impurity(labels: &[f64]) -> Impurity {
    gini(labels, &[])
}
