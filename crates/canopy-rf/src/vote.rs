//! Majority vote (mode) over label values.

/// Return the most frequent value in `values`, or `None` when empty.
///
/// Counts are tallied in order of first appearance and the running winner is
/// only replaced by a strictly greater count, so ties go to whichever of the
/// tied values appears first in `values`.
#[must_use]
pub fn majority(values: &[f64]) -> Option<f64> {
    let mut tally: Vec<(f64, usize)> = Vec::new();
    for &v in values {
        match tally.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, count)) => *count += 1,
            None => tally.push((v, 1)),
        }
    }
    let mut entries = tally.into_iter();
    let first = entries.next()?;
    Some(
        entries
            .fold(first, |best, entry| if entry.1 > best.1 { entry } else { best })
            .0,
    )
}
