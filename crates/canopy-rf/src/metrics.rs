use crate::error::RfError;

/// Percentage of positions where `predicted` equals `actual`, in [0, 100].
///
/// Labels are compared for exact equality.
///
/// # Errors
///
/// | Variant                      | When                          |
/// |------------------------------|-------------------------------|
/// | [`RfError::LengthMismatch`]  | the slices differ in length   |
/// | [`RfError::EmptyInput`]      | both slices are empty         |
pub fn accuracy(actual: &[f64], predicted: &[f64]) -> Result<f64, RfError> {
    if actual.len() != predicted.len() {
        return Err(RfError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(RfError::EmptyInput);
    }
    let correct = actual
        .iter()
        .zip(predicted)
        .filter(|&(a, p)| a == p)
        .count();
    Ok(correct as f64 / actual.len() as f64 * 100.0)
}
