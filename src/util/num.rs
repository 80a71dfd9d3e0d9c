/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: i64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// # Errors
/// Returns `Err(error)` if the magnitude exceeds [`MAX_SAFE_INT`].
///
/// # Example
/// ```
/// use pseudo9608::util::num::{MAX_SAFE_INT, i64_to_f64_checked};
///
/// assert_eq!(i64_to_f64_checked(42, "too big"), Ok(42.0));
/// assert!(i64_to_f64_checked(MAX_SAFE_INT + 1, "too big").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_INT.unsigned_abs() {
        return Err(error);
    }
    Ok(value as f64)
}

/// Safely converts an `f64` to `i64`, truncating toward zero.
///
/// # Errors
/// Returns `Err(error)` if the value is not finite or its truncation falls
/// outside the `i64` range.
///
/// # Example
/// ```
/// use pseudo9608::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(3.7, "bad"), Ok(3));
/// assert_eq!(f64_to_i64_checked(-3.7, "bad"), Ok(-3));
/// assert!(f64_to_i64_checked(f64::INFINITY, "bad").is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_i64_checked<E>(value: f64, error: E) -> Result<i64, E> {
    if !value.is_finite() {
        return Err(error);
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return Err(error);
    }
    Ok(truncated as i64)
}
