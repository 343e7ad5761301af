//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Saturate `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics when `min > max`; the lower bound wins.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Floor a f64 and clamp it to the u32 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let max = f64::from(u32::MAX);
    let clamped = value.clamp(0.0, max).floor();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Floor a f64 into i64, saturating at the range ends and returning 0 for NaN.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    cast::<f64, i64>(value.floor()).unwrap_or(if value > 0.0 { i64::MAX } else { i64::MIN })
}

#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert a collection length to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Index into a slice of `len` elements using a unit-interval draw (`floor(unit * len)`).
#[must_use]
pub fn unit_to_index(unit: f64, len: usize) -> usize {
    if len == 0 || !unit.is_finite() {
        return 0;
    }
    let scaled = (unit * usize_to_f64(len)).floor();
    cast::<f64, usize>(scaled).map_or(0, |idx| idx.min(len - 1))
}
