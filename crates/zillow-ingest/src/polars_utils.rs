//! Numeric formatting shared by the record sources.

/// Formats a float without a trailing fractional zero (`6037.0` -> `6037`).
pub fn format_numeric(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
