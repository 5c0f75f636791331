//! Lenient identity decoding.
//!
//! The backend is not consistent about identity fields: they arrive as numbers, as numeric
//! strings, or not at all. Records are still accepted in every case; an identity that cannot be
//! read as an integer decodes to `None` and the record is later ignored by the store.
//! Reading the identity out of a row is done by [`crate::row::Row::id`].

use serde_json::Value;

/// Coerces a JSON value into an integer identity.
///
/// Accepts integers, integral floats and strings holding an integer (surrounding whitespace is
/// ignored). Everything else, including fractional numbers, yields `None`.
pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
