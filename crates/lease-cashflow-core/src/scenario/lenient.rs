//! Field-level deserializers that never reject a scenario.
//!
//! Lease terms arrive from hand-edited forms and from upstream document
//! extraction, so numbers show up as strings with currency symbols, dates
//! in several layouts, and nulls where a value was not found. Each helper
//! maps whatever it sees to the closest usable value, falling back to the
//! field's default.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a loosely formatted number. `"$1,250.50"` → 1250.50, `"5%"` → 0.05.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let is_percent = trimmed.ends_with('%');
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' ' | '_'))
        .collect();
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    if is_percent {
        Some(value / Decimal::ONE_HUNDRED)
    } else {
        Some(value)
    }
}

/// Parse a date in ISO (`2026-01-31`), ISO timestamp or US (`01/31/2026`)
/// layout.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn value_to_count(value: &Value) -> Option<u32> {
    let d = value_to_decimal(value)?;
    if d <= Decimal::ZERO {
        return Some(0);
    }
    Some(d.trunc().to_u32().unwrap_or(u32::MAX))
}

/// Decimal field; anything unparseable becomes zero.
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_decimal(&value).unwrap_or_default())
}

/// Optional decimal field; anything unparseable becomes `None`.
pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_decimal(&value))
}

/// Non-negative whole count (months, spaces). Negatives clamp to zero and
/// fractions truncate.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_count(&value).unwrap_or(0))
}

pub fn opt_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_count(&value))
}

pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => parse_date(&s),
        _ => None,
    })
}

/// Free text; numbers are stringified and null becomes empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// List field; null becomes empty and malformed elements are dropped.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Normalize an enum tag: lowercase, with spaces and dashes folded to `_`.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_currency_and_percent() {
        assert_eq!(parse_decimal("$1,250.50"), Some(dec!(1250.50)));
        assert_eq!(parse_decimal("5%"), Some(dec!(0.05)));
        assert_eq!(parse_decimal(" 42 "), Some(dec!(42)));
        assert_eq!(parse_decimal("1e3"), Some(dec!(1000)));
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert_eq!(parse_date("2026-03-01"), expected);
        assert_eq!(parse_date("03/01/2026"), expected);
        assert_eq!(parse_date("2026-03-01T00:00:00Z"), expected);
        assert_eq!(parse_date("2026-03-01T09:30:00"), expected);
        assert_eq!(parse_date("March 1st"), None);
        assert_eq!(parse_date("2026-02-30"), None);
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag(" Base-Year "), "base_year");
        assert_eq!(normalize_tag("NNN"), "nnn");
    }
}
