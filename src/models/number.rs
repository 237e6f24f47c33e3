use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a loose form value. Numeric strings are accepted; null, booleans,
/// garbage, NaN and infinities give `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|n| n.is_finite())
}

/// Like `parse_number` but anything unparseable becomes 0.
pub fn coerce_number(value: &Value) -> f64 {
    parse_number(value).unwrap_or(0.0)
}

// Form inputs arrive as strings as often as numbers
pub fn deserialize_coerced_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_number).unwrap_or(0.0))
}

/// Like `deserialize_coerced_f64` but a missing or non-numeric value falls
/// back to the buffer default instead of zero.
pub fn deserialize_buffer_percentage<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(parse_number)
        .unwrap_or(crate::models::pricing::DEFAULT_BUFFER_PERCENTAGE))
}

fn to_u32(n: f64) -> Option<u32> {
    (n >= 0.0).then(|| n.round().min(u32::MAX as f64) as u32)
}

// Whole-number fields (day numbers, notice periods); negatives and garbage read as 0
pub fn deserialize_coerced_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(parse_number)
        .and_then(to_u32)
        .unwrap_or(0))
}

// Custom deserializer for optional whole-number fields (ages, group sizes)
pub fn deserialize_optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_number).and_then(to_u32))
}
