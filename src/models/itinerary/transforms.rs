use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::base::ItineraryDay;

/// How `structuredItinerary` is written when a draft is handed to a sink.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItineraryEncoding {
    /// JSON-encoded string, the layout the listing backend has always stored.
    #[default]
    String,
    Array,
}

impl std::str::FromStr for ItineraryEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(ItineraryEncoding::String),
            "array" => Ok(ItineraryEncoding::Array),
            other => Err(format!("unknown itinerary encoding: {}", other)),
        }
    }
}

/// Accept the itinerary either as a native list or as the JSON string older
/// records were saved with. Null and empty strings read as an empty list.
pub fn deserialize_itinerary<'de, D>(deserializer: D) -> Result<Vec<ItineraryDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(encoded)) => {
            if encoded.trim().is_empty() {
                return Ok(Vec::new());
            }
            serde_json::from_str(&encoded).map_err(D::Error::custom)
        }
        Some(list @ Value::Array(_)) => serde_json::from_value(list).map_err(D::Error::custom),
        Some(other) => Err(D::Error::custom(format!(
            "structuredItinerary must be a list or a JSON string, got {}",
            other
        ))),
    }
}

/// Rewrite the `structuredItinerary` field of a serialized draft in place.
pub fn encode_itinerary_field(
    document: &mut Value,
    encoding: ItineraryEncoding,
) -> Result<(), serde_json::Error> {
    if encoding == ItineraryEncoding::Array {
        return Ok(());
    }

    if let Some(field) = document.get_mut("structuredItinerary") {
        if field.is_array() {
            let encoded = serde_json::to_string(field)?;
            *field = Value::String(encoded);
        }
    }

    Ok(())
}
