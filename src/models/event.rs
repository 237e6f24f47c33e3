use serde::{Deserialize, Serialize};

use super::itinerary::transforms::deserialize_itinerary;
use super::itinerary::{ItineraryDay, ItineraryMode};
use super::number::{deserialize_coerced_f64, deserialize_coerced_u32, deserialize_optional_u32};
use super::pricing::PricingState;
use crate::error::DraftError;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Trek,
    Adventure,
    Cultural,
    Wellness,
    Leisure,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub max_altitude_meters: Option<u32>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationDetails {
    #[serde(default)]
    pub name: String,
    /// Hotel, camp, homestay...
    #[serde(default)]
    pub kind: String,
    /// Twin, triple, dorm...
    #[serde(default)]
    pub sharing: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRules {
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub min_age: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub max_age: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub min_group: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub max_group: Option<u32>,
    #[serde(default)]
    pub rules: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancellationTier {
    #[serde(default, deserialize_with = "deserialize_coerced_u32")]
    pub days_before: u32,
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub refund_percentage: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicy {
    #[serde(default)]
    pub tiers: Vec<CancellationTier>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Faq {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// The full event-trip listing as edited in the form.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub category_details: CategoryDetails,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub extra_dates: Vec<String>,
    #[serde(default)]
    pub itinerary_mode: ItineraryMode,
    #[serde(default)]
    pub itinerary_text: String,
    #[serde(default, deserialize_with = "deserialize_itinerary")]
    pub structured_itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub pricing: PricingState,
    #[serde(default)]
    pub accommodation: AccommodationDetails,
    #[serde(default)]
    pub participant_rules: ParticipantRules,
    #[serde(default)]
    pub cancellation_policy: CancellationPolicy,
    #[serde(default)]
    pub faqs: Vec<Faq>,
}

impl EventDraft {
    /// Decode a persisted event record. Accepts both itinerary encodings and
    /// a Mongo-style `_id` in place of `id`.
    pub fn from_json(raw: &str) -> Result<Self, DraftError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(mut value: serde_json::Value) -> Result<Self, DraftError> {
        if let Some(object) = value.as_object_mut() {
            if !object.contains_key("id") {
                if let Some(raw_id) = object.remove("_id") {
                    let id = match raw_id {
                        serde_json::Value::String(id) => Some(id),
                        serde_json::Value::Object(mut oid) => match oid.remove("$oid") {
                            Some(serde_json::Value::String(id)) => Some(id),
                            _ => None,
                        },
                        _ => None,
                    };
                    if let Some(id) = id {
                        object.insert("id".to_string(), serde_json::Value::String(id));
                    }
                }
            }
        }

        Ok(serde_json::from_value(value)?)
    }
}
