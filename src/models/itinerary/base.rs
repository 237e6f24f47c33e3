use serde::{Deserialize, Serialize};

use crate::models::number::{deserialize_coerced_f64, deserialize_coerced_u32};

/// A calendar day derived from the start/end range. Never persisted.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TripDate {
    pub iso_date: String,
    pub label: String,
}

/// Identity of an itinerary day: a trip ISO date or an extra-day label.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey {
    pub date: String,
}

impl DayKey {
    pub fn new(date: impl Into<String>) -> Self {
        Self { date: date.into() }
    }
}

impl From<&str> for DayKey {
    fn from(date: &str) -> Self {
        Self::new(date)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Place {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub full: String,
}

impl Place {
    /// Build a place from picker selections, composing `full` as
    /// "city, state, country" with blank parts skipped.
    pub fn compose(country: &str, state: &str, city: &str) -> Self {
        let full = [city, state, country]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            country: country.trim().to_string(),
            state: state.trim().to_string(),
            city: city.trim().to_string(),
            full,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub place: Place,
    #[serde(default)]
    pub activity_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub additional_cost: f64,
    /// Opaque reference handed back by the image upload service.
    #[serde(default)]
    pub image: Option<String>,
}

/// A single editable stop field, as sent by the stop editor.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum StopField {
    Name(String),
    Time(String),
    ActivityType(String),
    Description(String),
    AdditionalCost(f64),
    Image(Option<String>),
    Place(Place),
}

impl Stop {
    pub fn apply(&mut self, field: StopField) {
        match field {
            StopField::Name(name) => self.name = name,
            StopField::Time(time) => self.time = time,
            StopField::ActivityType(kind) => self.activity_type = kind,
            StopField::Description(description) => self.description = description,
            StopField::AdditionalCost(cost) => {
                self.additional_cost = if cost.is_finite() { cost } else { 0.0 }
            }
            StopField::Image(image) => self.image = image,
            // Picker sends the parts; `full` is always rebuilt from them
            StopField::Place(place) => {
                self.place = Place::compose(&place.country, &place.state, &place.city)
            }
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    #[serde(default, deserialize_with = "deserialize_coerced_u32")]
    pub day: u32,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub completed: bool,
}

impl ItineraryDay {
    pub fn key(&self) -> DayKey {
        DayKey::new(self.date.clone())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ItineraryMode {
    FreeText,
    #[default]
    Structured,
}
