use std::env;

use crate::error::ConfigError;
use crate::models::itinerary::transforms::ItineraryEncoding;

const EVENTS_DATABASE: &str = "Events";
const EVENTS_COLLECTION: &str = "Trips";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Unset means drafts can be previewed but not submitted.
    pub mongo_uri: Option<String>,
    pub events_database: String,
    pub events_collection: String,
    pub itinerary_encoding: ItineraryEncoding,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mongo_uri: None,
            events_database: EVENTS_DATABASE.to_string(),
            events_collection: EVENTS_COLLECTION.to_string(),
            itinerary_encoding: ItineraryEncoding::default(),
        }
    }
}

impl AppConfig {
    /// Read settings from the environment, loading `.env` first in debug builds.
    pub fn from_env() -> Result<Self, ConfigError> {
        if cfg!(debug_assertions) {
            dotenv::dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let itinerary_encoding = match non_empty("ITINERARY_ENCODING") {
            Some(raw) => raw.parse::<ItineraryEncoding>().map_err(ConfigError::Invalid)?,
            None => ItineraryEncoding::default(),
        };

        Ok(Self {
            mongo_uri: non_empty("MONGODB_URI"),
            events_database: non_empty("EVENTS_DATABASE")
                .unwrap_or_else(|| EVENTS_DATABASE.to_string()),
            events_collection: non_empty("EVENTS_COLLECTION")
                .unwrap_or_else(|| EVENTS_COLLECTION.to_string()),
            itinerary_encoding,
        })
    }

    pub fn require_mongo_uri(&self) -> Result<&str, ConfigError> {
        self.mongo_uri
            .as_deref()
            .ok_or(ConfigError::EnvVar(env::VarError::NotPresent))
    }
}
