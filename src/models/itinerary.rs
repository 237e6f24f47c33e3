pub mod base;
pub mod transforms;

pub use base::{DayKey, ItineraryDay, ItineraryMode, Place, Stop, StopField, TripDate};
