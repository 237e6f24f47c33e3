pub mod event;
pub mod itinerary;
pub mod number;
pub mod pricing;
