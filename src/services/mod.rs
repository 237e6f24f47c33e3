pub mod draft_service;
pub mod itinerary_service;
pub mod pricing_service;
pub mod submission_service;
pub mod validation_service;
