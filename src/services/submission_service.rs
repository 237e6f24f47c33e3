use serde_json::Value;

use crate::error::SinkError;
use crate::models::event::EventDraft;
use crate::models::itinerary::transforms::{encode_itinerary_field, ItineraryEncoding};

/// Where finalized drafts are sent. `create` returns the new record's ID.
#[allow(async_fn_in_trait)]
pub trait SubmissionSink {
    async fn create(&self, payload: Value) -> Result<String, SinkError>;
    async fn update(&self, id: &str, payload: Value) -> Result<(), SinkError>;
}

/// Serialize a finalized draft into the persisted layout. The record ID is
/// passed separately to the sink so it is left out of the body.
pub fn encode_for_submission(
    draft: &EventDraft,
    encoding: ItineraryEncoding,
) -> Result<Value, serde_json::Error> {
    let mut document = serde_json::to_value(draft)?;
    if let Some(object) = document.as_object_mut() {
        object.remove("id");
    }
    encode_itinerary_field(&mut document, encoding)?;
    Ok(document)
}

/// Message shown in the form banner when the sink fails.
pub fn banner_message(error: &SinkError) -> String {
    match error {
        SinkError::NotFound(_) => {
            "This event no longer exists. Reload the page and try again.".to_string()
        }
        SinkError::Rejected(reason) => format!("The event could not be saved: {}", reason),
        _ => "Something went wrong while saving the event. Please try again.".to_string(),
    }
}
