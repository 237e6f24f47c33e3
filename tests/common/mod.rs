#![allow(dead_code)]

use serde_json::Value;
use std::sync::Mutex;

use event_trip_api::error::SinkError;
use event_trip_api::models::event::{EventDraft, Faq};
use event_trip_api::models::pricing::CostItem;
use event_trip_api::services::submission_service::SubmissionSink;

/// In-memory sink that records every payload it receives.
#[derive(Default)]
pub struct MockSink {
    pub created: Mutex<Vec<Value>>,
    pub updated: Mutex<Vec<(String, Value)>>,
    pub fail: bool,
}

impl MockSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn last_created(&self) -> Option<Value> {
        self.created.lock().unwrap().last().cloned()
    }

    pub fn last_updated(&self) -> Option<(String, Value)> {
        self.updated.lock().unwrap().last().cloned()
    }
}

impl SubmissionSink for MockSink {
    async fn create(&self, payload: Value) -> Result<String, SinkError> {
        if self.fail {
            return Err(SinkError::Rejected("backend unavailable".to_string()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(payload);
        Ok(format!("event_{}", created.len()))
    }

    async fn update(&self, id: &str, payload: Value) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::NotFound(id.to_string()));
        }
        self.updated.lock().unwrap().push((id.to_string(), payload));
        Ok(())
    }
}

/// A draft that passes validation: three trip days and the pricing inputs
/// from the listing team's worked example (total 245).
pub fn ready_draft() -> EventDraft {
    let mut draft = EventDraft {
        title: "Spiti Valley Circuit".to_string(),
        image: Some("uploads/spiti-cover.jpg".to_string()),
        start_date: Some("2024-05-10".to_string()),
        end_date: Some("2024-05-12".to_string()),
        faqs: vec![Faq {
            question: "What is the maximum altitude?".to_string(),
            answer: "Kunzum Pass at 4,551 m.".to_string(),
        }],
        ..EventDraft::default()
    };

    draft.pricing.accommodation_items = vec![CostItem::new("Hotel", 100.0), CostItem::new("Camp", 50.0)];
    draft.pricing.transportation_items = vec![CostItem::new("Tempo Traveller", 30.0)];
    draft.pricing.visa_reg_fee = 20.0;
    draft.pricing.commission = 10.0;
    draft.pricing.buffer_percentage = 10.0;
    draft.pricing.your_fee = 5.0;
    draft.pricing.pg_charges = 5.0;

    draft
}
