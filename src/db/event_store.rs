use bson::{doc, oid::ObjectId, DateTime, Document};
use log::info;
use mongodb::{Client, Collection};
use serde_json::Value;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::SinkError;
use crate::models::event::EventDraft;
use crate::services::submission_service::SubmissionSink;

/// Event listings stored one document per event.
pub struct MongoEventStore {
    collection: Collection<Document>,
}

impl MongoEventStore {
    pub fn new(client: Arc<Client>, config: &AppConfig) -> Self {
        let collection = client
            .database(&config.events_database)
            .collection::<Document>(&config.events_collection);
        Self { collection }
    }

    fn parse_id(id: &str) -> Result<ObjectId, SinkError> {
        ObjectId::parse_str(id).map_err(|_| SinkError::InvalidId(id.to_string()))
    }

    fn to_document(payload: Value) -> Result<Document, SinkError> {
        if !payload.is_object() {
            return Err(SinkError::Encoding(format!(
                "event payload must be an object, got {}",
                payload
            )));
        }
        Ok(bson::to_document(&payload)?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<EventDraft, SinkError> {
        let object_id = Self::parse_id(id)?;

        let document = self
            .collection
            .find_one(doc! { "_id": object_id })
            .await?
            .ok_or_else(|| SinkError::NotFound(id.to_string()))?;

        let mut value: Value = bson::from_document(document)?;
        if let Some(object) = value.as_object_mut() {
            object.remove("_id");
            object.insert("id".to_string(), Value::String(object_id.to_hex()));
        }

        EventDraft::from_value(value).map_err(|e| SinkError::Encoding(e.to_string()))
    }
}

impl SubmissionSink for MongoEventStore {
    async fn create(&self, payload: Value) -> Result<String, SinkError> {
        let mut document = Self::to_document(payload)?;
        let now = DateTime::now();
        document.insert("createdAt", now);
        document.insert("updatedAt", now);

        let result = self.collection.insert_one(document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .ok_or_else(|| SinkError::Rejected("inserted ID is not an ObjectId".to_string()))?;

        info!("Created event {}", id);
        Ok(id)
    }

    async fn update(&self, id: &str, payload: Value) -> Result<(), SinkError> {
        let object_id = Self::parse_id(id)?;
        let mut document = Self::to_document(payload)?;
        document.remove("_id");
        document.remove("createdAt");
        document.insert("updatedAt", DateTime::now());

        let result = self
            .collection
            .update_one(doc! { "_id": object_id }, doc! { "$set": document })
            .await?;

        if result.matched_count == 0 {
            return Err(SinkError::NotFound(id.to_string()));
        }

        info!("Updated event {}", id);
        Ok(())
    }
}
