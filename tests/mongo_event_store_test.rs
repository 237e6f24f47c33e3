mod common;

use serial_test::serial;

use common::ready_draft;
use event_trip_api::config::AppConfig;
use event_trip_api::db::event_store::MongoEventStore;
use event_trip_api::db::mongo::create_mongo_client;
use event_trip_api::error::SinkError;
use event_trip_api::models::itinerary::transforms::ItineraryEncoding;
use event_trip_api::services::draft_service::{DraftAction, DraftController};

// These talk to a real MongoDB and are skipped unless MONGODB_URI is set
async fn test_store() -> Option<MongoEventStore> {
    let uri = std::env::var("MONGODB_URI").ok()?;
    let config = AppConfig {
        mongo_uri: Some(uri.clone()),
        events_database: "EventsTest".to_string(),
        ..AppConfig::default()
    };
    let client = create_mongo_client(&uri).await.ok()?;
    Some(MongoEventStore::new(client, &config))
}

#[tokio::test]
#[serial]
async fn test_create_then_load_round_trip() {
    let Some(store) = test_store().await else {
        return;
    };

    let mut controller = DraftController::load(ready_draft(), ItineraryEncoding::String);
    let id = controller.submit(&store).await.unwrap();

    let loaded = store.find_by_id(&id).await.unwrap();
    assert_eq!(loaded.id.as_deref(), Some(id.as_str()));
    assert_eq!(loaded.pricing.total_price, 245.0);
    assert_eq!(loaded.structured_itinerary.len(), 3);
}

#[tokio::test]
#[serial]
async fn test_update_existing_event() {
    let Some(store) = test_store().await else {
        return;
    };

    let mut controller = DraftController::load(ready_draft(), ItineraryEncoding::String);
    let id = controller.submit(&store).await.unwrap();

    controller.dispatch(DraftAction::SetTitle("Spiti Winter Circuit".to_string()));
    controller.submit(&store).await.unwrap();

    let loaded = store.find_by_id(&id).await.unwrap();
    assert_eq!(loaded.title, "Spiti Winter Circuit");
}

#[tokio::test]
#[serial]
async fn test_missing_event() {
    let Some(store) = test_store().await else {
        return;
    };

    assert!(matches!(
        store.find_by_id("000000000000000000000000").await,
        Err(SinkError::NotFound(_))
    ));
    assert!(matches!(
        store.find_by_id("bogus").await,
        Err(SinkError::InvalidId(_))
    ));
}
