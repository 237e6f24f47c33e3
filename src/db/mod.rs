pub mod event_store;
pub mod mongo;
