//! Storage traits and implementations.
//!
//! This module provides the persistence collaborator for collected metrics.
//! The `RecordStore` trait defines the interface, allowing an in-memory
//! implementation for tests and a `ClickHouse`-backed one for production.

pub mod record_store;

pub use record_store::{
    ClickHouseRecordStore, InMemoryRecordStore, RecordQuery, RecordStore, RecordStoreError,
    METRICS_TABLE,
};
