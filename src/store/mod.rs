//! Remote service store contract and its backends.
//!
//! The repository facade is the only caller of these traits.

pub mod memory;
pub mod postgrest;

use crate::domain::{NewService, ServiceId, ServicePatch, ServiceRecord};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgrest::{PostgrestConfig, PostgrestStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("service {0} not found")]
    NotFound(ServiceId),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Table of service records keyed by `id`.
pub trait ServiceStore: Send + Sync {
    /// Every record, newest `created_at` first.
    fn select_all(&self) -> Result<Vec<ServiceRecord>, StoreError>;

    /// Inserts with status `Masuk`; the store assigns `id` and `created_at`.
    fn insert(&self, fields: &NewService) -> Result<ServiceRecord, StoreError>;

    /// Partial update. Fails with `NotFound` if no row has this id.
    fn update(&self, id: ServiceId, patch: &ServicePatch) -> Result<ServiceRecord, StoreError>;

    /// Deleting a missing id is not an error.
    fn delete(&self, id: ServiceId) -> Result<(), StoreError>;
}
