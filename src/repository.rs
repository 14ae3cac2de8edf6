//! Service repository facade.
//! - Only component that talks to the remote store.
//! - Validates required fields before any call is issued.
//! - Normalizes every store failure into `RepoError::Transport`.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::{NewService, ServiceId, ServicePatch, ServiceRecord};
use crate::store::{ServiceStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Transport(String),
}

impl From<StoreError> for RepoError {
    fn from(e: StoreError) -> Self {
        RepoError::Transport(e.to_string())
    }
}

#[derive(Clone)]
pub struct ServiceRepository {
    store: Arc<dyn ServiceStore>,
}

impl ServiceRepository {
    pub fn new(store: Arc<dyn ServiceStore>) -> Self {
        Self { store }
    }

    /// All records, newest first.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<ServiceRecord>, RepoError> {
        let mut records = self.store.select_all().map_err(|e| {
            warn!(error = %e, "list_services_failed");
            RepoError::from(e)
        })?;
        // stable, so ties keep the store's order
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        info!(count = records.len(), "services_listed");
        Ok(records)
    }

    #[instrument(skip(self, input), fields(customer = %input.customer_name))]
    pub fn create(&self, input: NewService) -> Result<ServiceRecord, RepoError> {
        let fields = input.normalized();
        fields.validate().map_err(RepoError::Validation)?;

        let record = self.store.insert(&fields).map_err(|e| {
            warn!(error = %e, "create_service_failed");
            RepoError::from(e)
        })?;
        info!(id = record.id, "service_created");
        Ok(record)
    }

    #[instrument(skip(self, patch))]
    pub fn update(&self, id: ServiceId, patch: &ServicePatch) -> Result<ServiceRecord, RepoError> {
        if patch.is_empty() {
            return Err(RepoError::Validation("Tidak ada perubahan untuk disimpan.".into()));
        }
        patch.validate().map_err(RepoError::Validation)?;

        let record = self.store.update(id, patch).map_err(|e| {
            warn!(error = %e, "update_service_failed");
            RepoError::from(e)
        })?;
        info!(id, status = %record.status, "service_updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub fn remove(&self, id: ServiceId) -> Result<(), RepoError> {
        self.store.delete(id).map_err(|e| {
            warn!(error = %e, "remove_service_failed");
            RepoError::from(e)
        })?;
        info!(id, "service_removed");
        Ok(())
    }
}
