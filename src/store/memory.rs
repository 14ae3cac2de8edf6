// src/store/memory.rs
use crate::domain::{NewService, ServiceId, ServicePatch, ServiceRecord, ServiceStatus};
use crate::store::{ServiceStore, StoreError};
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    rows: Vec<ServiceRecord>,
    next_id: ServiceId,
    fail_next: Option<String>,
}

/// In-process store. Backs the `memory` backend and the test suite.
///
/// Counts every call so tests can assert that no remote call was made,
/// and can be told to fail the next call with a given message. Those
/// test hooks are compiled only under `cfg(test)`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
    clock: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds rows as-is (ids and timestamps preserved).
    #[cfg(test)]
    pub fn with_rows(rows: Vec<ServiceRecord>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            inner: Mutex::new(Inner {
                rows,
                next_id,
                fail_next: None,
            }),
            ..Self::default()
        }
    }

    /// Pins the creation clock; each insert advances it by one second.
    #[cfg(test)]
    pub fn with_clock(self, start: DateTime<Utc>) -> Self {
        if let Ok(mut clock) = self.clock.lock() {
            *clock = Some(start);
        }
        self
    }

    #[cfg(test)]
    pub fn fail_next(&self, message: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_next = Some(message.into());
        }
    }

    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current rows without counting as a call.
    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<ServiceRecord> {
        self.inner.lock().map(|i| i.rows.clone()).unwrap_or_default()
    }

    fn now(&self) -> DateTime<Utc> {
        match self.clock.lock() {
            Ok(mut clock) => match clock.as_mut() {
                Some(t) => {
                    *t += Duration::seconds(1);
                    *t
                }
                None => Utc::now(),
            },
            Err(_) => Utc::now(),
        }
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Network("memory store poisoned".into()))?;
        if let Some(msg) = inner.fail_next.take() {
            return Err(StoreError::Network(msg));
        }
        Ok(inner)
    }
}

impl ServiceStore for MemoryStore {
    fn select_all(&self) -> Result<Vec<ServiceRecord>, StoreError> {
        let inner = self.begin()?;
        let mut rows = inner.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn insert(&self, fields: &NewService) -> Result<ServiceRecord, StoreError> {
        let created_at = self.now();
        let mut inner = self.begin()?;
        inner.next_id += 1;
        let record = ServiceRecord {
            id: inner.next_id,
            created_at,
            customer_name: fields.customer_name.clone(),
            customer_phone: fields.customer_phone.clone(),
            item_name: fields.item_name.clone(),
            item_damage: fields.item_damage.clone(),
            status: ServiceStatus::Intake,
            high_priority: fields.high_priority,
        };
        inner.rows.push(record.clone());
        Ok(record)
    }

    fn update(&self, id: ServiceId, patch: &ServicePatch) -> Result<ServiceRecord, StoreError> {
        let mut inner = self.begin()?;
        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply_to(row);
        Ok(row.clone())
    }

    fn delete(&self, id: ServiceId) -> Result<(), StoreError> {
        let mut inner = self.begin()?;
        inner.rows.retain(|r| r.id != id);
        Ok(())
    }
}
