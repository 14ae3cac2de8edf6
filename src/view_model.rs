//! Service view model.
//!
//! Owns the canonical list of service records, runs the status-transition
//! policy around the repository calls, and derives the read projections the
//! pages render. Presentation code only ever sees `&[ServiceRecord]` or
//! cloned subsets; every mutation comes back through here.

use tracing::{debug, info, warn};

use crate::auth::SessionContext;
use crate::domain::{
    derive_view, request_status_change, Decision, Facets, NewService, ServiceId, ServicePatch,
    ServiceRecord, ServiceStatus, Tab,
};
use crate::repository::{RepoError, ServiceRepository};

/// Confirmation and notification, provided by whoever drives the view model.
pub trait Interaction {
    /// Returns `true` if the user agreed to `message`.
    fn confirm(&mut self, message: &str) -> bool;
    fn notify(&mut self, message: &str);
}

/// How the canonical list converges after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reconcile {
    /// Patch the in-memory list with the store's answer.
    #[default]
    Patch,
    /// Throw the list away and fetch it again.
    Refetch,
}

impl Reconcile {
    pub fn parse(s: &str) -> Option<Reconcile> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Some(Reconcile::Patch),
            "refetch" => Some(Reconcile::Refetch),
            _ => None,
        }
    }
}

/// A completed store mutation, fed to `apply_mutation`.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Created(ServiceRecord),
    Updated(ServiceRecord),
    Removed(ServiceId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    NoOp,
    Missing,
    Denied(String),
    Declined,
    Applied(ServiceRecord),
    /// The store call failed; the record kept its previous status.
    Reverted(RepoError),
}

pub struct ServiceViewModel {
    repo: ServiceRepository,
    session: SessionContext,
    reconcile: Reconcile,
    records: Vec<ServiceRecord>,
    loaded: bool,
    load_error: Option<String>,
    notices: Vec<String>,
}

impl ServiceViewModel {
    pub fn new(repo: ServiceRepository, session: SessionContext, reconcile: Reconcile) -> Self {
        Self {
            repo,
            session,
            reconcile,
            records: Vec::new(),
            loaded: false,
            load_error: None,
            notices: Vec::new(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[cfg(test)]
    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn find(&self, id: ServiceId) -> Option<&ServiceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Message of the last failed list fetch, cleared by the next good one.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn flash(&mut self, notices: impl IntoIterator<Item = String>) {
        self.notices.extend(notices);
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Fetches the full list. On failure the previous list stays visible.
    pub fn refresh(&mut self) -> Result<(), RepoError> {
        match self.repo.list() {
            Ok(records) => {
                self.records = records;
                self.loaded = true;
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, kept = self.records.len(), "refresh_failed_keeping_stale_list");
                self.load_error = Some(format!("Gagal memuat data servis: {e}"));
                Err(e)
            }
        }
    }

    /// Fetches the list unless a fetch has already succeeded.
    pub fn ensure_loaded(&mut self) {
        if !self.loaded {
            let _ = self.refresh();
        }
    }

    /// Brings the canonical list in line with a completed mutation.
    ///
    /// The store's answer is always patched in first, so a failed refetch
    /// leaves the list correct with only the load banner set.
    pub fn apply_mutation(&mut self, mutation: Mutation) -> &[ServiceRecord] {
        self.patch_local(mutation);
        if self.reconcile == Reconcile::Refetch {
            let _ = self.refresh();
        }
        &self.records
    }

    fn patch_local(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Created(record) => {
                let at = self
                    .records
                    .iter()
                    .position(|r| r.created_at <= record.created_at)
                    .unwrap_or(self.records.len());
                self.records.insert(at, record);
            }
            Mutation::Updated(record) => {
                if let Some(slot) = self.records.iter_mut().find(|r| r.id == record.id) {
                    *slot = record;
                }
            }
            Mutation::Removed(id) => self.records.retain(|r| r.id != id),
        }
    }

    /// Registers a new intake.
    pub fn create(
        &mut self,
        fields: NewService,
        ui: &mut dyn Interaction,
    ) -> Result<ServiceRecord, RepoError> {
        match self.repo.create(fields) {
            Ok(record) => {
                ui.notify(&format!(
                    "Servis #{} atas nama {} berhasil ditambahkan.",
                    record.id, record.customer_name
                ));
                self.apply_mutation(Mutation::Created(record.clone()));
                Ok(record)
            }
            Err(e) => {
                match &e {
                    RepoError::Validation(msg) => ui.notify(msg),
                    RepoError::Transport(msg) => {
                        ui.notify(&format!("Gagal menambah servis: {msg}"))
                    }
                }
                Err(e)
            }
        }
    }

    /// Runs the forward-only policy, asks for confirmation, then applies.
    pub fn change_status(
        &mut self,
        id: ServiceId,
        requested: ServiceStatus,
        ui: &mut dyn Interaction,
    ) -> StatusChange {
        let Some(current) = self.find(id).map(|r| r.status) else {
            ui.notify(&format!("Servis #{id} tidak ditemukan."));
            return StatusChange::Missing;
        };

        let decision = request_status_change(current, requested);
        debug!(id, from = %current, to = %requested, ?decision, "status_change_requested");

        match &decision {
            Decision::NoOp => StatusChange::NoOp,
            Decision::Denied(reason) => {
                ui.notify(reason);
                StatusChange::Denied(reason.clone())
            }
            Decision::NeedsConfirmation { .. } => {
                let prompt = decision.prompt().unwrap_or_default();
                if !ui.confirm(&prompt) {
                    return StatusChange::Declined;
                }
                self.apply_status(id, current, requested, ui)
            }
        }
    }

    fn apply_status(
        &mut self,
        id: ServiceId,
        previous: ServiceStatus,
        requested: ServiceStatus,
        ui: &mut dyn Interaction,
    ) -> StatusChange {
        if self.reconcile == Reconcile::Patch {
            self.set_local_status(id, requested);
        }

        match self.repo.update(id, &ServicePatch::status(requested)) {
            Ok(record) => {
                info!(id, from = %previous, to = %requested, "status_changed");
                self.apply_mutation(Mutation::Updated(record.clone()));
                StatusChange::Applied(record)
            }
            Err(e) => {
                self.set_local_status(id, previous);
                ui.notify(&format!("Gagal mengubah status: {e}"));
                StatusChange::Reverted(e)
            }
        }
    }

    fn set_local_status(&mut self, id: ServiceId, status: ServiceStatus) {
        if let Some(r) = self.records.iter_mut().find(|r| r.id == id) {
            r.status = status;
        }
    }

    /// Full-field edit. Never touches id, creation time or status.
    pub fn edit(
        &mut self,
        id: ServiceId,
        fields: NewService,
        ui: &mut dyn Interaction,
    ) -> Result<ServiceRecord, RepoError> {
        let patch = ServicePatch::edit(fields);
        match self.repo.update(id, &patch) {
            Ok(record) => {
                ui.notify(&format!("Servis #{id} berhasil diperbarui."));
                self.apply_mutation(Mutation::Updated(record.clone()));
                Ok(record)
            }
            Err(e) => {
                ui.notify(&format!("Gagal memperbarui servis #{id}: {e}"));
                Err(e)
            }
        }
    }

    /// Deletes after confirmation. `Ok(false)` when the user declined.
    pub fn delete(&mut self, id: ServiceId, ui: &mut dyn Interaction) -> Result<bool, RepoError> {
        let prompt = match self.find(id) {
            Some(r) => format!(
                "Hapus servis #{} ({} - {})? Tindakan ini tidak bisa dibatalkan.",
                r.id, r.customer_name, r.item_name
            ),
            None => format!("Hapus servis #{id}? Tindakan ini tidak bisa dibatalkan."),
        };
        if !ui.confirm(&prompt) {
            return Ok(false);
        }

        match self.repo.remove(id) {
            Ok(()) => {
                ui.notify(&format!("Servis #{id} berhasil dihapus."));
                self.apply_mutation(Mutation::Removed(id));
                Ok(true)
            }
            Err(e) => {
                ui.notify(&format!("Gagal menghapus servis #{id}: {e}"));
                Err(e)
            }
        }
    }

    pub fn view(&self, query: &str, facets: &Facets) -> Vec<ServiceRecord> {
        derive_view(&self.records, query, facets)
    }

    /// Filtered view restricted to one tab, in list order.
    pub fn tab_view(&self, query: &str, facets: &Facets, tab: Tab) -> Vec<ServiceRecord> {
        let mut rows = self.view(query, facets);
        rows.retain(|r| tab.contains(r.status));
        rows
    }
}
