use chrono::FixedOffset;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

use crate::auth::{PasswordGate, SessionContext};
use crate::db::connection::Database;
use crate::repository::ServiceRepository;
use crate::view_model::{Reconcile, ServiceViewModel};

/// Everything a request handler needs.
///
/// The view model sits behind one mutex: requests that touch it run one at
/// a time, which is the only ordering the service list relies on.
pub struct App {
    pub db: Database,
    pub gate: PasswordGate,
    pub repo: ServiceRepository,
    pub reconcile: Reconcile,
    pub session_ttl_secs: i64,
    pub utc_offset: FixedOffset,
    view_model: Mutex<Option<ServiceViewModel>>,
}

impl App {
    pub fn new(
        db: Database,
        gate: PasswordGate,
        repo: ServiceRepository,
        reconcile: Reconcile,
        session_ttl_secs: i64,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            db,
            gate,
            repo,
            reconcile,
            session_ttl_secs,
            utc_offset,
            view_model: Mutex::new(None),
        }
    }

    /// Runs `f` against the view model, opening it with `session` (and
    /// loading the list) if none is open yet.
    ///
    /// A panic inside `f` poisons the mutex; the guard is recovered rather
    /// than failing every later request. The list in a recovered view model
    /// is at worst stale, and the next mutation or refresh reconciles it.
    pub fn with_view_model<T>(
        &self,
        session: SessionContext,
        f: impl FnOnce(&mut ServiceViewModel) -> T,
    ) -> T {
        let mut slot = self.view_model.lock().unwrap_or_else(recover);

        let vm = slot.get_or_insert_with(|| {
            info!(session_started = session.created_at, "view_model_opened");
            ServiceViewModel::new(self.repo.clone(), session, self.reconcile)
        });
        vm.ensure_loaded();
        f(vm)
    }

    /// Drops the view model and its cached list (logout).
    pub fn close_view_model(&self) {
        let mut slot = self.view_model.lock().unwrap_or_else(recover);
        if let Some(vm) = slot.take() {
            info!(session_started = vm.session().created_at, "view_model_closed");
        }
    }
}

fn recover<G>(poisoned: PoisonError<G>) -> G {
    warn!("view_model_lock_poisoned_recovering");
    poisoned.into_inner()
}
