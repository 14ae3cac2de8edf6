use crate::app::App;
use crate::auth::{sessions::purge_stale_sessions, PasswordGate};
use crate::config::{AppConfig, StoreBackend};
use crate::db::connection::{init_db, Database};
use crate::repository::ServiceRepository;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::store::{MemoryStore, PostgrestStore, ServiceStore};
use anyhow::Context;
use astra::Server;
use std::sync::Arc;
use tracing::{error, info};

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod forms;
mod logging;
mod repository;
mod responses;
mod router;
mod spreadsheets;
mod store;
mod templates;
mod view_model;

#[cfg(test)]
mod tests;

fn main() {
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {e:#}");
            std::process::exit(1);
        }
    };
    logging::init_logging(config.log_format);

    if let Err(e) = run(config) {
        error!(error = %format!("{e:#}"), "server_failed");
        std::process::exit(1);
    }
    info!("server_stopped");
}

fn run(config: AppConfig) -> anyhow::Result<()> {
    let db = Database::new(config.db_path.clone());
    init_db(&db, &config.schema_path).context("database initialization failed")?;

    let now = chrono::Utc::now().timestamp();
    let purged = db
        .with_conn(|conn| purge_stale_sessions(conn, now))
        .context("session cleanup failed")?;
    info!(purged, "stale_sessions_purged");

    let store: Arc<dyn ServiceStore> = match &config.store {
        StoreBackend::Supabase(cfg) => {
            let store = PostgrestStore::new(cfg).context("remote store setup failed")?;
            info!(url = %store.table_url(), "using_postgrest_store");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            info!("using_memory_store");
            Arc::new(MemoryStore::new())
        }
    };

    let app = App::new(
        db,
        PasswordGate::new(&config.password),
        ServiceRepository::new(store),
        config.reconcile,
        config.session_ttl_secs,
        config.utc_offset,
    );

    info!(addr = %config.addr, workers = config.workers, reconcile = ?config.reconcile, "server_starting");

    Server::bind(&config.addr)
        .max_workers(config.workers)
        .serve(move |req, _info| match handle(req, &app) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        })
        .context("server ended with error")
}
