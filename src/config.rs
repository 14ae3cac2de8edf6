use anyhow::{anyhow, Context, Result};
use chrono::FixedOffset;
use std::net::SocketAddr;
use std::time::Duration;

use crate::store::PostgrestConfig;
use crate::view_model::Reconcile;

#[derive(Debug, Clone)]
pub enum StoreBackend {
    Supabase(PostgrestConfig),
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub workers: usize,
    pub password: String,
    pub db_path: String,
    pub schema_path: String,
    pub session_ttl_secs: i64,
    pub store: StoreBackend,
    pub reconcile: Reconcile,
    pub utc_offset: FixedOffset,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env`.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let addr = var("APP_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".into())
            .parse::<SocketAddr>()
            .context("APP_ADDR must be host:port")?;

        let workers = parse_or(var("APP_WORKERS"), 8usize, "APP_WORKERS")?;
        if workers == 0 {
            return Err(anyhow!("APP_WORKERS must be at least 1"));
        }

        let password = var("APP_PASSWORD").ok_or_else(|| anyhow!("APP_PASSWORD is not set"))?;

        let session_ttl_secs = parse_or(var("APP_SESSION_TTL_SECS"), 7 * 24 * 60 * 60, "APP_SESSION_TTL_SECS")?;
        if session_ttl_secs <= 0 {
            return Err(anyhow!("APP_SESSION_TTL_SECS must be positive"));
        }

        let store = match var("APP_STORE").as_deref().unwrap_or("supabase") {
            "supabase" => {
                let base_url = var("SUPABASE_URL").ok_or_else(|| anyhow!("SUPABASE_URL is not set"))?;
                let api_key = var("SUPABASE_ANON_KEY")
                    .ok_or_else(|| anyhow!("SUPABASE_ANON_KEY is not set"))?;
                StoreBackend::Supabase(PostgrestConfig {
                    base_url,
                    api_key,
                    table: var("SUPABASE_TABLE").unwrap_or_else(|| "services".into()),
                    timeout: Duration::from_secs(parse_or(var("SUPABASE_TIMEOUT_SECS"), 15, "SUPABASE_TIMEOUT_SECS")?),
                })
            }
            "memory" => StoreBackend::Memory,
            other => return Err(anyhow!("APP_STORE must be 'supabase' or 'memory', got '{other}'")),
        };

        let reconcile = match var("APP_RECONCILE") {
            Some(v) => Reconcile::parse(&v)
                .ok_or_else(|| anyhow!("APP_RECONCILE must be 'patch' or 'refetch', got '{v}'"))?,
            None => Reconcile::default(),
        };

        let offset_hours: i32 = parse_or(var("APP_UTC_OFFSET_HOURS"), 7, "APP_UTC_OFFSET_HOURS")?;
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600)
            .ok_or_else(|| anyhow!("APP_UTC_OFFSET_HOURS out of range: {offset_hours}"))?;

        let log_format = match var("APP_LOG_FORMAT").as_deref() {
            None | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(anyhow!("APP_LOG_FORMAT must be 'compact' or 'json', got '{other}'")),
        };

        Ok(Self {
            addr,
            workers,
            password,
            db_path: var("APP_DB_PATH").unwrap_or_else(|| "servis_toko.sqlite3".into()),
            schema_path: var("APP_SCHEMA_PATH").unwrap_or_else(|| "sql/schema.sql".into()),
            session_ttl_secs,
            store,
            reconcile,
            utc_offset,
            log_format,
        })
    }
}

fn parse_or<T>(value: Option<String>, default: T, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has invalid value '{v}': {e}")),
        None => Ok(default),
    }
}
