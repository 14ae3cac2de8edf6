// src/store/postgrest.rs
use crate::domain::{NewService, ServiceId, ServicePatch, ServiceRecord, ServiceStatus};
use crate::store::{ServiceStore, StoreError};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("servis_toko/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// Anon (or service) key, sent as `apikey` and bearer token.
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

/// Supabase/PostgREST backed store.
pub struct PostgrestStore {
    client: Client,
    table_url: Url,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    #[serde(flatten)]
    fields: &'a NewService,
    status: ServiceStatus,
}

impl PostgrestStore {
    pub fn new(cfg: &PostgrestConfig) -> Result<Self, StoreError> {
        let base = Url::parse(&format!("{}/", cfg.base_url.trim_end_matches('/')))
            .map_err(|e| StoreError::Config(format!("invalid store url: {e}")))?;
        let table_url = base
            .join("rest/v1/")
            .and_then(|u| u.join(&cfg.table))
            .map_err(|e| StoreError::Config(format!("invalid table url: {e}")))?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&cfg.api_key)
            .map_err(|_| StoreError::Config("api key is not a valid header value".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", cfg.api_key))
            .map_err(|_| StoreError::Config("api key is not a valid header value".into()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self { client, table_url })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn url_for(&self, params: &[(&str, String)]) -> Url {
        let mut url = self.table_url.clone();
        {
            let mut q = url.query_pairs_mut();
            for (k, v) in params {
                q.append_pair(k, v);
            }
        }
        url
    }

    fn id_filter(id: ServiceId) -> (&'static str, String) {
        ("id", format!("eq.{id}"))
    }

    /// Sends the request and returns the body text of a 2xx response.
    fn send(&self, req: RequestBuilder) -> Result<String, StoreError> {
        let resp = req.send().map_err(|e| StoreError::Network(e.to_string()))?;
        let status = resp.status();
        let text = resp.text().map_err(|e| StoreError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        Ok(text)
    }

    fn rows(text: &str) -> Result<Vec<ServiceRecord>, StoreError> {
        serde_json::from_str(text).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl ServiceStore for PostgrestStore {
    fn select_all(&self) -> Result<Vec<ServiceRecord>, StoreError> {
        let url = self.url_for(&[
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ]);
        debug!(%url, "select services");
        let text = self.send(self.client.get(url))?;
        Self::rows(&text)
    }

    fn insert(&self, fields: &NewService) -> Result<ServiceRecord, StoreError> {
        let body = InsertRow {
            fields,
            status: ServiceStatus::Intake,
        };
        let req = self
            .client
            .post(self.table_url.clone())
            .header("Prefer", "return=representation")
            .json(&[body]);
        let text = self.send(req)?;
        Self::rows(&text)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".into()))
    }

    fn update(&self, id: ServiceId, patch: &ServicePatch) -> Result<ServiceRecord, StoreError> {
        let url = self.url_for(&[Self::id_filter(id)]);
        let req = self
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(patch);
        let text = self.send(req)?;
        Self::rows(&text)?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound(id))
    }

    fn delete(&self, id: ServiceId) -> Result<(), StoreError> {
        let url = self.url_for(&[Self::id_filter(id)]);
        self.send(self.client.delete(url))?;
        Ok(())
    }
}

/// PostgREST errors come back as `{"message": "...", ...}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
