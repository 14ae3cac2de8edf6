use crate::app::App;
use crate::auth::PasswordGate;
use crate::db::connection::{init_db, Database};
use crate::domain::{ServiceRecord, ServiceStatus};
use crate::errors::ServerError;
use crate::repository::ServiceRepository;
use crate::router::handle;
use crate::store::{MemoryStore, ServiceStore};
use crate::view_model::Reconcile;
use astra::{Body, Response};
use chrono::{FixedOffset, TimeZone, Utc};
use http::{Method, Request};
use scraper::{Html, Selector};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const PASSWORD: &str = "rahasia";

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh sessions database in the temp dir, using the production schema.
pub fn init_test_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "servis_test_{}_{}.sqlite",
        std::process::id(),
        DB_COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_file(&path);
    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn record(id: i64, name: &str, item: &str, status: ServiceStatus, day: u32) -> ServiceRecord {
    ServiceRecord {
        id,
        created_at: Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap(),
        customer_name: name.into(),
        customer_phone: None,
        item_name: item.into(),
        item_damage: None,
        status,
        high_priority: false,
    }
}

pub struct TestApp {
    pub app: App,
    pub store: Arc<MemoryStore>,
}

/// App over a memory store seeded with three services:
/// #1 Dewi (Masuk), #2 Budi (Selesai), #3 Andi (Dikerjakan).
pub fn test_app(reconcile: Reconcile) -> TestApp {
    let store = Arc::new(
        MemoryStore::with_rows(vec![
            record(1, "Dewi", "Printer", ServiceStatus::Intake, 1),
            record(2, "Budi", "Laptop", ServiceStatus::Done, 2),
            record(3, "Andi", "Handphone", ServiceStatus::InProgress, 3),
        ])
        .with_clock(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
    );
    let dyn_store: Arc<dyn ServiceStore> = store.clone();

    let app = App::new(
        init_test_db(),
        PasswordGate::new(PASSWORD),
        ServiceRepository::new(dyn_store),
        reconcile,
        3_600,
        FixedOffset::east_opt(7 * 3600).unwrap(),
    );
    TestApp { app, store }
}

pub fn get(app: &App, uri: &str, cookie: Option<&str>) -> Result<Response, ServerError> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    handle(builder.body(Body::empty()).unwrap(), app)
}

pub fn post_form(
    app: &App,
    uri: &str,
    body: &str,
    cookie: Option<&str>,
) -> Result<Response, ServerError> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    handle(builder.body(Body::from(body.as_bytes().to_vec())).unwrap(), app)
}

/// Logs in and returns the `Cookie` header value for later requests.
pub fn login(app: &App) -> String {
    let resp = post_form(app, "/login", &format!("password={PASSWORD}"), None)
        .expect("login request failed");
    assert_eq!(resp.status(), 302);
    let set_cookie = header(&resp, "Set-Cookie");
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

pub fn header(resp: &Response, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut body = Vec::new();
    resp.into_body().reader().read_to_end(&mut body).unwrap();
    body
}

/// Texts of every element matching `selector`, whitespace-trimmed.
pub fn texts(html: &str, selector: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .collect()
}

pub fn attrs(html: &str, selector: &str, attr: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel)
        .filter_map(|e| e.value().attr(attr).map(str::to_string))
        .collect()
}

/// `data-id`s of the rendered service rows, in page order.
pub fn row_ids(html: &str) -> Vec<i64> {
    attrs(html, "table#services tbody tr[data-id]", "data-id")
        .iter()
        .map(|id| id.parse().unwrap())
        .collect()
}
