use crate::app::App;
use crate::auth::{SessionContext, SESSION_COOKIE};
use crate::domain::{partition, ServiceId};
use crate::errors::ServerError;
use crate::forms::{
    cookie_value, is_confirmed, parse_pairs, parse_service_form, parse_status_form, ListParams,
};
use crate::responses::{
    html_response, html_response_with_status, redirect, redirect_with_cookie, ResultResp,
};
use crate::spreadsheets::export_services_xlsx;
use crate::templates::pages::{confirm_page, edit_page, login_page, services_page, ServicesVm};
use crate::view_model::{Interaction, StatusChange};
use astra::Request;
use std::io::Read;
use tracing::{info, warn};

const MAX_FORM_BYTES: u64 = 64 * 1024;

/// Confirmation and notices for a single form post.
///
/// A browser cannot be asked mid-request, so `confirm` answers with whatever
/// the form already carried (`confirm=yes`) and remembers the prompt so the
/// handler can render the confirmation page when it was not given.
#[derive(Debug, Default)]
pub struct FormInteraction {
    confirmed: bool,
    prompt: Option<String>,
    notices: Vec<String>,
}

impl FormInteraction {
    pub fn new(confirmed: bool) -> Self {
        Self {
            confirmed,
            ..Self::default()
        }
    }

    /// Prompt that still needs the user's answer.
    pub fn pending_prompt(&self) -> Option<&str> {
        if self.confirmed {
            None
        } else {
            self.prompt.as_deref()
        }
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

impl Interaction for FormInteraction {
    fn confirm(&mut self, message: &str) -> bool {
        self.prompt = Some(message.to_string());
        self.confirmed
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/login") => match current_session(&req, app)? {
            Some(_) => redirect("/"),
            None => html_response(login_page(None)),
        },
        ("POST", "/login") => {
            let body = read_body(&mut req)?;
            login(&body, app)
        }
        ("POST", "/logout") => logout(&req, app),
        _ => {
            let Some(session) = current_session(&req, app)? else {
                return redirect("/login");
            };
            route_authenticated(&method, &path, &query, &mut req, app, session)
        }
    }
}

fn route_authenticated(
    method: &str,
    path: &str,
    query: &str,
    req: &mut Request,
    app: &App,
    session: SessionContext,
) -> ResultResp {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        ("GET", [""]) => list_services(query, app, session),
        ("GET", ["services", "export.xlsx"]) => export_services(query, app, session),
        ("POST", ["services"]) => {
            let body = read_body(req)?;
            create_service(&body, app, session)
        }
        ("POST", ["services", "refresh"]) => {
            app.with_view_model(session, |vm| {
                let _ = vm.refresh();
            });
            redirect("/")
        }
        ("GET", ["services", id, "edit"]) => {
            let id = parse_id(id)?;
            let record = app.with_view_model(session, |vm| vm.find(id).cloned());
            match record {
                Some(r) => html_response(edit_page(&r)),
                None => Err(ServerError::NotFound),
            }
        }
        ("POST", ["services", id]) => {
            let id = parse_id(id)?;
            let body = read_body(req)?;
            edit_service(id, &body, app, session)
        }
        ("POST", ["services", id, "status"]) => {
            let id = parse_id(id)?;
            let body = read_body(req)?;
            change_status(id, &body, app, session)
        }
        ("POST", ["services", id, "delete"]) => {
            let id = parse_id(id)?;
            let body = read_body(req)?;
            delete_service(id, &body, app, session)
        }
        _ => Err(ServerError::NotFound),
    }
}

fn login(body: &str, app: &App) -> ResultResp {
    let pairs = parse_pairs(body);
    let attempt = crate::forms::field(&pairs, "password").unwrap_or_default();

    if !app.gate.check(&attempt) {
        warn!("login_rejected");
        return html_response_with_status(401, login_page(Some("Password salah.")));
    }

    let ttl = app.session_ttl_secs;
    let (_, token) = app
        .db
        .with_conn(|conn| SessionContext::start(conn, now_unix(), ttl))?;
    info!("login_succeeded");

    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl}");
    redirect_with_cookie("/", &cookie)
}

fn logout(req: &Request, app: &App) -> ResultResp {
    if let Some(session) = current_session(req, app)? {
        app.db.with_conn(|conn| session.teardown(conn, now_unix()))?;
        app.close_view_model();
        info!("logout");
    }
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    redirect_with_cookie("/login", &cookie)
}

fn list_services(query: &str, app: &App, session: SessionContext) -> ResultResp {
    let params = ListParams::parse(query, app.utc_offset);

    let (view, load_error, notices) = app.with_view_model(session, |vm| {
        let view = vm.view(&params.query, &params.facets);
        let load_error = vm.load_error().map(str::to_string);
        (view, load_error, vm.take_notices())
    });

    let split = partition(&view);
    let page = ServicesVm {
        params: &params,
        rows: split.tab(params.tab),
        active_count: split.active.len(),
        history_count: split.history.len(),
        load_error: load_error.as_deref(),
        notices: &notices,
        utc_offset: app.utc_offset,
    };
    html_response(services_page(&page))
}

fn export_services(query: &str, app: &App, session: SessionContext) -> ResultResp {
    let params = ListParams::parse(query, app.utc_offset);
    let rows = app.with_view_model(session, |vm| {
        vm.tab_view(&params.query, &params.facets, params.tab)
    });
    let filename = format!(
        "servis_{}_{}.xlsx",
        params.tab.as_str(),
        chrono::Utc::now().with_timezone(&app.utc_offset).format("%Y%m%d")
    );
    export_services_xlsx(&rows, app.utc_offset, &filename)
}

fn create_service(body: &str, app: &App, session: SessionContext) -> ResultResp {
    let fields = parse_service_form(body);
    let mut ui = FormInteraction::new(true);
    app.with_view_model(session, |vm| {
        let _ = vm.create(fields, &mut ui);
        vm.flash(ui.take_notices());
    });
    redirect("/")
}

fn edit_service(id: ServiceId, body: &str, app: &App, session: SessionContext) -> ResultResp {
    let fields = parse_service_form(body);
    let mut ui = FormInteraction::new(true);
    app.with_view_model(session, |vm| {
        let _ = vm.edit(id, fields, &mut ui);
        vm.flash(ui.take_notices());
    });
    redirect("/")
}

fn change_status(id: ServiceId, body: &str, app: &App, session: SessionContext) -> ResultResp {
    let (status, confirmed) = parse_status_form(body)
        .ok_or_else(|| ServerError::BadRequest("Status tidak dikenal atau kosong.".into()))?;

    let mut ui = FormInteraction::new(confirmed);
    let outcome = app.with_view_model(session, |vm| {
        let outcome = vm.change_status(id, status, &mut ui);
        vm.flash(ui.take_notices());
        outcome
    });

    match (outcome, ui.pending_prompt()) {
        (StatusChange::Declined, Some(prompt)) => html_response(confirm_page(
            prompt,
            &format!("/services/{id}/status"),
            &[("status", status.label().to_string())],
        )),
        _ => redirect("/"),
    }
}

fn delete_service(id: ServiceId, body: &str, app: &App, session: SessionContext) -> ResultResp {
    let confirmed = is_confirmed(&parse_pairs(body));
    let mut ui = FormInteraction::new(confirmed);
    let deleted = app.with_view_model(session, |vm| {
        let deleted = vm.delete(id, &mut ui);
        vm.flash(ui.take_notices());
        deleted
    });

    match (deleted, ui.pending_prompt()) {
        (Ok(false), Some(prompt)) => {
            html_response(confirm_page(prompt, &format!("/services/{id}/delete"), &[]))
        }
        _ => redirect("/"),
    }
}

fn current_session(req: &Request, app: &App) -> Result<Option<SessionContext>, ServerError> {
    let Some(token) = req
        .headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| cookie_value(h, SESSION_COOKIE))
    else {
        return Ok(None);
    };
    app.db
        .with_conn(|conn| SessionContext::init(conn, token, now_unix()))
}

fn read_body(req: &mut Request) -> Result<String, ServerError> {
    let mut body = String::new();
    req.body_mut()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Isi formulir tidak terbaca: {e}")))?;
    Ok(body)
}

fn parse_id(raw: &str) -> Result<ServiceId, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("ID servis tidak valid: '{raw}'")))
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
