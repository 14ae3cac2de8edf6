use crate::errors::ServerError;
use crate::templates::pages::error_page;
use astra::{Body, Response, ResponseBuilder};
use tracing::warn;

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into a proper HTML response
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        warn!(%err, status, "request_failed");
    }
    let message = match &err {
        ServerError::NotFound => "Halaman tidak ditemukan.".to_string(),
        ServerError::BadRequest(msg) => msg.clone(),
        _ => "Terjadi kesalahan pada server.".to_string(),
    };
    let html = error_page(status, &message).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(html))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
