use crate::domain::ServiceStatus;
use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn status_badge(status: ServiceStatus) -> Markup {
    html! {
        span class=(format!("badge {}", status.css_class())) { (status.label()) }
    }
}

/// Flash notices and the load-error banner.
pub fn notices(load_error: Option<&str>, messages: &[String]) -> Markup {
    html! {
        @if let Some(err) = load_error {
            div class="banner banner-error" role="alert" { (err) }
        }
        @for msg in messages {
            div class="banner" role="status" { (msg) }
        }
    }
}
