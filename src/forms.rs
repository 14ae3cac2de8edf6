//! Query-string and form-body decoding for the HTML surface.

use crate::domain::{Facets, NewService, ServiceStatus, Tab};
use chrono::{FixedOffset, NaiveDate};
use url::form_urlencoded;

pub fn parse_pairs(input: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(input.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Search, filters and tab of the service list, as carried in the URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub query: String,
    pub facets: Facets,
    pub tab: Tab,
}

impl ListParams {
    /// Unknown statuses and malformed dates are ignored rather than rejected.
    pub fn parse(query_string: &str, utc_offset: FixedOffset) -> Self {
        let pairs = parse_pairs(query_string);
        let date = |key: &str| {
            first(&pairs, key)
                .filter(|v| !v.trim().is_empty())
                .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
        };

        let statuses = pairs
            .iter()
            .filter(|(k, _)| k == "status")
            .filter_map(|(_, v)| v.parse::<ServiceStatus>().ok())
            .collect();

        Self {
            query: first(&pairs, "q").unwrap_or_default().trim().to_string(),
            facets: Facets {
                statuses,
                start_date: date("from"),
                end_date: date("to"),
                utc_offset,
            },
            tab: first(&pairs, "tab").and_then(Tab::parse).unwrap_or_default(),
        }
    }

    /// Query string reproducing these params, with `tab` replaced.
    pub fn to_query_string(&self, tab: Tab) -> String {
        let mut s = form_urlencoded::Serializer::new(String::new());
        if !self.query.is_empty() {
            s.append_pair("q", &self.query);
        }
        // enum order, so the string is stable
        for st in ServiceStatus::ALL {
            if self.facets.statuses.contains(&st) {
                s.append_pair("status", st.label());
            }
        }
        if let Some(d) = self.facets.start_date {
            s.append_pair("from", &d.format("%Y-%m-%d").to_string());
        }
        if let Some(d) = self.facets.end_date {
            s.append_pair("to", &d.format("%Y-%m-%d").to_string());
        }
        s.append_pair("tab", tab.as_str());
        s.finish()
    }
}

/// Intake/edit form fields.
pub fn parse_service_form(body: &str) -> NewService {
    let pairs = parse_pairs(body);
    let text = |key: &str| first(&pairs, key).unwrap_or_default().to_string();
    let optional = |key: &str| first(&pairs, key).map(str::to_string);

    NewService {
        customer_name: text("customer_name"),
        customer_phone: optional("customer_phone"),
        item_name: text("item_name"),
        item_damage: optional("item_damage"),
        high_priority: matches!(first(&pairs, "high_priority"), Some("on" | "true" | "1")),
    }
}

/// Status change form: the requested status and whether the user already
/// confirmed it on the confirmation page.
pub fn parse_status_form(body: &str) -> Option<(ServiceStatus, bool)> {
    let pairs = parse_pairs(body);
    let status = first(&pairs, "status")?.parse().ok()?;
    Some((status, is_confirmed(&pairs)))
}

pub fn is_confirmed(pairs: &[(String, String)]) -> bool {
    first(pairs, "confirm") == Some("yes")
}

pub fn field(pairs: &[(String, String)], key: &str) -> Option<String> {
    first(pairs, key).map(str::to_string)
}

/// Value of one cookie from a `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|part| {
        let (k, v) = part.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}
