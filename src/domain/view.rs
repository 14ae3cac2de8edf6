// src/domain/view.rs
use crate::domain::service::ServiceRecord;
use crate::domain::status::ServiceStatus;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::collections::HashSet;

/// Filter facets applied on top of the search query.
#[derive(Debug, Clone, PartialEq)]
pub struct Facets {
    /// Empty means "any status".
    pub statuses: HashSet<ServiceStatus>,
    /// Inclusive, from the start of that day.
    pub start_date: Option<NaiveDate>,
    /// Inclusive, through the end of that day.
    pub end_date: Option<NaiveDate>,
    /// Offset in which calendar days are evaluated.
    pub utc_offset: FixedOffset,
}

impl Default for Facets {
    fn default() -> Self {
        Self {
            statuses: HashSet::new(),
            start_date: None,
            end_date: None,
            utc_offset: Utc.fix(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Active,
    History,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Active => "active",
            Tab::History => "history",
        }
    }

    pub fn parse(s: &str) -> Option<Tab> {
        match s {
            "active" => Some(Tab::Active),
            "history" => Some(Tab::History),
            _ => None,
        }
    }

    pub fn contains(self, status: ServiceStatus) -> bool {
        match self {
            Tab::Active => status.is_active(),
            Tab::History => !status.is_active(),
        }
    }
}

/// Active vs. historical split of one source list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub active: Vec<ServiceRecord>,
    pub history: Vec<ServiceRecord>,
}

impl Partition {
    pub fn tab(&self, tab: Tab) -> &[ServiceRecord] {
        match tab {
            Tab::Active => &self.active,
            Tab::History => &self.history,
        }
    }
}

pub fn matches_query(record: &ServiceRecord, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    record.customer_name.to_lowercase().contains(&q)
        || record.item_name.to_lowercase().contains(&q)
        || record.id.to_string().contains(&q)
}

pub fn matches_facets(record: &ServiceRecord, facets: &Facets) -> bool {
    if !facets.statuses.is_empty() && !facets.statuses.contains(&record.status) {
        return false;
    }

    let day = record
        .created_at
        .with_timezone(&facets.utc_offset)
        .date_naive();

    if facets.start_date.is_some_and(|start| day < start) {
        return false;
    }
    if facets.end_date.is_some_and(|end| day > end) {
        return false;
    }
    true
}

/// Filtered and searched subset, in source order.
pub fn derive_view(records: &[ServiceRecord], query: &str, facets: &Facets) -> Vec<ServiceRecord> {
    records
        .iter()
        .filter(|r| matches_query(r, query) && matches_facets(r, facets))
        .cloned()
        .collect()
}

pub fn partition(records: &[ServiceRecord]) -> Partition {
    let (active, history) = records
        .iter()
        .cloned()
        .partition(|r| r.status.is_active());
    Partition { active, history }
}
