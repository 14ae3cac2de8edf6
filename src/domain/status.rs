use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Workflow status of a repair intake.
///
/// Serialized with the shop's own labels, which is also what the remote
/// `services.status` column stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "Masuk")]
    Intake,
    #[serde(rename = "Pengecekan")]
    Inspection,
    #[serde(rename = "Dikerjakan")]
    InProgress,
    #[serde(rename = "Selesai")]
    Done,
    #[serde(rename = "Diambil")]
    PickedUp,
    #[serde(rename = "Batal")]
    Cancelled,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 6] = [
        ServiceStatus::Intake,
        ServiceStatus::Inspection,
        ServiceStatus::InProgress,
        ServiceStatus::Done,
        ServiceStatus::PickedUp,
        ServiceStatus::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ServiceStatus::Intake => "Masuk",
            ServiceStatus::Inspection => "Pengecekan",
            ServiceStatus::InProgress => "Dikerjakan",
            ServiceStatus::Done => "Selesai",
            ServiceStatus::PickedUp => "Diambil",
            ServiceStatus::Cancelled => "Batal",
        }
    }

    /// Position in the workflow. Both terminal statuses share the last rank.
    pub fn rank(self) -> u8 {
        match self {
            ServiceStatus::Intake => 0,
            ServiceStatus::Inspection => 1,
            ServiceStatus::InProgress => 2,
            ServiceStatus::Done => 3,
            ServiceStatus::PickedUp | ServiceStatus::Cancelled => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ServiceStatus::PickedUp | ServiceStatus::Cancelled)
    }

    /// Still being worked on (the "active" tab).
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ServiceStatus::Intake | ServiceStatus::Inspection | ServiceStatus::InProgress
        )
    }

    /// CSS modifier used by the status badge.
    pub fn css_class(self) -> &'static str {
        match self {
            ServiceStatus::Intake => "status-intake",
            ServiceStatus::Inspection => "status-inspection",
            ServiceStatus::InProgress => "status-in-progress",
            ServiceStatus::Done => "status-done",
            ServiceStatus::PickedUp => "status-picked-up",
            ServiceStatus::Cancelled => "status-cancelled",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ServiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ServiceStatus::ALL
            .into_iter()
            .find(|st| st.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
