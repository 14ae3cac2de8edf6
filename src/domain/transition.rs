// src/domain/transition.rs
use crate::domain::status::ServiceStatus;

/// Outcome of asking to move a record from one status to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    NoOp,
    Denied(String),
    NeedsConfirmation {
        from: ServiceStatus,
        to: ServiceStatus,
    },
}

impl Decision {
    /// Text the user must agree to before the change is applied.
    pub fn prompt(&self) -> Option<String> {
        match self {
            Decision::NeedsConfirmation { from, to } => {
                Some(format!("Ubah status dari {from} ke {to}?"))
            }
            _ => None,
        }
    }
}

/// Forward-only status policy. Pure: no I/O, no mutation.
///
/// - same status: `NoOp`
/// - lower rank than the current one: `Denied`
/// - terminal to the other terminal: `Denied`
/// - anything else needs the user's confirmation
pub fn request_status_change(current: ServiceStatus, requested: ServiceStatus) -> Decision {
    if current == requested {
        return Decision::NoOp;
    }

    if requested.rank() < current.rank() {
        return Decision::Denied(format!(
            "Status tidak bisa mundur dari {current} ke {requested}."
        ));
    }

    if current.is_terminal() {
        return Decision::Denied(format!(
            "Status {current} sudah final dan tidak bisa diubah ke {requested}."
        ));
    }

    Decision::NeedsConfirmation {
        from: current,
        to: requested,
    }
}
