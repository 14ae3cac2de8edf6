pub mod gate;
pub mod sessions;
pub mod token;

pub use gate::PasswordGate;
pub use sessions::{SessionContext, SESSION_COOKIE};
