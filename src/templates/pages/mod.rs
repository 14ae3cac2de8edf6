pub mod confirm;
pub mod edit;
pub mod error;
pub mod login;
pub mod services;

pub use confirm::confirm_page;
pub use edit::edit_page;
pub use error::error_page;
pub use login::login_page;
pub use services::{services_page, ServicesVm};
