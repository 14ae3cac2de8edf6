pub mod service;
pub mod status;
pub mod transition;
pub mod view;

pub use service::{NewService, ServiceId, ServicePatch, ServiceRecord};
pub use status::ServiceStatus;
pub use transition::{request_status_change, Decision};
pub use view::{derive_view, partition, Facets, Partition, Tab};
