pub mod alert;
pub mod config;
pub mod event;
pub mod mapper;
pub mod severity;
pub mod ticket;
pub mod transform;

pub use alert::{AlertExtensions, SecurityAlert};
pub use config::RoutingConfig;
pub use event::{EventExtensions, SecurityEvent};
pub use mapper::Mapper;
pub use severity::Severity;
pub use ticket::{Action, CustomFields, Service, TicketAction};
pub use transform::utc_timestamp;
