pub mod config;
pub mod errors;
pub mod event;
pub mod samples;

pub use config::{Environment, PortalConfig};
pub use errors::ResolveError;
pub use event::{Event, EventId, Organization};
