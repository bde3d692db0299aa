pub mod config;
pub mod logging;
pub mod view_registry;

pub use config::{ConfigError, ServerConfig};
pub use view_registry::ViewRegistry;
