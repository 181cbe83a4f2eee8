pub mod config;
pub mod deps;
pub mod error;
pub mod file_config;
pub mod types;

pub use config::AppConfig;
pub use deps::ServerDeps;
pub use error::{OrNotFound, Result, UnknownVariant, VexumError};
pub use file_config::{DashboardConfig, FileConfig, RadarConfig, ServerConfig, SessionConfig};
pub use types::*;
