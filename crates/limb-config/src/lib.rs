//! Configuration for the limb sensor tools.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line. Missing fields fall back to their defaults, unknown fields are
//! ignored.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, EllipsoidConfig, HorizonConfig, SensorConfig, ShapeKind};
pub use error::ConfigError;

/// Default config directory, `<platform config dir>/limb`.
pub fn default_config_dir() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("limb"))
}
