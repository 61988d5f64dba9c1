//! bootconf: Layered Bootstrap Settings
//!
//! Resolves the boot-time settings of a web UI runtime from compiled
//! defaults, a pre-boot settings object, URL query parameters and page meta
//! tags, with typed accessors, change notification and a command-line tool.

pub mod cli;
pub mod coerce;
pub mod collab;
pub mod compat;
pub mod config;
pub mod error;
pub mod global;
pub mod locale;
pub mod logging;
pub mod modes;
pub mod notify;
pub mod resolver;
pub mod schema;
pub mod sources;
pub mod value;

pub use error::{ApiError, ConfigError, StorageError};
pub use notify::{ChangeEvent, ListenerId};
pub use resolver::SettingsResolver;
pub use sources::BootEnvironment;
pub use value::{RawValue, Value};
