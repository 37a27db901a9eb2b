//! Core types, configuration, and utilities for the Meridian client.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_ACCOUNT_SERVER_URL, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
