//! Common utilities and types shared across dynawrap

pub mod config;
pub mod error;
pub mod utils;

pub use config::{ClientConfig, Environment, DEVELOPMENT_BACKOFF_MS};
pub use error::{BoxError, Error, Result};
pub use utils::{chunk_plan, parse_duration, parse_intervals};
