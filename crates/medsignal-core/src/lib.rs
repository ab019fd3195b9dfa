//! medsignal core — shared error type and extraction configuration.

pub mod config;
pub mod error;

pub use config::{ExtractionConfig, ScriptBlock};
pub use error::{Error, MalformedInput, Result};
