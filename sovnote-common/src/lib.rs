//! # SovNote Common Library
//!
//! Shared code for SovNote microservices including:
//! - Error types
//! - TOML configuration discovery and loading
//! - Logging configuration

pub mod config;
pub mod error;

pub use error::{Error, Result};
