//! HTTP API handlers for sovnote-ai

pub mod analyze;
pub mod health;

pub use analyze::{analyze_note, analyze_routes};
pub use health::health_routes;
