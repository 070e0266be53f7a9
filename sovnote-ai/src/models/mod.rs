//! Data models for sovnote-ai (Note Analyzer microservice)

pub mod analysis;
pub mod note;

pub use analysis::{AnalysisResult, KnowledgeGaps, GAP_THRESHOLD};
pub use note::Note;
