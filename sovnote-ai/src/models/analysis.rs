//! Analysis result returned to the client
//!
//! # Scoring
//! - `completeness_score`: cosine similarity × 100, clamped to [0, 100],
//!   rounded to 2 decimal places
//! - `knowledge_gaps`: "High" below [`GAP_THRESHOLD`], "Low" at or above it

use serde::{Deserialize, Serialize};

/// Completeness score at or above which knowledge gaps are "Low"
pub const GAP_THRESHOLD: f64 = 50.0;

/// Binary knowledge gap level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnowledgeGaps {
    High,
    Low,
}

impl KnowledgeGaps {
    /// Derive the gap level from a completeness score
    ///
    /// Exactly 50.0 is "Low" (not strictly less than the threshold).
    pub fn from_score(completeness_score: f64) -> Self {
        if completeness_score < GAP_THRESHOLD {
            KnowledgeGaps::High
        } else {
            KnowledgeGaps::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeGaps::High => "High",
            KnowledgeGaps::Low => "Low",
        }
    }
}

impl std::fmt::Display for KnowledgeGaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// One of the fixed classifier labels
    pub category: String,
    /// 0.0-100.0, two decimal places
    pub completeness_score: f64,
    /// Reference summary, or the placeholder when lookup failed
    pub wiki_summary: String,
    pub knowledge_gaps: KnowledgeGaps,
}

impl AnalysisResult {
    /// Build a result from a raw cosine similarity
    pub fn scored(category: String, wiki_summary: String, similarity: f32) -> Self {
        let completeness_score = completeness_from_similarity(similarity);
        Self {
            category,
            completeness_score,
            wiki_summary,
            knowledge_gaps: KnowledgeGaps::from_score(completeness_score),
        }
    }

    /// Build the degraded result used when no reference summary is available
    pub fn unavailable(category: String, placeholder: String) -> Self {
        Self {
            category,
            completeness_score: 0.0,
            wiki_summary: placeholder,
            knowledge_gaps: KnowledgeGaps::from_score(0.0),
        }
    }
}

/// Scale a cosine similarity (-1.0..=1.0) to a 0-100 percentage
///
/// Negative similarities clamp to 0.0. NaN maps to 0.0.
pub fn completeness_from_similarity(similarity: f32) -> f64 {
    let percent = f64::from(similarity) * 100.0;
    if percent.is_nan() {
        return 0.0;
    }
    round_to_hundredths(percent.clamp(0.0, 100.0))
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
