//! Feedback analysis result types.

use serde::{Deserialize, Serialize};

/// Overall tone of a piece of feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Case-insensitive match on the three known labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

/// Structured view of one feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalysis {
    /// 1 (very dissatisfied) to 5 (very satisfied).
    pub rating: u8,
    pub sentiment: Sentiment,
    pub summary: String,
    pub improvement_suggestions: Option<String>,
}

impl FeedbackAnalysis {
    pub const NEUTRAL_RATING: u8 = 3;
    pub const FALLBACK_SUMMARY: &'static str = "Thank you for your feedback.";

    /// The neutral analysis used whenever the model cannot be used.
    pub fn fallback() -> Self {
        Self {
            rating: Self::NEUTRAL_RATING,
            sentiment: Sentiment::Neutral,
            summary: Self::FALLBACK_SUMMARY.to_string(),
            improvement_suggestions: None,
        }
    }
}

/// Analysis plus whether the model actually produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub analysis: FeedbackAnalysis,
    pub ai_analyzed: bool,
}

impl AnalysisOutcome {
    pub fn fallback() -> Self {
        Self {
            analysis: FeedbackAnalysis::fallback(),
            ai_analyzed: false,
        }
    }
}
