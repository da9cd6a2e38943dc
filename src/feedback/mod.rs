// Feedback analysis: structured rating/sentiment/summary from free text

mod analyzer;
pub mod models;
pub mod parse;

pub use analyzer::FeedbackAnalyzer;
pub use models::{AnalysisOutcome, FeedbackAnalysis, Sentiment};
