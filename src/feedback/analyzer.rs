// Feedback analyzer - model-backed analysis with a neutral fallback

use super::models::{AnalysisOutcome, FeedbackAnalysis};
use super::parse::parse_analysis;
use crate::gateway::{AiGateway, Mode, QueryOptions};
use crate::interaction::{InteractionLog, InteractionRecord};
use crate::utils::logging::preview;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Lower temperature keeps ratings consistent between submissions.
const ANALYSIS_TEMPERATURE: f64 = 0.3;
const ANALYSIS_MAX_TOKENS: u32 = 300;

/// Converts free-text feedback into a [`FeedbackAnalysis`].
///
/// Analysis never fails: any gateway or parse error yields
/// [`FeedbackAnalysis::fallback`], so feedback submission keeps working while
/// the model is unreachable.
pub struct FeedbackAnalyzer {
    gateway: Arc<AiGateway>,
    interaction_log: Arc<dyn InteractionLog>,
}

impl FeedbackAnalyzer {
    pub fn new(gateway: Arc<AiGateway>, interaction_log: Arc<dyn InteractionLog>) -> Self {
        Self {
            gateway,
            interaction_log,
        }
    }

    /// Prompt asking for exactly the four analysis fields, with the feedback
    /// embedded verbatim.
    pub fn build_prompt(feedback: &str) -> String {
        format!(
            r#"Analyze this student feedback about a counseling session and provide structured analysis:

Feedback: "{feedback}"

Return a JSON object with the following structure:
{{
  "rating": <number 1-5 based on sentiment and content>,
  "sentiment": "<positive|neutral|negative>",
  "summary": "<1-2 sentence summary of key points>",
  "improvementSuggestions": "<optional constructive suggestions for the counselor>"
}}

Be objective, constructive, and professional. Base the rating on overall satisfaction expressed."#
        )
    }

    pub async fn analyze(&self, feedback: &str) -> FeedbackAnalysis {
        self.analyze_detailed(feedback).await.analysis
    }

    /// Like [`analyze`](Self::analyze), also reporting whether the model
    /// produced the result.
    pub async fn analyze_detailed(&self, feedback: &str) -> AnalysisOutcome {
        let prompt = Self::build_prompt(feedback);
        let options = QueryOptions::default()
            .with_temperature(ANALYSIS_TEMPERATURE)
            .with_max_tokens(ANALYSIS_MAX_TOKENS);

        debug!(feedback_length = feedback.len(), "Analyzing feedback with AI");
        let start = Instant::now();

        let response = match self.gateway.query_mode(&prompt, Mode::AnalyzeFeedback, options).await {
            Ok(response) => response,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "AI analysis unavailable, using default values");
                return AnalysisOutcome::fallback();
            }
        };

        self.interaction_log.record(&InteractionRecord::new(
            Mode::AnalyzeFeedback,
            &prompt,
            &response.text,
            start.elapsed().as_millis() as u64,
            response.cached,
        ));

        match parse_analysis(&response.text) {
            Ok(analysis) => {
                info!(
                    rating = analysis.rating,
                    sentiment = ?analysis.sentiment,
                    cached = response.cached,
                    "Feedback analyzed"
                );
                AnalysisOutcome {
                    analysis,
                    ai_analyzed: true,
                }
            }
            Err(e) => {
                error!(
                    error = %e,
                    response = %preview(&response.text, 200),
                    "Failed to parse AI analysis"
                );
                AnalysisOutcome::fallback()
            }
        }
    }
}
