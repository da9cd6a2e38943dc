// Mode table: request profiles for each kind of AI query

use crate::error::AiServiceError;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named request profile selecting the system instruction and output budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "chat")]
    Chat,
    #[serde(rename = "wellbeing_tips")]
    WellbeingTips,
    #[serde(rename = "recommendation")]
    Recommendation,
    #[serde(rename = "analyzeFeedback")]
    AnalyzeFeedback,
    #[serde(rename = "summarizeFeedback")]
    SummarizeFeedback,
}

/// Per-mode request settings.
#[derive(Debug)]
pub struct ModeProfile {
    pub system_prompt: &'static str,
    /// Output budget for this mode; `None` falls back to the configured default.
    pub default_max_tokens: Option<u32>,
}

static MODE_NAMES: phf::Map<&'static str, Mode> = phf_map! {
    "chat" => Mode::Chat,
    "wellbeing_tips" => Mode::WellbeingTips,
    "recommendation" => Mode::Recommendation,
    "analyzeFeedback" => Mode::AnalyzeFeedback,
    "summarizeFeedback" => Mode::SummarizeFeedback,
};

// Indexed by `Mode as usize`
static PROFILES: [ModeProfile; 5] = [
    ModeProfile {
        system_prompt: "You are a helpful AI assistant for a counselor appointment scheduler. \
            Provide concise, supportive, and helpful responses. Never provide medical advice or diagnoses. \
            If a student mentions serious mental health concerns, suicide, self-harm, or crisis situations, \
            always recommend they contact a real counselor immediately or call emergency services. \
            Keep responses positive and safe.",
        default_max_tokens: None,
    },
    ModeProfile {
        system_prompt: "You are a wellbeing assistant providing general wellness tips and stress management advice. \
            Provide simple, actionable, and positive suggestions for students. Never provide medical advice or diagnoses. \
            Keep responses brief and supportive. If serious issues are mentioned, recommend consulting a real counselor.",
        default_max_tokens: None,
    },
    ModeProfile {
        system_prompt: "You are an AI counselor recommendation assistant. Based on the student's needs, \
            suggest the most suitable counselor type (Academic, Career, Personal, or Mental Health) and explain why. \
            Be concise and helpful. For serious mental health concerns, always recommend Mental Health counselors \
            and suggest seeking immediate help.",
        default_max_tokens: None,
    },
    ModeProfile {
        system_prompt: "You are an AI feedback analyzer. Analyze the student feedback and return a JSON object with: \
            {\"rating\": <1-5>, \"sentiment\": \"<positive|neutral|negative>\", \"summary\": \"<brief summary>\", \
            \"improvementSuggestions\": \"<optional suggestions for counselor>\"}. \
            Base rating on the overall tone and content. Be objective and constructive.",
        default_max_tokens: Some(300),
    },
    ModeProfile {
        system_prompt: "You are an AI assistant that summarizes student feedback. \
            Extract key points, sentiment, and actionable insights. Be concise.",
        default_max_tokens: None,
    },
];

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Chat,
        Mode::WellbeingTips,
        Mode::Recommendation,
        Mode::AnalyzeFeedback,
        Mode::SummarizeFeedback,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::WellbeingTips => "wellbeing_tips",
            Mode::Recommendation => "recommendation",
            Mode::AnalyzeFeedback => "analyzeFeedback",
            Mode::SummarizeFeedback => "summarizeFeedback",
        }
    }

    pub fn profile(self) -> &'static ModeProfile {
        &PROFILES[self as usize]
    }

    /// Modes callers may request directly. Feedback analysis is driven by the
    /// analyzer only.
    pub fn is_public(self) -> bool {
        !matches!(self, Mode::AnalyzeFeedback)
    }
}

impl FromStr for Mode {
    type Err = AiServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MODE_NAMES.get(s).copied().ok_or_else(|| {
            let valid: Vec<&str> = Mode::ALL.iter().map(|m| m.as_str()).collect();
            AiServiceError::InvalidInput(format!(
                "Invalid mode. Must be one of: {}",
                valid.join(", ")
            ))
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
