pub mod anthropic;

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

pub use anthropic::AnthropicSuggester;

/// What the planner hands to a suggester: a free-text description of the
/// task and a free-text sketch of the user's other active tasks.
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub task_description: String,
    pub user_history: String,
}

/// A timeline suggestion as returned by the model. Field names match the
/// JSON the model is asked to produce.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSuggestion {
    pub suggested_timeline: String,
    pub estimated_duration: String,
    pub reasoning: String,
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// An external service that proposes a timeline for a task. The planner
/// treats every failure uniformly; there is no retry or timeout contract
/// at this level.
pub trait TimelineSuggester {
    fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> impl Future<Output = Result<TimelineSuggestion, SuggestError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_parses_camel_case_wire_format() {
        let raw = r#"{
            "suggestedTimeline": "Tomorrow 9:00 AM - 10:30 AM",
            "estimatedDuration": "1 hour 30 minutes",
            "reasoning": "Deep-focus work fits best in the morning."
        }"#;
        let suggestion: TimelineSuggestion = serde_json::from_str(raw).unwrap();
        assert_eq!(suggestion.estimated_duration, "1 hour 30 minutes");
        assert!(suggestion.suggested_timeline.starts_with("Tomorrow"));
    }
}
