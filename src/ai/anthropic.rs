use super::{SuggestError, SuggestionRequest, TimelineSuggester, TimelineSuggestion};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

const SYSTEM_PROMPT: &str = "\
You are a personal planning assistant that suggests realistic timelines and estimates durations for tasks.\n\n\
Based on the task description and the user's historical data:\n\
1. Suggest a timeline for the task, including start and end times.\n\
2. Estimate the duration required to complete the task (e.g., \"45 minutes\", \"2 hours\").\n\
3. Explain your reasoning behind the suggested timeline and duration.\n\n\
Return ONLY a JSON object, no explanation:\n\
{\n\
  \"suggestedTimeline\": \"Suggested timeline here (e.g., Tomorrow 9:00 AM - 10:30 AM)\",\n\
  \"estimatedDuration\": \"Estimated duration here (e.g., 1 hour 30 minutes)\",\n\
  \"reasoning\": \"Reasoning behind the suggestion\"\n\
}";

/// Timeline suggester backed by the Anthropic Messages API.
pub struct AnthropicSuggester {
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl AnthropicSuggester {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl TimelineSuggester for AnthropicSuggester {
    async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<TimelineSuggestion, SuggestError> {
        let user_msg = format!(
            "Task Description: {}\nUser History: {}",
            request.task_description, request.user_history
        );

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 400,
            "system": SYSTEM_PROMPT,
            "messages": [
                { "role": "user", "content": user_msg }
            ]
        });

        let resp = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SuggestError::Api { status, body });
        }

        let api_resp: serde_json::Value = resp.json().await?;

        // Extract text from the first content block
        let text = api_resp["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|block| block["text"].as_str())
            .ok_or_else(|| SuggestError::Malformed("no text in API response".to_string()))?;

        let json_str = strip_code_fences(text);
        serde_json::from_str::<TimelineSuggestion>(json_str)
            .map_err(|e| SuggestError::Malformed(format!("{} — raw: {}", e, text)))
    }
}

/// Strip markdown code fences if the model wrapped its JSON in them.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn leaves_plain_json_alone() {
        let text = "  {\"a\": 1}  ";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }
}
