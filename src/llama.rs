use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;

const TOGETHER_API_URL: &str = "https://api.together.xyz/v1/chat/completions";

// Model constant
pub const LLAMA_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";

/// Environment variable holding the Together API key. When unset, the app
/// runs on the heuristic analyzer and scripted responder alone.
pub const API_KEY_ENV: &str = "TOGETHER_API_KEY";

/// The two request modes the app sends to the hosted model. Anything else
/// coming over the wire is a request-validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Journal,
    Chat,
}

impl RequestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMode::Journal => "journal",
            RequestMode::Chat => "chat",
        }
    }

    pub fn from_str(s: &str) -> Option<RequestMode> {
        match s {
            "journal" => Some(RequestMode::Journal),
            "chat" => Some(RequestMode::Chat),
            _ => None,
        }
    }
}

/// Build the full prompt for a mode. Journal mode demands a bare JSON object
/// (the extractor copes when the model ignores that); chat mode asks for a
/// free-text supportive reply used as-is.
pub fn build_prompt(mode: RequestMode, input: &str) -> String {
    match mode {
        RequestMode::Journal => format!(
            r#"You are a journaling assistant. Respond ONLY with a valid JSON object. DO NOT include explanations, introductions, or comments.

Example output:
{{
  "mood": "Positive",
  "emotions": ["happy", "grateful"],
  "sentiment": 0.87,
  "keyThemes": ["work", "stress", "relationships"],
  "suggestions": ["Try meditating", "Talk to a friend", "Focus on what's in your control"]
}}

Now analyze this journal entry and return only the JSON object:

Journal Entry:
{input}"#
        ),
        RequestMode::Chat => format!(
            "You are a compassionate mental health AI companion. Respond with supportive, empathetic responses. Offer emotional validation, encouragement, and helpful suggestions when appropriate.\n\nUser:\n{input}"
        ),
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct TogetherClient {
    client: Client,
    api_key: String,
}

impl TogetherClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
        }
    }

    /// Construct a client from the environment, or None when no key is
    /// configured (the caller falls back to the local analyzers).
    pub fn from_env() -> Option<Self> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(&key))
    }

    /// Send one completion request and return the raw response text.
    pub async fn complete(
        &self,
        mode: RequestMode,
        input: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = CompletionRequest {
            model: LLAMA_MODEL.to_string(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: build_prompt(mode, input),
            }],
        };

        let response = self
            .client
            .post(TOGETHER_API_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("Together API error ({}): {}", status, error_text).into());
        }

        let completion: CompletionResponse = response.json().await?;

        completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| "No content returned by the model".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_mode_round_trips() {
        assert_eq!(RequestMode::from_str("journal"), Some(RequestMode::Journal));
        assert_eq!(RequestMode::from_str("chat"), Some(RequestMode::Chat));
        assert_eq!(RequestMode::Journal.as_str(), "journal");
        assert_eq!(RequestMode::Chat.as_str(), "chat");
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert_eq!(RequestMode::from_str("voice"), None);
        assert_eq!(RequestMode::from_str(""), None);
        assert_eq!(RequestMode::from_str("Journal"), None);
    }

    #[test]
    fn test_journal_prompt_embeds_entry_and_demands_json() {
        let prompt = build_prompt(RequestMode::Journal, "long day at the office");
        assert!(prompt.contains("long day at the office"));
        assert!(prompt.contains("ONLY with a valid JSON object"));
        assert!(prompt.contains("\"keyThemes\""));
    }

    #[test]
    fn test_chat_prompt_embeds_user_text() {
        let prompt = build_prompt(RequestMode::Chat, "I had trouble sleeping");
        assert!(prompt.contains("I had trouble sleeping"));
        assert!(prompt.contains("compassionate mental health AI companion"));
    }
}
