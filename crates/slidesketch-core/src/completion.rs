//! Completion backend trait and the chat-completions wire types.

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde_json::Value;

use crate::ExtractError;
use crate::prompt::{MAX_TOKENS, SYSTEM_PROMPT, TEMPERATURE, USER_PROMPT};

/// Boxed future returned by [`CompletionBackend::complete`].
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, ExtractError>> + Send + 'a>>;

/// A vision-capable completion service that can interpret a slide sketch.
pub trait CompletionBackend: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Issue exactly one completion call. Implementations must not retry.
    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
        api_key: &'a str,
    ) -> CompletionFuture<'a>;
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub response_format: ResponseFormat,
    pub temperature: f32,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl CompletionRequest {
    /// Build the extraction request for one image. The data URL is passed
    /// through as-is.
    pub fn for_image(model: &str, image_data_url: &str) -> Self {
        Self {
            model: model.to_string(),
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
                },
                Message {
                    role: "user".to_string(),
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: USER_PROMPT.to_string(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: image_data_url.to_string(),
                            },
                        },
                    ]),
                },
            ],
        }
    }

    /// The image data URL carried by this request, if any.
    pub fn image_data_url(&self) -> Option<&str> {
        self.messages.iter().find_map(|m| match &m.content {
            MessageContent::Parts(parts) => parts.iter().find_map(|p| match p {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                ContentPart::Text { .. } => None,
            }),
            MessageContent::Text(_) => None,
        })
    }
}

/// A decoded completion envelope. Only `choices[0].message.content` is read.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    envelope: Value,
}

impl CompletionResponse {
    pub fn from_envelope(envelope: Value) -> Self {
        Self { envelope }
    }

    /// Envelope whose first choice carries `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self::from_envelope(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content.into() } }]
        }))
    }

    /// The first choice's message content, or `"{}"` when it is missing,
    /// empty, or not a string.
    pub fn content(&self) -> &str {
        self.envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or("{}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let req = CompletionRequest::for_image("gpt-4o-mini", "data:image/png;base64,AAAA");
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["response_format"], json!({ "type": "json_object" }));
        assert_eq!(body["max_tokens"], 600);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], SYSTEM_PROMPT);
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(
            messages[1]["content"],
            json!([
                { "type": "text", "text": USER_PROMPT },
                { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } }
            ])
        );
    }

    #[test]
    fn image_data_url_is_recoverable() {
        let req = CompletionRequest::for_image("m", "data:image/jpeg;base64,/9j/");
        assert_eq!(req.image_data_url(), Some("data:image/jpeg;base64,/9j/"));
    }

    #[test]
    fn content_reads_first_choice() {
        let resp = CompletionResponse::from_envelope(json!({
            "choices": [
                { "message": { "content": "{\"title\":\"A\"}" } },
                { "message": { "content": "{\"title\":\"B\"}" } }
            ]
        }));
        assert_eq!(resp.content(), "{\"title\":\"A\"}");
    }

    #[test]
    fn content_defaults_to_empty_object() {
        for envelope in [
            json!({}),
            json!({ "choices": [] }),
            json!({ "choices": "nope" }),
            json!({ "choices": [{ "message": {} }] }),
            json!({ "choices": [{ "message": { "content": null } }] }),
            json!({ "choices": [{ "message": { "content": "" } }] }),
        ] {
            assert_eq!(CompletionResponse::from_envelope(envelope).content(), "{}");
        }
    }
}
