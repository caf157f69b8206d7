//! Request and response bodies for the Responses API.

use questline_narrative::domain::generator::{ContextRole, GenerationContext, GenerationRequest};
use serde::{Deserialize, Serialize};

pub(crate) const TEMPERATURE: f64 = 0.8;
pub(crate) const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Error code returned when `previous_response_id` is unknown or expired.
pub(crate) const PREVIOUS_RESPONSE_NOT_FOUND: &str = "previous_response_not_found";

#[derive(Debug, Serialize)]
pub(crate) struct ResponsesRequest<'a> {
    pub model: &'a str,
    pub instructions: &'a str,
    pub input: Vec<InputMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<&'a str>,
    pub store: bool,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub text: TextOptions,
}

#[derive(Debug, Serialize)]
pub(crate) struct InputMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextOptions {
    pub format: TextFormat,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

fn role_name(role: ContextRole) -> &'static str {
    match role {
        ContextRole::Narrator => "assistant",
        ContextRole::Player => "user",
        ContextRole::Summary => "developer",
    }
}

impl<'a> ResponsesRequest<'a> {
    /// Maps an engine request onto the wire, in continuation or transcript
    /// form. The turn prompt is always the last input message.
    pub(crate) fn from_generation(
        model: &'a str,
        request: &'a GenerationRequest,
        store: bool,
    ) -> Self {
        let (previous_response_id, mut input) = match &request.context {
            GenerationContext::Continuation { token } => (Some(token.as_str()), Vec::new()),
            GenerationContext::Transcript { turns } => (
                None,
                turns
                    .iter()
                    .map(|turn| InputMessage {
                        role: role_name(turn.role),
                        content: &turn.content,
                    })
                    .collect(),
            ),
        };
        input.push(InputMessage {
            role: "user",
            content: &request.prompt,
        });

        Self {
            model,
            instructions: &request.instructions,
            input,
            previous_response_id,
            store,
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            text: TextOptions {
                format: TextFormat {
                    kind: "json_object",
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponsesResponse {
    pub id: String,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl ResponsesResponse {
    /// Concatenated `output_text` parts of every message item.
    pub(crate) fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| &item.content)
            .filter(|part| part.kind == "output_text")
            .map(|part| part.text.as_str())
            .collect()
    }
}

/// Extracts `(message, code)` from an error body, falling back to the raw
/// text when it is not JSON.
pub(crate) fn parse_api_error(body: &str, status: u16) -> (String, Option<String>) {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => {
            let error = &json["error"];
            let message = error["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string();
            let code = error["code"]
                .as_str()
                .or_else(|| error["type"].as_str())
                .map(String::from);
            (message, code)
        }
        Err(_) => (format!("HTTP {status}: {body}"), None),
    }
}

#[cfg(test)]
mod tests {
    use questline_narrative::domain::generator::ContextTurn;
    use questline_narrative::domain::themes::Theme;

    use super::*;

    fn request(context: GenerationContext) -> GenerationRequest {
        GenerationRequest {
            theme: Theme::Cyberpunk,
            instructions: "You are the narrator.".into(),
            context,
            prompt: "Player action: Hack the door".into(),
            player_action: Some("Hack the door".into()),
        }
    }

    #[test]
    fn test_transcript_request_replays_turns_before_prompt() {
        let req = request(GenerationContext::Transcript {
            turns: vec![
                ContextTurn {
                    role: ContextRole::Summary,
                    content: "Earlier in the adventure: ran.".into(),
                },
                ContextTurn {
                    role: ContextRole::Narrator,
                    content: r#"{"narration":"Rain.","choices":["Go"]}"#.into(),
                },
                ContextTurn {
                    role: ContextRole::Player,
                    content: "Player chose: Go".into(),
                },
            ],
        });

        let body = serde_json::to_value(ResponsesRequest::from_generation("gpt", &req, false)).unwrap();

        let roles: Vec<&str> = body["input"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["developer", "assistant", "user", "user"]);
        assert_eq!(body["input"][3]["content"], "Player action: Hack the door");
        assert!(body.get("previous_response_id").is_none());
        assert_eq!(body["store"], false);
        assert_eq!(body["max_output_tokens"], 1000);
        assert_eq!(body["text"]["format"]["type"], "json_object");
    }

    #[test]
    fn test_continuation_request_sends_only_prompt() {
        let req = request(GenerationContext::Continuation {
            token: "resp_abc".into(),
        });

        let body = serde_json::to_value(ResponsesRequest::from_generation("gpt", &req, true)).unwrap();

        assert_eq!(body["previous_response_id"], "resp_abc");
        assert_eq!(body["input"].as_array().unwrap().len(), 1);
        assert_eq!(body["store"], true);
    }

    #[test]
    fn test_output_text_joins_message_parts() {
        let raw = r#"{
            "id": "resp_1",
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "{\"narration\":"},
                    {"type": "output_text", "text": "\"x\"}"}
                ]}
            ]
        }"#;

        let response: ResponsesResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(response.output_text(), r#"{"narration":"x"}"#);
    }

    #[test]
    fn test_parse_api_error_prefers_code() {
        let body = r#"{"error":{"type":"invalid_request_error","code":"previous_response_not_found","message":"Previous response not found."}}"#;

        let (message, code) = parse_api_error(body, 404);

        assert_eq!(message, "Previous response not found.");
        assert_eq!(code.as_deref(), Some(PREVIOUS_RESPONSE_NOT_FOUND));
    }

    #[test]
    fn test_parse_api_error_non_json() {
        let (message, code) = parse_api_error("Bad Gateway", 502);

        assert!(message.contains("502"));
        assert!(code.is_none());
    }
}
