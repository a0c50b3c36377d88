//! Anthropic Messages API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// MESSAGES TYPES
// =============================================================================

/// Request body for the messages endpoint.
#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub system: String,
    pub messages: Vec<Message>,
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from the messages endpoint.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
    /// Present when the API reports an error inside a 200 body.
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// One block of model output.
#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: String,
}

/// Token usage for a messages request.
#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error envelope returned on non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

/// Error details.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: "claude-test".to_string(),
            max_tokens: 2048,
            system: "be terse".to_string(),
            messages: vec![Message::user("set up pihole")],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-test");
        assert_eq!(json["max_tokens"], 2048);
        assert_eq!(json["system"], "be terse");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "set up pihole");
    }

    #[test]
    fn test_empty_system_is_omitted() {
        let request = MessagesRequest {
            model: "m".to_string(),
            max_tokens: 16,
            system: String::new(),
            messages: vec![Message::user("hi")],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "{\"title\":\"x\"}"}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 12, "output_tokens": 34}
            }"#,
        )
        .unwrap();

        assert_eq!(response.content.len(), 1);
        assert_eq!(response.content[0].block_type, "text");
        assert_eq!(response.usage.unwrap().output_tokens, 34);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_error_response_deserialization() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        )
        .unwrap();
        assert_eq!(body.error.error_type, "overloaded_error");
        assert_eq!(body.error.message, "Overloaded");
    }
}
