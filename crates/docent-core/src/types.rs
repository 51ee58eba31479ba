//! Shared types for docent-core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Message payload as it arrives at the boundary.
///
/// Validated once when the `RequestContext` is built; everything past the
/// boundary works with the plain text. Channels that grow richer payloads
/// add variants here rather than re-checking shapes downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessagePayload {
    Text { value: String },
}

impl MessagePayload {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// The plain-text content of the payload
    pub fn into_text(self) -> String {
        match self {
            Self::Text { value } => value,
        }
    }
}

/// One prior conversation turn, most-recent-last in `RequestContext::history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Everything the dispatcher knows about one incoming request.
///
/// Built per request and discarded after the outcome is produced; the
/// caller owns whatever conversation state it wants to carry across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub request_id: String,
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub context: Map<String, Value>,
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>, payload: MessagePayload) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            message: payload.into_text(),
            history: Vec::new(),
            context: Map::new(),
            received_at: Utc::now(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }

    /// String value from the free-form context map, or the given default
    pub fn context_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.context
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }
}

/// Result of one dispatch, always well-formed for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchOutcome {
    Success { data: DispatchData },
    Error { code: u16, message: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The success payload, if any
    pub fn data(&self) -> Option<&DispatchData> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }
}

/// Success payload of a dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchData {
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_intent: Option<String>,
    pub handled_by: String,
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_tagged_json_shape() {
        let payload = MessagePayload::text("你好");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["value"], "你好");

        let back: MessagePayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_payload_unknown_kind_rejected() {
        let result: Result<MessagePayload, _> =
            serde_json::from_str(r#"{"kind": "audio", "value": "beep"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_context_builder() {
        let request = RequestContext::new("visitor-1", MessagePayload::text("我想预约"))
            .with_history(vec![HistoryEntry::user("门票")]);
        assert_eq!(request.user_id, "visitor-1");
        assert_eq!(request.message, "我想预约");
        assert_eq!(request.history.len(), 1);
        assert!(!request.request_id.is_empty());
    }

    #[test]
    fn test_context_str_default() {
        let mut context = Map::new();
        context.insert("phone".to_string(), Value::String("139".to_string()));
        let request = RequestContext::new("v", MessagePayload::text("hi")).with_context(context);
        assert_eq!(request.context_str("phone", "000"), "139");
        assert_eq!(request.context_str("missing", "000"), "000");
    }

    #[test]
    fn test_outcome_success_json_shape() {
        let outcome = DispatchOutcome::Success {
            data: DispatchData {
                intent: "qa".to_string(),
                sub_intent: None,
                handled_by: "QAAgent".to_string(),
                response: "答复".to_string(),
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["intent"], "qa");
        assert_eq!(json["data"]["handled_by"], "QAAgent");
        // absent sub-intent is omitted entirely
        assert!(json["data"].get("sub_intent").is_none());
    }

    #[test]
    fn test_outcome_error_json_shape() {
        let outcome = DispatchOutcome::Error {
            code: 500,
            message: "boom".to_string(),
        };
        assert!(!outcome.is_success());
        assert!(outcome.data().is_none());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], 500);
    }
}
