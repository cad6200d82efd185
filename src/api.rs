//! Wire models for the RAG service's HTTP API.
//!
//! These mirror the JSON the service returns. Every field the client does
//! not strictly need is optional so that schema drift on the server side
//! degrades to defaults instead of decode failures.

use serde::{Deserialize, Serialize};

/// Status literal the service reports before any document was ingested.
pub const NOT_INITIALIZED: &str = "Not initialized";

/// Body of `GET /stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_documents: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<u64>,
    /// Generation model name, when the vector store is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

impl StatsResponse {
    pub fn is_initialized(&self) -> bool {
        self.status != NOT_INITIALIZED
    }
}

/// Body of `POST /upload` and `POST /delete`.
///
/// Error responses from the service carry `detail` instead of `message`;
/// both decode into this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl MessageResponse {
    /// The server's message, or `default` when it is absent or empty.
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(self.message.as_deref()).unwrap_or(default)
    }
}

/// Body sent to `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Body of `POST /query`.
///
/// Deployments disagree on whether the generated text lives under `answer`
/// or `response`; use [`QueryResponse::answer`] rather than reading either
/// field directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Leading excerpts of the chunks the answer was grounded on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl QueryResponse {
    pub fn answer(&self) -> Answer {
        if let Some(text) = non_empty(self.answer.as_deref()) {
            Answer::Primary(text.to_string())
        } else if let Some(text) = non_empty(self.response.as_deref()) {
            Answer::Alternate(text.to_string())
        } else {
            Answer::Missing
        }
    }
}

/// A query result normalized across both response schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Text found under `answer`.
    Primary(String),
    /// Text found under `response`.
    Alternate(String),
    /// Neither field carried text.
    Missing,
}

impl Answer {
    pub const MISSING_TEXT: &'static str = "No response";

    pub fn text(&self) -> &str {
        match self {
            Answer::Primary(text) | Answer::Alternate(text) => text,
            Answer::Missing => Self::MISSING_TEXT,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Answer::Missing)
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub rag_initialized: bool,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- StatsResponse ------------------------------------------------------

    #[test]
    fn stats_minimal_body_decodes_with_absent_counts() {
        let stats: StatsResponse = serde_json::from_str(r#"{"status":"Ready"}"#).unwrap();
        assert_eq!(stats.status, "Ready");
        assert!(stats.total_documents.is_none());
        assert!(stats.total_chunks.is_none());
    }

    #[test]
    fn stats_null_counts_decode_as_absent() {
        let stats: StatsResponse =
            serde_json::from_str(r#"{"status":"Active","total_documents":null,"total_chunks":7}"#)
                .unwrap();
        assert!(stats.total_documents.is_none());
        assert_eq!(stats.total_chunks, Some(7));
    }

    #[test]
    fn stats_missing_status_is_rejected() {
        let result = serde_json::from_str::<StatsResponse>(r#"{"total_chunks":3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn stats_extra_model_fields_decode() {
        let json = r#"{"status":"Active","total_chunks":12,"model":"llama3.2:3b",
            "embedding_model":"sentence-transformers/all-MiniLM-L6-v2"}"#;
        let stats: StatsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(stats.model.as_deref(), Some("llama3.2:3b"));
        assert!(stats.embedding_model.is_some());
    }

    #[test]
    fn stats_not_initialized_literal_is_exact() {
        let stats = StatsResponse {
            status: "not initialized".to_string(),
            total_documents: None,
            total_chunks: None,
            model: None,
            embedding_model: None,
        };
        assert!(stats.is_initialized());
    }

    // -- MessageResponse ----------------------------------------------------

    #[test]
    fn message_or_prefers_server_message() {
        let resp: MessageResponse =
            serde_json::from_str(r#"{"message":"All documents deleted and system reset"}"#)
                .unwrap();
        assert_eq!(
            resp.message_or("Deletion complete"),
            "All documents deleted and system reset"
        );
    }

    #[test]
    fn message_or_falls_back_on_absent_or_empty() {
        let absent = MessageResponse::default();
        assert_eq!(absent.message_or("Upload complete"), "Upload complete");
        let empty = MessageResponse {
            message: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(empty.message_or("Upload complete"), "Upload complete");
    }

    #[test]
    fn error_body_decodes_as_message_response() {
        let resp: MessageResponse =
            serde_json::from_str(r#"{"detail":"Only pdf and text files are allowed"}"#).unwrap();
        assert!(resp.message.is_none());
        assert_eq!(resp.detail.as_deref(), Some("Only pdf and text files are allowed"));
    }

    // -- QueryRequest / QueryResponse -----------------------------------------

    #[test]
    fn query_request_serializes_question_only() {
        let json = serde_json::to_string(&QueryRequest::new("What is X?")).unwrap();
        assert_eq!(json, r#"{"question":"What is X?"}"#);
    }

    #[test]
    fn answer_field_wins_over_response() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"answer":"Y","response":"Z"}"#).unwrap();
        assert_eq!(resp.answer(), Answer::Primary("Y".to_string()));
    }

    #[test]
    fn response_field_used_when_answer_absent() {
        let resp: QueryResponse = serde_json::from_str(r#"{"response":"Z"}"#).unwrap();
        assert_eq!(resp.answer(), Answer::Alternate("Z".to_string()));
    }

    #[test]
    fn empty_answer_falls_through_to_response() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"answer":"","response":"Z"}"#).unwrap();
        assert_eq!(resp.answer().text(), "Z");
    }

    #[test]
    fn neither_field_is_missing() {
        let resp: QueryResponse = serde_json::from_str("{}").unwrap();
        let answer = resp.answer();
        assert!(answer.is_missing());
        assert_eq!(answer.text(), "No response");
        assert_eq!(answer.to_string(), "No response");
    }

    #[test]
    fn sources_decode_when_present() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"answer":"Y","sources":["first excerpt","second"]}"#)
                .unwrap();
        assert_eq!(resp.sources.len(), 2);
    }

    // -- HealthResponse -------------------------------------------------------

    #[test]
    fn health_defaults_rag_initialized_to_false() {
        let health: HealthResponse = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert_eq!(health.status, "healthy");
        assert!(!health.rag_initialized);
    }
}
