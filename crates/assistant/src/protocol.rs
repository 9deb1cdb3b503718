use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::QueryError;

/// Body posted to the query endpoint.
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

/// Answer from the query service.
///
/// `viz` carries an encoded chart image whose format is given by `mime`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub data: Vec<Map<String, JsonValue>>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub viz: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

/// Optional structured extras of a [`QueryResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

impl QueryResponse {
    /// The extras, or `None` when the response carried none of them.
    pub fn meta(&self) -> Option<ResponseMeta> {
        let email_body = self.email_body.clone().filter(|s| !s.is_empty());
        let email_subject = self.email_subject.clone().filter(|s| !s.is_empty());
        if email_body.is_none() && email_subject.is_none() && self.rows_affected.is_none() {
            return None;
        }
        Some(ResponseMeta {
            email_body,
            email_subject,
            rows_affected: self.rows_affected,
        })
    }
}

fn non_empty_str<'a>(doc: &'a JsonValue, key: &str) -> Option<&'a str> {
    doc.get(key)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Read a raw HTTP reply from the query service.
///
/// Success statuses decode the body as a [`QueryResponse`]. An error status
/// whose body still carries a `summary` is treated as an answer. Otherwise the
/// error message is the body's `error`, then `details`, then the raw text, then
/// `API error: <status>`.
pub fn interpret_response(status: u16, body: &str) -> Result<QueryResponse, QueryError> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_str(body)?);
    }

    let Ok(doc) = serde_json::from_str::<JsonValue>(body) else {
        let text = body.trim();
        debug!(status, "query service returned a non-JSON error body");
        return Err(QueryError::Service(if text.is_empty() {
            format!("API error: {status}")
        } else {
            text.to_string()
        }));
    };

    if let Some(summary) = non_empty_str(&doc, "summary") {
        debug!(status, "query service returned a summary with an error status");
        let data = doc
            .get("data")
            .and_then(JsonValue::as_array)
            .map(|rows| rows.iter().filter_map(|r| r.as_object().cloned()).collect())
            .unwrap_or_default();
        return Ok(QueryResponse {
            sql: non_empty_str(&doc, "sql").map(str::to_string),
            data,
            summary: summary.to_string(),
            viz: non_empty_str(&doc, "viz").map(str::to_string),
            mime: non_empty_str(&doc, "mime").map(str::to_string),
            ..QueryResponse::default()
        });
    }

    let message = non_empty_str(&doc, "error")
        .or_else(|| non_empty_str(&doc, "details"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("API error: {status}"));
    Err(QueryError::Service(message))
}
