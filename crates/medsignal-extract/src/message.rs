//! Input messages as handed over by the ingestion side.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use medsignal_core::MalformedInput;

/// Media attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

/// One scraped message. Read-only to the pipeline.
///
/// `text` holds the raw JSON value as it arrived: absent, a string, or a
/// list of fragments. Anything else is reported as malformed on assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub source_id: String,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media: Option<MediaKind>,
}

impl Message {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_raw_text(source_id, Value::String(text.into()))
    }

    pub fn with_raw_text(source_id: impl Into<String>, text: Value) -> Self {
        Self {
            source_id: source_id.into(),
            text: Some(text),
            date: None,
            media: None,
        }
    }

    pub fn without_text(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: None,
            date: None,
            media: None,
        }
    }

    /// Resolve the raw text into a string.
    ///
    /// Fragment lists (plain strings or objects with a `text` field) are
    /// joined with a space. Absent or null text is `Ok(None)`.
    pub fn resolve_text(&self) -> Result<Option<Cow<'_, str>>, MalformedInput> {
        match &self.text {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(Cow::Borrowed(s.as_str()))),
            Some(Value::Array(parts)) => {
                let mut pieces = Vec::with_capacity(parts.len());
                for (i, part) in parts.iter().enumerate() {
                    match part {
                        Value::String(s) => pieces.push(s.as_str()),
                        Value::Object(obj) => match obj.get("text") {
                            Some(Value::String(s)) => pieces.push(s.as_str()),
                            other => {
                                return Err(self.malformed(format!(
                                    "text fragment {} has {} text",
                                    i,
                                    other.map(json_kind).unwrap_or("no")
                                )))
                            }
                        },
                        other => {
                            return Err(self.malformed(format!(
                                "text fragment {} is {}",
                                i,
                                json_kind(other)
                            )))
                        }
                    }
                }
                Ok(Some(Cow::Owned(pieces.join(" "))))
            }
            Some(other) => Err(self.malformed(format!("text is {}", json_kind(other)))),
        }
    }

    fn malformed(&self, reason: String) -> MalformedInput {
        MalformedInput {
            source_id: self.source_id.clone(),
            reason,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
