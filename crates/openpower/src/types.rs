//! Core data types for recorded thoughts and the errors shared across the crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single reasoning step stored in a [`ThoughtLedger`](crate::ThoughtLedger).
///
/// Serialises with the field names sequential-thinking clients send
/// (`thought`, `thought_number`, ...). The descriptive Rust names are also
/// accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    #[serde(rename = "thought", alias = "text")]
    pub text: String,
    #[serde(rename = "thought_number", alias = "sequence_number")]
    pub sequence_number: u32,
    #[serde(rename = "total_thoughts", alias = "total_expected")]
    pub total_expected: u32,
    #[serde(rename = "next_thought_needed", alias = "continuation_needed")]
    pub continuation_needed: bool,
    #[serde(default, rename = "branch_from_thought", alias = "branch_origin")]
    pub branch_origin: Option<u32>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_revision: bool,
    #[serde(
        default,
        rename = "needs_more_thoughts",
        alias = "needs_more",
        deserialize_with = "null_as_false"
    )]
    pub needs_more: bool,
    #[serde(default, rename = "revises_thought", alias = "revises_sequence_number")]
    pub revises_sequence_number: Option<u32>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Thought {
    /// Validate an untyped JSON payload into a `Thought`.
    ///
    /// Unknown fields are ignored. Missing or ill-typed required fields and
    /// zero positions are rejected with [`OpenPowerError::InvalidThought`].
    pub fn from_value(value: Value) -> OpenPowerResult<Self> {
        if !value.is_object() {
            return Err(OpenPowerError::InvalidThought(
                "thought payload must be a JSON object".to_string(),
            ));
        }

        let thought: Thought = serde_json::from_value(value)
            .map_err(|e| OpenPowerError::InvalidThought(e.to_string()))?;
        thought.validate()?;
        Ok(thought)
    }

    fn validate(&self) -> OpenPowerResult<()> {
        let positions = [
            ("thought_number", Some(self.sequence_number)),
            ("total_thoughts", Some(self.total_expected)),
            ("branch_from_thought", self.branch_origin),
            ("revises_thought", self.revises_sequence_number),
        ];

        for (field, value) in positions {
            if value == Some(0) {
                return Err(OpenPowerError::InvalidThought(format!(
                    "{field} must be a positive integer"
                )));
            }
        }

        Ok(())
    }
}

/// Outcome of recording a thought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThoughtRecord {
    pub thought_recorded: bool,
    /// Ledger length after the write.
    pub current_sequence: usize,
    pub thought: Thought,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_thought: Option<Thought>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_point: Option<Thought>,
}

/// Errors that can occur in the OpenPower core.
#[derive(thiserror::Error, Debug)]
pub enum OpenPowerError {
    #[error("Invalid thought: {0}")]
    InvalidThought(String),

    #[error("{field} refers to thought {position}, but the ledger holds {len}")]
    ReferenceOutOfRange {
        field: &'static str,
        position: u32,
        len: usize,
    },

    #[error("Invalid model id {0:?}: expected `name` or `org/name`")]
    InvalidModelId(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type OpenPowerResult<T> = Result<T, OpenPowerError>;
