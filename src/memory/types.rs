//! Core engram type definitions.
//!
//! Defines [`EngramType`] (how consumers interpret a memory) and [`Engram`]
//! (one immutable unit of recorded experience).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interpretation tag for an engram. Does not affect parsing or storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngramType {
    /// A standalone fact.
    #[default]
    Atomic,
    /// A memory that links other memories or concepts together.
    Link,
    /// A recurring pattern distilled from several experiences.
    Pattern,
}

impl EngramType {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Link => "link",
            Self::Pattern => "pattern",
        }
    }

    pub const ALL: [EngramType; 3] = [Self::Atomic, Self::Link, Self::Pattern];
}

impl std::fmt::Display for EngramType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EngramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "link" => Ok(Self::Link),
            "pattern" => Ok(Self::Pattern),
            _ => Err(format!("unknown engram type: {s}")),
        }
    }
}

/// One immutable unit of recorded experience.
///
/// All fields are fixed at construction. The consolidator stores and indexes an
/// engram but never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engram {
    id: String,
    content: String,
    schema: String,
    #[serde(rename = "type")]
    engram_type: EngramType,
    created_at: DateTime<Utc>,
}

impl Engram {
    /// Create an engram with a fresh UUID v7 id and the current time.
    pub fn new(
        content: impl Into<String>,
        schema: impl Into<String>,
        engram_type: EngramType,
    ) -> Self {
        Self::with_id(uuid::Uuid::now_v7().to_string(), content, schema, engram_type)
    }

    /// Create an engram with a caller-supplied id.
    ///
    /// Appends are idempotent by id, so a caller that retries with the same id
    /// never produces a duplicate record.
    pub fn with_id(
        id: impl Into<String>,
        content: impl Into<String>,
        schema: impl Into<String>,
        engram_type: EngramType,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            schema: schema.into(),
            engram_type,
            created_at: Utc::now(),
        }
    }

    /// Rebuild an engram from its stored parts.
    pub(crate) fn from_parts(
        id: String,
        content: String,
        schema: String,
        engram_type: EngramType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content,
            schema,
            engram_type,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The mindmap schema naming the concepts this engram touches.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn engram_type(&self) -> EngramType {
        self.engram_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
