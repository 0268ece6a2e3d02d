use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single row from any source: field name → field value.
///
/// All values are strings; there are no typed columns. Field sets are
/// heterogeneous across records; a missing field reads as the empty string.
/// The backing map is a `BTreeMap` so field iteration order is fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: BTreeMap::new() }
    }

    /// Field value, or `""` when the field is absent.
    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// True when the field is absent or empty after trimming.
    pub fn is_blank(&self, name: &str) -> bool {
        self.value(name).trim().is_empty()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }
}

/// An ordered sequence of records sharing a nominal header.
///
/// Created once per parsed text blob; immutable afterwards; superseded
/// wholesale when the source is re-supplied.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A raw text blob plus a display name for diagnostics.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub name: String,
    pub text: String,
}

impl SourceText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// Raw source texts, in user-supplied order. The order is observable:
/// it decides which values come first in concatenated conflicts.
#[derive(Debug, Clone, Default)]
pub struct MergeInput {
    pub main: Vec<SourceText>,
    pub linked: Vec<SourceText>,
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Which side of the join a condition was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSide {
    Main,
    Linked,
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Linked => write!(f, "linked"),
        }
    }
}

/// Recoverable conditions encountered during a merge. Warnings never abort
/// processing; the engine degrades and reports the best achievable result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeWarning {
    /// A source text parsed to zero non-blank rows.
    EmptySource { side: JoinSide, name: String },
    /// The configured join key is absent from a dataset's header.
    JoinKeyMissing { side: JoinSide, key: String, name: String },
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource { side, name } => {
                write!(f, "{side} source '{name}' contains no rows")
            }
            Self::JoinKeyMissing { side, key, name } => {
                write!(f, "{side} source '{name}': join key '{key}' not found in header")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub main_rows: usize,
    pub linked_keys: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Engine output: merged records plus derived metadata.
///
/// Callers own the returned records outright; the engine retains nothing
/// between calls, so downstream mutation never corrupts a later merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    pub meta: MergeMeta,
    pub summary: MergeSummary,
    /// Distinct field names observed across the output, base header first.
    pub fields: Vec<String>,
    pub records: Vec<Record>,
    pub warnings: Vec<MergeWarning>,
}
