use serde::{Deserialize, Serialize};

/// One `{id, name}` board reference in the order the work-management
/// service returned it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRef {
    pub id: String,
    pub name: String,
}

/// A single column value on a raw board item.
///
/// `id` is a free-form column identifier whose meaning is inferred by
/// substring matching during normalization. `text` is the human-readable
/// rendering and may be absent; `value` is the service's raw JSON-encoded
/// cell content, carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl RawField {
    pub fn new(id: impl Into<String>, text: Option<&str>) -> Self {
        Self { id: id.into(), text: text.map(str::to_owned), value: None }
    }
}

/// One row from a board, exactly as fetched: loosely typed, free-text
/// valued, field identifiers unique within the record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub name: String,
    pub fields: Vec<RawField>,
}

pub const DEFAULT_STAGE: &str = "Unknown";
pub const DEFAULT_STATUS: &str = "Unknown";
pub const DEFAULT_SECTOR: &str = "Other";

/// Typed analytic view of exactly one [`RawRecord`].
///
/// Every attribute has a defined default (`0`, `0`, `"Unknown"`,
/// `"Unknown"`, `"Other"`), so a missing source field never produces an
/// undefined value downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub name: String,
    pub revenue: f64,
    pub probability: f64,
    pub stage: String,
    pub status: String,
    pub sector: String,
}
