//! Page and cursor types for cursor-paginated list endpoints

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// One decoded response from a list endpoint.
///
/// Both fields are optional on the wire: a missing `data` reads as an empty
/// page and a missing `has_more` reads as the end of the listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
}

impl Page {
    pub fn new(data: Vec<Value>, has_more: bool) -> Self {
        Self { data, has_more }
    }

    /// Cursor for the page after this one: the `id` of the last record.
    ///
    /// Returns `None` when the page is empty or the last record has no
    /// string or integer `id`.
    pub fn next_cursor(&self) -> Option<Cursor> {
        self.data.last().and_then(Cursor::from_record)
    }
}

/// Opaque pagination token sent back as `starting_after`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the `id` field of a record.
    ///
    /// Integer ids of any size are rendered as their decimal digits;
    /// floats, booleans, nulls and nested values are not usable as cursors.
    pub fn from_record(record: &Value) -> Option<Self> {
        match record.get("id")? {
            Value::String(id) => Some(Self(id.clone())),
            Value::Number(id) => {
                let digits = id.to_string();
                let unsigned = digits.strip_prefix('-').unwrap_or(&digits);
                (!unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()))
                    .then_some(Self(digits))
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
