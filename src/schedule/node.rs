//! Schedule B hierarchy as returned by the lookup endpoint.
//!
//! The vendor nests children under `children`; this model calls them
//! `items`. Both keys decode into the same field, so a raw vendor body and
//! an already-normalized body parse identically.

use serde::{Deserialize, Deserializer, Serialize};

/// Number of digits in a selectable Schedule B code.
pub const LEAF_DIGITS: usize = 10;

/// One node of the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleNode {
    /// Section, chapter, heading or full code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Description.
    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate label used when there is no description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit of measure.
    #[serde(rename = "uom", default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,
    /// Children in document order.
    #[serde(
        alias = "children",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub items: Vec<ScheduleNode>,
}

impl ScheduleNode {
    /// Creates a node with just a code and description.
    #[must_use]
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Appends a child, builder style.
    #[must_use]
    pub fn with_child(mut self, child: ScheduleNode) -> Self {
        self.items.push(child);
        self
    }
}

/// Result of a Schedule B lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// Top-level nodes in document order.
    #[serde(alias = "children", default, deserialize_with = "null_as_empty")]
    pub items: Vec<ScheduleNode>,
}

/// The ASCII digits of `code`, in order.
#[must_use]
pub fn digits_only(code: &str) -> String {
    code.chars().filter(char::is_ascii_digit).collect()
}

/// A code is a leaf iff it has exactly ten digits once punctuation is removed.
#[must_use]
pub fn is_leaf_code(code: &str) -> bool {
    code.chars().filter(char::is_ascii_digit).count() == LEAF_DIGITS
}

/// Formats a ten-digit code as `XXXX.XX.XXXX`; anything else is returned as-is.
#[must_use]
pub fn format_code(code: &str) -> String {
    let digits = digits_only(code);
    if digits.len() == LEAF_DIGITS {
        format!("{}.{}.{}", &digits[..4], &digits[4..6], &digits[6..])
    } else {
        code.to_string()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
