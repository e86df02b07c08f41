//! The closed set of stored field kinds.
//!
//! A [`FieldKind`] names the physical shape of a field instance as the content
//! store keeps it. Registry entries are keyed by identifier strings, but every
//! entry maps onto exactly one of these tags, which is what the resolver uses
//! to look a field instance up on a content node.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage shape of a content field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "BooleanField")]
    Boolean,
    #[serde(rename = "DateField")]
    Date,
    #[serde(rename = "DateTimeField")]
    DateTime,
    #[serde(rename = "NumericField")]
    Numeric,
    #[serde(rename = "TextField")]
    Text,
    #[serde(rename = "TimeField")]
    Time,
    #[serde(rename = "MultiTextField")]
    MultiText,
}

impl FieldKind {
    /// Every kind, in registration order.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Boolean,
        FieldKind::Date,
        FieldKind::DateTime,
        FieldKind::Numeric,
        FieldKind::Text,
        FieldKind::Time,
        FieldKind::MultiText,
    ];

    /// Canonical identifier of the kind, as content definitions spell it.
    pub const fn identifier(self) -> &'static str {
        match self {
            FieldKind::Boolean => "BooleanField",
            FieldKind::Date => "DateField",
            FieldKind::DateTime => "DateTimeField",
            FieldKind::Numeric => "NumericField",
            FieldKind::Text => "TextField",
            FieldKind::Time => "TimeField",
            FieldKind::MultiText => "MultiTextField",
        }
    }

    /// Exact, case-sensitive match against [`FieldKind::identifier`].
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.identifier() == identifier)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
