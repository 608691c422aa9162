//! Core type definitions for target field descriptions.

use serde::{Deserialize, Serialize};

/// Storage type of a target field, as reported by the repository backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    StringLong,
    Text,
    TextLong,
    Integer,
    /// `lat,lng` pairs.
    Geolocation,
    /// Extended Date/Time Format values.
    Edtf,
    /// `namespace:predicate:id` triples.
    TypedRelation,
    /// Reference to a taxonomy term or node.
    EntityReference,
    /// Any other backend field type.
    #[serde(untagged)]
    Other(String),
}

impl FieldType {
    /// Example value written into CSV templates.
    pub fn sample_value(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::StringLong | FieldType::Text | FieldType::TextLong => {
                "Free text"
            }
            FieldType::Geolocation => "+49.16,-123.93",
            FieldType::EntityReference => "100 [or term name or http://foo.com/someuri]",
            FieldType::Edtf => "2020-10-28",
            FieldType::TypedRelation => "relators:art:30",
            FieldType::Integer => "100",
            FieldType::Other(_) => "",
        }
    }

    /// Documentation section describing how to populate this field type.
    pub fn documentation_section(&self) -> &'static str {
        match self {
            FieldType::String
            | FieldType::StringLong
            | FieldType::Text
            | FieldType::TextLong
            | FieldType::Integer => "Single-valued fields",
            FieldType::Geolocation => "Geolocation fields",
            FieldType::EntityReference => "Taxonomy reference fields",
            FieldType::Edtf => "EDTF fields",
            FieldType::TypedRelation => "Typed Relation fields",
            FieldType::Other(_) => "",
        }
    }
}

/// How many values a field accepts.
///
/// Serialized the way the backend reports it: a positive integer, or `-1`
/// for unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Cardinality {
    Limited(usize),
    Unlimited,
}

impl Cardinality {
    /// Maximum number of values, if limited.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Cardinality::Limited(n) => Some(*n),
            Cardinality::Unlimited => None,
        }
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::Limited(1)
    }
}

impl From<i64> for Cardinality {
    fn from(value: i64) -> Self {
        if value < 0 {
            Cardinality::Unlimited
        } else {
            Cardinality::Limited(value as usize)
        }
    }
}

impl From<Cardinality> for i64 {
    fn from(value: Cardinality) -> Self {
        match value {
            Cardinality::Limited(n) => n as i64,
            Cardinality::Unlimited => -1,
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::Limited(n) => write!(f, "{n}"),
            Cardinality::Unlimited => write!(f, "unlimited"),
        }
    }
}
