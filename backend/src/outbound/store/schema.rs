//! Collection schema declaration uploaded to the store.
//!
//! The store enforces required/unique/enum/range constraints server-side
//! against the most recently uploaded declaration; this module is the single
//! place those constraints are written down.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

/// Scalar types the store understands.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

/// Constraint declaration for a single field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(rename = "type")]
    kind: FieldType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    unique: bool,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    allowed: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
}

impl FieldSchema {
    fn new(kind: FieldType) -> Self {
        Self {
            kind,
            required: false,
            unique: false,
            allowed: None,
            min: None,
            max: None,
            default: None,
        }
    }

    /// A string-typed field.
    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    /// A number-typed field.
    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    /// A boolean-typed field.
    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    /// Reject writes missing this field.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Reject writes duplicating an existing value.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Restrict the field to an enumerated value set.
    pub fn one_of(mut self, allowed: &[&'static str]) -> Self {
        self.allowed = Some(allowed.to_vec());
        self
    }

    /// Restrict a numeric field to an inclusive range.
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Value applied when a write omits the field.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Field declarations for one collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSchema {
    properties: BTreeMap<&'static str, FieldSchema>,
}

impl CollectionSchema {
    fn new(properties: impl IntoIterator<Item = (&'static str, FieldSchema)>) -> Self {
        Self {
            properties: properties.into_iter().collect(),
        }
    }
}

/// Full schema declaration for the store.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    collections: BTreeMap<&'static str, CollectionSchema>,
}

/// The two collections this application owns.
///
/// Ids and timestamps are store-managed and therefore absent here.
pub fn declared_schema() -> Schema {
    let users = CollectionSchema::new([
        ("email", FieldSchema::string().required().unique()),
        ("name", FieldSchema::string().required()),
        (
            "isAdmin",
            FieldSchema::boolean().default_value(json!(false)),
        ),
        ("password", FieldSchema::string().required()),
    ]);
    let feedback = CollectionSchema::new([
        ("userId", FieldSchema::string().required()),
        ("userName", FieldSchema::string().required()),
        ("userEmail", FieldSchema::string().required()),
        ("rating", FieldSchema::number().required().range(1, 5)),
        ("comment", FieldSchema::string().required()),
        (
            "category",
            FieldSchema::string()
                .one_of(&["feature", "bug", "general", "ui", "performance"])
                .default_value(json!("general")),
        ),
        (
            "status",
            FieldSchema::string()
                .one_of(&["open", "reviewed", "closed"])
                .default_value(json!("open")),
        ),
        ("adminResponse", FieldSchema::string()),
    ]);

    Schema {
        collections: [("users", users), ("feedback", feedback)]
            .into_iter()
            .collect(),
    }
}
