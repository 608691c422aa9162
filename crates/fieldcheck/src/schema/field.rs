//! Description of one target field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{Cardinality, FieldType};

/// Target field descriptions keyed by machine name, in backend order.
pub type FieldDefinitions = IndexMap<String, FieldDefinition>;

/// What the backend expects in one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Storage type.
    pub field_type: FieldType,
    /// Number of values accepted.
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Maximum length of each value, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// Whether the field must be populated on create.
    #[serde(default)]
    pub required: bool,
    /// Entity type referenced by typed relation and entity reference fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    /// Relators (`namespace:predicate`) a typed relation field accepts.
    /// Empty means any relator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub typed_relations: Vec<String>,
}

impl FieldDefinition {
    /// Create a single-valued field definition.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            cardinality: Cardinality::default(),
            max_length: None,
            label: String::new(),
            required: false,
            target_type: None,
            typed_relations: Vec::new(),
        }
    }

    /// Set the cardinality.
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Set the maximum value length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the referenced entity type.
    pub fn with_target_type(mut self, target_type: impl Into<String>) -> Self {
        self.target_type = Some(target_type.into());
        self
    }

    /// Set the relators a typed relation field accepts.
    pub fn with_typed_relations<I, S>(mut self, relators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.typed_relations = relators.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if `rel_type` may be used in this field.
    pub fn accepts_relator(&self, rel_type: &str) -> bool {
        self.typed_relations.is_empty() || self.typed_relations.iter().any(|r| r == rel_type)
    }

    /// Entity type attached to typed relation values.
    ///
    /// Falls back to `node` when the backend did not report one.
    pub fn relation_target_type(&self) -> &str {
        self.target_type.as_deref().unwrap_or("node")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_definitions_in_order() {
        let json = r#"{
            "field_linked_agent": {"field_type": "typed_relation", "cardinality": -1, "target_type": "taxonomy_term"},
            "field_coordinates": {"field_type": "geolocation", "cardinality": 2},
            "title": {"field_type": "string", "max_length": 255, "required": true}
        }"#;
        let defs: FieldDefinitions = serde_json::from_str(json).unwrap();

        let names: Vec<_> = defs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["field_linked_agent", "field_coordinates", "title"]);
        assert_eq!(defs["field_linked_agent"].cardinality, Cardinality::Unlimited);
        assert_eq!(defs["field_linked_agent"].relation_target_type(), "taxonomy_term");
        assert_eq!(defs["title"].max_length, Some(255));
        assert_eq!(defs["title"].cardinality, Cardinality::Limited(1));
        assert!(defs["field_linked_agent"].typed_relations.is_empty());
    }

    #[test]
    fn test_builder() {
        let def = FieldDefinition::new(FieldType::Edtf)
            .with_cardinality(Cardinality::Limited(3))
            .with_label("Date created")
            .required();
        assert_eq!(def.cardinality.limit(), Some(3));
        assert!(def.required);
        assert_eq!(def.relation_target_type(), "node");
    }

    #[test]
    fn test_accepts_relator() {
        let def = FieldDefinition::new(FieldType::TypedRelation)
            .with_typed_relations(["relators:art", "relators:pht"]);
        assert!(def.accepts_relator("relators:pht"));
        assert!(!def.accepts_relator("relators:aut"));

        let open = FieldDefinition::new(FieldType::TypedRelation);
        assert!(open.accepts_relator("relators:aut"));

        let json = r#"{"field_type": "typed_relation", "typed_relations": ["relators:art"]}"#;
        let def: FieldDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.typed_relations, vec!["relators:art"]);
    }
}
