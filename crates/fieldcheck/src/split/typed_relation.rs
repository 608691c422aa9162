//! Typed relation subvalues (`namespace:predicate:target_id`).

use serde::{Deserialize, Serialize};

use super::{split_field, SubGrammar};
use crate::error::{FieldcheckError, Result};

/// A typed reference from one record to another, e.g. `relators:pht:5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedRelation {
    /// Relation type in `namespace:predicate` form.
    pub rel_type: String,
    /// ID of the referenced entity.
    pub target_id: u64,
    /// Entity type of the referenced entity, supplied by the caller.
    pub target_type: String,
}

/// Parses typed relation subvalues, tagging each with one target type.
#[derive(Debug, Clone)]
pub struct TypedRelationGrammar {
    target_type: String,
}

impl TypedRelationGrammar {
    /// Create a grammar whose results all carry `target_type`.
    pub fn new(target_type: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
        }
    }

    fn malformed(&self, segment: &str, position: usize, reason: String) -> FieldcheckError {
        FieldcheckError::MalformedSegment {
            grammar: self.name(),
            position,
            segment: segment.to_string(),
            reason,
        }
    }
}

impl SubGrammar for TypedRelationGrammar {
    type Output = TypedRelation;

    fn name(&self) -> &'static str {
        "typed relation"
    }

    fn parse(&self, segment: &str, position: usize) -> Result<TypedRelation> {
        let parts: Vec<&str> = segment.split(':').collect();
        if parts.len() != 3 {
            return Err(self.malformed(
                segment,
                position,
                format!(
                    "expected 'namespace:predicate:id', found {} colon-separated parts",
                    parts.len()
                ),
            ));
        }

        let namespace = parts[0].trim();
        let predicate = parts[1].trim();
        if namespace.is_empty() || predicate.is_empty() {
            return Err(self.malformed(
                segment,
                position,
                "relation namespace and predicate must not be empty".to_string(),
            ));
        }

        let raw_id = parts[2].trim();
        let target_id = raw_id.parse::<u64>().map_err(|_| {
            self.malformed(segment, position, format!("target ID '{raw_id}' is not an integer"))
        })?;

        Ok(TypedRelation {
            rel_type: format!("{namespace}:{predicate}"),
            target_id,
            target_type: self.target_type.clone(),
        })
    }
}

/// Split a typed relation field into its relations.
///
/// `target_type` is attached to every relation parsed from the field.
pub fn split_typed_relation_string(
    value: &str,
    subdelimiter: &str,
    target_type: &str,
) -> Result<Vec<TypedRelation>> {
    split_field(value, subdelimiter, &TypedRelationGrammar::new(target_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(rel_type: &str, target_id: u64, target_type: &str) -> TypedRelation {
        TypedRelation {
            rel_type: rel_type.to_string(),
            target_id,
            target_type: target_type.to_string(),
        }
    }

    #[test]
    fn test_split_typed_relation_string_single() {
        let res = split_typed_relation_string("relators:pht:5", "|", "foo").unwrap();
        assert_eq!(res, vec![relation("relators:pht", 5, "foo")]);
    }

    #[test]
    fn test_split_typed_relation_string_multiple() {
        let res = split_typed_relation_string("relators:pht:5|relators:con:10", "|", "bar").unwrap();
        assert_eq!(res[0], relation("relators:pht", 5, "bar"));
        assert_eq!(res[1], relation("relators:con", 10, "bar"));
    }

    #[test]
    fn test_split_typed_relation_string_multiple_at_sign() {
        let res = split_typed_relation_string("relators:pht:5@relators:con:10", "@", "baz").unwrap();
        assert_eq!(res[0], relation("relators:pht", 5, "baz"));
        assert_eq!(res[1], relation("relators:con", 10, "baz"));
    }

    #[test]
    fn test_whitespace_around_id() {
        let res = split_typed_relation_string("relators:aut: 42 ", "|", "node").unwrap();
        assert_eq!(res[0].target_id, 42);
    }

    #[test]
    fn test_non_integer_id_is_malformed() {
        let err = split_typed_relation_string("relators:pht:five", "|", "foo").unwrap_err();
        assert!(matches!(
            err,
            FieldcheckError::MalformedSegment { position: 0, .. }
        ));
        assert!(err.to_string().contains("not an integer"));
    }

    #[test]
    fn test_wrong_component_count_is_malformed() {
        let err = split_typed_relation_string("relators:pht:5|relators:5", "|", "foo").unwrap_err();
        match err {
            FieldcheckError::MalformedSegment { position, segment, grammar, .. } => {
                assert_eq!(position, 1);
                assert_eq!(segment, "relators:5");
                assert_eq!(grammar, "typed relation");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(split_typed_relation_string("relators:pht:person:5", "|", "foo").is_err());
    }
}
