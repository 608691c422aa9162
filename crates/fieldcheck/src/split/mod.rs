//! Splitting of multi-valued CSV fields into structured values.
//!
//! A single CSV cell may hold several values separated by the configured
//! subdelimiter. Each subvalue is parsed with a [`SubGrammar`]; the resulting
//! values keep the order they had in the cell.
//!
//! # Example
//!
//! ```
//! use fieldcheck::split::split_geolocation_string;
//!
//! let points = split_geolocation_string("49.16667, -123.93333|50.1,-120.5", "|").unwrap();
//! assert_eq!(points.len(), 2);
//! assert_eq!(points[1].lat, "50.1");
//! ```

mod geolocation;
mod typed_relation;

pub use geolocation::{split_geolocation_string, Geolocation, GeolocationGrammar};
pub use typed_relation::{split_typed_relation_string, TypedRelation, TypedRelationGrammar};

use crate::error::Result;

/// Parser for one subvalue of a delimited field.
pub trait SubGrammar {
    /// The structured value produced for each subvalue.
    type Output;

    /// Name used when reporting malformed subvalues.
    fn name(&self) -> &'static str;

    /// Parse one subvalue. `position` is its zero-based index within the field.
    fn parse(&self, segment: &str, position: usize) -> Result<Self::Output>;
}

/// Split `field` on `subdelimiter` and parse every subvalue with `grammar`.
///
/// Fails on the first subvalue that does not match the grammar.
pub fn split_field<G: SubGrammar>(
    field: &str,
    subdelimiter: &str,
    grammar: &G,
) -> Result<Vec<G::Output>> {
    subvalues(field, subdelimiter)
        .enumerate()
        .map(|(position, segment)| grammar.parse(segment, position))
        .collect()
}

/// Iterate over the raw subvalues of a field.
///
/// An empty subdelimiter yields the whole field as a single subvalue.
pub fn subvalues<'a>(field: &'a str, subdelimiter: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
    if subdelimiter.is_empty() {
        Box::new(std::iter::once(field))
    } else {
        Box::new(field.split(subdelimiter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldcheckError;

    struct Upper;

    impl SubGrammar for Upper {
        type Output = String;

        fn name(&self) -> &'static str {
            "upper"
        }

        fn parse(&self, segment: &str, position: usize) -> Result<String> {
            if segment.is_empty() {
                return Err(FieldcheckError::MalformedSegment {
                    grammar: self.name(),
                    position,
                    segment: segment.to_string(),
                    reason: "empty".to_string(),
                });
            }
            Ok(segment.to_uppercase())
        }
    }

    #[test]
    fn test_split_field_preserves_order() {
        let values = split_field("c|a|b", "|", &Upper).unwrap();
        assert_eq!(values, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_split_field_multichar_delimiter() {
        let values = split_field("a;;b", ";;", &Upper).unwrap();
        assert_eq!(values, vec!["A", "B"]);
    }

    #[test]
    fn test_split_field_reports_position() {
        let err = split_field("a||b", "|", &Upper).unwrap_err();
        match err {
            FieldcheckError::MalformedSegment { position, grammar, .. } => {
                assert_eq!(position, 1);
                assert_eq!(grammar, "upper");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_subvalues_empty_delimiter() {
        let values: Vec<_> = subvalues("a|b", "").collect();
        assert_eq!(values, vec!["a|b"]);
    }
}
