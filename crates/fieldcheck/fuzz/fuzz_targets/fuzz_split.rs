//! Fuzz target for multi-valued field splitting.
//!
//! Splitting either succeeds with one value per subvalue or fails with a
//! malformed segment error; it never panics.

#![no_main]

use arbitrary::Arbitrary;
use fieldcheck::{
    split_geolocation_string, split_typed_relation_string, validate_latlong_value,
    FieldcheckError,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    field: &'a str,
    subdelimiter: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    if input.subdelimiter.is_empty() {
        return;
    }
    let segments = input.field.split(input.subdelimiter).count();

    match split_geolocation_string(input.field, input.subdelimiter) {
        Ok(points) => assert_eq!(points.len(), segments),
        Err(e) => assert!(matches!(e, FieldcheckError::MalformedSegment { .. })),
    }
    match split_typed_relation_string(input.field, input.subdelimiter, "node") {
        Ok(relations) => assert_eq!(relations.len(), segments),
        Err(e) => assert!(matches!(e, FieldcheckError::MalformedSegment { .. })),
    }
    for segment in input.field.split(input.subdelimiter) {
        let _ = validate_latlong_value(segment);
    }
});
