//! Fieldcheck: normalization and validation of spreadsheet metadata fields.
//!
//! Fieldcheck takes raw, user-authored values from CSV or Excel rows and turns
//! them into typed values ready for a repository backend, rejecting malformed
//! input before anything is submitted.
//!
//! # Core Principles
//!
//! - **Tolerant of people**: case, punctuation and stray whitespace are forgiven
//! - **Strict about structure**: coordinates, typed relations and dates follow exact grammars
//! - **Explicit configuration**: every operation takes the [`Config`] it needs
//!
//! # Example
//!
//! ```
//! use fieldcheck::{split_typed_relation_string, validate_edtf_value, Config};
//!
//! let config = Config::default();
//! let relations =
//!     split_typed_relation_string("relators:art:30|relators:pht:31", &config.subdelimiter, "node")
//!         .unwrap();
//! assert_eq!(relations[1].rel_type, "relators:pht");
//! assert_eq!(relations[1].target_id, 31);
//!
//! assert!(validate_edtf_value("1985-04-12/1985-04~").is_ok());
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod input;
pub mod media;
pub mod schema;
pub mod split;
pub mod validation;

pub use compare::compare_strings;
pub use config::Config;
pub use error::{FieldcheckError, Result};
pub use input::{csv_from_excel, preprocess_csv, write_csv_template, DataTable, SourceMetadata};
pub use media::{resolve_media_type, MediaTypeConfig, ModelConfig};
pub use schema::{Cardinality, FieldDefinition, FieldDefinitions, FieldType};
pub use split::{split_geolocation_string, split_typed_relation_string, Geolocation, TypedRelation};
pub use validation::{
    validate_calendar_date, validate_edtf_value, validate_language_code, validate_latlong_value,
    validate_node_created_date_string, Observation, ObservationType, Severity, ValidationEngine,
};
