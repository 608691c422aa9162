//! Checks on individual values and on whole input tables.
//!
//! [`values`] holds the domain predicates. The row validators apply them to
//! every relevant cell of a [`DataTable`](crate::input::DataTable) and report
//! problems as [`Observation`]s.

mod observation;
mod validators;
pub mod values;

pub use observation::{Evidence, Observation, ObservationType, Severity};
pub use validators::{
    CardinalityValidator, CreatedDateValidator, EdtfValidator, FieldLengthValidator,
    GeolocationValidator, LanguageCodeValidator, RowValidator, TermNameLengthValidator,
    TypedRelationValidator, UrlAliasValidator, ValidationEngine, TERM_NAME_MAX_LENGTH,
};
pub use values::{
    created_date_is_in_future, validate_calendar_date, validate_edtf_value,
    validate_language_code, validate_latlong_value, validate_node_created_date_string,
    validate_single_edtf_date,
};
