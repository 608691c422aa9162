//! Descriptions of the fields CSV columns are loaded into.

mod field;
mod types;

pub use field::{FieldDefinition, FieldDefinitions};
pub use types::{Cardinality, FieldType};
