//! Validators that check every relevant cell of an input table.

use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::input::DataTable;
use crate::schema::{Cardinality, FieldDefinition, FieldDefinitions, FieldType};
use crate::split::{subvalues, SubGrammar, TypedRelationGrammar};

use super::observation::{Evidence, Observation, ObservationType, Severity};
use super::values::{
    created_date_is_in_future, validate_edtf_value, validate_language_code,
    validate_latlong_value, validate_node_created_date_string,
};

/// Trait for row validators.
pub trait RowValidator: Send + Sync {
    /// Name recorded as the detector of every observation.
    fn name(&self) -> &'static str;

    /// Run validation and return observations.
    fn validate(
        &self,
        table: &DataTable,
        fields: &FieldDefinitions,
        config: &Config,
    ) -> Vec<Observation>;
}

/// Columns of `table` whose field definition satisfies `predicate`.
fn defined_columns<'a>(
    table: &'a DataTable,
    fields: &'a FieldDefinitions,
    predicate: impl Fn(&FieldDefinition) -> bool,
) -> Vec<(usize, &'a str, &'a FieldDefinition)> {
    table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            let def = fields.get(header)?;
            predicate(def).then_some((idx, header.as_str(), def))
        })
        .collect()
}

/// Non-empty cells of a column as (1-based row, trimmed value).
fn populated_cells(table: &DataTable, index: usize) -> impl Iterator<Item = (usize, &str)> {
    table
        .column_values(index)
        .enumerate()
        .map(|(row, value)| (row + 1, value.trim()))
        .filter(|(_, value)| !value.is_empty())
}

/// Non-empty subvalues of a cell as (position, trimmed subvalue).
fn populated_subvalues<'a>(
    value: &'a str,
    subdelimiter: &'a str,
) -> impl Iterator<Item = (usize, &'a str)> + 'a {
    subvalues(value, subdelimiter)
        .enumerate()
        .map(|(position, sub)| (position, sub.trim()))
        .filter(|(_, sub)| !sub.is_empty())
}

/// Checks that geolocation subvalues are valid `lat,lng` pairs.
pub struct GeolocationValidator;

impl RowValidator for GeolocationValidator {
    fn name(&self) -> &'static str {
        "geolocation_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        fields: &FieldDefinitions,
        config: &Config,
    ) -> Vec<Observation> {
        let mut observations = Vec::new();

        for (idx, column, _) in defined_columns(table, fields, |d| d.field_type == FieldType::Geolocation) {
            for (row, value) in populated_cells(table, idx) {
                for (position, sub) in populated_subvalues(value, &config.subdelimiter) {
                    if validate_latlong_value(sub) {
                        continue;
                    }
                    observations.push(
                        Observation::new(
                            ObservationType::InvalidValue,
                            Severity::Error,
                            column,
                            row,
                            format!("'{sub}' is not a valid lat,long pair"),
                        )
                        .with_evidence(
                            Evidence::new()
                                .with_value(sub)
                                .with_position(position)
                                .with_expected("latitude within ±90, longitude within ±180"),
                        )
                        .with_detector(self.name()),
                    );
                }
            }
        }

        observations
    }
}

/// Checks that EDTF subvalues are valid dates, intervals or sets.
pub struct EdtfValidator;

impl RowValidator for EdtfValidator {
    fn name(&self) -> &'static str {
        "edtf_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        fields: &FieldDefinitions,
        config: &Config,
    ) -> Vec<Observation> {
        let mut observations = Vec::new();

        for (idx, column, _) in defined_columns(table, fields, |d| d.field_type == FieldType::Edtf) {
            for (row, value) in populated_cells(table, idx) {
                for (position, sub) in populated_subvalues(value, &config.subdelimiter) {
                    if let Err(reason) = validate_edtf_value(sub) {
                        observations.push(
                            Observation::new(
                                ObservationType::InvalidValue,
                                Severity::Error,
                                column,
                                row,
                                reason,
                            )
                            .with_evidence(Evidence::new().with_value(sub).with_position(position))
                            .with_detector(self.name()),
                        );
                    }
                }
            }
        }

        observations
    }
}

/// Checks the `created` base field: well-formed and not in the future.
pub struct CreatedDateValidator {
    now: NaiveDateTime,
}

impl CreatedDateValidator {
    /// Compare against the current local time.
    pub fn new() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// Compare against a fixed point in time.
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Default for CreatedDateValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RowValidator for CreatedDateValidator {
    fn name(&self) -> &'static str {
        "created_date_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        _fields: &FieldDefinitions,
        _config: &Config,
    ) -> Vec<Observation> {
        let Some(idx) = table.column_index("created") else {
            return Vec::new();
        };

        let mut observations = Vec::new();
        for (row, value) in populated_cells(table, idx) {
            let observation = if !validate_node_created_date_string(value) {
                Observation::new(
                    ObservationType::MalformedValue,
                    Severity::Error,
                    "created",
                    row,
                    format!("'{value}' is not a valid created date"),
                )
                .with_evidence(
                    Evidence::new()
                        .with_value(value)
                        .with_expected("YYYY-MM-DDThh:mm:ss+hh:mm"),
                )
            } else if created_date_is_in_future(value, self.now) {
                Observation::new(
                    ObservationType::FutureDate,
                    Severity::Error,
                    "created",
                    row,
                    format!("created date '{value}' is in the future"),
                )
                .with_evidence(
                    Evidence::new()
                        .with_value(value)
                        .with_expected(json!({ "not_after": self.now.to_string() })),
                )
            } else {
                continue;
            };
            observations.push(observation.with_detector(self.name()));
        }

        observations
    }
}

/// Checks the `langcode` base field against the recognized language codes.
pub struct LanguageCodeValidator;

impl RowValidator for LanguageCodeValidator {
    fn name(&self) -> &'static str {
        "language_code_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        _fields: &FieldDefinitions,
        _config: &Config,
    ) -> Vec<Observation> {
        let Some(idx) = table.column_index("langcode") else {
            return Vec::new();
        };

        populated_cells(table, idx)
            .filter(|(_, value)| !validate_language_code(value))
            .map(|(row, value)| {
                Observation::new(
                    ObservationType::InvalidValue,
                    Severity::Error,
                    "langcode",
                    row,
                    format!("'{value}' is not a recognized language code"),
                )
                .with_evidence(Evidence::new().with_value(value))
                .with_detector(self.name())
            })
            .collect()
    }
}

/// Checks that typed relation subvalues are `namespace:predicate:id` triples
/// whose relator is one the field accepts.
pub struct TypedRelationValidator;

impl RowValidator for TypedRelationValidator {
    fn name(&self) -> &'static str {
        "typed_relation_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        fields: &FieldDefinitions,
        config: &Config,
    ) -> Vec<Observation> {
        let mut observations = Vec::new();

        for (idx, column, def) in
            defined_columns(table, fields, |d| d.field_type == FieldType::TypedRelation)
        {
            let grammar = TypedRelationGrammar::new(def.relation_target_type());
            for (row, value) in populated_cells(table, idx) {
                for (position, sub) in populated_subvalues(value, &config.subdelimiter) {
                    let observation = match grammar.parse(sub, position) {
                        Ok(relation) if def.accepts_relator(&relation.rel_type) => continue,
                        Ok(relation) => Observation::new(
                            ObservationType::InvalidValue,
                            Severity::Error,
                            column,
                            row,
                            format!("relator '{}' is not configured for this field", relation.rel_type),
                        )
                        .with_evidence(
                            Evidence::new()
                                .with_value(relation.rel_type.as_str())
                                .with_position(position)
                                .with_expected(json!(def.typed_relations)),
                        ),
                        Err(err) => Observation::new(
                            ObservationType::MalformedValue,
                            Severity::Error,
                            column,
                            row,
                            err.to_string(),
                        )
                        .with_evidence(
                            Evidence::new()
                                .with_value(sub)
                                .with_position(position)
                                .with_expected("namespace:predicate:id"),
                        ),
                    };
                    observations.push(observation.with_detector(self.name()));
                }
            }
        }

        observations
    }
}

/// Checks that `url_alias` values start with a slash.
pub struct UrlAliasValidator;

impl RowValidator for UrlAliasValidator {
    fn name(&self) -> &'static str {
        "url_alias_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        _fields: &FieldDefinitions,
        _config: &Config,
    ) -> Vec<Observation> {
        let Some(idx) = table.column_index("url_alias") else {
            return Vec::new();
        };

        populated_cells(table, idx)
            .filter(|(_, value)| !value.starts_with('/'))
            .map(|(row, value)| {
                Observation::new(
                    ObservationType::MalformedValue,
                    Severity::Error,
                    "url_alias",
                    row,
                    format!("URL alias '{value}' must start with '/'"),
                )
                .with_evidence(Evidence::new().with_value(value).with_expected("/path"))
                .with_detector(self.name())
            })
            .collect()
    }
}

/// Longest taxonomy term name the backend stores.
pub const TERM_NAME_MAX_LENGTH: usize = 255;

static VOCABULARY_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]+:").unwrap());

/// Reports taxonomy term names longer than [`TERM_NAME_MAX_LENGTH`].
///
/// Entity reference subvalues that are numeric ids or URIs are not names and
/// are skipped. A `vocabulary:` prefix is not part of the name.
pub struct TermNameLengthValidator;

impl TermNameLengthValidator {
    fn term_name(sub: &str) -> Option<&str> {
        if sub.bytes().all(|b| b.is_ascii_digit())
            || sub.starts_with("http://")
            || sub.starts_with("https://")
        {
            return None;
        }
        let name = match VOCABULARY_PREFIX.find(sub) {
            Some(prefix) => sub[prefix.end()..].trim(),
            None => sub,
        };
        Some(name)
    }
}

impl RowValidator for TermNameLengthValidator {
    fn name(&self) -> &'static str {
        "term_name_length_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        fields: &FieldDefinitions,
        config: &Config,
    ) -> Vec<Observation> {
        let mut observations = Vec::new();

        for (idx, column, _) in defined_columns(table, fields, |d| {
            d.field_type == FieldType::EntityReference
                && d.target_type.as_deref().is_none_or(|t| t == "taxonomy_term")
        }) {
            for (row, value) in populated_cells(table, idx) {
                for (position, sub) in populated_subvalues(value, &config.subdelimiter) {
                    let Some(name) = Self::term_name(sub) else {
                        continue;
                    };
                    let length = name.chars().count();
                    if length <= TERM_NAME_MAX_LENGTH {
                        continue;
                    }
                    observations.push(
                        Observation::new(
                            ObservationType::LengthExceeded,
                            Severity::Error,
                            column,
                            row,
                            format!(
                                "term name is {length} characters, longer than the maximum of {TERM_NAME_MAX_LENGTH}"
                            ),
                        )
                        .with_evidence(
                            Evidence::new()
                                .with_value(name)
                                .with_position(position)
                                .with_expected(TERM_NAME_MAX_LENGTH),
                        )
                        .with_detector(self.name()),
                    );
                }
            }
        }

        observations
    }
}

/// Reports fields holding more subvalues than their cardinality allows.
///
/// The extra values are dropped on ingest, so these are warnings. `title`
/// is never checked.
pub struct CardinalityValidator;

impl RowValidator for CardinalityValidator {
    fn name(&self) -> &'static str {
        "cardinality_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        fields: &FieldDefinitions,
        config: &Config,
    ) -> Vec<Observation> {
        let mut observations = Vec::new();

        for (idx, column, def) in defined_columns(table, fields, |d| {
            matches!(d.cardinality, Cardinality::Limited(_))
        }) {
            if column == "title" {
                continue;
            }
            let Some(limit) = def.cardinality.limit() else {
                continue;
            };

            for (row, value) in populated_cells(table, idx) {
                let count = subvalues(value, &config.subdelimiter).count();
                if count > limit {
                    observations.push(
                        Observation::new(
                            ObservationType::CardinalityExceeded,
                            Severity::Warning,
                            column,
                            row,
                            format!(
                                "{count} values but the field allows {limit}; extra values will be dropped"
                            ),
                        )
                        .with_evidence(Evidence::new().with_value(count).with_expected(limit))
                        .with_detector(self.name()),
                    );
                }
            }
        }

        observations
    }
}

/// Reports subvalues longer than the field's maximum length.
///
/// Subvalues are measured as written, surrounding spaces included, since
/// that is what gets truncated.
pub struct FieldLengthValidator;

impl RowValidator for FieldLengthValidator {
    fn name(&self) -> &'static str {
        "field_length_validator"
    }

    fn validate(
        &self,
        table: &DataTable,
        fields: &FieldDefinitions,
        config: &Config,
    ) -> Vec<Observation> {
        let mut observations = Vec::new();

        for (idx, column, def) in defined_columns(table, fields, |d| d.max_length.is_some()) {
            let Some(max_length) = def.max_length else {
                continue;
            };
            for (row, value) in table.column_values(idx).enumerate() {
                for (position, sub) in subvalues(value, &config.subdelimiter).enumerate() {
                    if sub.trim().is_empty() {
                        continue;
                    }
                    let length = sub.chars().count();
                    if length <= max_length {
                        continue;
                    }
                    observations.push(
                        Observation::new(
                            ObservationType::LengthExceeded,
                            Severity::Warning,
                            column,
                            row + 1,
                            format!(
                                "value is {length} characters, longer than the maximum of {max_length}; it will be truncated"
                            ),
                        )
                        .with_evidence(
                            Evidence::new()
                                .with_value(sub)
                                .with_position(position)
                                .with_expected(max_length),
                        )
                        .with_detector(self.name()),
                    );
                }
            }
        }

        observations
    }
}

/// Runs a set of row validators over a table.
pub struct ValidationEngine {
    validators: Vec<Box<dyn RowValidator>>,
}

impl ValidationEngine {
    /// Create a new validation engine with all default validators.
    pub fn new() -> Self {
        Self {
            validators: vec![
                Box::new(GeolocationValidator),
                Box::new(EdtfValidator),
                Box::new(CreatedDateValidator::new()),
                Box::new(LanguageCodeValidator),
                Box::new(TypedRelationValidator),
                Box::new(UrlAliasValidator),
                Box::new(TermNameLengthValidator),
                Box::new(CardinalityValidator),
                Box::new(FieldLengthValidator),
            ],
        }
    }

    /// Create an engine that runs only `validators`.
    pub fn with_validators(validators: Vec<Box<dyn RowValidator>>) -> Self {
        Self { validators }
    }

    /// Run all validators and collect observations, errors first.
    pub fn validate(
        &self,
        table: &DataTable,
        fields: &FieldDefinitions,
        config: &Config,
    ) -> Vec<Observation> {
        let mut all_observations = Vec::new();

        for validator in &self.validators {
            let observations = validator.validate(table, fields, config);
            debug!(
                validator = validator.name(),
                observations = observations.len(),
                "ran row validator"
            );
            all_observations.extend(observations);
        }

        // Stable sort keeps row order within a severity
        all_observations.sort_by(|a, b| b.severity.cmp(&a.severity));

        all_observations
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
