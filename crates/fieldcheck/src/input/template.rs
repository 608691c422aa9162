//! CSV template generation from target field definitions.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::info;

use crate::config::Config;
use crate::error::{FieldcheckError, Result};
use crate::schema::FieldDefinitions;

/// Header of the column holding each template row's description.
pub const ROW_LABEL_COLUMN: &str = "REMOVE THIS COLUMN (KEEP THIS ROW)";

/// Suffix appended to `input_csv` for the template file name.
pub const TEMPLATE_SUFFIX: &str = ".csv_file_template";

/// Base fields every template starts with, after the id column.
const BASE_FIELDS: [(&str, &str, &str); 5] = [
    // (name, sample, documentation section)
    ("file", "myimage.jpg", "Required fields"),
    ("uid", "21", "Base fields"),
    ("langcode", "fr", "Base fields"),
    ("created", "2020-11-15T23:49:22+00:00", "Base fields"),
    ("title", "Free text", "Base fields"),
];

type TemplateRow = IndexMap<String, String>;

/// Write a CSV template describing every field of `fields`.
///
/// The file is `<input_dir>/<input_csv>.csv_file_template`. After the
/// header come rows for labels, required flags, sample data, cardinality,
/// and the documentation section covering each field type.
pub fn write_csv_template(config: &Config, fields: &FieldDefinitions) -> Result<PathBuf> {
    let rows = template_rows(config, fields);

    let mut columns: Vec<&str> = vec![ROW_LABEL_COLUMN, config.id_field.as_str()];
    for (name, _, _) in BASE_FIELDS {
        if !columns.contains(&name) {
            columns.push(name);
        }
    }
    for name in fields.keys() {
        if !columns.contains(&name.as_str()) {
            columns.push(name);
        }
    }

    let path = config
        .input_dir
        .join(format!("{}{TEMPLATE_SUFFIX}", config.input_csv));
    let file = File::create(&path).map_err(|e| FieldcheckError::io(&path, e))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    writer.write_record(&columns)?;
    for row in &rows {
        writer.write_record(
            columns
                .iter()
                .map(|column| row.get(*column).map(String::as_str).unwrap_or("")),
        )?;
    }
    writer.flush().map_err(|e| FieldcheckError::io(&path, e))?;

    info!(path = %path.display(), fields = fields.len(), "wrote CSV template");
    Ok(path)
}

fn template_rows(config: &Config, fields: &FieldDefinitions) -> [TemplateRow; 5] {
    let id_field = config.id_field.clone();

    let mut labels = row("LABEL (REMOVE THIS ROW)");
    for (name, def) in fields {
        labels.insert(name.clone(), def.label.clone());
    }

    let mut required = row("REQUIRED IN CREATE TASKS (REMOVE THIS ROW)");
    for (name, def) in fields {
        required.insert(name.clone(), yes_no(def.required));
    }
    for (name, value) in [("title", true), ("uid", false), ("langcode", false), ("created", false)] {
        required.insert(name.to_string(), yes_no(value));
    }
    required.insert(id_field.clone(), yes_no(true));
    required.insert("file".to_string(), yes_no(false));

    let mut samples = row("SAMPLE DATA (REMOVE THIS ROW)");
    samples.insert(id_field.clone(), "0001".to_string());
    let mut cardinality = row("NUMBER OF VALUES ALLOWED (REMOVE THIS ROW)");
    cardinality.insert(id_field.clone(), "1".to_string());
    let mut docs = row("SECTION IN DOCUMENTATION (REMOVE THIS ROW)");
    docs.insert(id_field, "Required fields".to_string());

    for (name, sample, section) in BASE_FIELDS {
        samples.insert(name.to_string(), sample.to_string());
        cardinality.insert(name.to_string(), "1".to_string());
        docs.insert(name.to_string(), section.to_string());
    }

    for (name, def) in fields {
        samples.insert(name.clone(), def.field_type.sample_value().to_string());
        cardinality.insert(name.clone(), def.cardinality.to_string());
        docs.insert(name.clone(), def.field_type.documentation_section().to_string());
    }

    [labels, required, samples, cardinality, docs]
}

fn row(description: &str) -> TemplateRow {
    let mut row = IndexMap::new();
    row.insert(ROW_LABEL_COLUMN.to_string(), description.to_string());
    row
}

fn yes_no(value: bool) -> String {
    let answer = if value { "Yes" } else { "No" };
    answer.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Cardinality, FieldDefinition, FieldType};

    fn fields() -> FieldDefinitions {
        let mut fields = FieldDefinitions::new();
        fields.insert(
            "title".to_string(),
            FieldDefinition::new(FieldType::String)
                .with_label("Title")
                .required(),
        );
        fields.insert(
            "field_coordinates".to_string(),
            FieldDefinition::new(FieldType::Geolocation)
                .with_label("Coordinates")
                .with_cardinality(Cardinality::Unlimited),
        );
        fields.insert(
            "field_linked_agent".to_string(),
            FieldDefinition::new(FieldType::TypedRelation)
                .with_cardinality(Cardinality::Limited(3)),
        );
        fields
    }

    #[test]
    fn test_write_csv_template() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            input_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        let path = write_csv_template(&config, &fields()).unwrap();
        assert!(path.ends_with("metadata.csv.csv_file_template"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec![
                ROW_LABEL_COLUMN,
                "id",
                "file",
                "uid",
                "langcode",
                "created",
                "title",
                "field_coordinates",
                "field_linked_agent",
            ]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 5);

        // labels
        assert_eq!(&rows[0][0], "LABEL (REMOVE THIS ROW)");
        assert_eq!(&rows[0][7], "Coordinates");
        assert_eq!(&rows[0][1], "");
        // required
        assert_eq!(&rows[1][1], "Yes");
        assert_eq!(&rows[1][6], "Yes");
        assert_eq!(&rows[1][7], "No");
        // samples
        assert_eq!(&rows[2][1], "0001");
        assert_eq!(&rows[2][7], "+49.16,-123.93");
        assert_eq!(&rows[2][8], "relators:art:30");
        // cardinality
        assert_eq!(&rows[3][7], "unlimited");
        assert_eq!(&rows[3][8], "3");
        // docs; definitions override base field sections
        assert_eq!(&rows[4][2], "Required fields");
        assert_eq!(&rows[4][6], "Single-valued fields");
        assert_eq!(&rows[4][8], "Typed Relation fields");
    }
}
