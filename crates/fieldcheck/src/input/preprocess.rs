//! Preparation of the input CSV before rows are ingested.
//!
//! Preprocessing appends configured template columns, drops commented-out
//! rows, and writes the result next to the input as `<input>.prepocessed`.

use std::borrow::Cow;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::parser::{Parser, ParserConfig};
use super::source::{DataTable, SourceMetadata};
use crate::config::Config;
use crate::error::{FieldcheckError, Result};

/// Suffix of the preprocessed CSV written next to the input.
pub const PREPROCESSED_SUFFIX: &str = ".prepocessed";

/// Result of preprocessing the input CSV.
#[derive(Debug, Clone)]
pub struct PreprocessedCsv {
    /// Rows that will be ingested, template columns included.
    pub table: DataTable,
    /// Metadata of the original input file.
    pub source: SourceMetadata,
    /// Where the preprocessed CSV was written.
    pub output_path: PathBuf,
    /// Number of commented-out rows dropped.
    pub skipped_rows: usize,
}

/// Read the input CSV named by `config`, apply templates and comment
/// filtering, and write the preprocessed copy.
pub fn preprocess_csv(config: &Config) -> Result<PreprocessedCsv> {
    let input_path = config.input_csv_path();
    if !input_path.exists() {
        return Err(FieldcheckError::io(
            &input_path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "CSV file not found"),
        ));
    }

    let parser = Parser::with_config(ParserConfig::from_config(config)?);
    let (mut table, source) = parser.parse_file(&input_path)?;

    apply_field_templates(&mut table, config);

    let before = table.row_count();
    table.rows.retain(|row| !DataTable::is_comment_row(row));
    let skipped_rows = before - table.row_count();
    if skipped_rows > 0 {
        info!(skipped_rows, "skipped commented-out CSV rows");
    }

    let mut output = input_path.clone().into_os_string();
    output.push(PREPROCESSED_SUFFIX);
    let output_path = PathBuf::from(output);
    write_table(&table, &output_path)?;

    Ok(PreprocessedCsv {
        table,
        source,
        output_path,
        skipped_rows,
    })
}

/// Add each template column missing from the table, filled with its value.
///
/// Columns already present in the input are left untouched.
pub fn apply_field_templates(table: &mut DataTable, config: &Config) {
    let original_headers = table.headers.clone();

    for template in &config.csv_field_templates {
        for (field_name, field_value) in template {
            if original_headers.contains(field_name) {
                continue;
            }
            match table.column_index(field_name) {
                Some(idx) => {
                    for row in &mut table.rows {
                        row[idx] = field_value.clone();
                    }
                }
                None => {
                    table.headers.push(field_name.clone());
                    for row in &mut table.rows {
                        row.push(field_value.clone());
                    }
                }
            }
        }
    }
}

/// Write a table, header first, using the table's delimiter.
pub fn write_table(table: &DataTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| FieldcheckError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(table.delimiter)
        .from_writer(BufWriter::new(file));

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|e| FieldcheckError::io(path, e))?;
    Ok(())
}

/// Cut `value` to at most `max_length` characters.
///
/// The backend rejects longer values, so truncation is logged with the
/// record it happened in.
pub fn truncate_value<'a>(
    field_name: &str,
    record_id: &str,
    max_length: usize,
    value: &'a str,
) -> Cow<'a, str> {
    match value.char_indices().nth(max_length) {
        Some((cut, _)) => {
            warn!(
                field = field_name,
                record_id,
                max_length,
                original = value,
                "CSV field value truncated to the field's maximum length"
            );
            Cow::Owned(value[..cut].to_string())
        }
        None => Cow::Borrowed(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use std::fs;

    fn template(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_templates_do_not_override_input_columns() {
        let mut table = DataTable::new(
            vec!["id".to_string(), "field_model".to_string()],
            vec![vec!["1".to_string(), "25".to_string()]],
            b',',
        );
        let config = Config {
            csv_field_templates: vec![
                template(&[("field_model", "99")]),
                template(&[("field_rights", "CC-BY"), ("langcode", "fr")]),
            ],
            ..Config::default()
        };

        apply_field_templates(&mut table, &config);

        assert_eq!(table.headers, vec!["id", "field_model", "field_rights", "langcode"]);
        assert_eq!(table.rows[0], vec!["1", "25", "CC-BY", "fr"]);
    }

    #[test]
    fn test_later_template_replaces_earlier_template_value() {
        let mut table = DataTable::new(vec!["id".to_string()], vec![vec!["1".to_string()]], b',');
        let config = Config {
            csv_field_templates: vec![template(&[("langcode", "fr")]), template(&[("langcode", "es")])],
            ..Config::default()
        };
        apply_field_templates(&mut table, &config);
        assert_eq!(table.headers, vec!["id", "langcode"]);
        assert_eq!(table.rows[0], vec!["1", "es"]);
    }

    #[test]
    fn test_preprocess_writes_filtered_copy() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("metadata.csv"),
            "id,title\n001,First\n#002,Commented\n003,Third\n",
        )
        .unwrap();

        let config = Config {
            input_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let result = preprocess_csv(&config).unwrap();

        assert_eq!(result.skipped_rows, 1);
        assert_eq!(result.table.row_count(), 2);
        assert_eq!(result.source.row_count, 3);
        assert!(result.output_path.ends_with("metadata.csv.prepocessed"));

        let written = fs::read_to_string(&result.output_path).unwrap();
        assert_eq!(written, "id,title\n001,First\n003,Third\n");
    }

    #[test]
    fn test_preprocess_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            input_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        assert!(matches!(
            preprocess_csv(&config),
            Err(FieldcheckError::Io { .. })
        ));
    }

    #[test]
    fn test_truncate_value() {
        assert_eq!(truncate_value("title", "001", 5, "abc"), "abc");
        assert_eq!(truncate_value("title", "001", 3, "abcdef"), "abc");
        assert_eq!(truncate_value("title", "001", 2, "été!"), "ét");
        assert!(matches!(truncate_value("title", "001", 3, "abc"), Cow::Borrowed(_)));
    }
}
