//! CSV reader producing [`DataTable`]s.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{clean_row_values, DataTable, SourceMetadata};
use crate::config::Config;
use crate::error::{FieldcheckError, Result};

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Column delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Trim whitespace around every value.
    pub trim_values: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            max_rows: None,
            trim_values: false,
        }
    }
}

impl ParserConfig {
    /// Parser settings for the input CSV described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            delimiter: config.delimiter_byte()?,
            ..Self::default()
        })
    }
}

/// Parses delimited text files with a header row.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| FieldcheckError::io(path, e))?;
        let size_bytes = file
            .metadata()
            .map_err(|e| FieldcheckError::io(path, e))?
            .len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| FieldcheckError::io(path, e))?;

        if std::str::from_utf8(&contents).is_err() {
            return Err(FieldcheckError::Encoding {
                path: path.to_path_buf(),
            });
        }

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let data_table = self.parse_bytes(&contents)?;
        debug!(
            path = %path.display(),
            rows = data_table.row_count(),
            columns = data_table.column_count(),
            "parsed input file"
        );

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            self.config.delimiter,
            data_table.row_count(),
            data_table.column_count(),
        );

        Ok((data_table, source_metadata))
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(FieldcheckError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            // Pad short rows, drop cells beyond the header
            row.resize(expected_cols, String::new());

            if self.config.trim_values {
                clean_row_values(&mut row);
            }

            rows.push(row);
        }

        if rows.is_empty() {
            return Err(FieldcheckError::EmptyData("No data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows, self.config.delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"id,title,field_coordinates\n001,Alice,\"49.1,-123.9\"\n002,Bob,";
        let table = parser.parse_bytes(data).unwrap();

        assert_eq!(table.headers, vec!["id", "title", "field_coordinates"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 2), Some("49.1,-123.9"));
        assert_eq!(table.get(1, 1), Some("Bob"));
    }

    #[test]
    fn test_short_and_long_rows_are_normalized() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"a,b,c\n1\n1,2,3,4").unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_configured_delimiter_and_trim() {
        let parser = Parser::with_config(ParserConfig {
            delimiter: b'\t',
            trim_values: true,
            ..ParserConfig::default()
        });
        let table = parser.parse_bytes(b"id\ttitle\n 1 \t  Foo bar \n").unwrap();
        assert_eq!(table.get(0, 0), Some("1"));
        assert_eq!(table.get(0, 1), Some("Foo bar"));
        assert_eq!(table.delimiter, b'\t');
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let table = parser.parse_bytes(b"id\n1\n2\n3").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_header_only_is_empty_data() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_bytes(b"id,title\n"),
            Err(FieldcheckError::EmptyData(_))
        ));
    }
}
