//! Run configuration.
//!
//! A [`Config`] is built once, validated, and then passed by reference to every
//! operation that needs it. Nothing in the crate reads configuration from a
//! global.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldcheckError, Result};

/// One `label: [extensions]` entry of an extension mapping list.
pub type ExtensionMapping = IndexMap<String, Vec<String>>;

/// Characters with meaning inside structured subvalues.
const RESERVED_SUBDELIMITER_CHARS: &[char] = &[':', ','];

/// Options consulted while reading and checking input data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the input CSV/workbook and generated files.
    pub input_dir: PathBuf,
    /// Input file name (relative to `input_dir`) or absolute path.
    pub input_csv: String,
    /// Column delimiter of the input CSV.
    pub delimiter: String,
    /// Separator between repeated values inside one field.
    pub subdelimiter: String,
    /// Column holding each record's identifier.
    pub id_field: String,
    /// Worksheet read when the input is an Excel workbook.
    pub excel_worksheet: String,
    /// CSV file written from the workbook, inside `input_dir`.
    pub excel_csv_filename: String,
    /// Single media type used for every file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Ordered media type to extension mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_types: Option<Vec<ExtensionMapping>>,
    /// Single model used for every file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Ordered model to extension mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<ExtensionMapping>>,
    /// Columns added to every row unless already present in the input.
    pub csv_field_templates: Vec<IndexMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input_data"),
            input_csv: "metadata.csv".to_string(),
            delimiter: ",".to_string(),
            subdelimiter: "|".to_string(),
            id_field: "id".to_string(),
            excel_worksheet: "Sheet1".to_string(),
            excel_csv_filename: "excel.csv".to_string(),
            media_type: None,
            media_types: None,
            model: None,
            models: None,
            csv_field_templates: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a `.json` or `.toml` file.
    ///
    /// Top-level keys are matched case-insensitively. The result is validated
    /// before it is returned.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| FieldcheckError::io(path, e))?;

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let config = match extension.as_str() {
            "json" => Self::from_json_str(&contents)?,
            "toml" => Self::from_toml_str(&contents)?,
            other => {
                return Err(FieldcheckError::Config(format!(
                    "unsupported configuration format '{other}' for {}",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), "loaded configuration");
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        let value = match value {
            serde_json::Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k.to_lowercase(), v))
                    .collect(),
            ),
            _ => {
                return Err(FieldcheckError::Config(
                    "configuration must be a JSON object".to_string(),
                ));
            }
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let table: toml::Table = contents.parse()?;
        let lowered: toml::Table = table
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(toml::Value::Table(lowered).try_into()?)
    }

    /// Check option values that deserialization cannot.
    pub fn validate(&self) -> Result<()> {
        if self.subdelimiter.is_empty() {
            return Err(FieldcheckError::Config(
                "subdelimiter must not be empty".to_string(),
            ));
        }
        if let Some(c) = self
            .subdelimiter
            .chars()
            .find(|c| RESERVED_SUBDELIMITER_CHARS.contains(c))
        {
            return Err(FieldcheckError::Config(format!(
                "subdelimiter '{}' contains '{c}', which separates parts of structured values",
                self.subdelimiter
            )));
        }
        if self.subdelimiter == self.delimiter {
            return Err(FieldcheckError::Config(format!(
                "subdelimiter '{}' must differ from the column delimiter",
                self.subdelimiter
            )));
        }
        self.delimiter_byte()?;
        if self.id_field.trim().is_empty() {
            return Err(FieldcheckError::Config("id_field must not be empty".to_string()));
        }
        Ok(())
    }

    /// The column delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        // "\t" is accepted as an escaped tab for convenience.
        let delimiter = if self.delimiter == "\\t" { "\t" } else { self.delimiter.as_str() };
        match delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(FieldcheckError::Config(format!(
                "delimiter '{}' must be a single ASCII character",
                self.delimiter
            ))),
        }
    }

    /// Returns true if the input is an Excel workbook.
    pub fn is_excel_input(&self) -> bool {
        self.input_csv.to_lowercase().ends_with(".xlsx")
    }

    /// Resolve a file name against `input_dir` unless it is absolute.
    pub fn resolve_input_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.input_dir.join(path)
        }
    }

    /// Path of the Excel workbook named by `input_csv`.
    pub fn excel_path(&self) -> PathBuf {
        self.resolve_input_path(&self.input_csv)
    }

    /// Path of the CSV file extracted from the Excel workbook.
    pub fn excel_csv_path(&self) -> PathBuf {
        self.input_dir.join(&self.excel_csv_filename)
    }

    /// Path of the CSV data that rows are read from.
    ///
    /// For workbook input this is the extracted CSV, not the workbook.
    pub fn input_csv_path(&self) -> PathBuf {
        if self.is_excel_input() {
            self.excel_csv_path()
        } else {
            self.resolve_input_path(&self.input_csv)
        }
    }
}
