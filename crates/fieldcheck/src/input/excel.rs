//! Extraction of one worksheet of an `.xlsx` workbook into CSV.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use tempfile::NamedTempFile;
use tracing::info;

use crate::config::Config;
use crate::error::{FieldcheckError, Result};

/// Key column of worksheets that update existing nodes.
pub const NODE_ID_FIELD: &str = "node_id";

/// The worksheet to extract and where its CSV goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookSource {
    pub workbook: PathBuf,
    pub worksheet: String,
    pub output: PathBuf,
}

impl WorkbookSource {
    pub fn new(
        workbook: impl Into<PathBuf>,
        worksheet: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            workbook: workbook.into(),
            worksheet: worksheet.into(),
            output: output.into(),
        }
    }

    /// Workbook, worksheet, and output CSV named by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.excel_path(),
            config.excel_worksheet.clone(),
            config.excel_csv_path(),
        )
    }
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub output: PathBuf,
    /// Data rows written, header excluded.
    pub rows_written: usize,
}

/// Extract the worksheet configured in `config` to `excel_csv_filename`.
pub fn csv_from_excel(config: &Config) -> Result<ExtractionSummary> {
    extract_worksheet(&WorkbookSource::from_config(config), &config.id_field)
}

/// Write every row of `source.worksheet` as comma-separated CSV.
///
/// The first row is the header and must contain `id_field` or
/// [`NODE_ID_FIELD`]. Rows and columns keep their workbook order; empty
/// cells become empty fields. The output file only appears once every row
/// has been written.
pub fn extract_worksheet(source: &WorkbookSource, id_field: &str) -> Result<ExtractionSummary> {
    if !source.workbook.is_file() {
        return Err(FieldcheckError::io(
            &source.workbook,
            std::io::Error::new(std::io::ErrorKind::NotFound, "Excel workbook not found"),
        ));
    }

    let mut workbook: Xlsx<_> = open_workbook(&source.workbook)?;
    if !workbook.sheet_names().iter().any(|name| name == &source.worksheet) {
        return Err(FieldcheckError::WorksheetNotFound {
            worksheet: source.worksheet.clone(),
            workbook: source.workbook.clone(),
        });
    }

    let range = workbook.worksheet_range(&source.worksheet)?;
    // Ranges start at the first used cell; leading blank columns are restored.
    let leading_columns = range.start().map_or(0, |(_, col)| col as usize);

    let mut rows = range.rows().map(|row| {
        std::iter::repeat_n(String::new(), leading_columns)
            .chain(row.iter().map(cell_to_string))
            .collect::<Vec<_>>()
    });

    let header = rows.next().ok_or_else(|| {
        FieldcheckError::EmptyData(format!(
            "worksheet '{}' in {} is empty",
            source.worksheet,
            source.workbook.display()
        ))
    })?;
    if !has_key_column(&header, id_field) {
        return Err(FieldcheckError::Config(format!(
            "worksheet '{}' in {} has no '{id_field}' or '{NODE_ID_FIELD}' column",
            source.worksheet,
            source.workbook.display()
        )));
    }

    let rows_written = write_rows(&source.output, &header, rows)?;

    info!(
        workbook = %source.workbook.display(),
        worksheet = %source.worksheet,
        output = %source.output.display(),
        rows = rows_written,
        "extracted worksheet to CSV"
    );

    Ok(ExtractionSummary {
        output: source.output.clone(),
        rows_written,
    })
}

fn has_key_column(header: &[String], id_field: &str) -> bool {
    header
        .iter()
        .map(|column| column.trim())
        .any(|column| column == id_field || column == NODE_ID_FIELD)
}

fn write_rows(
    path: &Path,
    header: &[String],
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Dropping the temp file on an early return removes it.
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| FieldcheckError::io(dir, e))?;

    let count = {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(BufWriter::new(temp.as_file_mut()));

        writer.write_record(header)?;
        let mut count = 0;
        for row in rows {
            writer.write_record(&row)?;
            count += 1;
        }
        writer.flush().map_err(|e| FieldcheckError::io(path, e))?;
        count
    };

    temp.persist(path)
        .map_err(|e| FieldcheckError::io(path, e.error))?;
    Ok(count)
}

/// Render a cell the way it reads in the spreadsheet.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            None => cell.to_string(),
        },
        Data::Error(e) => e.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(-42.0), "-42");
        assert_eq!(format_float(10.5), "10.5");
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::String("Title 1".to_string())), "Title 1");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_missing_workbook_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = WorkbookSource::new(
            dir.path().join("absent.xlsx"),
            "Sheet1",
            dir.path().join("excel.csv"),
        );
        let err = extract_worksheet(&source, "id").unwrap_err();
        assert!(matches!(err, FieldcheckError::Io { .. }));
        assert!(!dir.path().join("excel.csv").exists());
    }

    fn header(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_key_column() {
        assert!(has_key_column(&header(&["id", "title"]), "id"));
        assert!(has_key_column(&header(&["node_id", "title"]), "id"));
        assert!(has_key_column(&header(&["title", " local_id "]), "local_id"));
        assert!(!has_key_column(&header(&["title", "identifier"]), "id"));
        assert!(!has_key_column(&[], "id"));
    }

    #[test]
    fn test_write_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("excel.csv");
        let rows = vec![header(&["1", "a, b"]), header(&["2"])];

        let count = write_rows(&path, &header(&["id", "title"]), rows.into_iter()).unwrap();

        assert_eq!(count, 2);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "id,title\n1,\"a, b\"\n2\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be replaced by the finished CSV.
        let path = dir.path().join("excel.csv");
        std::fs::create_dir(&path).unwrap();

        let err = write_rows(&path, &header(&["id"]), std::iter::once(header(&["1"]))).unwrap_err();

        assert!(matches!(err, FieldcheckError::Io { .. }));
        assert!(path.is_dir());
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("excel.csv")]);
    }

    #[test]
    fn test_missing_output_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("excel.csv");

        let err = write_rows(&path, &header(&["id"]), std::iter::empty()).unwrap_err();

        assert!(matches!(err, FieldcheckError::Io { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_source_from_config() {
        let config = Config {
            input_dir: PathBuf::from("in"),
            input_csv: "book.xlsx".to_string(),
            excel_worksheet: "Data".to_string(),
            ..Config::default()
        };
        let source = WorkbookSource::from_config(&config);
        assert_eq!(source.workbook, PathBuf::from("in/book.xlsx"));
        assert_eq!(source.worksheet, "Data");
        assert_eq!(source.output, PathBuf::from("in/excel.csv"));
    }
}
