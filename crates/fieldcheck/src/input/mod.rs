//! Input parsing and data source handling.

mod excel;
mod parser;
mod preprocess;
mod source;
mod template;

pub use excel::{
    csv_from_excel, extract_worksheet, ExtractionSummary, WorkbookSource, NODE_ID_FIELD,
};
pub use parser::{Parser, ParserConfig};
pub use preprocess::{
    apply_field_templates, preprocess_csv, truncate_value, write_table, PreprocessedCsv,
    PREPROCESSED_SUFFIX,
};
pub use source::{clean_row_values, DataTable, SourceMetadata};
pub use template::{write_csv_template, ROW_LABEL_COLUMN, TEMPLATE_SUFFIX};
