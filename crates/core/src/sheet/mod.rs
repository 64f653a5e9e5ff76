//! Spreadsheet reading and writing.
//!
//! Uploads are either `.xlsx` workbooks (first worksheet only) or delimited
//! text (CSV and its `;`/tab/`|` variants). The format is sniffed from the
//! bytes, not taken from a filename. The first row is the header row; every
//! following row becomes a [`Row`] numbered the way a spreadsheet user sees
//! it (header is row 1).

mod delimited;
mod workbook;

use serde::Deserialize;

pub use delimited::detect_delimiter;

/// Local file header signature that starts every zip archive, and so every
/// `.xlsx` workbook.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("sheet is empty: a header row is required")]
    Empty,

    #[error("malformed sheet at row {row}: {message}")]
    Malformed { row: usize, message: String },

    #[error("unreadable workbook: {0}")]
    Workbook(String),

    #[error("failed to write sheet: {0}")]
    Write(String),
}

/// File formats a sheet can be read from or written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    #[default]
    Xlsx,
    Csv,
}

impl SheetFormat {
    /// Sniff the format of uploaded bytes.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) {
            Self::Xlsx
        } else {
            Self::Csv
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// One data row of a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based sheet row number (the header is row 1).
    pub number: usize,
    /// Trimmed cell values in column order.
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(number: usize, cells: Vec<String>) -> Self {
        Self { number, cells }
    }

    /// Cell at `column`, or `""` when the row is shorter than that.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// A parsed sheet: header plus data rows in file order.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

/// Parse an uploaded sheet in whichever format its bytes are in.
///
/// Rows whose cells are all blank are skipped. Rows may be shorter or longer
/// than the header; missing cells read as empty through [`Row::cell`].
pub fn read_sheet(bytes: &[u8]) -> Result<Sheet, SheetError> {
    match SheetFormat::detect(bytes) {
        SheetFormat::Xlsx => workbook::read(bytes),
        SheetFormat::Csv => delimited::read(bytes),
    }
}

/// Serialize a header and rows in `format`.
pub fn write_sheet<I>(
    format: SheetFormat,
    header: &[&str],
    rows: I,
) -> Result<Vec<u8>, SheetError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    match format {
        SheetFormat::Xlsx => workbook::write(header, rows),
        SheetFormat::Csv => delimited::write(header, rows),
    }
}
