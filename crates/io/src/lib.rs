// File I/O operations

pub mod csv;
pub mod xlsx;

use std::fmt;
use std::path::{Path, PathBuf};

use flexitrack_recon::model::Table;

/// A file that could not be opened, decoded, or read as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoError {
    pub path: PathBuf,
    pub message: String,
}

impl IoError {
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for IoError {}

/// Supported table formats, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    Workbook,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(TableFormat::Csv),
            "tsv" | "tab" => Some(TableFormat::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(TableFormat::Workbook),
            _ => None,
        }
    }
}

/// Load a table from disk. `sheet` picks a worksheet in spreadsheet files
/// and is rejected for delimited text.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let format = TableFormat::from_path(path).ok_or_else(|| {
        IoError::new(
            path,
            "unsupported file type (expected .csv, .tsv, .txt, .xlsx, .xlsm, .xls, .xlsb or .ods)",
        )
    })?;

    if sheet.is_some() && format != TableFormat::Workbook {
        return Err(IoError::new(path, "a sheet name only applies to spreadsheet files"));
    }

    let table = match format {
        TableFormat::Csv => crate::csv::import(path, &source)?,
        TableFormat::Tsv => crate::csv::import_tsv(path, &source)?,
        TableFormat::Workbook => crate::xlsx::import(path, sheet, &source)?,
    };

    log::info!(
        "loaded {} ({} columns, {} rows)",
        source,
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}
