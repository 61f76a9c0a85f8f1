use crate::table::RowId;
use thiserror::Error;

/// Errors that can occur while loading, editing or exporting a table
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Index out of bounds: row {row}, col {col} (table has {rows} rows, {cols} cols)")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Row index out of bounds: {index} (table has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error("Row not found: {id}")]
    UnknownRow { id: RowId },

    #[error("Row {index} changed since it was displayed (expected {expected}, found {actual})")]
    StaleRow {
        index: usize,
        expected: RowId,
        actual: RowId,
    },

    #[error("File contains no CSV records")]
    EmptyInput,

    #[error("Record {record} has {actual} fields, header has {expected}")]
    RaggedRow {
        record: usize,
        expected: usize,
        actual: usize,
    },

    #[error("No file loaded")]
    NoTableLoaded,

    #[error("No file supplied")]
    NoFileSupplied,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    /// Whether the error was caused by the content of a dropped file
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            SheetError::EmptyInput | SheetError::RaggedRow { .. } | SheetError::Csv(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
