//! One editing session: the Empty/Loaded state every front end drives.

use crate::csv::CsvOptions;
use crate::error::{Result, SheetError};
use crate::table::{Row, RowId, Table};

/// File name offered for every export
pub const EXPORT_FILE_NAME: &str = "edited_data.csv";

/// A file handed over by a drop zone, file picker or path argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        DroppedFile {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// CSV text ready to be offered for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Empty,
    Loaded {
        source: String,
        table: Table,
    },
}

/// Holds at most one loaded table.
///
/// Starts empty; a successful load moves it to loaded and later loads replace
/// the table wholesale. A failed load leaves the current state untouched.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: State,
    options: CsvOptions,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: CsvOptions) -> Self {
        Session {
            state: State::Empty,
            options,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded { .. })
    }

    /// Name of the file the current table was loaded from
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        match &self.state {
            State::Empty => None,
            State::Loaded { source, .. } => Some(source),
        }
    }

    #[must_use]
    pub fn table(&self) -> Option<&Table> {
        match &self.state {
            State::Empty => None,
            State::Loaded { table, .. } => Some(table),
        }
    }

    fn table_mut(&mut self) -> Result<&mut Table> {
        match &mut self.state {
            State::Empty => Err(SheetError::NoTableLoaded),
            State::Loaded { table, .. } => Ok(table),
        }
    }

    /// Load the first of the supplied files; any others are ignored
    pub fn load_files<I>(&mut self, files: I) -> Result<&Table>
    where
        I: IntoIterator<Item = DroppedFile>,
    {
        let mut files = files.into_iter();
        let first = files.next().ok_or(SheetError::NoFileSupplied)?;
        let ignored = files.count();
        if ignored > 0 {
            tracing::debug!(ignored, file = %first.name, "multiple files supplied, using the first");
        }
        self.load(first)
    }

    /// Decode a file and replace the current table with it
    pub fn load(&mut self, file: DroppedFile) -> Result<&Table> {
        let table = match Table::from_csv_bytes(&file.bytes, &self.options) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "failed to load file");
                return Err(e);
            }
        };
        tracing::info!(
            file = %file.name,
            columns = table.col_count(),
            rows = table.row_count(),
            "loaded file"
        );
        self.state = State::Loaded {
            source: file.name,
            table,
        };
        self.table().ok_or(SheetError::NoTableLoaded)
    }

    pub fn edit_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<()> {
        self.table_mut()?.edit_cell(row, col, value)
    }

    /// Edit a cell after checking the row is still the one the caller saw
    pub fn edit_cell_checked(
        &mut self,
        row: usize,
        expected: RowId,
        col: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        let table = self.table_mut()?;
        table.check_row(row, expected)?;
        table.edit_cell(row, col, value)
    }

    /// Append an empty row, returning its position and id
    pub fn add_row(&mut self) -> Result<(usize, RowId)> {
        let table = self.table_mut()?;
        let id = table.add_row();
        Ok((table.row_count() - 1, id))
    }

    pub fn delete_row(&mut self, row: usize) -> Result<Row> {
        self.table_mut()?.delete_row(row)
    }

    /// Delete a row after checking it is still the one the caller saw
    pub fn delete_row_checked(&mut self, row: usize, expected: RowId) -> Result<Row> {
        let table = self.table_mut()?;
        table.check_row(row, expected)?;
        table.delete_row(row)
    }

    /// Serialize the current table for download
    pub fn export(&self) -> Result<Export> {
        let table = self.table().ok_or(SheetError::NoTableLoaded)?;
        Ok(Export {
            file_name: EXPORT_FILE_NAME,
            content: table.to_csv_string()?,
        })
    }
}
