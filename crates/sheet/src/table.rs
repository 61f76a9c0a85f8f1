use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a row within one table.
///
/// Assigned when a row is decoded or added and never reused, so a view that
/// remembers the id can tell whether the row at a position is still the one
/// it rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A data row: one text cell per header column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    id: RowId,
    cells: Vec<String>,
}

impl Row {
    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// A header plus an ordered list of text rows.
///
/// Rows are addressed by their current position; positions shift when a row
/// before them is deleted. Every row has exactly `col_count()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Row>,
    next_id: u64,
}

impl Table {
    /// Create a table with the given header and no rows
    #[must_use]
    pub fn new<S: Into<String>>(header: Vec<S>) -> Self {
        Table {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            next_id: 0,
        }
    }

    /// Create a table from a header and data rows.
    ///
    /// Short rows are padded with empty cells and long rows truncated so
    /// every row matches the header width.
    #[must_use]
    pub fn from_data<S: Into<String>>(header: Vec<S>, rows: Vec<Vec<S>>) -> Self {
        let mut table = Table::new(header);
        let width = table.col_count();
        for cells in rows {
            let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
            cells.resize(width, String::new());
            table.push_row(cells);
        }
        table
    }

    fn push_row(&mut self, cells: Vec<String>) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push(Row { id, cells });
        id
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.header.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Header first, then every row, in display order
    pub fn records(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(|r| r.cells.as_slice()))
    }

    /// Get the row at a position
    pub fn row(&self, index: usize) -> Result<&Row> {
        self.rows.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.rows.len(),
        })
    }

    /// Get a cell value by position
    pub fn get(&self, row: usize, col: usize) -> Result<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(col))
            .map(String::as_str)
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows.len(),
                cols: self.header.len(),
            })
    }

    /// Replace the value of one cell
    pub fn edit_cell<S: Into<String>>(&mut self, row: usize, col: usize, value: S) -> Result<()> {
        let (rows, cols) = (self.rows.len(), self.header.len());
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.cells.get_mut(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            })?;
        *cell = value.into();
        Ok(())
    }

    /// Append a row of empty cells, one per header column
    pub fn add_row(&mut self) -> RowId {
        self.push_row(vec![String::new(); self.header.len()])
    }

    /// Remove the row at a position, shifting later rows up by one
    pub fn delete_row(&mut self, index: usize) -> Result<Row> {
        if index >= self.rows.len() {
            return Err(SheetError::RowIndexOutOfBounds {
                index,
                count: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Current position of a row, if it still exists
    #[must_use]
    pub fn position_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Verify the row at `index` is still the row with `expected` id
    pub fn check_row(&self, index: usize, expected: RowId) -> Result<()> {
        let actual = self.row(index)?.id;
        if actual == expected {
            Ok(())
        } else {
            Err(SheetError::StaleRow {
                index,
                expected,
                actual,
            })
        }
    }

    pub fn edit_cell_by_id<S: Into<String>>(&mut self, id: RowId, col: usize, value: S) -> Result<()> {
        let index = self.position_of(id).ok_or(SheetError::UnknownRow { id })?;
        self.edit_cell(index, col, value)
    }

    pub fn delete_row_by_id(&mut self, id: RowId) -> Result<Row> {
        let index = self.position_of(id).ok_or(SheetError::UnknownRow { id })?;
        self.delete_row(index)
    }
}
