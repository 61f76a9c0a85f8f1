//! Editable CSV tables.
//!
//! A [`Table`] is a header plus ordered rows of plain text cells. Files are
//! decoded into a table, edited in place by position, and written back out as
//! CSV. A [`Session`] holds the table of one editing session and is what the
//! web and terminal front ends drive.
//!
//! # Examples
//!
//! ```
//! use csvedit_sheet::{DroppedFile, Session};
//!
//! let mut session = Session::new();
//! session
//!     .load(DroppedFile::new("people.csv", "name,age\nAlice,30\nBob,25\n"))
//!     .unwrap();
//!
//! session.edit_cell(0, 1, "31").unwrap();
//! session.add_row().unwrap();
//! session.delete_row(1).unwrap();
//!
//! let export = session.export().unwrap();
//! assert_eq!(export.file_name, "edited_data.csv");
//! assert_eq!(export.content, "name,age\nAlice,31\n,\n");
//! ```
//!
//! ## Loading from a file
//!
//! ```no_run
//! use csvedit_sheet::Table;
//!
//! let table = Table::from_csv("data.csv").unwrap();
//! println!("{} columns, {} rows", table.col_count(), table.row_count());
//! ```
//!
//! # Dialect
//!
//! Reading follows RFC 4180 as implemented by the `csv` crate: `"` quoting
//! with doubled quotes as escapes, quoted fields may hold delimiters and
//! newlines. The delimiter is sniffed unless set in [`CsvOptions`]; output is
//! always comma-separated by default. Cell values are never trimmed or typed.

mod csv;
mod error;
mod session;
mod table;

/// Re-export CSV options and helpers.
pub use crate::csv::{decode_text, parse_delimiter, sniff_delimiter, CsvOptions, RaggedRows};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export session types.
pub use session::{DroppedFile, Export, Session, EXPORT_FILE_NAME};
/// Re-export table types.
pub use table::{Row, RowId, Table};
