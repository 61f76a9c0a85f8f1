use crate::error::{Result, SheetError};
use crate::table::Table;
use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Delimiters considered when sniffing, in tie-break order
const SNIFF_CANDIDATES: &[u8] = &[b',', b'\t', b';', b'|'];

/// How to treat data records whose field count differs from the header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RaggedRows {
    /// Pad short records with empty cells and truncate long ones
    #[default]
    Pad,
    /// Fail the load with `SheetError::RaggedRow`
    Reject,
}

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter; `None` sniffs it on read and writes commas
    pub delimiter: Option<u8>,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Policy for records that do not match the header width
    pub ragged: RaggedRows,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: None,
            quote: b'"',
            ragged: RaggedRows::Pad,
        }
    }
}

impl CsvOptions {
    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set the ragged-row policy
    #[must_use]
    pub fn with_ragged(mut self, ragged: RaggedRows) -> Self {
        self.ragged = ragged;
        self
    }

    fn write_delimiter(&self) -> u8 {
        self.delimiter.unwrap_or(b',')
    }
}

/// Decode file bytes to text.
///
/// A UTF-8 BOM is dropped. Bytes that are not valid UTF-8 are read as
/// Windows-1252, which is what spreadsheet exports usually are.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            tracing::debug!("input is not UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded
        }
    }
}

/// Detect the most likely field delimiter from the first few lines.
///
/// Each candidate is scored by how many lines share the first line's field
/// count, weighted by that count. A candidate must split the first line into
/// more than one field to be considered.
#[must_use]
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(10)
        .collect();

    let mut best = b',';
    let mut best_score = 0usize;

    for &delim in SNIFF_CANDIDATES {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map_or(1, |r| r.len())
            })
            .collect();

        let Some(&target) = counts.first() else {
            break;
        };
        if target <= 1 {
            continue;
        }

        let score = counts.iter().filter(|&&c| c == target).count() * target;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Parse a delimiter given on the command line.
///
/// Accepts a single ASCII character or one of the names `tab`, `comma`,
/// `semicolon`, `pipe`.
pub fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s {
        "tab" | "\\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        "pipe" => Ok(b'|'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
            _ => Err(format!("invalid delimiter '{s}': expected one ASCII character")),
        },
    }
}

impl Table {
    /// Load a table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_with_options(path, &CsvOptions::default())
    }

    /// Load a table from a CSV file with custom options
    pub fn from_csv_with_options<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Self> {
        let mut bytes = Vec::new();
        File::open(path.as_ref())?.read_to_end(&mut bytes)?;
        Self::from_csv_bytes(&bytes, options)
    }

    /// Load a table from a CSV string
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_bytes(content.as_bytes(), &CsvOptions::default())
    }

    /// Load a table from raw file content.
    ///
    /// The first record becomes the header, every later record a row. Blank
    /// lines are skipped.
    pub fn from_csv_bytes(bytes: &[u8], options: &CsvOptions) -> Result<Self> {
        let text = decode_text(bytes);
        let delimiter = options
            .delimiter
            .unwrap_or_else(|| sniff_delimiter(&text));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(options.quote)
            .has_headers(false) // We handle headers ourselves
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = reader.records();
        let header: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Err(SheetError::EmptyInput),
        };
        let width = header.len();

        let mut rows = Vec::new();
        for (offset, result) in records.enumerate() {
            let record = result?;
            // 1-based, header is record 1
            let number = offset + 2;
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            if cells.len() != width {
                if options.ragged == RaggedRows::Reject {
                    return Err(SheetError::RaggedRow {
                        record: number,
                        expected: width,
                        actual: cells.len(),
                    });
                }
                if cells.len() > width {
                    tracing::warn!(
                        record = number,
                        fields = cells.len(),
                        expected = width,
                        "truncating record wider than header"
                    );
                }
                cells.resize(width, String::new());
            }
            rows.push(cells);
        }

        tracing::debug!(
            columns = width,
            rows = rows.len(),
            delimiter = %char::from(delimiter).escape_default(),
            "decoded csv"
        );

        Ok(Table::from_data(header, rows))
    }

    /// Write the header and all rows to a writer as CSV
    pub fn write_csv<W: Write>(&self, writer: W, options: &CsvOptions) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.write_delimiter())
            .quote(options.quote)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        for record in self.records() {
            csv_writer.write_record(record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Convert the table to a comma-separated CSV string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, &CsvOptions::default())?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
