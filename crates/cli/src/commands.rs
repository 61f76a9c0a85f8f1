//! Editing commands shared by the REPL and `--execute` scripts.

use anyhow::{bail, Context, Result};
use csvedit_sheet::{DroppedFile, Session, Table};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A parsed editing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the first of the given files
    Open(Vec<PathBuf>),
    Show,
    Set {
        row: usize,
        col: usize,
        value: String,
    },
    Add,
    Delete(usize),
    /// Export to the given path, or the configured output
    Export(Option<PathBuf>),
    Help,
    Clear,
    Quit,
}

/// What the caller should do after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn parse_index(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token.with_context(|| format!("missing {what}"))?;
    token
        .parse()
        .with_context(|| format!("invalid {what} '{token}'"))
}

/// Split off the first whitespace-delimited word
fn next_word(input: &str) -> (Option<&str>, &str) {
    let input = input.trim_start();
    if input.is_empty() {
        return (None, input);
    }
    match input.find(char::is_whitespace) {
        Some(end) => (Some(&input[..end]), &input[end..]),
        None => (Some(input), ""),
    }
}

/// Parse one command line. The leading ':' is optional.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let line = line.strip_prefix(':').unwrap_or(line);
    let (name, rest) = next_word(line);
    let Some(name) = name else {
        bail!("empty command");
    };

    let command = match name {
        "open" | "o" => {
            let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if paths.is_empty() {
                bail!("usage: :open PATH");
            }
            Command::Open(paths)
        }
        "show" | "s" => Command::Show,
        "set" => {
            let (row, rest) = next_word(rest);
            let (col, rest) = next_word(rest);
            let row = parse_index(row, "row")?;
            let col = parse_index(col, "column")?;
            // One separating space; everything after it is the value
            let value = rest.strip_prefix(char::is_whitespace).unwrap_or(rest);
            Command::Set {
                row,
                col,
                value: value.to_string(),
            }
        }
        "add" | "a" => Command::Add,
        "delete" | "del" | "d" => {
            let (row, _) = next_word(rest);
            Command::Delete(parse_index(row, "row")?)
        }
        "export" | "x" => {
            let path = rest.trim();
            Command::Export((!path.is_empty()).then(|| PathBuf::from(path)))
        }
        "help" | "h" | "?" => Command::Help,
        "clear" => Command::Clear,
        "quit" | "q" | "exit" => Command::Quit,
        _ => bail!("Unknown command: {name}"),
    };
    Ok(command)
}

/// Split a `--execute` script into command lines.
///
/// Commands end at `;` or a newline; `\;` is a literal semicolon.
pub fn split_script(script: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&';') => {
                current.push(';');
                chars.next();
            }
            ';' | '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    lines.push(current);

    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Read files from disk and load the first one into the session
pub fn open_files(session: &mut Session, paths: &[PathBuf]) -> Result<()> {
    let first = paths.first().context("no file given")?;
    if paths.len() > 1 {
        tracing::debug!(ignored = paths.len() - 1, "only the first file is opened");
    }
    let bytes =
        std::fs::read(first).with_context(|| format!("Failed to read file: {}", first.display()))?;
    let name = first
        .file_name()
        .map_or_else(|| first.display().to_string(), |n| n.to_string_lossy().into_owned());
    session.load(DroppedFile::new(name, bytes))?;
    Ok(())
}

/// Run one command against the session, writing any output to `out`
pub fn execute<W: Write>(
    session: &mut Session,
    command: Command,
    output: &Path,
    out: &mut W,
) -> Result<Flow> {
    match command {
        Command::Open(paths) => {
            open_files(session, &paths)?;
            if let Some(table) = session.table() {
                writeln!(
                    out,
                    "Loaded {} ({} columns, {} rows)",
                    session.source_name().unwrap_or_default(),
                    table.col_count(),
                    table.row_count()
                )?;
            }
        }
        Command::Show => match session.table() {
            Some(table) => write!(out, "{}", render_table(table))?,
            None => writeln!(out, "No file loaded")?,
        },
        Command::Set { row, col, value } => {
            session.edit_cell(row, col, value)?;
        }
        Command::Add => {
            let (index, _) = session.add_row()?;
            writeln!(out, "Added row {index}")?;
        }
        Command::Delete(row) => {
            session.delete_row(row)?;
            writeln!(out, "Deleted row {row}")?;
        }
        Command::Export(path) => {
            let export = session.export()?;
            let path = path.as_deref().unwrap_or(output);
            std::fs::write(path, &export.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = export.content.len(), "exported");
            writeln!(out, "Wrote {}", path.display())?;
        }
        Command::Help => write!(out, "{HELP}")?,
        Command::Clear => write!(out, "\x1B[2J\x1B[1;1H")?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Run every command of a script, stopping at the first failure
pub fn run_script<W: Write>(
    session: &mut Session,
    script: &str,
    output: &Path,
    out: &mut W,
) -> Result<()> {
    for line in split_script(script) {
        let command = parse_command(&line)?;
        if execute(session, command, output, out)
            .with_context(|| format!("'{line}' failed"))?
            == Flow::Quit
        {
            break;
        }
    }
    Ok(())
}

pub const HELP: &str = "\
Commands (the leading ':' is optional):
  :open PATH            Load a CSV file (only the first path is used)
  :show                 Print the table
  :set ROW COL VALUE    Replace one cell (0-based positions)
  :add                  Append an empty row
  :delete ROW           Remove a row; later rows move up
  :export [PATH]        Write the table as CSV
  :clear                Clear screen
  :help                 Show this help
  :quit                 Exit

With --execute, commands are separated by ';' or newlines. Write '\\;' for a
literal semicolon in a value.
";

fn display_cell(cell: &str) -> String {
    cell.replace('\n', "\\n").replace('\r', "\\r")
}

/// Format the table with a leading position column and aligned cells
pub fn render_table(table: &Table) -> String {
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(table.row_count() + 1);
    let mut head = vec!["#".to_string()];
    head.extend(table.header().iter().map(|h| display_cell(h)));
    lines.push(head);
    for (index, row) in table.rows().enumerate() {
        let mut line = vec![index.to_string()];
        line.extend(row.cells().iter().map(|c| display_cell(c)));
        lines.push(line);
    }

    let columns = table.col_count() + 1;
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            lines
                .iter()
                .filter_map(|line| line.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut rendered = String::new();
    for (i, line) in lines.iter().enumerate() {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        rendered.push_str(cells.join(" | ").trim_end());
        rendered.push('\n');
        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            rendered.push_str(&rule.join("-+-"));
            rendered.push('\n');
        }
    }
    if table.is_empty() {
        rendered.push_str("(no rows)\n");
    }
    rendered
}
