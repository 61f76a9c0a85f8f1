//! HTML rendering of the editing page.
//!
//! The page is a projection of the session: nothing here keeps state. Cell
//! inputs and buttons carry the position and id of the row they were rendered
//! for, and the page script sends those back with every request.

use csvedit_sheet::{Session, Table, EXPORT_FILE_NAME};
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; }
.container { max-width: 1200px; margin: 0 auto; padding: 1rem; }
h1 { font-size: 1.5rem; margin-bottom: 1rem; }
#drop-zone { border: 2px dashed #ccc; padding: 1rem; margin-bottom: 1rem; text-align: center; cursor: pointer; }
#drop-zone .hint-active { display: none; }
#drop-zone.active .hint-active { display: block; }
#drop-zone.active .hint-idle { display: none; }
#error { background: #fde8e8; color: #9b1c1c; padding: 0.5rem 1rem; margin-bottom: 1rem; }
.source { color: #555; margin-bottom: 0.5rem; }
.table-wrap { overflow-x: auto; margin-bottom: 1rem; }
table { border-collapse: collapse; width: 100%; }
th, td { padding: 0.5rem 1rem; text-align: left; }
td .cell { width: 100%; box-sizing: border-box; font: inherit; }
.controls { display: flex; justify-content: space-between; margin-bottom: 1rem; }
button.delete { background: #e02424; color: #fff; border: 0; padding: 0.4rem 0.8rem; }
a.download { background: #22c55e; color: #fff; font-weight: bold; padding: 0.5rem 1rem; text-decoration: none; }
"#;

const SCRIPT: &str = r#"
const zone = document.getElementById('drop-zone');
const picker = document.getElementById('file-input');
const banner = document.getElementById('error');

// One request at a time, in event order
let queue = Promise.resolve();
function enqueue(task) {
  queue = queue.then(task).catch((e) => {
    banner.textContent = e.message;
    banner.hidden = false;
  });
}

async function send(url, init) {
  const res = await fetch(url, init);
  if (!res.ok) {
    const body = await res.json().catch(() => ({ error: res.statusText }));
    throw new Error(body.error);
  }
  return res;
}

function upload(files) {
  if (!files || files.length === 0) return;
  const form = new FormData();
  for (const file of files) form.append('file', file, file.name);
  enqueue(async () => {
    await send('/api/upload', { method: 'POST', body: form });
    location.reload();
  });
}

zone.addEventListener('click', () => picker.click());
picker.addEventListener('change', () => upload(picker.files));
zone.addEventListener('dragover', (e) => { e.preventDefault(); zone.classList.add('active'); });
zone.addEventListener('dragleave', () => zone.classList.remove('active'));
zone.addEventListener('drop', (e) => {
  e.preventDefault();
  zone.classList.remove('active');
  upload(e.dataTransfer.files);
});

for (const input of document.querySelectorAll('.cell')) {
  input.addEventListener('input', () => {
    const row = input.closest('tr').dataset;
    const body = JSON.stringify({
      row: Number(row.index),
      row_id: Number(row.id),
      col: Number(input.dataset.col),
      value: input.value,
    });
    enqueue(() => send('/api/cells', {
      method: 'PUT',
      headers: { 'Content-Type': 'application/json' },
      body,
    }));
  });
}

for (const button of document.querySelectorAll('button.delete')) {
  button.addEventListener('click', () => {
    const row = button.closest('tr').dataset;
    enqueue(async () => {
      await send(`/api/rows/${row.index}?id=${row.id}`, { method: 'DELETE' });
      location.reload();
    });
  });
}

const add = document.getElementById('add-row');
if (add) {
  add.addEventListener('click', () => enqueue(async () => {
    await send('/api/rows', { method: 'POST' });
    location.reload();
  }));
}
"#;

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the whole page for the current session
pub fn render_page(session: &Session) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>CSV Editor</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");
    html.push_str("<h1>CSV Editor</h1>\n");
    html.push_str(
        "<div id=\"drop-zone\">\n\
         <input id=\"file-input\" type=\"file\" accept=\".csv,text/csv\" multiple hidden>\n\
         <p class=\"hint-idle\">Drag 'n' drop a CSV file here, or click to select a file</p>\n\
         <p class=\"hint-active\">Drop the CSV file here ...</p>\n\
         </div>\n",
    );
    html.push_str("<div id=\"error\" role=\"alert\" hidden></div>\n");

    if let Some(table) = session.table() {
        if let Some(source) = session.source_name() {
            let _ = writeln!(html, "<p class=\"source\">{}</p>", escape(source));
        }
        render_table(&mut html, table);
        let _ = write!(
            html,
            "<div class=\"controls\">\n\
             <button id=\"add-row\" type=\"button\">Add New Row</button>\n\
             <a class=\"download\" href=\"/api/export\" download=\"{EXPORT_FILE_NAME}\">Download CSV</a>\n\
             </div>\n",
        );
    }

    html.push_str("</div>\n<script>");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

/// Render the editable grid: header, one input per cell, a delete button per row
pub fn render_table(html: &mut String, table: &Table) {
    html.push_str("<div class=\"table-wrap\">\n<table>\n<thead>\n<tr>");
    for label in table.header() {
        let _ = write!(html, "<th>{}</th>", escape(label));
    }
    html.push_str("<th>Actions</th></tr>\n</thead>\n<tbody>\n");

    for (index, row) in table.rows().enumerate() {
        let _ = write!(
            html,
            "<tr data-index=\"{index}\" data-id=\"{}\">",
            row.id().0
        );
        for (col, cell) in row.cells().iter().enumerate() {
            render_cell(html, col, cell);
        }
        html.push_str("<td><button class=\"delete\" type=\"button\">Delete</button></td></tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
}

/// Text inputs drop line breaks, so multi-line values get a textarea.
fn render_cell(html: &mut String, col: usize, cell: &str) {
    if cell.contains('\n') {
        // The parser eats one newline right after <textarea>
        let _ = write!(
            html,
            "<td><textarea class=\"cell\" data-col=\"{col}\" rows=\"{}\">\n{}</textarea></td>",
            cell.lines().count().max(2),
            escape(cell)
        );
    } else {
        let _ = write!(
            html,
            "<td><input class=\"cell\" type=\"text\" data-col=\"{col}\" value=\"{}\"></td>",
            escape(cell)
        );
    }
}
