use csvedit_sheet::{CsvOptions, DroppedFile, RaggedRows, Session, SheetError, Table};
use tempfile::tempdir;

fn load(session: &mut Session, name: &str, content: &str) {
    session
        .load(DroppedFile::new(name, content.as_bytes()))
        .unwrap();
}

fn cells(table: &Table) -> Vec<Vec<String>> {
    table.rows().map(|r| r.cells().to_vec()).collect()
}

// ===== Editing Scenario =====

#[test]
fn test_edit_add_delete_export() {
    let mut session = Session::new();
    load(&mut session, "people.csv", "name,age\nAlice,30\nBob,25\n");

    let table = session.table().unwrap();
    assert_eq!(table.header(), ["name", "age"]);
    assert_eq!(cells(table), vec![vec!["Alice", "30"], vec!["Bob", "25"]]);

    session.edit_cell(0, 1, "31").unwrap();
    assert_eq!(
        cells(session.table().unwrap()),
        vec![vec!["Alice", "31"], vec!["Bob", "25"]]
    );

    session.add_row().unwrap();
    assert_eq!(
        cells(session.table().unwrap()),
        vec![vec!["Alice", "31"], vec!["Bob", "25"], vec!["", ""]]
    );

    session.delete_row(1).unwrap();
    assert_eq!(
        cells(session.table().unwrap()),
        vec![vec!["Alice", "31"], vec!["", ""]]
    );

    assert_eq!(session.export().unwrap().content, "name,age\nAlice,31\n,\n");
}

#[test]
fn test_export_reflects_every_edit_in_order() {
    let mut session = Session::new();
    load(&mut session, "grid.csv", "a,b,c\n1,2,3\n4,5,6\n");

    session.edit_cell(1, 2, "six").unwrap();
    session.edit_cell(0, 0, "one").unwrap();
    session.add_row().unwrap();
    session.edit_cell(2, 1, "new").unwrap();
    session.edit_cell(0, 0, "uno").unwrap();

    assert_eq!(
        session.export().unwrap().content,
        "a,b,c\nuno,2,3\n4,5,six\n,new,\n"
    );
}

// ===== Round Trip =====

#[test]
fn test_decode_encode_round_trip() {
    let inputs = [
        "name,age\nAlice,30\nBob,25\n",
        "id,comment\n1,\"has, comma\"\n2,\"multi\nline\"\n3,\"quote \"\"q\"\"\"\n",
        "only\nvalue\n",
        "a,b\n",
        "x,y\n,\n1,\n",
        "a;b,c\n1;2,3\n",
    ];

    for input in inputs {
        let table = Table::from_csv_str(input).unwrap();
        assert_eq!(table.to_csv_string().unwrap(), input, "round trip of {input:?}");
    }
}

#[test]
fn test_crlf_input_normalized_on_export() {
    let table = Table::from_csv_str("a,b\r\n1,2\r\n").unwrap();
    assert_eq!(cells(&table), vec![vec!["1", "2"]]);
    assert_eq!(table.to_csv_string().unwrap(), "a,b\n1,2\n");
}

// ===== Row Operations =====

#[test]
fn test_add_row_width_for_any_size() {
    for rows in 0..4 {
        let mut table = Table::new(vec!["a", "b", "c", "d"]);
        for _ in 0..rows {
            table.add_row();
        }
        table.add_row();
        assert_eq!(table.row_count(), rows + 1);
        assert!(table.rows().all(|r| r.cells().len() == 4));
    }
}

#[test]
fn test_delete_each_position() {
    let original = Table::from_csv_str("n\n0\n1\n2\n3\n4\n").unwrap();

    for i in 0..original.row_count() {
        let mut table = original.clone();
        table.delete_row(i).unwrap();

        let expected: Vec<Vec<String>> = (0..5)
            .filter(|&n| n != i)
            .map(|n| vec![n.to_string()])
            .collect();
        assert_eq!(cells(&table), expected);
    }
}

#[test]
fn test_delete_then_edit_uses_current_position() {
    let mut table = Table::from_csv_str("n\na\nb\nc\n").unwrap();
    table.delete_row(0).unwrap();
    table.edit_cell(0, 0, "B").unwrap();
    assert_eq!(cells(&table), vec![vec!["B"], vec!["c"]]);
}

// ===== Loading =====

#[test]
fn test_second_load_replaces_everything() {
    let mut session = Session::new();
    load(&mut session, "first.csv", "a,b,c\n1,2,3\n4,5,6\n7,8,9\n");
    session.add_row().unwrap();

    load(&mut session, "second.csv", "x\nonly\n");

    let table = session.table().unwrap();
    assert_eq!(table.header(), ["x"]);
    assert_eq!(cells(table), vec![vec!["only"]]);
    assert_eq!(session.source_name(), Some("second.csv"));
    assert_eq!(session.export().unwrap().content, "x\nonly\n");
}

#[test]
fn test_strict_session_rejects_ragged_file() {
    let mut session =
        Session::with_options(CsvOptions::default().with_ragged(RaggedRows::Reject));
    load(&mut session, "ok.csv", "a,b\n1,2\n");

    let err = session
        .load(DroppedFile::new("bad.csv", "a,b\n1,2,3\n"))
        .unwrap_err();

    assert!(err.is_decode_error());
    assert!(matches!(err, SheetError::RaggedRow { record: 2, .. }));
    assert_eq!(session.source_name(), Some("ok.csv"));
}

#[test]
fn test_load_from_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("semicolons.csv");
    std::fs::write(&path, "city;pop\nOslo;700000\n").unwrap();

    let table = Table::from_csv(&path).unwrap();

    assert_eq!(table.header(), ["city", "pop"]);
    assert_eq!(table.get(0, 0).unwrap(), "Oslo");
}

#[test]
fn test_error_messages() {
    let mut table = Table::from_csv_str("a\n1\n").unwrap();
    let err = table.edit_cell(3, 0, "x").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Index out of bounds: row 3, col 0 (table has 1 rows, 1 cols)"
    );
    assert_eq!(
        SheetError::EmptyInput.to_string(),
        "File contains no CSV records"
    );
}
