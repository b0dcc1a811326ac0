use sheetboard::table::{MAX_CELL_WIDTH, render_pairs, render_table};

#[test]
fn render_table_aligns_columns() {
    let rows = vec![
        vec!["1".to_string(), "Alice".to_string()],
        vec!["2".to_string(), "Bob".to_string()],
    ];

    let rendered = render_table(&["id", "name"], &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines,
        vec!["id   name", "---  -----", "1    Alice", "2    Bob"]
    );
}

#[test]
fn render_table_normalizes_control_characters() {
    let rows = vec![vec!["line1\nline2\tvalue".to_string()]];

    let rendered = render_table(&["note"], &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "line1 line2 value");
}

#[test]
fn render_table_counts_accented_characters_once() {
    let rows = vec![vec!["café".to_string(), "ok".to_string()]];

    let rendered = render_table(&["descripción", "estado"], &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "descripción  estado");
    assert_eq!(lines[2], "café         ok");
}

#[test]
fn long_cells_are_cut_with_an_ellipsis() {
    let long = "x".repeat(MAX_CELL_WIDTH + 20);
    let rendered = render_table(&["problema"], &[vec![long]]);
    let cell = rendered.lines().nth(2).unwrap();

    assert_eq!(cell.chars().count(), MAX_CELL_WIDTH);
    assert!(cell.ends_with('…'));
}

#[test]
fn pairs_align_labels_and_keep_long_values() {
    let url = format!("https://drive.google.com/uc?export=view&id={}", "a".repeat(60));
    let rendered = render_pairs(&[("fecha", "05-01-2025".to_string()), ("registro 1", url.clone())]);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "fecha       05-01-2025");
    assert_eq!(lines[1], format!("registro 1  {url}"));
}
