//! Empty row/column removal and text sanitizing

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::CleanOptions;
use crate::model::{CellValue, Row, Table};

static NON_ALPHANUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s]").expect("valid sanitize regex"));

/// Run the cleaning passes selected in `options`
pub fn clean(table: &Table, options: &CleanOptions) -> Table {
    let table = if options.drop_empty {
        drop_empty(table)
    } else {
        table.clone()
    };

    if options.sanitize_text {
        sanitize_text(&table)
    } else {
        table
    }
}

/// Remove rows whose cells are all missing, then columns whose remaining
/// cells are all missing. Empty text is not missing.
///
/// A table with no rows left keeps no columns.
pub fn drop_empty(table: &Table) -> Table {
    let rows: Vec<&Row> = table.rows().iter().filter(|r| !r.is_all_missing()).collect();

    let keep: Vec<usize> = (0..table.column_count())
        .filter(|&col| rows.iter().any(|r| !r.cells[col].is_missing()))
        .collect();

    let names = keep
        .iter()
        .map(|&col| table.columns()[col].name.clone())
        .collect();
    let rows: Vec<Row> = rows
        .into_iter()
        .map(|r| {
            let cells = keep.iter().map(|&col| r.cells[col].clone()).collect();
            Row::new(cells, r.source_line)
        })
        .collect();

    debug!(
        rows_dropped = table.row_count() - rows.len(),
        columns_dropped = table.column_count() - keep.len(),
        "dropped empty rows and columns"
    );

    Table::from_parts_unchecked(names, rows)
}

/// Strip every character that is not an ASCII letter, ASCII digit or
/// whitespace from text cells. Numbers and missing cells are unchanged.
pub fn sanitize_text(table: &Table) -> Table {
    let mut changed = 0usize;
    let rows = table
        .rows()
        .iter()
        .map(|r| {
            let cells = r
                .cells
                .iter()
                .map(|cell| {
                    let cleaned = sanitize_cell(cell);
                    if &cleaned != cell {
                        changed += 1;
                    }
                    cleaned
                })
                .collect();
            Row::new(cells, r.source_line)
        })
        .collect();

    debug!(cells_changed = changed, "sanitized text cells");

    Table::from_parts_unchecked(
        table.columns().iter().map(|c| c.name.clone()).collect(),
        rows,
    )
}

fn sanitize_cell(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Text(s) => CellValue::Text(NON_ALPHANUMERIC_RE.replace_all(s, "").into_owned()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> CellValue {
        CellValue::Missing
    }

    fn messy() -> Table {
        Table::from_rows(
            vec!["id", "blank", "note"],
            vec![
                vec![CellValue::Int(1), missing(), "a!".into()],
                vec![missing(), missing(), missing()],
                vec![CellValue::Int(2), missing(), "".into()],
                vec![missing(), missing(), missing()],
            ],
        )
        .unwrap()
    }

    fn has_missing_row_or_column(table: &Table) -> bool {
        table.rows().iter().any(Row::is_all_missing)
            || (0..table.column_count())
                .any(|c| table.rows().iter().all(|r| r.cells[c].is_missing()))
    }

    #[test]
    fn test_drop_empty_removes_rows_and_columns() {
        let table = drop_empty(&messy());
        assert_eq!(table.column_names(), vec!["id", "note"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0].source_line, 2);
        assert_eq!(table.rows()[1].source_line, 4);
        assert!(!has_missing_row_or_column(&table));
    }

    #[test]
    fn test_drop_empty_keeps_empty_text() {
        let table = drop_empty(&messy());
        assert_eq!(table.cell(1, "note"), Some(&CellValue::from("")));
    }

    #[test]
    fn test_drop_empty_leaves_surviving_cells_untouched() {
        let original = messy();
        let cleaned = drop_empty(&original);
        assert_eq!(cleaned.cell(0, "id"), original.cell(0, "id"));
        assert_eq!(cleaned.cell(0, "note"), original.cell(0, "note"));
        assert_eq!(cleaned.cell(1, "id"), original.cell(2, "id"));
        // input is not modified
        assert_eq!(original.row_count(), 4);
        assert_eq!(original.column_count(), 3);
    }

    #[test]
    fn test_drop_empty_column_checked_after_rows() {
        // "b" only has a value in a row that survives, so it stays; "c" is
        // missing everywhere once the all-missing row is gone.
        let table = Table::from_rows(
            vec!["a", "b", "c"],
            vec![
                vec![missing(), missing(), missing()],
                vec![CellValue::Int(1), CellValue::Int(2), missing()],
            ],
        )
        .unwrap();
        let cleaned = drop_empty(&table);
        assert_eq!(cleaned.column_names(), vec!["a", "b"]);
        assert_eq!(cleaned.row_count(), 1);
    }

    #[test]
    fn test_drop_empty_header_only_table() {
        let table = Table::from_rows(vec!["a", "b"], vec![]).unwrap();
        let cleaned = drop_empty(&table);
        assert_eq!(cleaned.column_count(), 0);
        assert_eq!(cleaned.row_count(), 0);
    }

    #[test]
    fn test_drop_empty_is_idempotent() {
        let once = drop_empty(&messy());
        assert_eq!(drop_empty(&once), once);
    }

    #[test]
    fn test_sanitize_scenario() {
        let table = Table::from_rows(
            vec!["title"],
            vec![vec!["Order #123 - 50% off!".into()]],
        )
        .unwrap();
        let cleaned = sanitize_text(&table);
        assert_eq!(
            cleaned.cell(0, "title"),
            Some(&CellValue::from("Order 123  50 off"))
        );
    }

    #[test]
    fn test_sanitize_keeps_whitespace_and_non_text() {
        let table = Table::from_rows(
            vec!["a", "b", "c"],
            vec![vec!["tab\there\nnew-line".into(), CellValue::Float(-1.5), missing()]],
        )
        .unwrap();
        let cleaned = sanitize_text(&table);
        assert_eq!(cleaned.cell(0, "a"), Some(&CellValue::from("tab\there\nnewline")));
        assert_eq!(cleaned.cell(0, "b"), Some(&CellValue::Float(-1.5)));
        assert_eq!(cleaned.cell(0, "c"), Some(&CellValue::Missing));
    }

    #[test]
    fn test_sanitize_drops_non_ascii_letters() {
        let table = Table::from_rows(vec!["a"], vec![vec!["Café €5".into()]]).unwrap();
        assert_eq!(
            sanitize_text(&table).cell(0, "a"),
            Some(&CellValue::from("Caf 5"))
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let table = Table::from_rows(
            vec!["a", "b"],
            vec![
                vec!["x@y.com".into(), "(555) 123-4567".into()],
                vec!["!!!".into(), CellValue::Int(3)],
            ],
        )
        .unwrap();
        let once = sanitize_text(&table);
        assert_eq!(sanitize_text(&once), once);
    }

    #[test]
    fn test_clean_options() {
        let table = messy();
        let dropped = clean(&table, &CleanOptions::default());
        assert_eq!(dropped.cell(0, "note"), Some(&CellValue::from("a!")));

        let both = clean(&table, &CleanOptions::default().with_sanitize_text(true));
        assert_eq!(both.cell(0, "note"), Some(&CellValue::from("a")));
        assert_eq!(both.column_count(), 2);

        let neither = clean(&table, &CleanOptions::default().with_drop_empty(false));
        assert_eq!(neither, table);
    }

    #[test]
    fn test_sanitized_digits_reload_as_numbers() {
        use crate::config::LoadOptions;
        use crate::output::to_csv_bytes;
        use crate::parser::load;

        let table = Table::from_rows(vec!["sku"], vec![vec!["#123".into()]]).unwrap();
        let sanitized = sanitize_text(&table);
        assert_eq!(sanitized.cell(0, "sku"), Some(&CellValue::from("123")));

        // Text that looks numeric after sanitizing is inferred as a number on reload
        let reloaded = load(&to_csv_bytes(&sanitized).unwrap(), &LoadOptions::default()).unwrap();
        assert_eq!(reloaded.table.cell(0, "sku"), Some(&CellValue::Int(123)));
        assert_ne!(reloaded.table, sanitized);
    }
}
