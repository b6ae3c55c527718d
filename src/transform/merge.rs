//! Left outer join of two tables on a shared key column

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::config::MergeOptions;
use crate::error::{Error, Result, Side};
use crate::model::{CellType, CellValue, KeyIndex, Row, Table};

/// Left outer join of `left` and `right` on the column `key`.
///
/// Every left row appears once per matching right row, or once with the
/// right-only columns missing when nothing matches. Unmatched right rows are
/// dropped. Non-key columns present in both tables get the suffixes from
/// `options`. Neither input is modified.
pub fn merge(left: &Table, right: &Table, key: &str, options: &MergeOptions) -> Result<Table> {
    let left_key = left.column_index(key).ok_or_else(|| Error::MissingMergeKey {
        key: key.to_string(),
        side: Side::Left,
    })?;
    let right_key = right.column_index(key).ok_or_else(|| Error::MissingMergeKey {
        key: key.to_string(),
        side: Side::Right,
    })?;

    check_key_types(
        left.columns()[left_key].inferred_type,
        right.columns()[right_key].inferred_type,
        key,
    )?;

    let names = joined_names(left, right, key, options)?;
    let right_columns: Vec<usize> = (0..right.column_count())
        .filter(|&c| c != right_key)
        .collect();

    let index = KeyIndex::build(right, right_key);
    let mut rows = Vec::with_capacity(left.row_count());
    let mut unmatched = 0usize;

    for left_row in left.rows() {
        let matches = index.lookup(&left_row.cells[left_key]);
        if matches.is_empty() {
            unmatched += 1;
            let mut cells = left_row.cells.clone();
            cells.resize(names.len(), CellValue::Missing);
            rows.push(Row::new(cells, left_row.source_line));
            continue;
        }

        for &pos in matches {
            let right_row = &right.rows()[pos];
            let mut cells = Vec::with_capacity(names.len());
            cells.extend(left_row.cells.iter().cloned());
            cells.extend(right_columns.iter().map(|&c| right_row.cells[c].clone()));
            rows.push(Row::new(cells, left_row.source_line));
        }
    }

    debug!(
        key,
        left_rows = left.row_count(),
        right_rows = right.row_count(),
        rows = rows.len(),
        unmatched,
        "merged tables"
    );

    Ok(Table::from_parts_unchecked(names, rows))
}

/// A numeric key column cannot be joined against a text key column.
fn check_key_types(left: CellType, right: CellType, key: &str) -> Result<()> {
    let text_like = |t: CellType| matches!(t, CellType::Text | CellType::Mixed);
    if (left.is_numeric() && text_like(right)) || (text_like(left) && right.is_numeric()) {
        return Err(Error::MergeComputation {
            reason: format!(
                "cannot merge on column '{}': left is {} and right is {}",
                key, left, right
            ),
        });
    }
    Ok(())
}

/// Left columns, then right columns without the key, suffixing overlaps
fn joined_names(
    left: &Table,
    right: &Table,
    key: &str,
    options: &MergeOptions,
) -> Result<Vec<String>> {
    let (left_suffix, right_suffix) = &options.suffixes;
    let overlaps = |name: &str| {
        name != key && left.column_index(name).is_some() && right.column_index(name).is_some()
    };

    let mut names: Vec<String> = left
        .columns()
        .iter()
        .map(|c| {
            if overlaps(&c.name) {
                format!("{}{}", c.name, left_suffix)
            } else {
                c.name.clone()
            }
        })
        .collect();

    names.extend(right.columns().iter().filter(|c| c.name != key).map(|c| {
        if overlaps(&c.name) {
            format!("{}{}", c.name, right_suffix)
        } else {
            c.name.clone()
        }
    }));

    let mut seen = FxHashSet::default();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(Error::MergeComputation {
                reason: format!("column '{}' appears more than once in the merged table", name),
            });
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> CellValue {
        CellValue::Int(i)
    }

    fn products() -> Table {
        Table::from_rows(
            vec!["id", "name"],
            vec![vec![int(1), "A".into()], vec![int(2), "B".into()]],
        )
        .unwrap()
    }

    fn cities() -> Table {
        Table::from_rows(
            vec!["id", "city"],
            vec![vec![int(1), "X".into()], vec![int(3), "Y".into()]],
        )
        .unwrap()
    }

    #[test]
    fn test_left_outer_join_scenario() {
        let merged = merge(&products(), &cities(), "id", &MergeOptions::default()).unwrap();
        let expected = Table::from_rows(
            vec!["id", "name", "city"],
            vec![
                vec![int(1), "A".into(), "X".into()],
                vec![int(2), "B".into(), CellValue::Missing],
            ],
        )
        .unwrap();
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_multi_match_expands_rows() {
        let right = Table::from_rows(
            vec!["id", "tag"],
            vec![
                vec![int(1), "red".into()],
                vec![int(2), "big".into()],
                vec![int(1), "blue".into()],
            ],
        )
        .unwrap();
        let merged = merge(&products(), &right, "id", &MergeOptions::default()).unwrap();
        assert_eq!(merged.row_count(), 3);
        assert_eq!(merged.cell(0, "tag"), Some(&CellValue::from("red")));
        assert_eq!(merged.cell(1, "tag"), Some(&CellValue::from("blue")));
        assert_eq!(merged.cell(2, "name"), Some(&CellValue::from("B")));
        assert_eq!(merged.cell(2, "tag"), Some(&CellValue::from("big")));
    }

    #[test]
    fn test_overlapping_columns_are_suffixed() {
        let right = Table::from_rows(
            vec!["name", "id"],
            vec![vec!["Alpha".into(), int(1)]],
        )
        .unwrap();
        let merged = merge(&products(), &right, "id", &MergeOptions::default()).unwrap();
        assert_eq!(merged.column_names(), vec!["id", "name_x", "name_y"]);
        assert_eq!(merged.cell(0, "name_y"), Some(&CellValue::from("Alpha")));
        assert_eq!(merged.cell(1, "name_y"), Some(&CellValue::Missing));

        let options = MergeOptions::default().with_suffixes("_main", "_other");
        let merged = merge(&products(), &right, "id", &options).unwrap();
        assert_eq!(merged.column_names(), vec!["id", "name_main", "name_other"]);
    }

    #[test]
    fn test_missing_key() {
        let err = merge(&products(), &cities(), "name", &MergeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingMergeKey { side: Side::Right, .. }
        ));

        let err = merge(&products(), &cities(), "city", &MergeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingMergeKey { side: Side::Left, .. }));
    }

    #[test]
    fn test_numeric_keys_match_across_int_and_float() {
        let right = Table::from_rows(
            vec!["id", "city"],
            vec![vec![CellValue::Float(2.0), "Z".into()]],
        )
        .unwrap();
        let merged = merge(&products(), &right, "id", &MergeOptions::default()).unwrap();
        assert_eq!(merged.cell(1, "city"), Some(&CellValue::from("Z")));
    }

    #[test]
    fn test_missing_keys_match_each_other() {
        let left = Table::from_rows(
            vec!["id", "name"],
            vec![vec![CellValue::Missing, "A".into()]],
        )
        .unwrap();
        let right = Table::from_rows(
            vec!["id", "city"],
            vec![vec![CellValue::Missing, "X".into()]],
        )
        .unwrap();
        let merged = merge(&left, &right, "id", &MergeOptions::default()).unwrap();
        assert_eq!(merged.cell(0, "city"), Some(&CellValue::from("X")));
    }

    #[test]
    fn test_numeric_against_text_key_fails() {
        let right = Table::from_rows(
            vec!["id", "city"],
            vec![vec!["one".into(), "X".into()]],
        )
        .unwrap();
        let err = merge(&products(), &right, "id", &MergeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MergeComputation { .. }));
    }

    #[test]
    fn test_suffix_collision_fails() {
        let left = Table::from_rows(vec!["id", "name", "name_x"], vec![]).unwrap();
        let right = Table::from_rows(vec!["id", "name"], vec![]).unwrap();
        let err = merge(&left, &right, "id", &MergeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MergeComputation { .. }));
    }

    #[test]
    fn test_inputs_unchanged() {
        let left = products();
        let right = cities();
        let _ = merge(&left, &right, "id", &MergeOptions::default()).unwrap();
        assert_eq!(left, products());
        assert_eq!(right, cities());
    }
}
