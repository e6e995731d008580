use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::column_name;
use crate::error::{Result, TableditError};

/// One user-created table.
///
/// Serialized as `{ title, columns, numericColumn, rows }`, the same shape
/// used for the persisted blob and for export files. Deserialization never
/// fails for a JSON object: odd field types are coerced to text and missing
/// fields default, so run `normalize` afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, deserialize_with = "de_text")]
    pub title: String,
    /// Column names in display order. Never empty once normalized.
    #[serde(default, deserialize_with = "de_columns")]
    pub columns: Vec<String>,
    /// Index of the summed column, if any.
    #[serde(default, deserialize_with = "de_numeric_column")]
    pub numeric_column: Option<usize>,
    /// Rows in display order; each row has exactly `columns.len()` cells.
    #[serde(default, deserialize_with = "de_rows")]
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given title and columns.
    #[must_use]
    pub fn new(title: impl Into<String>, columns: Vec<String>) -> Self {
        let mut table = Self {
            title: title.into(),
            columns,
            numeric_column: None,
            rows: Vec::new(),
        };
        table.normalize();
        table
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell text at `(row, col)`.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Append a row of empty cells.
    pub fn push_empty_row(&mut self) {
        self.rows.push(vec![String::new(); self.columns.len()]);
    }

    /// Append a column named `Column <n>` and extend every row with an empty cell.
    ///
    /// Returns the index of the new column.
    pub fn push_default_column(&mut self) -> usize {
        let name = column_name(self.columns.len() + 1);
        self.push_column(name)
    }

    /// Append a named column and extend every row with an empty cell.
    pub fn push_column(&mut self, name: String) -> usize {
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.columns.len() - 1
    }

    /// Remove a column and its cell from every row.
    ///
    /// The numeric column is cleared if it was the removed one and shifted
    /// left if it sat after it.
    pub fn remove_column(&mut self, col: usize) -> Result<String> {
        if col >= self.columns.len() {
            return Err(TableditError::column_out_of_range(col));
        }
        if self.columns.len() == 1 {
            return Err(TableditError::LastColumn);
        }
        let name = self.columns.remove(col);
        for row in &mut self.rows {
            if col < row.len() {
                row.remove(col);
            }
        }
        self.numeric_column = match self.numeric_column {
            Some(n) if n == col => None,
            Some(n) if n > col => Some(n - 1),
            other => other,
        };
        Ok(name)
    }

    /// Remove a row, returning its cells.
    pub fn remove_row(&mut self, row: usize) -> Result<Vec<String>> {
        if row >= self.rows.len() {
            return Err(TableditError::row_out_of_range(row));
        }
        Ok(self.rows.remove(row))
    }

    /// Select the summed column. `None` clears the selection.
    pub fn set_numeric_column(&mut self, col: Option<usize>) -> Result<()> {
        if let Some(c) = col {
            if c >= self.columns.len() {
                return Err(TableditError::column_out_of_range(c));
            }
        }
        self.numeric_column = col;
        Ok(())
    }

    /// Repair a table that came from outside the process.
    ///
    /// Gives a column-less table one default column, pads short rows with
    /// empty cells, truncates long rows, and clears a dangling numeric column.
    /// Returns `true` if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self.columns.is_empty() {
            self.columns.push(column_name(1));
            changed = true;
        }
        let width = self.columns.len();
        for row in &mut self.rows {
            if row.len() != width {
                row.resize(width, String::new());
                changed = true;
            }
        }
        if self.numeric_column.is_some_and(|c| c >= width) {
            self.numeric_column = None;
            changed = true;
        }
        changed
    }
}

/// Text form of a JSON value: strings as-is, `null` as empty, anything else
/// as its JSON text.
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn de_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_text)
}

/// Column names from an array of any values. Anything else yields no columns,
/// which `normalize` later replaces with a default one.
fn de_columns<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(value_text).collect(),
        _ => Vec::new(),
    })
}

/// A numeric column stored as a number, a numeric string, or anything else
/// (which means none).
fn de_numeric_column<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => match n.as_u64() {
            Some(index) => usize::try_from(index).ok(),
            None => n.as_f64().and_then(float_to_index),
        },
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    })
}

fn float_to_index(f: f64) -> Option<usize> {
    if f.is_finite() && f >= 0.0 && f.fract().abs() < f64::EPSILON && f <= f64::from(u32::MAX) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = f as usize;
        Some(index)
    } else {
        None
    }
}

/// Rows as they may appear in hand-edited or foreign JSON. A row that is not
/// an array becomes a single cell, a `null` row an empty one.
fn de_rows<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(rows) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(rows
        .into_iter()
        .map(|row| match row {
            Value::Array(cells) => cells.into_iter().map(value_text).collect(),
            Value::Null => Vec::new(),
            other => vec![value_text(other)],
        })
        .collect())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new("T", vec!["A".into(), "B".into(), "C".into()]);
        t.rows = vec![
            vec!["1".into(), "2".into(), "3".into()],
            vec!["4".into(), "5".into(), "6".into()],
        ];
        t
    }

    #[test]
    fn test_push_default_column_extends_rows() {
        let mut t = sample();
        let idx = t.push_default_column();
        assert_eq!(idx, 3);
        assert_eq!(t.columns[3], "Column 4");
        assert!(t.rows.iter().all(|r| r.len() == 4 && r[3].is_empty()));
    }

    #[test]
    fn test_remove_column_shifts_numeric() {
        let mut t = sample();
        t.numeric_column = Some(2);
        assert_eq!(t.remove_column(0).unwrap(), "A");
        assert_eq!(t.numeric_column, Some(1));
        assert_eq!(t.rows[0], vec!["2", "3"]);
    }

    #[test]
    fn test_remove_numeric_column_clears_it() {
        let mut t = sample();
        t.numeric_column = Some(1);
        t.remove_column(1).unwrap();
        assert_eq!(t.numeric_column, None);
        assert!(t.rows.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_remove_last_column_rejected() {
        let mut t = Table::new("T", vec!["Only".into()]);
        assert!(matches!(t.remove_column(0), Err(TableditError::LastColumn)));
        assert!(matches!(
            t.remove_column(5),
            Err(TableditError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn test_normalize_pads_truncates_and_clears() {
        let mut t = sample();
        t.rows = vec![vec!["x".into()], vec!["a".into(); 5]];
        t.numeric_column = Some(7);
        assert!(t.normalize());
        assert_eq!(t.rows[0], vec!["x", "", ""]);
        assert_eq!(t.rows[1].len(), 3);
        assert_eq!(t.numeric_column, None);
        assert!(!t.normalize());
    }

    #[test]
    fn test_lenient_deserialize() {
        let t: Table = serde_json::from_str(
            r#"{"title":"X","columns":["A","B"],"numericColumn":"1","rows":[[1,null],[true,"s"]]}"#,
        )
        .unwrap();
        assert_eq!(t.numeric_column, Some(1));
        assert_eq!(t.rows[0], vec!["1", ""]);
        assert_eq!(t.rows[1], vec!["true", "s"]);
    }

    #[test]
    fn test_foreign_types_become_text() {
        let mut t: Table = serde_json::from_str(
            r#"{"title":42,"columns":["A",{"k":1},null],"numericColumn":true,"rows":[[{"v":1},[2]],"solo",null]}"#,
        )
        .unwrap();
        assert_eq!(t.title, "42");
        assert_eq!(t.columns, vec!["A", r#"{"k":1}"#, ""]);
        assert_eq!(t.numeric_column, None);
        assert_eq!(t.rows[0], vec![r#"{"v":1}"#, "[2]"]);
        assert_eq!(t.rows[1], vec!["solo"]);
        assert!(t.rows[2].is_empty());

        t.normalize();
        assert!(t.rows.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_bare_object_gets_default_column() {
        let mut t: Table = serde_json::from_str(r#"{"columns":"nope","rows":7}"#).unwrap();
        assert_eq!(t.title, "");
        assert!(t.columns.is_empty());
        assert!(t.rows.is_empty());
        assert!(t.normalize());
        assert_eq!(t.columns, vec!["Column 1"]);
    }

    #[test]
    fn test_numeric_column_as_float() {
        let t: Table =
            serde_json::from_str(r#"{"title":"X","columns":["A","B"],"numericColumn":1.0}"#)
                .unwrap();
        assert_eq!(t.numeric_column, Some(1));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let t: Table = serde_json::from_str(r#"{"title":"X","columns":["A"]}"#).unwrap();
        assert_eq!(t.numeric_column, None);
        assert!(t.rows.is_empty());
    }

    #[test]
    fn test_serialized_field_names() {
        let t = Table::new("X", vec!["A".into()]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(
            json,
            r#"{"title":"X","columns":["A"],"numericColumn":null,"rows":[]}"#
        );
    }
}
