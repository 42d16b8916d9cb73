use chrono::NaiveDate;
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    Text(String),
    Date(NaiveDate),
    #[default]
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Date(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Empty, Into::into)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Empty => Ok(()),
        }
    }
}

/// One recall notice: column name to value, in the order the columns were found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record(IndexMap<String, Cell>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column`, keeping its original position if it was already present.
    pub fn insert<K: Into<String>, V: Into<Cell>>(&mut self, column: K, value: V) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Record {
    type Item = (String, Cell);
    type IntoIter = indexmap::map::IntoIter<String, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUrl {
    pub url: String,
    pub reason: String,
}

impl FailedUrl {
    pub fn new<U: Into<String>, R: ToString>(url: U, reason: R) -> Self {
        Self {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for FailedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.reason)
    }
}

/// Rectangular view of a record set, ready to be written as a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: vec![],
        }
    }

    /// Columns are the union of all record keys in first-seen order; absent keys become empty cells.
    pub fn from_records(records: &[Record]) -> Self {
        let mut columns: IndexMap<&str, ()> = IndexMap::new();
        for record in records {
            for column in record.columns() {
                columns.entry(column).or_default();
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .keys()
                    .map(|c| record.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            columns: columns.keys().map(ToString::to_string).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Concatenates `older` below `self`. Columns of `older` not present here are appended.
    pub fn append(mut self, older: Table) -> Table {
        let mapping: Vec<usize> = older
            .columns
            .iter()
            .map(|c| match self.column_index(c) {
                Some(idx) => idx,
                None => {
                    self.columns.push(c.clone());
                    self.columns.len() - 1
                }
            })
            .collect();

        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, Cell::Empty);
        }

        for old_row in older.rows {
            let mut row = vec![Cell::Empty; width];
            for (cell, &idx) in old_row.into_iter().zip(&mapping) {
                row[idx] = cell;
            }
            self.rows.push(row);
        }
        self
    }

    /// Removes rows of `self` whose `key_columns` all match a row of `existing`.
    /// Rows with an empty key cell are always kept. Returns how many rows were removed.
    pub fn remove_known(&mut self, existing: &Table, key_columns: &[&str]) -> usize {
        if key_columns.is_empty() {
            return 0;
        }

        let (Some(ours), Some(theirs)) = (
            self.key_indices(key_columns),
            existing.key_indices(key_columns),
        ) else {
            return 0;
        };

        let known: std::collections::HashSet<Vec<String>> = existing
            .rows
            .iter()
            .filter_map(|row| row_key(row, &theirs))
            .collect();

        let before = self.rows.len();
        self.rows
            .retain(|row| row_key(row, &ours).map_or(true, |key| !known.contains(&key)));
        before - self.rows.len()
    }

    fn key_indices(&self, key_columns: &[&str]) -> Option<Vec<usize>> {
        key_columns.iter().map(|c| self.column_index(c)).collect()
    }
}

fn row_key(row: &[Cell], indices: &[usize]) -> Option<Vec<String>> {
    indices
        .iter()
        .map(|&i| match row.get(i) {
            Some(cell) if !cell.is_empty() => Some(cell.to_string()),
            _ => None,
        })
        .collect()
}
