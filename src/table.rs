use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// A parsed CSV file held in memory
///
/// Columns and rows are kept in file order. Every row carries exactly one
/// cell per column; [`Table::new`] refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Raised when a row does not line up with the header
#[derive(Debug, Error, PartialEq, Eq)]
#[error("row {row} has {found} cells but the table has {expected} columns")]
pub struct RaggedRow {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

impl Table {
    /// Build a table from a header and its rows
    ///
    /// # Arguments
    /// * `columns` - Column names in display order
    /// * `rows` - Data rows, each exactly `columns.len()` cells wide
    ///
    /// # Returns
    /// * `Result<Table, RaggedRow>` - The table, or the first row whose width is wrong
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, RaggedRow> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(RaggedRow {
                row: idx,
                expected: columns.len(),
                found: row.len(),
            });
        }

        Ok(Table { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Process-wide slot for the most recently uploaded table
///
/// Holds either nothing or a single [`Table`]. Every operation takes the lock
/// for its whole duration, so a reader never sees a half-written table.
/// Readers get an `Arc` snapshot and render without holding the lock.
#[derive(Debug, Default)]
pub struct TableStore {
    slot: RwLock<Option<Arc<Table>>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `table`, dropping whatever was stored before
    pub fn replace(&self, table: Table) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(table));
    }

    /// Current table, if any
    pub fn snapshot(&self) -> Option<Arc<Table>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the stored table
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> Table {
        Table::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3", "4"])],
        )
        .unwrap()
    }

    #[test]
    fn new_accepts_rows_matching_header() {
        let table = sample();
        assert_eq!(table.columns(), strings(&["a", "b"]).as_slice());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1], strings(&["3", "4"]));
    }

    #[test]
    fn new_rejects_ragged_row() {
        let err = Table::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn header_only_table_has_no_rows() {
        let table = Table::new(strings(&["only"]), Vec::new()).unwrap();
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn store_starts_empty() {
        let store = TableStore::new();
        assert!(store.is_empty());
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn store_replace_then_clear() {
        let store = TableStore::new();
        store.replace(sample());
        assert_eq!(store.snapshot().unwrap().row_count(), 2);

        let single = Table::new(strings(&["x"]), vec![strings(&["9"])]).unwrap();
        store.replace(single);
        assert_eq!(store.snapshot().unwrap().columns(), strings(&["x"]).as_slice());

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_survives_later_clear() {
        let store = TableStore::new();
        store.replace(sample());
        let held = store.snapshot().unwrap();
        store.clear();
        assert_eq!(held.row_count(), 2);
        assert!(store.snapshot().is_none());
    }
}
