use crate::store::error::StoreError;
use crate::store::{check_frame, validate_table_name, SnapshotStore};
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps tables in process memory. Whole frames are swapped under the write lock.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    tables: RwLock<HashMap<String, DataFrame>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn write_frame(&self, table: &str, frame: &DataFrame) -> Result<(), StoreError> {
        check_frame(table, frame)?;
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        tables.insert(table.to_string(), frame.clone());
        Ok(())
    }

    fn read_frame(&self, table: &str) -> Result<DataFrame, StoreError> {
        validate_table_name(table)?;
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        tables
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::records::CombinedRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_write_then_read() -> Result<(), Box<dyn std::error::Error>> {
        let store = MemorySnapshotStore::new();
        assert!(store.read("t").unwrap_err().is_not_found());

        let date = NaiveDate::from_ymd_opt(2023, 8, 14).unwrap();
        let records = vec![CombinedRecord {
            date,
            temp_max: 41.2,
            temp_min: 31.0,
            precipitation: 0.0,
            month: NaiveDate::from_ymd_opt(2023, 8, 1).unwrap(),
            tourists: Some(980_000),
        }];
        store.write("t", &records)?;
        assert_eq!(store.read("t")?, records);

        store.write("t", &[])?;
        assert!(store.read("t")?.is_empty());
        Ok(())
    }
}
