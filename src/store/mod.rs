//! Durable home of the combined table. Every write fully replaces the named table.

pub mod error;
pub mod memory_store;
pub mod parquet_store;

use crate::store::error::StoreError;
use crate::types::records::{
    check_combined_schema, combined_to_frame, frame_to_combined, CombinedRecord,
};
use polars::prelude::DataFrame;

pub const DEFAULT_TABLE: &str = "weather_tourism";

/// A named-table sink for snapshots.
///
/// Implementations must make `write_frame` atomic for readers: a concurrent `read_frame`
/// sees either the previous table or the new one, never a mix. Both calls block, so async
/// callers run them on the blocking pool.
pub trait SnapshotStore: Send + Sync {
    /// Replaces the table. `frame` must have the combined layout.
    fn write_frame(&self, table: &str, frame: &DataFrame) -> Result<(), StoreError>;

    /// The current table, or [`StoreError::NotFound`] if it was never written.
    fn read_frame(&self, table: &str) -> Result<DataFrame, StoreError>;

    fn write(&self, table: &str, records: &[CombinedRecord]) -> Result<(), StoreError> {
        let frame = combined_to_frame(records)?;
        self.write_frame(table, &frame)
    }

    fn read(&self, table: &str) -> Result<Vec<CombinedRecord>, StoreError> {
        let frame = self.read_frame(table)?;
        frame_to_combined(&frame).map_err(|source| StoreError::Schema {
            table: table.to_string(),
            source,
        })
    }
}

/// Table names end up in file names, so only a conservative character set is accepted.
pub fn validate_table_name(table: &str) -> Result<(), StoreError> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(table.to_string()))
    }
}

pub(crate) fn check_frame(table: &str, frame: &DataFrame) -> Result<(), StoreError> {
    validate_table_name(table)?;
    check_combined_schema(frame).map_err(|source| StoreError::Schema {
        table: table.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert!(validate_table_name("weather_tourism").is_ok());
        assert!(validate_table_name("dubai-2023").is_ok());
        for bad in ["", "../etc/passwd", "a b", "snap.parquet", "dübai"] {
            assert!(
                matches!(validate_table_name(bad), Err(StoreError::InvalidTableName(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
