use crate::store::error::StoreError;
use crate::store::{check_frame, validate_table_name, SnapshotStore};
use crate::utils::{ensure_dir_exists, get_cache_dir};
use log::{debug, info};
use polars::prelude::*;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores each table as `<dir>/<table>.parquet`.
///
/// A write goes to a temporary file in `dir` that is renamed over the target once
/// complete, so readers only ever open a finished file.
#[derive(Debug, Clone)]
pub struct ParquetSnapshotStore {
    dir: PathBuf,
}

impl ParquetSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ParquetSnapshotStore { dir: dir.into() }
    }

    /// A store in the default cache location, `<system cache dir>/weather_tourism`.
    pub fn in_cache_dir() -> Result<Self, StoreError> {
        get_cache_dir()
            .map(Self::new)
            .map_err(StoreError::DirResolution)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, table: &str) -> Result<PathBuf, StoreError> {
        validate_table_name(table)?;
        Ok(self.dir.join(format!("{table}.parquet")))
    }
}

impl SnapshotStore for ParquetSnapshotStore {
    fn write_frame(&self, table: &str, frame: &DataFrame) -> Result<(), StoreError> {
        check_frame(table, frame)?;
        let path = self.table_path(table)?;
        ensure_dir_exists(&self.dir).map_err(|e| StoreError::DirCreation(self.dir.clone(), e))?;

        let mut temp_file =
            NamedTempFile::new_in(&self.dir).map_err(|e| StoreError::WriteIo(path.clone(), e))?;
        let mut df = frame.clone();
        ParquetWriter::new(temp_file.as_file_mut())
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)
            .map_err(|e| StoreError::WritePolars(path.clone(), e))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| StoreError::WriteIo(path.clone(), e))?;
        temp_file
            .persist(&path)
            .map_err(|e| StoreError::WriteIo(path.clone(), e.error))?;

        info!("Wrote {} rows to snapshot {}", df.height(), path.display());
        Ok(())
    }

    fn read_frame(&self, table: &str) -> Result<DataFrame, StoreError> {
        let path = self.table_path(table)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(table.to_string()))
            }
            Err(e) => return Err(StoreError::ReadIo(path, e)),
        };
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| StoreError::ReadPolars(path.clone(), e))?;
        debug!("Read {} rows from snapshot {}", df.height(), path.display());
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::records::{combined_to_frame, CombinedRecord};
    use chrono::{Datelike, NaiveDate};
    use std::sync::Arc;

    fn records(start: NaiveDate, days: usize) -> Vec<CombinedRecord> {
        start
            .iter_days()
            .take(days)
            .enumerate()
            .map(|(i, date)| CombinedRecord {
                date,
                temp_max: 30.0 + i as f64 / 10.0,
                temp_min: 20.0 - i as f64 / 10.0,
                precipitation: (i % 3) as f64,
                month: NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap(),
                tourists: (date.month() % 2 == 0).then_some(1_000_000 + i as u64),
            })
            .collect()
    }

    #[test]
    fn test_snapshot_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = ParquetSnapshotStore::new(dir.path());
        let written = records(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 365);

        store.write("dubai", &written)?;
        let read = store.read("dubai")?;
        assert_eq!(read.len(), written.len());
        assert_eq!(read, written);
        assert_eq!(read[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(read[364].date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        Ok(())
    }

    #[test]
    fn test_write_replaces_previous_table() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = ParquetSnapshotStore::new(dir.path());
        store.write("t", &records(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), 40))?;
        let second = records(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), 3);
        store.write("t", &second)?;
        assert_eq!(store.read("t")?, second);

        // Only the table file remains, no temporary leftovers.
        let entries: Vec<_> = std::fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name(), "t.parquet");
        Ok(())
    }

    #[test]
    fn test_missing_table_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = ParquetSnapshotStore::new(dir.path().join("not-created-yet"));
        match store.read("nothing") {
            Err(StoreError::NotFound(table)) => assert_eq!(table, "nothing"),
            other => panic!("expected not found, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_not_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("broken.parquet"), b"not parquet at all")?;
        let store = ParquetSnapshotStore::new(dir.path());
        let err = store.read("broken").unwrap_err();
        assert!(matches!(err, StoreError::ReadPolars(..)), "{err:?}");
        assert!(!err.is_not_found());
        Ok(())
    }

    #[test]
    fn test_rejects_bad_input() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = ParquetSnapshotStore::new(dir.path());
        assert!(matches!(
            store.write("../escape", &[]),
            Err(StoreError::InvalidTableName(_))
        ));

        let frame = combined_to_frame(&records(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 2))?
            .drop("tourists")?;
        assert!(matches!(
            store.write_frame("t", &frame),
            Err(StoreError::Schema { .. })
        ));
        assert!(store.read("t").unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn test_readers_never_see_partial_tables() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = Arc::new(ParquetSnapshotStore::new(dir.path()));
        let small = records(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 31);
        let large = records(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 1461);
        store.write("live", &small)?;

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || -> Result<(), StoreError> {
                for i in 0..20 {
                    let next = if i % 2 == 0 { &large } else { &small };
                    store.write("live", next)?;
                }
                Ok(())
            })
        };
        for _ in 0..50 {
            let height = store.read_frame("live")?.height();
            assert!(height == 31 || height == 1461, "saw {height} rows");
        }
        writer.join().expect("writer thread panicked")?;
        Ok(())
    }
}
