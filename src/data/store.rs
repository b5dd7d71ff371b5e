use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::data::models::{SuburbKey, SuburbRecord, SuburbRow};
use crate::data::state::error::RefreshError;

/// Immutable, fully built index of suburb records.
///
/// Records keep the order in which they first appeared in the source.
#[derive(Debug, Default)]
pub struct SuburbTable {
    records: Vec<SuburbRecord>,
    index: HashMap<SuburbKey, usize>,
    loaded_at: Option<DateTime<Utc>>
}

impl SuburbTable {
    pub fn empty() -> Self {
        SuburbTable::default()
    }

    /// Parses a CSV source with a header row.
    ///
    /// Only a failure to read the header is an error. Unreadable rows and rows
    /// without a suburb name are skipped; a duplicate key replaces the earlier
    /// record in place.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RefreshError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        reader.headers()?;

        let mut table = SuburbTable::empty();
        for (line, row) in reader.deserialize::<SuburbRow>().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    warn!("Skipping unreadable suburb row {}: {}", line + 1, err);
                    continue;
                }
            };
            match row.into_record() {
                Some(record) => table.insert(record),
                None => warn!("Skipping suburb row {} without a suburb name", line + 1),
            }
        }
        table.loaded_at = Some(Utc::now());

        Ok(table)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RefreshError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => RefreshError::FileNotFound(path.to_path_buf()),
            _ => RefreshError::from(err),
        })?;
        SuburbTable::from_reader(file)
    }

    fn insert(&mut self, record: SuburbRecord) {
        let key = record.key();
        match self.index.get(&key) {
            Some(&position) => self.records[position] = record,
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn find(&self, suburb: &str, state: &str) -> Option<&SuburbRecord> {
        self.index
            .get(&SuburbKey::new(suburb, state))
            .map(|&position| &self.records[position])
    }

    pub fn records(&self) -> &[SuburbRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

impl From<Vec<SuburbRecord>> for SuburbTable {
    fn from(records: Vec<SuburbRecord>) -> Self {
        let mut table = SuburbTable::empty();
        for record in records {
            table.insert(record);
        }
        table.loaded_at = Some(Utc::now());
        table
    }
}

/// Owner of the current [`SuburbTable`].
///
/// Readers take an `Arc` snapshot; reloads build a new table off to the side
/// and swap the whole `Arc`, so nobody ever sees a half-built index.
#[derive(Debug)]
pub struct SuburbStore {
    source: PathBuf,
    table: RwLock<Arc<SuburbTable>>
}

impl SuburbStore {
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        SuburbStore {
            source: source.into(),
            table: RwLock::new(Arc::new(SuburbTable::empty()))
        }
    }

    pub fn with_table<P: Into<PathBuf>>(source: P, table: SuburbTable) -> Self {
        SuburbStore {
            source: source.into(),
            table: RwLock::new(Arc::new(table))
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Initial load. A missing or unreadable source leaves the store empty.
    pub fn load(&self) -> usize {
        match SuburbTable::from_path(&self.source) {
            Ok(table) => {
                let count = table.len();
                self.replace(table);
                info!("Loaded {} suburb records from {}", count, self.source.display());
                count
            },
            Err(err) => {
                warn!("{}; starting with an empty suburb store", err);
                self.replace(SuburbTable::empty());
                0
            }
        }
    }

    /// Rebuilds the table from the source. On failure the current table is kept.
    pub fn reload(&self) -> Result<usize, RefreshError> {
        let table = SuburbTable::from_path(&self.source)?;
        let count = table.len();
        self.replace(table);
        Ok(count)
    }

    pub fn replace(&self, table: SuburbTable) {
        let mut current = self.table
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(table);
    }

    pub fn snapshot(&self) -> Arc<SuburbTable> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn find(&self, suburb: &str, state: &str) -> Option<SuburbRecord> {
        self.snapshot().find(suburb, state).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }
}
