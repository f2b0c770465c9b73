//! JSON-file ledger.
//!
//! The whole sheet is rewritten (temp file + rename) after every mutation,
//! so registrations survive restarts and a crash never leaves a torn file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use rc_domain::error::Result;
use rc_domain::snapshot;

use crate::sheet::Sheet;
use crate::store::LedgerStore;

pub struct FileLedger {
    path: PathBuf,
    sheet: Mutex<Sheet>,
}

impl FileLedger {
    /// Load the sheet at `path`, or start an empty one.
    pub fn open(path: &Path) -> Result<Self> {
        let sheet: Sheet = snapshot::load(path)?;
        tracing::info!(
            rows = sheet.rows.len(),
            path = %path.display(),
            "file ledger loaded"
        );
        Ok(Self {
            path: path.to_path_buf(),
            sheet: Mutex::new(sheet),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reorder rows by `column` and persist.
    pub fn sort_by_column(&self, column: &str) -> Result<()> {
        self.mutate(|sheet| sheet.sort_by_column(column))
    }

    /// Apply `f` to the sheet and persist the result.  On a failed write the
    /// in-memory sheet is rolled back so memory never runs ahead of disk.
    fn mutate<T>(&self, f: impl FnOnce(&mut Sheet) -> Result<T>) -> Result<T> {
        let mut sheet = self.sheet.lock();
        let before = sheet.clone();
        let out = f(&mut sheet)?;
        if let Err(e) = snapshot::store(&self.path, &*sheet) {
            *sheet = before;
            return Err(e);
        }
        Ok(out)
    }
}

#[async_trait]
impl LedgerStore for FileLedger {
    async fn read_headers(&self) -> Result<Vec<String>> {
        Ok(self.sheet.lock().headers.clone())
    }

    async fn write_headers(&self, headers: &[String]) -> Result<()> {
        self.mutate(|sheet| {
            sheet.set_headers(headers);
            Ok(())
        })
    }

    async fn create_row(&self, values: Vec<String>) -> Result<String> {
        self.mutate(|sheet| sheet.append(values))
    }

    async fn find_row(&self, key: &str) -> Result<Option<usize>> {
        Ok(self.sheet.lock().find(key))
    }

    async fn update_cell(&self, row: usize, column: &str, value: &str) -> Result<()> {
        self.mutate(|sheet| sheet.update(row, column, value))
    }

    async fn read_row(&self, row: usize) -> Result<Option<Vec<String>>> {
        Ok(self.sheet.lock().row(row))
    }
}
