//! In-process ledger used by tests and the `memory` backend.
//!
//! Supports fault injection so callers can exercise the retry and
//! lost-response paths of the adapter without a real network.

use async_trait::async_trait;
use parking_lot::Mutex;

use rc_domain::error::{Error, Result};

use crate::sheet::Sheet;
use crate::store::LedgerStore;

#[derive(Debug, Default)]
struct Faults {
    /// Creates that fail before the row lands.
    create_rejected: u32,
    /// Creates that land but report a failure (lost response).
    create_lost: u32,
    update: u32,
    find: u32,
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
    sheet: Mutex<Sheet>,
    faults: Mutex<Faults>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the whole sheet.
    pub fn snapshot(&self) -> Sheet {
        self.sheet.lock().clone()
    }

    pub fn row_count(&self) -> usize {
        self.sheet.lock().rows.len()
    }

    /// Reorder rows by the values under `column`.
    pub fn sort_by_column(&self, column: &str) -> Result<()> {
        self.sheet.lock().sort_by_column(column)
    }

    /// Delete the row keyed `key`, as an operator editing the sheet might.
    pub fn remove_row(&self, key: &str) -> bool {
        let mut sheet = self.sheet.lock();
        let before = sheet.rows.len();
        sheet
            .rows
            .retain(|row| row.first().map(String::as_str) != Some(key));
        sheet.rows.len() != before
    }

    /// Fail the next `n` creates.  With `landed` the row is still appended,
    /// simulating a response lost after the write succeeded.
    pub fn fail_creates(&self, n: u32, landed: bool) {
        let mut faults = self.faults.lock();
        if landed {
            faults.create_lost = n;
        } else {
            faults.create_rejected = n;
        }
    }

    pub fn fail_updates(&self, n: u32) {
        self.faults.lock().update = n;
    }

    pub fn fail_finds(&self, n: u32) {
        self.faults.lock().find = n;
    }
}

fn take(counter: &mut u32) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn read_headers(&self) -> Result<Vec<String>> {
        Ok(self.sheet.lock().headers.clone())
    }

    async fn write_headers(&self, headers: &[String]) -> Result<()> {
        self.sheet.lock().set_headers(headers);
        Ok(())
    }

    async fn create_row(&self, values: Vec<String>) -> Result<String> {
        let (rejected, lost) = {
            let mut faults = self.faults.lock();
            (
                take(&mut faults.create_rejected),
                take(&mut faults.create_lost),
            )
        };
        if rejected {
            return Err(Error::Ledger("create_row: 503 service unavailable".into()));
        }
        let key = self.sheet.lock().append(values)?;
        if lost {
            return Err(Error::Ledger("create_row: connection reset".into()));
        }
        Ok(key)
    }

    async fn find_row(&self, key: &str) -> Result<Option<usize>> {
        if take(&mut self.faults.lock().find) {
            return Err(Error::Ledger("find_row: 503 service unavailable".into()));
        }
        Ok(self.sheet.lock().find(key))
    }

    async fn update_cell(&self, row: usize, column: &str, value: &str) -> Result<()> {
        if take(&mut self.faults.lock().update) {
            return Err(Error::Ledger("update_cell: 503 service unavailable".into()));
        }
        self.sheet.lock().update(row, column, value)
    }

    async fn read_row(&self, row: usize) -> Result<Option<Vec<String>>> {
        Ok(self.sheet.lock().row(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lost_create_still_lands() {
        let ledger = MemoryLedger::new();
        ledger.write_headers(&["K".into()]).await.unwrap();
        ledger.fail_creates(1, true);
        assert!(ledger.create_row(vec!["k1".into()]).await.is_err());
        assert_eq!(ledger.find_row("k1").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn rejected_create_does_not_land() {
        let ledger = MemoryLedger::new();
        ledger.write_headers(&["K".into()]).await.unwrap();
        ledger.fail_creates(1, false);
        assert!(ledger.create_row(vec!["k1".into()]).await.is_err());
        assert_eq!(ledger.row_count(), 0);
        ledger.create_row(vec!["k1".into()]).await.unwrap();
        assert_eq!(ledger.row_count(), 1);
    }
}
