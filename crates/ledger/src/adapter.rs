//! Registration protocol over a [`LedgerStore`].
//!
//! * `create` is the only operation that appends rows.  The caller supplies
//!   the id and every attempt probes for it first, so a lost response never
//!   duplicates the row, even across separate calls.
//! * Every later write resolves the row by `registration_id` first; a
//!   missing row for a known id is a [`Error::Consistency`].

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use rc_domain::error::{Error, Result};
use rc_domain::record::{headers, Column, RecordDraft};
use rc_domain::retry::RetryPolicy;
use rc_domain::trace::TraceEvent;

use crate::store::LedgerStore;

/// A resolved row.  Only valid until the sheet is next reordered, so it is
/// never stored; re-resolve before each write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHandle {
    pub registration_id: Uuid,
    pub row: usize,
}

pub struct LedgerAdapter {
    store: Arc<dyn LedgerStore>,
    retry: RetryPolicy,
    sheet_title: String,
}

impl LedgerAdapter {
    pub fn new(store: Arc<dyn LedgerStore>, retry: RetryPolicy, sheet_title: &str) -> Self {
        Self {
            store,
            retry,
            sheet_title: sheet_title.to_owned(),
        }
    }

    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    // ── Headers ─────────────────────────────────────────────────────

    /// Write the header row if it is missing or differs.  Returns whether
    /// anything was rewritten.
    pub async fn sync_headers(&self) -> Result<bool> {
        let expected = headers();
        let current = self
            .retry
            .run("read_headers", |_| self.store.read_headers())
            .await?;
        let rewritten = current != expected;
        if rewritten {
            self.retry
                .run("write_headers", |_| self.store.write_headers(&expected))
                .await?;
        }
        TraceEvent::LedgerHeadersSynced {
            sheet: self.sheet_title.clone(),
            rewritten,
        }
        .emit();
        Ok(rewritten)
    }

    /// Initialize an empty sheet; refuse to write under a header row that
    /// someone changed by hand.
    pub async fn verify_headers(&self) -> Result<()> {
        let current = self
            .retry
            .run("read_headers", |_| self.store.read_headers())
            .await?;
        if current.is_empty() {
            self.sync_headers().await?;
            return Ok(());
        }
        let expected = headers();
        if current != expected {
            return Err(Error::Schema(format!(
                "sheet \"{}\" headers {current:?} do not match {expected:?}; resync headers",
                self.sheet_title
            )));
        }
        Ok(())
    }

    // ── Rows ────────────────────────────────────────────────────────

    /// Create the row keyed `registration_id`, or adopt it if an earlier
    /// call already appended it.
    ///
    /// Reuse one id for every call made on behalf of a registration.
    pub async fn create(&self, registration_id: Uuid, draft: &RecordDraft) -> Result<Uuid> {
        self.verify_headers().await?;

        let key = registration_id.to_string();
        let values = draft.to_row(registration_id);

        let (row, attempts) = self
            .retry
            .run("create_row", |attempt| {
                let key = key.clone();
                let values = values.clone();
                async move {
                    if let Some(row) = self.store.find_row(&key).await? {
                        tracing::info!(
                            registration_id = %key,
                            attempt,
                            "earlier create landed; not repeating"
                        );
                        return Ok((row, attempt));
                    }
                    self.store.create_row(values).await?;
                    let row = self.store.find_row(&key).await?.ok_or_else(|| {
                        Error::Ledger(format!("row {key} not visible after create"))
                    })?;
                    Ok((row, attempt))
                }
            })
            .await?;

        TraceEvent::RegistrationCreated {
            registration_id,
            actor_id: draft.actor_id,
            row,
            attempts,
        }
        .emit();

        Ok(registration_id)
    }

    /// Find the row currently holding `registration_id`.
    pub async fn resolve(&self, registration_id: Uuid) -> Result<Option<RowHandle>> {
        let key = registration_id.to_string();
        let row = self
            .retry
            .run("find_row", |_| self.store.find_row(&key))
            .await?;
        Ok(row.map(|row| RowHandle {
            registration_id,
            row,
        }))
    }

    /// Overwrite one cell of a resolved row.
    pub async fn write_cell(&self, handle: &RowHandle, column: Column, value: &str) -> Result<()> {
        self.retry
            .run("update_cell", |_| {
                self.store.update_cell(handle.row, column.header(), value)
            })
            .await?;

        TraceEvent::LedgerCellWritten {
            registration_id: handle.registration_id,
            column: column.header().to_owned(),
            row: handle.row,
        }
        .emit();
        Ok(())
    }

    /// Resolve then write.  An unresolvable id is a consistency failure.
    pub async fn write(&self, registration_id: Uuid, column: Column, value: &str) -> Result<()> {
        let handle = self
            .resolve(registration_id)
            .await?
            .ok_or(Error::Consistency { registration_id })?;
        self.write_cell(&handle, column, value).await
    }

    /// The registration's cells by column, if the row exists.
    pub async fn read_record(&self, registration_id: Uuid) -> Result<Option<BTreeMap<Column, String>>> {
        let Some(handle) = self.resolve(registration_id).await? else {
            return Ok(None);
        };
        let sheet_headers = self
            .retry
            .run("read_headers", |_| self.store.read_headers())
            .await?;
        let Some(cells) = self
            .retry
            .run("read_row", |_| self.store.read_row(handle.row))
            .await?
        else {
            return Ok(None);
        };

        let record = Column::ALL
            .iter()
            .filter_map(|column| {
                let idx = sheet_headers.iter().position(|h| h == column.header())?;
                Some((*column, cells.get(idx).cloned().unwrap_or_default()))
            })
            .collect();
        Ok(Some(record))
    }
}
