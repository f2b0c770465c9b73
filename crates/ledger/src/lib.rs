//! `rc-ledger`: tabular record persistence for Rollcall.
//!
//! Provides the [`LedgerStore`] trait that abstracts over the external
//! spreadsheet, two implementations ([`MemoryLedger`] and [`FileLedger`]),
//! and the [`LedgerAdapter`] that owns the registration protocol on top of
//! them:
//!
//! | Operation        | Behavior                                                    |
//! |------------------|-------------------------------------------------------------|
//! | `create`         | one row per registration, keyed by a fresh UUID             |
//! | `resolve`        | scan the key column; never trust a cached row number        |
//! | `write_cell`     | idempotent overwrite of one named cell                      |
//! | `sync_headers`   | rewrite the header row when missing or different            |

pub mod adapter;
pub mod file;
pub mod memory;
pub mod sheet;
pub mod store;

pub use adapter::{LedgerAdapter, RowHandle};
pub use file::FileLedger;
pub use memory::MemoryLedger;
pub use sheet::Sheet;
pub use store::LedgerStore;

use std::sync::Arc;

use rc_domain::config::{LedgerBackend, LedgerConfig};
use rc_domain::error::Result;

/// Create the [`LedgerStore`] selected by `ledger.backend`.
pub fn create_store(cfg: &LedgerConfig) -> Result<Arc<dyn LedgerStore>> {
    match cfg.backend {
        LedgerBackend::File => Ok(Arc::new(FileLedger::open(&cfg.sheet_path())?)),
        LedgerBackend::Memory => Ok(Arc::new(MemoryLedger::new())),
    }
}
