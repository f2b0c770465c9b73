use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Ledger
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// JSON sheet file under `state_path`.
    #[default]
    File,
    /// In-process sheet, lost on restart.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub backend: LedgerBackend,
    #[serde(default = "d_sheet_title")]
    pub sheet_title: String,
    /// Directory for the file ledger and the session/completion snapshots.
    #[serde(default = "d_state_path")]
    pub state_path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            sheet_title: d_sheet_title(),
            state_path: d_state_path(),
        }
    }
}

impl LedgerConfig {
    /// Path of the file-backed sheet.
    pub fn sheet_path(&self) -> PathBuf {
        self.state_path.join(format!("{}.json", self.sheet_title))
    }
}

fn d_sheet_title() -> String {
    "Registros".into()
}
fn d_state_path() -> PathBuf {
    PathBuf::from("./data/state")
}
