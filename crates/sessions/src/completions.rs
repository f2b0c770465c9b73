//! Daily completion set: `actor_id → date of last completed registration`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use parking_lot::RwLock;

use rc_domain::error::Result;
use rc_domain::event::ActorId;
use rc_domain::snapshot;

#[derive(Default)]
pub struct DailyCompletionSet {
    completed: RwLock<HashMap<ActorId, NaiveDate>>,
    snapshot_path: Option<PathBuf>,
}

impl DailyCompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load or create the set at `state_path/completions.json`.
    pub fn open(state_path: &Path) -> Result<Self> {
        let snapshot_path = state_path.join("completions.json");
        let completed: HashMap<ActorId, NaiveDate> = snapshot::load(&snapshot_path)?;
        Ok(Self {
            completed: RwLock::new(completed),
            snapshot_path: Some(snapshot_path),
        })
    }

    pub fn mark(&self, actor_id: ActorId, date: NaiveDate) {
        self.completed.write().insert(actor_id, date);
    }

    /// Whether the actor already completed a registration on `date`.
    pub fn completed_on(&self, actor_id: ActorId, date: NaiveDate) -> bool {
        self.completed.read().get(&actor_id) == Some(&date)
    }

    pub fn clear(&self) -> usize {
        let mut completed = self.completed.write();
        let n = completed.len();
        completed.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.completed.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flush(&self) -> Result<()> {
        match &self.snapshot_path {
            Some(path) => snapshot::store(path, &*self.completed.read()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn completion_only_blocks_same_date() {
        let set = DailyCompletionSet::new();
        set.mark(5, day(4));
        assert!(set.completed_on(5, day(4)));
        assert!(!set.completed_on(5, day(5)));
        assert!(!set.completed_on(6, day(4)));
    }

    #[test]
    fn clear_empties_set() {
        let set = DailyCompletionSet::new();
        set.mark(5, day(4));
        assert_eq!(set.clear(), 1);
        assert!(!set.completed_on(5, day(4)));
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let set = DailyCompletionSet::open(dir.path()).unwrap();
        set.mark(5, day(4));
        set.flush().unwrap();

        let reopened = DailyCompletionSet::open(dir.path()).unwrap();
        assert!(reopened.completed_on(5, day(4)));
    }
}
