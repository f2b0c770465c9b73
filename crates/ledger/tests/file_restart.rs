//! A registration created before a restart keeps resolving to its own row,
//! even after the sheet has been re-sorted in between.

use std::sync::Arc;

use chrono::NaiveDate;
use rc_domain::record::{Column, RecordDraft};
use rc_domain::retry::RetryPolicy;
use rc_ledger::{FileLedger, LedgerAdapter};
use uuid::Uuid;

fn draft(crew: &str) -> RecordDraft {
    RecordDraft {
        actor_id: 1001,
        date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
        crew: crew.into(),
    }
}

fn open(path: &std::path::Path) -> (Arc<FileLedger>, LedgerAdapter) {
    let ledger = Arc::new(FileLedger::open(path).unwrap());
    let adapter = LedgerAdapter::new(ledger.clone(), RetryPolicy::immediate(3), "Registros");
    (ledger, adapter)
}

#[tokio::test]
async fn registration_resolves_across_restart_and_reorder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Registros.json");

    let id = {
        let (_, adapter) = open(&path);
        adapter.create(Uuid::new_v4(), &draft("ALFA")).await.unwrap();
        let id = adapter.create(Uuid::new_v4(), &draft("ZULU")).await.unwrap();
        adapter.write(id, Column::CrewType, "REGULAR").await.unwrap();
        id
    };

    // Someone sorts the sheet by crew name while the process is down.
    {
        let (ledger, adapter) = open(&path);
        ledger.sort_by_column(Column::Crew.header()).unwrap();
        adapter.create(Uuid::new_v4(), &draft("BRAVO")).await.unwrap();
        ledger.sort_by_column(Column::Crew.header()).unwrap();
    }

    let (ledger, adapter) = open(&path);
    adapter.write(id, Column::StartTime, "07:30").await.unwrap();

    let record = adapter.read_record(id).await.unwrap().unwrap();
    assert_eq!(record[&Column::Crew], "ZULU");
    assert_eq!(record[&Column::CrewType], "REGULAR");
    assert_eq!(record[&Column::StartTime], "07:30");

    // No other row picked up the write.
    let rows = ledger.path().to_path_buf();
    let raw = std::fs::read_to_string(rows).unwrap();
    assert_eq!(raw.matches("07:30").count(), 1);
}
