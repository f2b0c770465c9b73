//! Effect failures: retries, exhaustion and lost ledger rows.

mod common;

use common::{token, Harness, ACTOR};
use rc_domain::event::{InboundEvent, Outbound};
use rc_domain::record::Column;
use rc_engine::messages;
use rc_sessions::ProtocolState;

/// Walk to `CONFIRM_START_PHOTO` and return the confirm prompt.
async fn at_start_photo_confirm(h: &Harness) -> Outbound {
    h.one(InboundEvent::text(ACTOR, "/ingreso")).await;
    let out = h.one(InboundEvent::text(ACTOR, "CREW-7")).await;
    let out = h.one(InboundEvent::button(ACTOR, token(&out, "Confirmar"))).await;
    let out = h.one(InboundEvent::button(ACTOR, token(&out, "REGULAR"))).await;
    h.one(InboundEvent::button(ACTOR, token(&out, "Confirmar"))).await;
    h.blobs.insert("selfie", b"jpeg".to_vec());
    h.one(InboundEvent::photo(ACTOR, "selfie")).await
}

#[tokio::test]
async fn two_upload_failures_then_success_store_one_link() {
    let h = Harness::new();
    let prompt = at_start_photo_confirm(&h).await;

    h.objects.fail_next(2);
    let out = h.one(InboundEvent::button(ACTOR, token(&prompt, "Confirmar"))).await;
    assert!(out.text().contains("Fotografía registrada"));
    assert_eq!(h.state(ACTOR), ProtocolState::AwaitingStartLocation);

    assert_eq!(h.objects.attempts(), 3);
    assert_eq!(h.objects.object_names().len(), 1);
    assert_eq!(h.sheet.row_count(), 1);
    let record = h.record(ACTOR).await;
    assert!(record[&Column::StartPhoto].starts_with("memory://objects/selfie_inicio_"));
}

#[tokio::test]
async fn exhausted_upload_keeps_session_and_buttons() {
    let h = Harness::new();
    let prompt = at_start_photo_confirm(&h).await;
    let before = h.session(ACTOR).unwrap();

    h.objects.fail_next(3);
    let out = h.one(InboundEvent::button(ACTOR, token(&prompt, "Confirmar"))).await;
    assert_eq!(out.text(), messages::media_failed());
    assert_eq!(h.session(ACTOR).unwrap(), before);

    let record = h.record(ACTOR).await;
    assert!(record[&Column::StartPhoto].is_empty());
    assert!(record[&Column::StartTime].is_empty());

    // The same confirm button still works once the store recovers.
    let again = token(&out, "Confirmar");
    assert_eq!(again, token(&prompt, "Confirmar"));
    h.one(InboundEvent::button(ACTOR, again)).await;
    assert_eq!(h.state(ACTOR), ProtocolState::AwaitingStartLocation);
    assert!(!h.record(ACTOR).await[&Column::StartPhoto].is_empty());
}

#[tokio::test]
async fn lost_create_response_does_not_duplicate_row() {
    let h = Harness::new();
    h.one(InboundEvent::text(ACTOR, "/ingreso")).await;
    let out = h.one(InboundEvent::text(ACTOR, "CREW-7")).await;

    h.sheet.fail_creates(1, true);
    h.one(InboundEvent::button(ACTOR, token(&out, "Confirmar"))).await;
    assert_eq!(h.state(ACTOR), ProtocolState::AwaitingType);
    assert_eq!(h.sheet.row_count(), 1);
}

#[tokio::test]
async fn confirm_after_failed_create_adopts_the_landed_row() {
    let h = Harness::new();
    h.one(InboundEvent::text(ACTOR, "/ingreso")).await;
    let out = h.one(InboundEvent::text(ACTOR, "CREW-7")).await;
    let confirm = token(&out, "Confirmar");
    let reserved = h.session(ACTOR).unwrap().reserved_registration_id.unwrap();

    // The append lands, but the row lookups around it fail until the
    // attempts run out.
    h.sheet.fail_creates(1, true);
    h.sheet.fail_finds(2);
    let reply = h.one(InboundEvent::button(ACTOR, confirm.clone())).await;
    assert_eq!(reply.text(), messages::ledger_failed());
    assert_eq!(h.state(ACTOR), ProtocolState::ConfirmCrewId);
    assert_eq!(h.sheet.row_count(), 1);

    h.one(InboundEvent::button(ACTOR, confirm)).await;
    assert_eq!(h.state(ACTOR), ProtocolState::AwaitingType);
    assert_eq!(h.sheet.row_count(), 1);
    assert_eq!(h.session(ACTOR).unwrap().registration_id, Some(reserved));
    assert_eq!(h.record(ACTOR).await[&Column::Crew], "CREW-7");
}

#[tokio::test]
async fn ledger_outage_on_create_keeps_confirm_state() {
    let h = Harness::new();
    h.one(InboundEvent::text(ACTOR, "/ingreso")).await;
    let out = h.one(InboundEvent::text(ACTOR, "CREW-7")).await;

    h.sheet.fail_creates(3, false);
    let reply = h.one(InboundEvent::button(ACTOR, token(&out, "Confirmar"))).await;
    assert_eq!(reply.text(), messages::ledger_failed());
    assert_eq!(h.state(ACTOR), ProtocolState::ConfirmCrewId);
    assert!(h.session(ACTOR).unwrap().registration_id.is_none());
    assert_eq!(h.sheet.row_count(), 0);
}

#[tokio::test]
async fn deleted_row_drops_session_and_asks_for_restart() {
    let h = Harness::new();
    h.one(InboundEvent::text(ACTOR, "/ingreso")).await;
    let out = h.one(InboundEvent::text(ACTOR, "CREW-7")).await;
    let out = h.one(InboundEvent::button(ACTOR, token(&out, "Confirmar"))).await;
    let out = h.one(InboundEvent::button(ACTOR, token(&out, "REGULAR"))).await;

    let id = h.session(ACTOR).unwrap().registration_id.unwrap();
    assert!(h.sheet.remove_row(&id.to_string()));

    let reply = h.one(InboundEvent::button(ACTOR, token(&out, "Confirmar"))).await;
    assert_eq!(reply.text(), messages::restart_required());
    assert!(h.session(ACTOR).is_none());

    let out = h.one(InboundEvent::text(ACTOR, "/ingreso")).await;
    assert_eq!(out.text(), messages::crew_prompt());
}
