//! Actor session model.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rc_domain::event::ActorId;
use rc_domain::record::{Column, CrewType, PhotoSlot};

use crate::tokens::ActionTokens;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Protocol state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Position in the attendance protocol, in protocol order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtocolState {
    #[default]
    Idle,
    AwaitingCrewId,
    ConfirmCrewId,
    AwaitingType,
    ConfirmType,
    AwaitingStartPhoto,
    ConfirmStartPhoto,
    AwaitingStartLocation,
    OnShift,
    AwaitingEndPhoto,
    ConfirmEndPhoto,
    AwaitingEndLocation,
    Completed,
}

impl ProtocolState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::AwaitingCrewId => "AWAITING_CREW_ID",
            Self::ConfirmCrewId => "CONFIRM_CREW_ID",
            Self::AwaitingType => "AWAITING_TYPE",
            Self::ConfirmType => "CONFIRM_TYPE",
            Self::AwaitingStartPhoto => "AWAITING_START_PHOTO",
            Self::ConfirmStartPhoto => "CONFIRM_START_PHOTO",
            Self::AwaitingStartLocation => "AWAITING_START_LOCATION",
            Self::OnShift => "ON_SHIFT",
            Self::AwaitingEndPhoto => "AWAITING_END_PHOTO",
            Self::ConfirmEndPhoto => "CONFIRM_END_PHOTO",
            Self::AwaitingEndLocation => "AWAITING_END_LOCATION",
            Self::Completed => "COMPLETED",
        }
    }

    /// Only `IDLE` and `COMPLETED` may start a new registration.
    pub fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Completed)
    }

    /// A registration is in progress (between `/ingreso` and completion).
    pub fn in_progress(self) -> bool {
        !self.can_start()
    }

    pub fn is_confirm(self) -> bool {
        matches!(
            self,
            Self::ConfirmCrewId | Self::ConfirmType | Self::ConfirmStartPhoto | Self::ConfirmEndPhoto
        )
    }

    /// The photo slot a state collects or confirms, if any.
    pub fn photo_slot(self) -> Option<PhotoSlot> {
        match self {
            Self::AwaitingStartPhoto | Self::ConfirmStartPhoto => Some(PhotoSlot::Start),
            Self::AwaitingEndPhoto | Self::ConfirmEndPhoto => Some(PhotoSlot::End),
            _ => None,
        }
    }

    /// The slot whose live location a state waits for, if any.
    pub fn location_slot(self) -> Option<PhotoSlot> {
        match self {
            Self::AwaitingStartLocation => Some(PhotoSlot::Start),
            Self::AwaitingEndLocation => Some(PhotoSlot::End),
            _ => None,
        }
    }
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A photo received but not yet confirmed for a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMedia {
    pub slot: PhotoSlot,
    pub media_ref: String,
}

/// One actor's position in the protocol plus everything collected so far.
///
/// Never holds a ledger row number: every write resolves the row by
/// `registration_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSession {
    pub actor_id: ActorId,
    pub state: ProtocolState,
    #[serde(default)]
    pub registration_id: Option<Uuid>,
    /// Id chosen for the row before it exists.  Stays fixed across failed
    /// creates so a later confirm finds a row that landed unseen.
    #[serde(default)]
    pub reserved_registration_id: Option<Uuid>,
    #[serde(default)]
    pub pending_media: Option<PendingMedia>,
    #[serde(default)]
    pub active_action_tokens: ActionTokens,
    /// Values chosen or committed during this registration, by column.
    #[serde(default)]
    pub collected_fields: BTreeMap<Column, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActorSession {
    /// A fresh session in `IDLE`.
    pub fn new(actor_id: ActorId, now: DateTime<Utc>) -> Self {
        Self {
            actor_id,
            state: ProtocolState::Idle,
            registration_id: None,
            reserved_registration_id: None,
            pending_media: None,
            active_action_tokens: ActionTokens::default(),
            collected_fields: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn crew(&self) -> Option<&str> {
        self.collected_fields.get(&Column::Crew).map(String::as_str)
    }

    pub fn crew_type(&self) -> Option<CrewType> {
        self.collected_fields
            .get(&Column::CrewType)
            .and_then(|raw| CrewType::parse(raw))
    }

    pub fn field(&self, column: Column) -> Option<&str> {
        self.collected_fields.get(&column).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn only_idle_and_completed_can_start() {
        assert!(ProtocolState::Idle.can_start());
        assert!(ProtocolState::Completed.can_start());
        assert!(!ProtocolState::OnShift.can_start());
        assert!(ProtocolState::AwaitingEndLocation.in_progress());
    }

    #[test]
    fn slots_follow_state() {
        assert_eq!(
            ProtocolState::ConfirmEndPhoto.photo_slot(),
            Some(PhotoSlot::End)
        );
        assert_eq!(
            ProtocolState::AwaitingStartLocation.location_slot(),
            Some(PhotoSlot::Start)
        );
        assert_eq!(ProtocolState::OnShift.photo_slot(), None);
    }

    #[test]
    fn session_survives_json_snapshot() {
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 13, 0, 0).unwrap();
        let mut session = ActorSession::new(42, now);
        session.state = ProtocolState::ConfirmType;
        session.registration_id = Some(Uuid::new_v4());
        session
            .collected_fields
            .insert(Column::Crew, "CREW-7".into());
        session
            .collected_fields
            .insert(Column::CrewType, CrewType::Regular.as_str().into());

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"CONFIRM_TYPE\""));
        let back: ActorSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
        assert_eq!(back.crew(), Some("CREW-7"));
        assert_eq!(back.crew_type(), Some(CrewType::Regular));
    }
}
