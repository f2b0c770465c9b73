//! Inbound transport contract: the normalized envelope a messaging
//! connector posts for every chat update.
//!
//! `POST /v1/inbound` runs the event through the engine (blocking until its
//! effects are done) and returns the outbound actions the connector must
//! perform, in order.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

use rc_domain::event::{ActorId, ChatKind, EventPayload, InboundEvent, Outbound};

use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct InboundEnvelope {
    /// Platform user id of the sender.
    pub actor_id: ActorId,
    /// `"private"`, `"group"`, `"supergroup"` or `"channel"`.
    #[serde(default = "d_private")]
    pub chat_type: ChatType,
    pub event: EventPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

fn d_private() -> ChatType {
    ChatType::Private
}

impl From<ChatType> for ChatKind {
    fn from(value: ChatType) -> Self {
        match value {
            ChatType::Private => ChatKind::Private,
            ChatType::Group | ChatType::Supergroup => ChatKind::Group,
            ChatType::Channel => ChatKind::Channel,
        }
    }
}

impl InboundEnvelope {
    pub fn into_event(self) -> InboundEvent {
        InboundEvent {
            actor_id: self.actor_id,
            chat: self.chat_type.into(),
            payload: self.event,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InboundResponse {
    pub actions: Vec<Outbound>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/inbound
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn inbound(
    State(state): State<AppState>,
    Json(body): Json<InboundEnvelope>,
) -> impl IntoResponse {
    let event = body.into_event();
    tracing::debug!(
        actor_id = event.actor_id,
        chat = ?event.chat,
        kind = event.payload.kind(),
        "inbound event"
    );

    let actions = state.engine.handle(event).await;
    Json(InboundResponse { actions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supergroup_maps_to_group() {
        let raw = r#"{"actor_id":5,"chat_type":"supergroup","event":{"type":"text","text":"/ingreso"}}"#;
        let envelope: InboundEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.into_event().chat, ChatKind::Group);
    }

    #[test]
    fn chat_type_defaults_to_private() {
        let raw = r#"{"actor_id":5,"event":{"type":"button","token":"confirm_name.ab12cd34"}}"#;
        let event = serde_json::from_str::<InboundEnvelope>(raw)
            .unwrap()
            .into_event();
        assert_eq!(event.chat, ChatKind::Private);
        assert_eq!(event.payload.kind(), "button");
    }
}
