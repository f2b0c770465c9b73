//! Normalized chat events exchanged with the messaging gateway.
//!
//! The transport binding turns platform updates into [`InboundEvent`]s and
//! renders the [`Outbound`] actions the engine returns.

use serde::{Deserialize, Serialize};

/// Chat-platform identifier of the person going through the protocol.
pub type ActorId = i64;

/// Kind of chat the event arrived from.  Only private chats are served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    #[default]
    Private,
    Group,
    Channel,
}

/// One event delivered by the messaging gateway for a single actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub actor_id: ActorId,
    #[serde(default)]
    pub chat: ChatKind,
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn private(actor_id: ActorId, payload: EventPayload) -> Self {
        Self {
            actor_id,
            chat: ChatKind::Private,
            payload,
        }
    }

    pub fn text(actor_id: ActorId, text: impl Into<String>) -> Self {
        Self::private(actor_id, EventPayload::Text { text: text.into() })
    }

    pub fn photo(actor_id: ActorId, blob_ref: impl Into<String>) -> Self {
        Self::private(
            actor_id,
            EventPayload::Photo {
                blob_ref: blob_ref.into(),
            },
        )
    }

    pub fn live_location(actor_id: ActorId, latitude: f64, longitude: f64) -> Self {
        Self::private(
            actor_id,
            EventPayload::Location {
                latitude,
                longitude,
                live_period: Some(900),
            },
        )
    }

    pub fn static_location(actor_id: ActorId, latitude: f64, longitude: f64) -> Self {
        Self::private(
            actor_id,
            EventPayload::Location {
                latitude,
                longitude,
                live_period: None,
            },
        )
    }

    pub fn button(actor_id: ActorId, token: impl Into<String>) -> Self {
        Self::private(
            actor_id,
            EventPayload::Button {
                token: token.into(),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Text {
        text: String,
    },
    Photo {
        /// Transport-side reference to the largest photo size.
        blob_ref: String,
    },
    Location {
        latitude: f64,
        longitude: f64,
        /// Live-sharing period in seconds; absent for a static pin.
        #[serde(default)]
        live_period: Option<u32>,
    },
    Button {
        token: String,
    },
}

impl EventPayload {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Photo { .. } => "photo",
            Self::Location { .. } => "location",
            Self::Button { .. } => "button",
        }
    }
}

/// An inline control: the label shown to the actor and the opaque token
/// sent back when it is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyButton {
    pub label: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub buttons: Vec<KeyButton>,
}

impl Keyboard {
    pub fn token_for(&self, label_prefix: &str) -> Option<&str> {
        self.buttons
            .iter()
            .find(|b| b.label.starts_with(label_prefix))
            .map(|b| b.token.as_str())
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().map(|b| b.token.as_str())
    }
}

/// An action the transport must perform on behalf of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    ReplyText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        keyboard: Option<Keyboard>,
    },
    EditLastMessage {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        keyboard: Option<Keyboard>,
    },
}

impl Outbound {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::ReplyText {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn reply_with(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::ReplyText {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    pub fn edit(text: impl Into<String>) -> Self {
        Self::EditLastMessage {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn edit_with(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::EditLastMessage {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::ReplyText { text, .. } | Self::EditLastMessage { text, .. } => text,
        }
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        match self {
            Self::ReplyText { keyboard, .. } | Self::EditLastMessage { keyboard, .. } => {
                keyboard.as_ref()
            }
        }
    }
}
