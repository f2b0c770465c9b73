//! Input contract enforcement.
//!
//! Runs before the transition function.  Turns a raw event into an
//! [`Input`] the current state accepts, or rejects it with no side effects.

use rc_domain::event::{ChatKind, EventPayload, InboundEvent, Outbound};
use rc_sessions::{Action, ActorSession, ProtocolState};

use crate::command::Command;
use crate::messages;

/// An event that passed the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Text(String),
    Photo { media_ref: String },
    LiveLocation { latitude: f64, longitude: f64 },
    Action(Action),
}

impl Input {
    /// Short name used in logs and trace events.
    pub fn kind(&self) -> String {
        match self {
            Input::Command(cmd) => format!("/{}", cmd.name()),
            Input::Text(_) => "text".into(),
            Input::Photo { .. } => "photo".into(),
            Input::LiveLocation { .. } => "live_location".into(),
            Input::Action(action) => action.slug().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Not served at all (non-private chat).  No reply.
    Ignore,
    /// Wrong content type for the current step.
    Validation(Outbound),
    /// Button whose token is not active.
    StaleAction(Outbound),
    /// Anything else a `CONFIRM_*` or resting state does not accept.
    Reminder(Outbound),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Admit(Input),
    Reject(Rejection),
}

fn validation(text: String) -> GateDecision {
    GateDecision::Reject(Rejection::Validation(Outbound::reply(text)))
}

fn reminder(text: String) -> GateDecision {
    GateDecision::Reject(Rejection::Reminder(Outbound::reply(text)))
}

/// Decide whether `event` may reach the transition function.
pub fn check(session: &ActorSession, event: &InboundEvent) -> GateDecision {
    if event.chat != ChatKind::Private {
        return GateDecision::Reject(Rejection::Ignore);
    }

    let state = session.state;

    // Commands and buttons are meaningful in every state.
    match &event.payload {
        EventPayload::Text { text } => {
            if let Some(cmd) = Command::parse(text) {
                return GateDecision::Admit(Input::Command(cmd));
            }
        }
        EventPayload::Button { token } => {
            return match session.active_action_tokens.lookup(token) {
                Some(action) => GateDecision::Admit(Input::Action(action)),
                None => GateDecision::Reject(Rejection::StaleAction(Outbound::reply(
                    messages::stale_button(),
                ))),
            };
        }
        _ => {}
    }

    if state.is_confirm() {
        return reminder(messages::use_buttons());
    }

    match (state, &event.payload) {
        (ProtocolState::AwaitingCrewId, EventPayload::Text { text }) => {
            GateDecision::Admit(Input::Text(text.clone()))
        }
        (ProtocolState::AwaitingCrewId, _) => validation(messages::need_crew_text()),

        (ProtocolState::AwaitingType, _) => validation(messages::need_type_button()),

        (ProtocolState::AwaitingStartPhoto | ProtocolState::AwaitingEndPhoto, payload) => {
            match payload {
                EventPayload::Photo { blob_ref } => GateDecision::Admit(Input::Photo {
                    media_ref: blob_ref.clone(),
                }),
                _ => validation(messages::need_photo(
                    state.photo_slot().unwrap_or(rc_domain::record::PhotoSlot::Start),
                )),
            }
        }

        (
            ProtocolState::AwaitingStartLocation | ProtocolState::AwaitingEndLocation,
            EventPayload::Location {
                latitude,
                longitude,
                live_period: Some(period),
            },
        ) if *period > 0 => GateDecision::Admit(Input::LiveLocation {
            latitude: *latitude,
            longitude: *longitude,
        }),
        (ProtocolState::AwaitingStartLocation | ProtocolState::AwaitingEndLocation, _) => {
            validation(messages::need_live_location())
        }

        (ProtocolState::OnShift, _) => reminder(messages::on_shift_hint()),

        _ => reminder(messages::not_now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(state: ProtocolState) -> ActorSession {
        let mut s = ActorSession::new(1, Utc::now());
        s.state = state;
        s
    }

    #[test]
    fn group_chats_are_ignored() {
        let mut event = InboundEvent::text(1, "/ingreso");
        event.chat = ChatKind::Group;
        assert_eq!(
            check(&session(ProtocolState::Idle), &event),
            GateDecision::Reject(Rejection::Ignore)
        );
    }

    #[test]
    fn commands_pass_in_any_state() {
        let decision = check(
            &session(ProtocolState::ConfirmStartPhoto),
            &InboundEvent::text(1, "/salida"),
        );
        assert_eq!(decision, GateDecision::Admit(Input::Command(Command::Salida)));
    }

    #[test]
    fn photo_while_waiting_for_crew_is_validation_error() {
        let decision = check(
            &session(ProtocolState::AwaitingCrewId),
            &InboundEvent::photo(1, "f1"),
        );
        assert!(matches!(
            decision,
            GateDecision::Reject(Rejection::Validation(_))
        ));
    }

    #[test]
    fn static_location_is_rejected() {
        let decision = check(
            &session(ProtocolState::AwaitingStartLocation),
            &InboundEvent::static_location(1, -12.0, -77.0),
        );
        match decision {
            GateDecision::Reject(Rejection::Validation(out)) => {
                assert!(out.text().contains("tiempo real"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn live_location_is_admitted() {
        let decision = check(
            &session(ProtocolState::AwaitingEndLocation),
            &InboundEvent::live_location(1, -12.5, -77.25),
        );
        assert_eq!(
            decision,
            GateDecision::Admit(Input::LiveLocation {
                latitude: -12.5,
                longitude: -77.25
            })
        );
    }

    #[test]
    fn unknown_token_is_stale() {
        let mut s = session(ProtocolState::ConfirmCrewId);
        s.active_action_tokens
            .issue(&[Action::ConfirmName, Action::RetryName]);
        let decision = check(&s, &InboundEvent::button(1, "confirm_name.deadbeef"));
        assert!(matches!(
            decision,
            GateDecision::Reject(Rejection::StaleAction(_))
        ));
    }

    #[test]
    fn active_token_is_admitted() {
        let mut s = session(ProtocolState::ConfirmCrewId);
        let issued = s
            .active_action_tokens
            .issue(&[Action::ConfirmName, Action::RetryName]);
        let decision = check(&s, &InboundEvent::button(1, issued[1].1.clone()));
        assert_eq!(decision, GateDecision::Admit(Input::Action(Action::RetryName)));
    }

    #[test]
    fn text_in_confirm_state_gets_reminder() {
        let decision = check(
            &session(ProtocolState::ConfirmType),
            &InboundEvent::text(1, "REGULAR"),
        );
        assert!(matches!(decision, GateDecision::Reject(Rejection::Reminder(_))));
    }
}
