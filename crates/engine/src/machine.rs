//! The transition table.
//!
//! `transition` is pure: it reads the current session and the admitted
//! input and returns the proposed session plus the effects to run.  It does
//! no I/O and never reads the clock; everything time-dependent arrives in
//! [`Context`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use rc_domain::config::TimeWindow;
use rc_domain::event::Outbound;
use rc_domain::record::{format_coordinate, normalize_crew_name, Column, CrewType, PhotoSlot, RecordDraft};
use rc_sessions::{Action, ActorSession, PendingMedia, ProtocolState};
use uuid::Uuid;

use crate::command::Command;
use crate::effect::Effect;
use crate::gate::Input;
use crate::messages;

/// Everything time- and actor-dependent the table needs.
#[derive(Debug, Clone)]
pub struct Context {
    pub now: DateTime<Utc>,
    /// Local calendar date.
    pub today: NaiveDate,
    /// Local wall-clock time.
    pub local_time: NaiveTime,
    pub exempt: bool,
    pub completed_today: bool,
    pub window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub session: ActorSession,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(session: &ActorSession, reply: Outbound) -> Self {
        Self {
            session: session.clone(),
            effects: vec![Effect::Send(reply)],
        }
    }
}

fn type_actions() -> Vec<Action> {
    CrewType::ALL.into_iter().map(Action::SelectType).collect()
}

fn hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn transition(session: &ActorSession, input: Input, ctx: &Context) -> Transition {
    if let Input::Command(cmd) = input {
        return command(session, cmd, ctx);
    }

    let mut next = session.clone();
    next.updated_at = ctx.now;
    let mut effects = Vec::new();

    match (session.state, input) {
        // ── Crew name ───────────────────────────────────────────────
        (ProtocolState::AwaitingCrewId, Input::Text(text)) => {
            let crew = normalize_crew_name(&text);
            if crew.is_empty() {
                return Transition::stay(session, Outbound::reply(messages::need_crew_text()));
            }
            next.collected_fields.insert(Column::Crew, crew.clone());
            next.reserved_registration_id
                .get_or_insert_with(Uuid::new_v4);
            next.state = ProtocolState::ConfirmCrewId;
            let issued = next
                .active_action_tokens
                .issue(&[Action::ConfirmName, Action::RetryName]);
            effects.push(Effect::Send(Outbound::reply_with(
                messages::crew_confirm(&crew),
                messages::keyboard(&issued),
            )));
        }
        (ProtocolState::ConfirmCrewId, Input::Action(Action::ConfirmName)) => {
            let Some(crew) = session.crew().map(str::to_owned) else {
                next.state = ProtocolState::AwaitingCrewId;
                next.active_action_tokens.clear();
                effects.push(Effect::Send(Outbound::edit(messages::crew_reprompt())));
                return Transition {
                    session: next,
                    effects,
                };
            };
            if session.registration_id.is_none() {
                let registration_id = session
                    .reserved_registration_id
                    .unwrap_or_else(Uuid::new_v4);
                next.reserved_registration_id = Some(registration_id);
                effects.push(Effect::CreateRecord {
                    registration_id,
                    draft: RecordDraft {
                        actor_id: session.actor_id,
                        date: ctx.today,
                        crew,
                    },
                });
            }
            next.state = ProtocolState::AwaitingType;
            let issued = next.active_action_tokens.issue(&type_actions());
            effects.push(Effect::Send(Outbound::edit_with(
                messages::type_menu(),
                messages::keyboard(&issued),
            )));
        }
        (ProtocolState::ConfirmCrewId, Input::Action(Action::RetryName)) => {
            next.collected_fields.remove(&Column::Crew);
            next.state = ProtocolState::AwaitingCrewId;
            next.active_action_tokens.clear();
            effects.push(Effect::Send(Outbound::edit(messages::crew_reprompt())));
        }

        // ── Crew type ───────────────────────────────────────────────
        (ProtocolState::AwaitingType, Input::Action(Action::SelectType(crew_type))) => {
            next.collected_fields
                .insert(Column::CrewType, crew_type.as_str().to_owned());
            next.state = ProtocolState::ConfirmType;
            let issued = next
                .active_action_tokens
                .issue(&[Action::ConfirmType, Action::RetryType]);
            effects.push(Effect::Send(Outbound::edit_with(
                messages::type_confirm(crew_type),
                messages::keyboard(&issued),
            )));
        }
        (ProtocolState::ConfirmType, Input::Action(Action::ConfirmType)) => {
            let Some(crew_type) = session.crew_type() else {
                return retype(session, ctx);
            };
            effects.push(Effect::WriteCell {
                column: Column::CrewType,
                value: crew_type.as_str().to_owned(),
            });
            next.state = ProtocolState::AwaitingStartPhoto;
            next.active_action_tokens.clear();
            effects.push(Effect::Send(Outbound::edit(messages::start_photo_prompt(
                crew_type,
            ))));
        }
        (ProtocolState::ConfirmType, Input::Action(Action::RetryType)) => {
            return retype(session, ctx);
        }

        // ── Photos ──────────────────────────────────────────────────
        (
            state @ (ProtocolState::AwaitingStartPhoto | ProtocolState::AwaitingEndPhoto),
            Input::Photo { media_ref },
        ) => {
            let slot = state.photo_slot().unwrap_or(PhotoSlot::Start);
            let (confirm, retry, next_state) = match slot {
                PhotoSlot::Start => (
                    Action::ConfirmStartPhoto,
                    Action::RetryStartPhoto,
                    ProtocolState::ConfirmStartPhoto,
                ),
                PhotoSlot::End => (
                    Action::ConfirmEndPhoto,
                    Action::RetryEndPhoto,
                    ProtocolState::ConfirmEndPhoto,
                ),
            };
            next.pending_media = Some(PendingMedia { slot, media_ref });
            next.state = next_state;
            let issued = next.active_action_tokens.issue(&[confirm, retry]);
            effects.push(Effect::Send(Outbound::reply_with(
                messages::photo_confirm(slot),
                messages::keyboard(&issued),
            )));
        }
        (
            state @ (ProtocolState::ConfirmStartPhoto | ProtocolState::ConfirmEndPhoto),
            Input::Action(action @ (Action::ConfirmStartPhoto | Action::ConfirmEndPhoto)),
        ) => {
            let slot = state.photo_slot().unwrap_or(PhotoSlot::Start);
            let expected = match slot {
                PhotoSlot::Start => Action::ConfirmStartPhoto,
                PhotoSlot::End => Action::ConfirmEndPhoto,
            };
            let pending = session
                .pending_media
                .as_ref()
                .filter(|p| p.slot == slot && action == expected);
            let Some(pending) = pending else {
                next.pending_media = None;
                next.state = awaiting_photo(slot);
                next.active_action_tokens.clear();
                effects.push(Effect::Send(Outbound::edit(messages::photo_reprompt(slot))));
                return Transition {
                    session: next,
                    effects,
                };
            };

            let time = hhmm(ctx.local_time);
            effects.push(Effect::CapturePhoto {
                slot,
                media_ref: pending.media_ref.clone(),
            });
            effects.push(Effect::WriteCell {
                column: slot.time_column(),
                value: time.clone(),
            });
            next.collected_fields.insert(slot.time_column(), time.clone());
            next.pending_media = None;
            next.active_action_tokens.clear();
            next.state = match slot {
                PhotoSlot::Start => ProtocolState::AwaitingStartLocation,
                PhotoSlot::End => ProtocolState::AwaitingEndLocation,
            };
            effects.push(Effect::Send(Outbound::edit(messages::photo_saved(slot, &time))));
        }
        (
            state @ (ProtocolState::ConfirmStartPhoto | ProtocolState::ConfirmEndPhoto),
            Input::Action(Action::RetryStartPhoto | Action::RetryEndPhoto),
        ) => {
            let slot = state.photo_slot().unwrap_or(PhotoSlot::Start);
            next.pending_media = None;
            next.state = awaiting_photo(slot);
            next.active_action_tokens.clear();
            effects.push(Effect::Send(Outbound::edit(messages::photo_reprompt(slot))));
        }

        // ── Live locations ──────────────────────────────────────────
        (
            state @ (ProtocolState::AwaitingStartLocation | ProtocolState::AwaitingEndLocation),
            Input::LiveLocation {
                latitude,
                longitude,
            },
        ) => {
            let slot = state.location_slot().unwrap_or(PhotoSlot::Start);
            let lat = format_coordinate(latitude);
            let lon = format_coordinate(longitude);
            effects.push(Effect::WriteCell {
                column: slot.latitude_column(),
                value: lat.clone(),
            });
            effects.push(Effect::WriteCell {
                column: slot.longitude_column(),
                value: lon.clone(),
            });
            next.collected_fields.insert(slot.latitude_column(), lat);
            next.collected_fields.insert(slot.longitude_column(), lon);

            match slot {
                PhotoSlot::Start => {
                    next.state = ProtocolState::OnShift;
                    effects.push(Effect::Send(Outbound::reply(
                        messages::start_location_saved(),
                    )));
                }
                PhotoSlot::End => {
                    if !ctx.exempt {
                        effects.push(Effect::MarkCompleted { date: ctx.today });
                    }
                    next.state = ProtocolState::Completed;
                    effects.push(Effect::Send(Outbound::reply(messages::end_location_saved())));
                }
            }
        }

        (state, _) => {
            return Transition::stay(session, Outbound::reply(messages::pending_step(state)));
        }
    }

    Transition {
        session: next,
        effects,
    }
}

fn awaiting_photo(slot: PhotoSlot) -> ProtocolState {
    match slot {
        PhotoSlot::Start => ProtocolState::AwaitingStartPhoto,
        PhotoSlot::End => ProtocolState::AwaitingEndPhoto,
    }
}

/// Back to the type menu with fresh tokens.
fn retype(session: &ActorSession, ctx: &Context) -> Transition {
    let mut next = session.clone();
    next.updated_at = ctx.now;
    next.collected_fields.remove(&Column::CrewType);
    next.state = ProtocolState::AwaitingType;
    let issued = next.active_action_tokens.issue(&type_actions());
    Transition {
        session: next,
        effects: vec![Effect::Send(Outbound::edit_with(
            messages::type_menu(),
            messages::keyboard(&issued),
        ))],
    }
}

fn command(session: &ActorSession, cmd: Command, ctx: &Context) -> Transition {
    let state = session.state;
    match cmd {
        Command::Help => Transition::stay(session, Outbound::reply(messages::help())),

        Command::Start if state.in_progress() => {
            Transition::stay(session, Outbound::reply(messages::pending_step(state)))
        }
        Command::Start => Transition::stay(session, Outbound::reply(messages::welcome())),

        Command::Ingreso if state.in_progress() => {
            Transition::stay(session, Outbound::reply(messages::pending_step(state)))
        }
        Command::Ingreso if ctx.completed_today && !ctx.exempt => {
            Transition::stay(session, Outbound::reply(messages::lockout()))
        }
        Command::Ingreso if !ctx.window.contains(ctx.local_time) => Transition::stay(
            session,
            Outbound::reply(messages::outside_window(&ctx.window)),
        ),
        Command::Ingreso => {
            let mut fresh = ActorSession::new(session.actor_id, ctx.now);
            fresh.state = ProtocolState::AwaitingCrewId;
            Transition {
                session: fresh,
                effects: vec![Effect::Send(Outbound::reply(messages::crew_prompt()))],
            }
        }

        Command::Salida => match state {
            ProtocolState::OnShift => {
                let mut next = session.clone();
                next.updated_at = ctx.now;
                next.state = ProtocolState::AwaitingEndPhoto;
                Transition {
                    session: next,
                    effects: vec![Effect::Send(Outbound::reply(messages::end_photo_prompt()))],
                }
            }
            ProtocolState::Completed => {
                Transition::stay(session, Outbound::reply(messages::salida_closed()))
            }
            ProtocolState::Idle => {
                Transition::stay(session, Outbound::reply(messages::no_active_shift()))
            }
            ProtocolState::AwaitingEndPhoto
            | ProtocolState::ConfirmEndPhoto
            | ProtocolState::AwaitingEndLocation => {
                Transition::stay(session, Outbound::reply(messages::pending_step(state)))
            }
            _ => Transition::stay(session, Outbound::reply(messages::salida_blocked(state))),
        },

        Command::Unknown(_) => {
            Transition::stay(session, Outbound::reply(messages::command_not_allowed()))
        }
    }
}
