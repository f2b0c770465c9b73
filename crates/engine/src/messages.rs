//! Reply catalogue.  Every user-facing string lives here.

use rc_domain::config::TimeWindow;
use rc_domain::event::{KeyButton, Keyboard};
use rc_domain::record::{CrewType, PhotoSlot};
use rc_sessions::{Action, ActionTokens, ProtocolState};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Keyboards
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn label(action: Action) -> &'static str {
    match action {
        Action::ConfirmName | Action::ConfirmType => "✅ Confirmar",
        Action::ConfirmStartPhoto | Action::ConfirmEndPhoto => "✅ Confirmar",
        Action::RetryName | Action::RetryType => "✏️ Corregir",
        Action::RetryStartPhoto | Action::RetryEndPhoto => "🔄 Corregir",
        Action::SelectType(CrewType::Disponibilidad) => "🟠 DISPONIBILIDAD",
        Action::SelectType(CrewType::Regular) => "⚪ REGULAR",
    }
}

/// Keyboard for freshly issued tokens, in issue order.
pub fn keyboard(issued: &[(Action, String)]) -> Keyboard {
    Keyboard {
        buttons: issued
            .iter()
            .map(|(action, token)| KeyButton {
                label: label(*action).to_owned(),
                token: token.clone(),
            })
            .collect(),
    }
}

/// Keyboard for the tokens a session still accepts.
pub fn active_keyboard(tokens: &ActionTokens) -> Option<Keyboard> {
    if tokens.is_empty() {
        return None;
    }
    Some(Keyboard {
        buttons: tokens
            .iter()
            .map(|(token, action)| KeyButton {
                label: label(action).to_owned(),
                token: token.to_owned(),
            })
            .collect(),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Commands
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn welcome() -> String {
    "👋👋 ¡Hola! Bienvenido al bot de asistencia 👷‍♂️👷‍♂️.\n\n\
     📌 Funciones disponibles:\n\n\
     /ingreso – Iniciar registro de asistencia 📝\n\
     /salida – Registrar salida final 📸\n\
     /ayuda – Mostrar instrucciones ℹ️"
        .into()
}

pub fn help() -> String {
    "ℹ️ Instrucciones para uso del bot:\n\n\
     1️⃣ Usa /ingreso para registrar tu inicio de jornada laboral 👷‍♂️.\n\
     \u{20}  - Envía el nombre de tu cuadrilla\n\
     \u{20}  - Elige el tipo de cuadrilla\n\
     \u{20}  - Luego la foto de inicio de actividades 📸\n\
     \u{20}  - Ubicación en tiempo real 📍\n\n\
     2️⃣ Usa /salida para tu fin de jornada laboral 👷‍♂️:\n\
     \u{20}  - Envía la foto de fin de actividades 📸\n\
     \u{20}  - Ubicación en tiempo real 📍\n\n\
     ‼️ El flujo es estricto, no puedes saltarte pasos. 🧐"
        .into()
}

pub fn command_not_allowed() -> String {
    "⚠️ Comando no permitido en este momento.\nUsa /ayuda para más información.".into()
}

pub fn lockout() -> String {
    "⚠️ Ya completaste tu registro de hoy.\n\nDebes esperar hasta mañana para iniciar uno nuevo."
        .into()
}

pub fn outside_window(window: &TimeWindow) -> String {
    format!(
        "⏰ El registro de ingreso solo está disponible entre las {} y las {}.",
        window.start.format("%H:%M"),
        window.end.format("%H:%M")
    )
}

pub fn salida_closed() -> String {
    "✅ Ya completaste tu registro hoy. No puedes registrar otra salida.".into()
}

pub fn no_active_shift() -> String {
    "⚠️ No hay jornada activa. Usa /ingreso para iniciar.".into()
}

/// `/salida` before the start half of the protocol is done.
pub fn salida_blocked(state: ProtocolState) -> String {
    let missing = match state {
        ProtocolState::AwaitingCrewId | ProtocolState::ConfirmCrewId => {
            "el nombre de la cuadrilla ✍️"
        }
        ProtocolState::AwaitingType | ProtocolState::ConfirmType => "el tipo de cuadrilla 🟠⚪",
        ProtocolState::AwaitingStartPhoto | ProtocolState::ConfirmStartPhoto => {
            "tu foto de inicio 📸"
        }
        _ => "tu ubicación en tiempo real 📍",
    };
    format!("⚠️ No puedes registrar salida todavía. Te falta {missing}")
}

/// What the actor still has to do in `state`.
pub fn pending_step(state: ProtocolState) -> String {
    match state {
        ProtocolState::AwaitingCrewId => "✍️ Te falta escribir el nombre de tu cuadrilla.".into(),
        ProtocolState::ConfirmCrewId
        | ProtocolState::ConfirmType
        | ProtocolState::ConfirmStartPhoto
        | ProtocolState::ConfirmEndPhoto => use_buttons(),
        ProtocolState::AwaitingType => "🟠⚪ Te falta elegir el tipo de cuadrilla.".into(),
        ProtocolState::AwaitingStartPhoto => "📸 Te falta tu foto de inicio.".into(),
        ProtocolState::AwaitingStartLocation => {
            "📍 Te falta tu ubicación en tiempo real de inicio.".into()
        }
        ProtocolState::OnShift => {
            "⚠️ Ya tienes un registro en curso. Complétalo con /salida.".into()
        }
        ProtocolState::AwaitingEndPhoto => "📸 Te falta tu foto de salida.".into(),
        ProtocolState::AwaitingEndLocation => {
            "📍 Te falta tu ubicación en tiempo real de salida.".into()
        }
        ProtocolState::Completed => {
            "✅ Registro completado. No puedes iniciar otro hasta mañana.".into()
        }
        ProtocolState::Idle => "Usa /ingreso para comenzar tu registro.".into(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Protocol steps
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn crew_prompt() -> String {
    "✍️ Escribe el nombre de tu cuadrilla. 👷‍♂️👷‍♀️\n\n\
     Ejemplo:\n\nD 1 WIN SGA CHRISTOPHER INGA CONTRERAS"
        .into()
}

pub fn crew_confirm(crew: &str) -> String {
    format!("¿Has ingresado correctamente el nombre de tu cuadrilla 👷‍♂️? 🤔\n\n{crew}\n\n¿Es correcto?")
}

pub fn crew_reprompt() -> String {
    "✍️ Escribe el nombre de tu cuadrilla 👷‍♂️ nuevamente.".into()
}

pub fn type_menu() -> String {
    "Selecciona el tipo de cuadrilla:".into()
}

pub fn type_confirm(crew_type: CrewType) -> String {
    format!("Seleccionaste: {crew_type}.\n\n¿Es correcto?")
}

pub fn start_photo_prompt(crew_type: CrewType) -> String {
    format!(
        "Tipificación de cuadrilla confirmada: {crew_type}.\n\n\
         📸 Envía tu foto de inicio con tus EPPs completos."
    )
}

pub fn end_photo_prompt() -> String {
    "📸 Envía tu foto de fin de labores con tus EPPs completos.\nPara finalizar tu jornada. 🏠"
        .into()
}

pub fn photo_confirm(slot: PhotoSlot) -> String {
    let purpose = match slot {
        PhotoSlot::Start => "iniciar actividades",
        PhotoSlot::End => "finalizar actividades",
    };
    format!(
        "¿Usamos esta foto para {purpose}?\n\n\
         ⚠️ Importante: después de confirmar,\n\
         ⏳ espera como mínimo 8 seg. para continuar."
    )
}

pub fn photo_reprompt(slot: PhotoSlot) -> String {
    match slot {
        PhotoSlot::Start => "🔄 Envía nuevamente tu foto de inicio de actividades.".into(),
        PhotoSlot::End => "🔄 Envía nuevamente tu foto de salida.".into(),
    }
}

pub fn photo_saved(slot: PhotoSlot, time: &str) -> String {
    let which = match slot {
        PhotoSlot::Start => "inicio",
        PhotoSlot::End => "salida",
    };
    format!(
        "✅ Fotografía registrada. ⏱️ Hora de {which}: {time}.\n\n\
         📍 Ahora envía tu ubicación en tiempo real\n\n\
         (Elige “Compartir ubicación en tiempo real” 📍)."
    )
}

pub fn start_location_saved() -> String {
    "✅ Ubicación de inicio registrada.\n\nRecuerda que para concluir tu jornada debes usar /salida."
        .into()
}

pub fn end_location_saved() -> String {
    "✅ Ubicación de salida registrada.\n\n👷‍♂️🦺 Salida registrada. Que tengas un buen regreso a casa. 🏠"
        .into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Rejections
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn need_crew_text() -> String {
    "⚠️ Aquí solo debes escribir el nombre de la cuadrilla. ✍️".into()
}

pub fn need_type_button() -> String {
    "⚠️ Elige el tipo de cuadrilla con los botones.".into()
}

pub fn need_photo(slot: PhotoSlot) -> String {
    match slot {
        PhotoSlot::Start => "📸 Aquí solo debes enviar tu foto de inicio. 🤳".into(),
        PhotoSlot::End => "📸 Aquí solo debes enviar tu foto de salida. 🤳".into(),
    }
}

pub fn need_live_location() -> String {
    "⚠️ Por favor, comparte tu ubicación en tiempo real.\n\n\
     Toca el clip ➜ Ubicación ➜ Compartir ubicación en tiempo real."
        .into()
}

pub fn use_buttons() -> String {
    "⚠️ Usa los botones ✅ Confirmar o Corregir para continuar.".into()
}

pub fn stale_button() -> String {
    "⚠️ Este botón ya no es válido.".into()
}

pub fn not_now() -> String {
    "⚠️ No es momento de enviar esto.\n\nUsa /ingreso para comenzar.".into()
}

pub fn on_shift_hint() -> String {
    "👷‍♂️ Tu jornada está en curso. Usa /salida para registrar tu salida.".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Failures
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn media_failed() -> String {
    "⚠️ No pude registrar tu foto.\nPresiona ✅ Confirmar otra vez o 🔄 Corregir para enviar otra.".into()
}

pub fn ledger_failed() -> String {
    "⚠️ No pude guardar este paso en el registro. Intenta de nuevo en unos segundos.".into()
}

pub fn restart_required() -> String {
    "❌ No encontré tu registro activo. Inicia nuevamente con /ingreso.".into()
}

pub fn generic_failure() -> String {
    "⚠️ Ocurrió un error inesperado. Intenta de nuevo.".into()
}
