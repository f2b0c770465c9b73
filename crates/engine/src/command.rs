//! Slash-command parsing.

/// A recognized (or unrecognized) chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Ingreso,
    Salida,
    Unknown(String),
}

impl Command {
    /// Parse text starting with `/`.  Accepts bot mentions
    /// (`/ingreso@SomeBot`) and ignores arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('/')?;
        let word = rest.split_whitespace().next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default().to_lowercase();
        Some(match name.as_str() {
            "start" => Command::Start,
            "ayuda" | "help" => Command::Help,
            "ingreso" => Command::Ingreso,
            "salida" => Command::Salida,
            _ => Command::Unknown(name),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Start => "start",
            Command::Help => "ayuda",
            Command::Ingreso => "ingreso",
            Command::Salida => "salida",
            Command::Unknown(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::parse("/ingreso"), Some(Command::Ingreso));
        assert_eq!(Command::parse(" /SALIDA "), Some(Command::Salida));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/ayuda ahora"), Some(Command::Help));
    }

    #[test]
    fn strips_bot_mention() {
        assert_eq!(Command::parse("/ingreso@AsistenciaBot"), Some(Command::Ingreso));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(Command::parse("CREW-7"), None);
    }

    #[test]
    fn unknown_command_keeps_name() {
        assert_eq!(
            Command::parse("/borrar"),
            Some(Command::Unknown("borrar".into()))
        );
    }
}
