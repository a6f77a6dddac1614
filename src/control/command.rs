// src/control/command.rs
//! Command vocabulary of the control socket

use std::fmt;

/// A parsed control command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a workout
    Use,
    /// Free-form action; `payload` is everything after the fourth character
    Act { payload: String },
    Unknown(String),
}

impl Command {
    /// Classify one command line. Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text == "use" {
            Command::Use
        } else if text.starts_with("act") {
            let payload = text
                .char_indices()
                .nth(4)
                .map(|(offset, _)| &text[offset..])
                .unwrap_or("");
            Command::Act { payload: payload.to_string() }
        } else {
            Command::Unknown(text.to_string())
        }
    }
}

/// The single reply written back on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ok,
    ActionAcknowledged,
    UnknownCommand,
    /// A workout is already running and overlap is not allowed
    Busy,
}

impl Reply {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reply::Ok => "ok",
            Reply::ActionAcknowledged => "action acknowledged",
            Reply::UnknownCommand => "unknown command",
            Reply::Busy => "busy",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "ok" => Some(Reply::Ok),
            "action acknowledged" => Some(Reply::ActionAcknowledged),
            "unknown command" => Some(Reply::UnknownCommand),
            "busy" => Some(Reply::Busy),
            _ => None,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_use() {
        assert_eq!(Command::parse("use"), Command::Use);
        assert_eq!(Command::parse("  use\r\n"), Command::Use);
        assert_eq!(Command::parse("user"), Command::Unknown("user".to_string()));
        assert_eq!(Command::parse("USE"), Command::Unknown("USE".to_string()));
    }

    #[test]
    fn test_parse_act_payload_offset() {
        assert_eq!(Command::parse("act:curl"), Command::Act { payload: "curl".to_string() });
        assert_eq!(
            Command::parse("act pause now"),
            Command::Act { payload: "pause now".to_string() }
        );
        assert_eq!(Command::parse("act"), Command::Act { payload: String::new() });
        assert_eq!(Command::parse("acti"), Command::Act { payload: String::new() });
        assert_eq!(Command::parse("action"), Command::Act { payload: "on".to_string() });
        assert_eq!(Command::parse("act é"), Command::Act { payload: "é".to_string() });
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse("ping"), Command::Unknown("ping".to_string()));
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
    }

    #[test]
    fn test_reply_wire_strings() {
        for reply in [Reply::Ok, Reply::ActionAcknowledged, Reply::UnknownCommand, Reply::Busy] {
            assert_eq!(Reply::parse(reply.as_str()), Some(reply));
            assert_eq!(reply.to_string(), reply.as_str());
        }
        assert_eq!(Reply::parse("nope"), None);
    }
}
