//! Commands for the Session context.

use questline_core::command::Command;
use uuid::Uuid;

/// Command to start a new game session.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Requested theme identifier.
    pub theme: String,
    /// Display name for the player character; blank means the default.
    pub character_name: String,
}

impl Command for StartGame {
    fn command_type(&self) -> &'static str {
        "session.start_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to answer the pending turn of a session.
#[derive(Debug, Clone)]
pub struct TakeAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to advance.
    pub session_id: Uuid,
    /// What the player does.
    pub action: String,
}

impl Command for TakeAction {
    fn command_type(&self) -> &'static str {
        "session.take_action"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_report_type_and_correlation_id() {
        let correlation_id = Uuid::new_v4();
        let start = StartGame {
            correlation_id,
            theme: "cyberpunk".into(),
            character_name: String::new(),
        };
        let action = TakeAction {
            correlation_id,
            session_id: Uuid::new_v4(),
            action: "Look".into(),
        };

        assert_eq!(start.command_type(), "session.start_game");
        assert_eq!(action.command_type(), "session.take_action");
        assert_eq!(start.correlation_id(), correlation_id);
        assert_eq!(Command::correlation_id(&action), correlation_id);
    }
}
