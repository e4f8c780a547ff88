//! Conversation turns and the append-only turn log.
//!
//! Turns are immutable records of user/assistant exchanges. The ordered log
//! is the only source of truth for slot extraction: snapshots are always
//! recomputed from the full sequence, never patched incrementally.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Role of a turn's speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Inbound message from the caller.
    User,
    /// Outbound assistant utterance.
    Assistant,
}

/// An immutable turn within a conversation.
///
/// # Invariants
///
/// - `text` is non-empty (validated at construction)
/// - `ordinal` is assigned by the log and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// The speaker.
    role: TurnRole,

    /// The turn text.
    text: String,

    /// Zero-based position within the conversation.
    ordinal: u32,

    /// When the turn was recorded.
    recorded_at: Timestamp,
}

impl ConversationTurn {
    /// Creates a turn.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if text is blank
    pub fn new(
        role: TurnRole,
        text: impl Into<String>,
        ordinal: u32,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(Self {
            role,
            text,
            ordinal,
            recorded_at: Timestamp::now(),
        })
    }

    /// Reconstitutes a turn from persistence (no validation).
    pub fn reconstitute(
        role: TurnRole,
        text: String,
        ordinal: u32,
        recorded_at: Timestamp,
    ) -> Self {
        Self {
            role,
            text,
            ordinal,
            recorded_at,
        }
    }

    /// Returns the speaker role.
    pub fn role(&self) -> TurnRole {
        self.role
    }

    /// Returns the turn text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the position within the conversation.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Returns when the turn was recorded.
    pub fn recorded_at(&self) -> &Timestamp {
        &self.recorded_at
    }

    /// Returns true if this turn came from the caller.
    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }

    /// Returns true if this turn came from the assistant.
    pub fn is_assistant(&self) -> bool {
        self.role == TurnRole::Assistant
    }
}

/// Append-only ordered sequence of turns for one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnLog {
    turns: Vec<ConversationTurn>,
}

impl TurnLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn, assigning the next ordinal.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if text is blank
    pub fn append(
        &mut self,
        role: TurnRole,
        text: impl Into<String>,
    ) -> Result<&ConversationTurn, ValidationError> {
        let ordinal = self.turns.len() as u32;
        let turn = ConversationTurn::new(role, text, ordinal)?;
        self.turns.push(turn);
        Ok(self.turns.last().expect("just pushed"))
    }

    /// Returns the full ordered sequence.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if the log has no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod turn {
        use super::*;

        #[test]
        fn creates_user_turn() {
            let turn = ConversationTurn::new(TurnRole::User, "hola", 0).unwrap();
            assert!(turn.is_user());
            assert_eq!(turn.text(), "hola");
            assert_eq!(turn.ordinal(), 0);
        }

        #[test]
        fn rejects_blank_text() {
            assert!(ConversationTurn::new(TurnRole::User, "   ", 0).is_err());
        }

        #[test]
        fn round_trips_through_serde() {
            let turn = ConversationTurn::new(TurnRole::Assistant, "¿para cuántos?", 3).unwrap();
            let json = serde_json::to_string(&turn).unwrap();
            let back: ConversationTurn = serde_json::from_str(&json).unwrap();
            assert_eq!(turn, back);
        }
    }

    mod log {
        use super::*;

        #[test]
        fn append_assigns_sequential_ordinals() {
            let mut log = TurnLog::new();
            log.append(TurnRole::User, "quiero reservar").unwrap();
            log.append(TurnRole::Assistant, "¿qué día?").unwrap();
            log.append(TurnRole::User, "el sábado").unwrap();

            let ordinals: Vec<u32> = log.turns().iter().map(|t| t.ordinal()).collect();
            assert_eq!(ordinals, vec![0, 1, 2]);
        }

        #[test]
        fn append_preserves_order() {
            let mut log = TurnLog::new();
            log.append(TurnRole::User, "primero").unwrap();
            log.append(TurnRole::User, "segundo").unwrap();
            assert_eq!(log.turns()[0].text(), "primero");
            assert_eq!(log.turns()[1].text(), "segundo");
        }

        #[test]
        fn empty_log_reports_empty() {
            let log = TurnLog::new();
            assert!(log.is_empty());
            assert_eq!(log.len(), 0);
        }

        #[test]
        fn rejects_blank_turn_without_appending() {
            let mut log = TurnLog::new();
            assert!(log.append(TurnRole::User, "").is_err());
            assert!(log.is_empty());
        }
    }
}
