//! Template responder adapter.
//!
//! Deterministic stand-in for the LLM responder: asks for the first missing
//! slot, asks the rice question when only that remains, and summarizes for
//! confirmation. Production wires the real natural-language responder here;
//! tests and development use this one.

use async_trait::async_trait;

use crate::domain::dialogue::{
    BookingSnapshot, ConversationTurn, SlotKind, SnapshotStage,
};
use crate::domain::foundation::DomainError;
use crate::ports::Responder;

/// Rule-based responder over the extracted snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateResponder;

impl TemplateResponder {
    /// Creates the responder.
    pub fn new() -> Self {
        Self
    }

    fn greeting(history: &[ConversationTurn], push_name: &str) -> Option<String> {
        let first_exchange = !history.iter().any(|t| t.is_assistant());
        if first_exchange && !push_name.trim().is_empty() {
            Some(format!("¡Hola, {push_name}! "))
        } else if first_exchange {
            Some("¡Hola! ".to_string())
        } else {
            None
        }
    }

    fn ask_for(slot: SlotKind) -> &'static str {
        match slot {
            SlotKind::Date => "¿Qué día queréis venir?",
            SlotKind::Time => "¿A qué hora os va bien?",
            SlotKind::PartySize => "¿Cuántos seréis?",
            SlotKind::RiceDecision => {
                "¿Queréis encargar arroz? Hay que pedirlo con antelación."
            }
        }
    }
}

#[async_trait]
impl Responder for TemplateResponder {
    async fn reply(
        &self,
        history: &[ConversationTurn],
        snapshot: &BookingSnapshot,
        push_name: &str,
    ) -> Result<String, DomainError> {
        let greeting = Self::greeting(history, push_name).unwrap_or_default();

        let body = match snapshot.stage {
            SnapshotStage::AwaitingConfirmation => format!(
                "Pues lo tengo todo: {}. ¿Te lo confirmo?",
                snapshot.summary()
            ),
            _ => match snapshot.missing.first() {
                Some(slot) => Self::ask_for(*slot).to_string(),
                None => "¿En qué te puedo ayudar?".to_string(),
            },
        };

        Ok(format!("{greeting}{body}"))
    }
}
