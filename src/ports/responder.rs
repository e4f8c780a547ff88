//! Responder port.
//!
//! The opaque natural-language responder (an LLM in production) that
//! phrases the next assistant utterance for the fresh-booking flow. The
//! dialogue core hands it the full history plus the extracted snapshot;
//! what it says is its business, what has been gathered is ours.
//!
//! Modification-flow replies are deterministic and never go through this
//! port.

use async_trait::async_trait;

use crate::domain::dialogue::{BookingSnapshot, ConversationTurn};
use crate::domain::foundation::DomainError;

/// Port for the natural-language responder.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produces the next assistant utterance.
    async fn reply(
        &self,
        history: &[ConversationTurn],
        snapshot: &BookingSnapshot,
        push_name: &str,
    ) -> Result<String, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responder_is_object_safe() {
        fn _accepts_dyn(_responder: &dyn Responder) {}
    }
}
