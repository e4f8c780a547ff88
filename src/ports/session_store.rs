//! Session store port.
//!
//! Persists the per-caller modification session and the append-only turn
//! history. Keyed by caller identity; the orchestrator serializes access
//! per identity, so implementations need no cross-call coordination beyond
//! plain interior mutability.

use async_trait::async_trait;

use crate::domain::dialogue::{ConversationTurn, TurnRole};
use crate::domain::foundation::{DomainError, PhoneNumber};
use crate::domain::modification::ModificationSession;

/// Port for conversation state persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the caller's modification session, if one is open.
    async fn load_session(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<ModificationSession>, DomainError>;

    /// Saves (creates or replaces) the caller's modification session.
    async fn save_session(&self, session: &ModificationSession) -> Result<(), DomainError>;

    /// Destroys the caller's modification session.
    async fn clear_session(&self, phone: &PhoneNumber) -> Result<(), DomainError>;

    /// Appends a turn to the caller's conversation history.
    async fn append_turn(
        &self,
        phone: &PhoneNumber,
        role: TurnRole,
        text: &str,
    ) -> Result<(), DomainError>;

    /// Returns the caller's full ordered turn history.
    async fn history(&self, phone: &PhoneNumber) -> Result<Vec<ConversationTurn>, DomainError>;
}
