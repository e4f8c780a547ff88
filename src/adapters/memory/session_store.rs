//! In-memory session store adapter.
//!
//! Holds modification sessions and turn histories per caller. Useful for
//! testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::{ConversationTurn, TurnLog, TurnRole};
use crate::domain::foundation::{DomainError, PhoneNumber};
use crate::domain::modification::ModificationSession;
use crate::ports::SessionStore;

/// In-memory conversation state storage.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<PhoneNumber, ModificationSession>>>,
    histories: Arc<RwLock<HashMap<PhoneNumber, TurnLog>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load_session(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<ModificationSession>, DomainError> {
        Ok(self.sessions.read().await.get(phone).cloned())
    }

    async fn save_session(&self, session: &ModificationSession) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .insert(session.phone.clone(), session.clone());
        Ok(())
    }

    async fn clear_session(&self, phone: &PhoneNumber) -> Result<(), DomainError> {
        self.sessions.write().await.remove(phone);
        Ok(())
    }

    async fn append_turn(
        &self,
        phone: &PhoneNumber,
        role: TurnRole,
        text: &str,
    ) -> Result<(), DomainError> {
        let mut histories = self.histories.write().await;
        let log = histories.entry(phone.clone()).or_default();
        log.append(role, text)?;
        Ok(())
    }

    async fn history(&self, phone: &PhoneNumber) -> Result<Vec<ConversationTurn>, DomainError> {
        Ok(self
            .histories
            .read()
            .await
            .get(phone)
            .map(|log| log.turns().to_vec())
            .unwrap_or_default())
    }
}
