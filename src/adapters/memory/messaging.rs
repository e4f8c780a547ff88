//! Recording messaging gateway adapter.
//!
//! Captures outbound hand-off messages instead of delivering them. Used in
//! tests to assert on escalation behavior.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PhoneNumber};
use crate::ports::{ContactCard, MessagingGateway};

/// Messaging gateway that records instead of sending.
#[derive(Debug, Clone, Default)]
pub struct RecordingMessagingGateway {
    texts: Arc<RwLock<Vec<(PhoneNumber, String)>>>,
    cards: Arc<RwLock<Vec<(PhoneNumber, ContactCard)>>>,
}

impl RecordingMessagingGateway {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All texts sent so far.
    pub async fn sent_texts(&self) -> Vec<(PhoneNumber, String)> {
        self.texts.read().await.clone()
    }

    /// All contact cards sent so far.
    pub async fn sent_cards(&self) -> Vec<(PhoneNumber, ContactCard)> {
        self.cards.read().await.clone()
    }
}

#[async_trait]
impl MessagingGateway for RecordingMessagingGateway {
    async fn send_text(&self, to: &PhoneNumber, text: &str) -> Result<(), DomainError> {
        self.texts
            .write()
            .await
            .push((to.clone(), text.to_string()));
        Ok(())
    }

    async fn send_contact_card(
        &self,
        to: &PhoneNumber,
        card: &ContactCard,
    ) -> Result<(), DomainError> {
        self.cards.write().await.push((to.clone(), card.clone()));
        Ok(())
    }
}
