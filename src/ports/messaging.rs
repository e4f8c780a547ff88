//! Messaging gateway port.
//!
//! Used only for human-escalation hand-offs: unsupported content and
//! large-group requests get the restaurant's contact card pushed alongside
//! the normal reply.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, PhoneNumber};

/// Contact details shared when handing a caller off to a human.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    /// Name shown on the card, e.g. the restaurant name.
    pub display_name: String,

    /// Phone number to call.
    pub phone: String,
}

/// Port for outbound messages beyond the ordinary turn reply.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Sends a free-standing text message.
    async fn send_text(&self, to: &PhoneNumber, text: &str) -> Result<(), DomainError>;

    /// Sends a contact card.
    async fn send_contact_card(
        &self,
        to: &PhoneNumber,
        card: &ContactCard,
    ) -> Result<(), DomainError>;
}
