//! Menu validator port.
//!
//! The dialogue core recognizes the *shape* of a dish mention; whether the
//! phrase names a real dish, and under which canonical name, is decided by
//! the menu service behind this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// Outcome of validating a free-text dish mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MenuVerdict {
    /// The text names a dish on the menu.
    Valid { canonical_name: String },

    /// The text does not match the menu; `message` explains and usually
    /// lists what is on offer.
    Rejected { message: String },
}

/// Port for the external menu service.
#[async_trait]
pub trait MenuValidator: Send + Sync {
    /// Resolves free text to a canonical dish name, or rejects it.
    async fn validate(&self, free_text: &str) -> Result<MenuVerdict, DomainError>;
}
