//! Dialogue configuration.
//!
//! Thresholds and timeouts for the dialogue core, loadable from the
//! environment with the `MESABOT_` prefix (e.g. `MESABOT_SESSION_IDLE_SECS`).

use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::ports::ContactCard;

/// Configuration for the dialogue core.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// Party sizes above this are escalated to a human instead of booked
    /// in-band.
    #[serde(default = "default_large_group_threshold")]
    pub large_group_threshold: u32,

    /// Minimum rice servings the kitchen prepares.
    #[serde(default = "default_min_rice_servings")]
    pub min_rice_servings: u32,

    /// Maximum high chairs / stroller spaces per reservation.
    #[serde(default = "default_max_extra_count")]
    pub max_extra_count: u32,

    /// Seconds of inactivity after which a modification session expires.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Per-call timeout for collaborator services, in milliseconds.
    #[serde(default = "default_collaborator_timeout_ms")]
    pub collaborator_timeout_ms: u64,

    /// Name on the contact card sent on human hand-offs.
    #[serde(default = "default_contact_name")]
    pub contact_name: String,

    /// Phone on the contact card sent on human hand-offs.
    #[serde(default = "default_contact_phone")]
    pub contact_phone: String,
}

impl DialogueConfig {
    /// Loads configuration from `MESABOT_`-prefixed environment variables,
    /// falling back to defaults. Reads a local `.env` file if present.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        config::Config::builder()
            .add_source(config::Environment::with_prefix("MESABOT"))
            .build()?
            .try_deserialize()
    }

    /// The contact card for human hand-offs.
    pub fn contact_card(&self) -> ContactCard {
        ContactCard {
            display_name: self.contact_name.clone(),
            phone: self.contact_phone.clone(),
        }
    }

    /// Validates threshold coherence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.large_group_threshold == 0 {
            return Err(ValidationError::out_of_range(
                "large_group_threshold",
                1,
                i64::MAX,
                0,
            ));
        }
        if self.min_rice_servings == 0 {
            return Err(ValidationError::out_of_range("min_rice_servings", 1, i64::MAX, 0));
        }
        if self.collaborator_timeout_ms == 0 {
            return Err(ValidationError::out_of_range(
                "collaborator_timeout_ms",
                1,
                i64::MAX,
                0,
            ));
        }
        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            large_group_threshold: default_large_group_threshold(),
            min_rice_servings: default_min_rice_servings(),
            max_extra_count: default_max_extra_count(),
            session_idle_secs: default_session_idle_secs(),
            collaborator_timeout_ms: default_collaborator_timeout_ms(),
            contact_name: default_contact_name(),
            contact_phone: default_contact_phone(),
        }
    }
}

fn default_large_group_threshold() -> u32 {
    10
}

fn default_min_rice_servings() -> u32 {
    2
}

fn default_max_extra_count() -> u32 {
    3
}

fn default_session_idle_secs() -> u64 {
    1800
}

fn default_collaborator_timeout_ms() -> u64 {
    5000
}

fn default_contact_name() -> String {
    "Restaurante".to_string()
}

fn default_contact_phone() -> String {
    "+34960000000".to_string()
}
