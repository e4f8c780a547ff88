//! Adapters - Implementations of the ports.
//!
//! - `memory` - in-memory booking/session stores and a recording gateway
//! - `rules` - rule-based availability oracle
//! - `menu` - static menu validator
//! - `responder` - deterministic template responder

pub mod memory;
pub mod menu;
pub mod responder;
pub mod rules;

pub use memory::{InMemoryBookingStore, InMemorySessionStore, RecordingMessagingGateway};
pub use menu::StaticMenuValidator;
pub use responder::TemplateResponder;
pub use rules::{AvailabilityRules, RuleBasedAvailability};
