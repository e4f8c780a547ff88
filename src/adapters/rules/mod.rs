//! Rule-based collaborator adapters.

mod availability;

pub use availability::{AvailabilityRules, RuleBasedAvailability};
