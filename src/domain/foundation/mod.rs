//! Foundation value objects shared across the domain.
//!
//! Strongly-typed identifiers, error types, timestamps, and the state
//! machine trait used by session and snapshot lifecycle enums.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BookingId, PhoneNumber};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
