//! Booking-modification domain module.
//!
//! The per-caller modification session, lazy-reference resolution against
//! candidate bookings, per-field collection handlers, and the state machine
//! that drives the negotiation.

mod fields;
mod machine;
mod reference;
mod session;

pub use fields::{handler_for, CollectOutcome, FieldContext, FieldHandler};
pub use machine::{ModificationStateMachine, TurnOutcome};
pub use reference::resolve_booking_reference;
pub use session::{ModificationSession, ModificationStage};
