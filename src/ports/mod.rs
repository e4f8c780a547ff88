//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue core and the outside world. Adapters implement these ports.
//!
//! - `BookingStore` - reservation lookup and the single confirmed-change
//!   mutation
//! - `AvailabilityOracle` - can this date/time/party-size be booked?
//! - `MenuValidator` - does this free text name a dish on the menu?
//! - `MessagingGateway` - human-escalation hand-offs (contact card)
//! - `SessionStore` - per-caller session and turn-history persistence
//! - `Responder` - the opaque natural-language responder for the
//!   fresh-booking flow

mod availability;
mod booking_store;
mod menu;
mod messaging;
mod responder;
mod session_store;

pub use availability::{AvailabilityOracle, AvailabilityVerdict, UnavailabilityReason};
pub use booking_store::BookingStore;
pub use menu::{MenuValidator, MenuVerdict};
pub use messaging::{ContactCard, MessagingGateway};
pub use responder::Responder;
pub use session_store::SessionStore;
