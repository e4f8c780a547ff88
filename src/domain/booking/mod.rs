//! Booking domain module.
//!
//! Reservation records as read from the booking store, rice selections,
//! and the pending-change payloads a modification session negotiates.

mod change;
mod record;
mod rice;

pub use change::{ModifiableField, PendingChange};
pub use record::{weekday_name_es, ExistingBookingRecord};
pub use rice::RiceSelection;
