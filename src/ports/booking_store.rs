//! Booking store port.
//!
//! Lookup of existing reservations by caller identity and the single
//! mutation the dialogue core is allowed: applying one confirmed
//! [`PendingChange`] to one booking.
//!
//! [`PendingChange`]: crate::domain::booking::PendingChange

use async_trait::async_trait;

use crate::domain::booking::{ExistingBookingRecord, PendingChange};
use crate::domain::foundation::{BookingId, DomainError, PhoneNumber};

/// Port for reservation persistence.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Returns all reservations for a caller, soonest first.
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Vec<ExistingBookingRecord>, DomainError>;

    /// Returns one reservation by id.
    async fn get_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<ExistingBookingRecord>, DomainError>;

    /// Applies exactly one confirmed change to one reservation.
    ///
    /// Returns false when the booking no longer exists.
    async fn update(&self, id: &BookingId, change: &PendingChange)
        -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn BookingStore) {}
    }
}
