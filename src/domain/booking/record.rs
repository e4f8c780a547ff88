//! Existing reservation record.
//!
//! Read-only view of a reservation as stored by the booking store. The
//! dialogue core never mutates a record directly; confirmed modifications go
//! through `BookingStore::update` with a [`PendingChange`] payload.
//!
//! [`PendingChange`]: super::PendingChange

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, PhoneNumber};

use super::RiceSelection;

/// A reservation already held in the booking store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingBookingRecord {
    /// Store identity of the reservation.
    pub id: BookingId,

    /// Name the reservation is under.
    pub customer_name: String,

    /// Contact phone the reservation is keyed by.
    pub phone: PhoneNumber,

    /// Reservation date.
    pub date: NaiveDate,

    /// Reservation time.
    pub time: NaiveTime,

    /// Number of diners.
    pub party_size: u32,

    /// Pre-ordered rice, if any.
    pub rice: Option<RiceSelection>,

    /// High chairs reserved.
    pub high_chair_count: u32,

    /// Stroller spaces reserved.
    pub stroller_count: u32,
}

impl ExistingBookingRecord {
    /// One-line summary used when listing candidate bookings, e.g.
    /// "sábado 14/02 a las 14:00, 6 personas".
    pub fn summary(&self) -> String {
        let day = weekday_name_es(self.date);
        let mut s = format!(
            "{} {} a las {}, {} personas",
            day,
            self.date.format("%d/%m"),
            self.time.format("%H:%M"),
            self.party_size
        );
        if let Some(rice) = &self.rice {
            s.push_str(&format!(", {}", rice.describe()));
        }
        s
    }
}

/// Spanish weekday name, lowercase, for user-facing summaries.
pub fn weekday_name_es(date: NaiveDate) -> &'static str {
    use chrono::{Datelike, Weekday};
    match date.weekday() {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}
