//! Modifiable fields and pending-change payloads.
//!
//! A modification session negotiates exactly one field change at a time.
//! The negotiated outcome is a `PendingChange`: a tagged union with one
//! variant per modifiable attribute, carrying the fully-validated new value.
//! Nothing is written to the booking store until the user confirms, and the
//! confirmed payload is applied atomically via `BookingStore::update`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{weekday_name_es, ExistingBookingRecord, RiceSelection};

/// The six attributes of a reservation a caller can change in-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifiableField {
    Date,
    Time,
    PartySize,
    Rice,
    HighChairs,
    Strollers,
}

impl ModifiableField {
    /// All fields in the order they are offered to the user.
    pub const ALL: [ModifiableField; 6] = [
        ModifiableField::Date,
        ModifiableField::Time,
        ModifiableField::PartySize,
        ModifiableField::Rice,
        ModifiableField::HighChairs,
        ModifiableField::Strollers,
    ];

    /// User-facing label, e.g. for the "what do you want to change" menu.
    pub fn label(&self) -> &'static str {
        match self {
            ModifiableField::Date => "la fecha",
            ModifiableField::Time => "la hora",
            ModifiableField::PartySize => "el número de personas",
            ModifiableField::Rice => "el arroz",
            ModifiableField::HighChairs => "las tronas",
            ModifiableField::Strollers => "los carritos",
        }
    }

    /// Changing date, time, or party size can invalidate the availability
    /// the other two depend on, so those three always re-check.
    pub fn requires_availability_check(&self) -> bool {
        matches!(
            self,
            ModifiableField::Date | ModifiableField::Time | ModifiableField::PartySize
        )
    }
}

/// A fully-validated, not-yet-committed change to one booking field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum PendingChange {
    Date { date: NaiveDate },
    Time { time: NaiveTime },
    PartySize { party_size: u32 },
    Rice { rice: Option<RiceSelection> },
    HighChairs { count: u32 },
    Strollers { count: u32 },
}

impl PendingChange {
    /// The field this change targets.
    pub fn field(&self) -> ModifiableField {
        match self {
            PendingChange::Date { .. } => ModifiableField::Date,
            PendingChange::Time { .. } => ModifiableField::Time,
            PendingChange::PartySize { .. } => ModifiableField::PartySize,
            PendingChange::Rice { .. } => ModifiableField::Rice,
            PendingChange::HighChairs { .. } => ModifiableField::HighChairs,
            PendingChange::Strollers { .. } => ModifiableField::Strollers,
        }
    }

    /// Human-readable description presented at confirmation time.
    pub fn describe(&self) -> String {
        match self {
            PendingChange::Date { date } => format!(
                "cambiar la fecha al {} {}",
                weekday_name_es(*date),
                date.format("%d/%m/%Y")
            ),
            PendingChange::Time { time } => {
                format!("cambiar la hora a las {}", time.format("%H:%M"))
            }
            PendingChange::PartySize { party_size } => {
                format!("cambiar la reserva a {party_size} personas")
            }
            PendingChange::Rice { rice: Some(rice) } => {
                format!("cambiar el arroz a {}", rice.describe())
            }
            PendingChange::Rice { rice: None } => "quitar el arroz de la reserva".to_string(),
            PendingChange::HighChairs { count } => format!("reservar {count} tronas"),
            PendingChange::Strollers { count } => {
                format!("reservar espacio para {count} carritos")
            }
        }
    }

    /// Applies this change to a booking record, returning the updated copy.
    pub fn apply_to(&self, record: &ExistingBookingRecord) -> ExistingBookingRecord {
        let mut updated = record.clone();
        match self {
            PendingChange::Date { date } => updated.date = *date,
            PendingChange::Time { time } => updated.time = *time,
            PendingChange::PartySize { party_size } => updated.party_size = *party_size,
            PendingChange::Rice { rice } => updated.rice = rice.clone(),
            PendingChange::HighChairs { count } => updated.high_chair_count = *count,
            PendingChange::Strollers { count } => updated.stroller_count = *count,
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{BookingId, PhoneNumber};

    fn record() -> ExistingBookingRecord {
        ExistingBookingRecord {
            id: BookingId::new(),
            customer_name: "Marta".to_string(),
            phone: PhoneNumber::parse("34600111222").unwrap(),
            date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            party_size: 6,
            rice: Some(RiceSelection::new("Arroz Negro", 4, 6).unwrap()),
            high_chair_count: 1,
            stroller_count: 0,
        }
    }

    #[test]
    fn only_scheduling_fields_require_availability_check() {
        assert!(ModifiableField::Date.requires_availability_check());
        assert!(ModifiableField::Time.requires_availability_check());
        assert!(ModifiableField::PartySize.requires_availability_check());
        assert!(!ModifiableField::Rice.requires_availability_check());
        assert!(!ModifiableField::HighChairs.requires_availability_check());
        assert!(!ModifiableField::Strollers.requires_availability_check());
    }

    #[test]
    fn apply_date_changes_only_the_date() {
        let record = record();
        let new_date = NaiveDate::from_ymd_opt(2026, 2, 21).unwrap();
        let updated = PendingChange::Date { date: new_date }.apply_to(&record);
        assert_eq!(updated.date, new_date);
        assert_eq!(updated.time, record.time);
        assert_eq!(updated.party_size, record.party_size);
        assert_eq!(updated.rice, record.rice);
    }

    #[test]
    fn apply_rice_none_clears_the_rice() {
        let updated = PendingChange::Rice { rice: None }.apply_to(&record());
        assert_eq!(updated.rice, None);
    }

    #[test]
    fn apply_party_size_keeps_extras() {
        let updated = PendingChange::PartySize { party_size: 8 }.apply_to(&record());
        assert_eq!(updated.party_size, 8);
        assert_eq!(updated.high_chair_count, 1);
    }

    #[test]
    fn describe_clear_rice_reads_as_removal() {
        let text = PendingChange::Rice { rice: None }.describe();
        assert!(text.contains("quitar"));
    }

    #[test]
    fn change_reports_its_field() {
        let change = PendingChange::Time {
            time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        };
        assert_eq!(change.field(), ModifiableField::Time);
    }

    #[test]
    fn serializes_with_field_tag() {
        let change = PendingChange::PartySize { party_size: 4 };
        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("\"field\":\"party_size\""));
    }
}
