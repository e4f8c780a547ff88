//! Availability oracle port.
//!
//! Answers whether a date/time/party-size combination can be booked, with
//! alternatives when it cannot. The reason taxonomy matters: the
//! modification flow keeps negotiating on ordinary capacity conflicts but
//! hands off to a human on same-day and out-of-window rejections.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// Why a requested slot cannot be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailabilityReason {
    /// Same-day requests are not handled in-band; the caller must phone.
    SameDay,

    /// The date falls outside the accepted booking window.
    OutsideWindow,

    /// The slot is simply full (or the time is outside service hours).
    NoCapacity,
}

impl UnavailabilityReason {
    /// True if this rejection ends the in-band flow and hands off to a human.
    pub fn requires_handoff(&self) -> bool {
        matches!(self, Self::SameDay | Self::OutsideWindow)
    }
}

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityVerdict {
    /// Whether the requested combination can be booked.
    pub is_available: bool,

    /// Set when unavailable.
    pub reason: Option<UnavailabilityReason>,

    /// Alternative hours on the requested date.
    pub suggested_hours: Vec<NaiveTime>,

    /// An alternative date, when the whole day is out.
    pub suggested_date: Option<NaiveDate>,

    /// Optional explanation to relay to the caller.
    pub message: Option<String>,
}

impl AvailabilityVerdict {
    /// The requested slot can be booked.
    pub fn available() -> Self {
        Self {
            is_available: true,
            reason: None,
            suggested_hours: Vec::new(),
            suggested_date: None,
            message: None,
        }
    }

    /// The requested slot cannot be booked.
    pub fn unavailable(reason: UnavailabilityReason) -> Self {
        Self {
            is_available: false,
            reason: Some(reason),
            suggested_hours: Vec::new(),
            suggested_date: None,
            message: None,
        }
    }

    /// Attaches alternative hours.
    pub fn with_suggested_hours(mut self, hours: Vec<NaiveTime>) -> Self {
        self.suggested_hours = hours;
        self
    }

    /// Attaches an alternative date.
    pub fn with_suggested_date(mut self, date: NaiveDate) -> Self {
        self.suggested_date = Some(date);
        self
    }

    /// Attaches an explanation.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Port for the external availability service.
#[async_trait]
pub trait AvailabilityOracle: Send + Sync {
    /// Evaluates whether `party_size` diners fit on `date` at `time`.
    async fn evaluate(
        &self,
        date: NaiveDate,
        party_size: u32,
        time: NaiveTime,
    ) -> Result<AvailabilityVerdict, DomainError>;
}
