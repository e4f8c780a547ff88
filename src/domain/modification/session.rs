//! Modification session record.
//!
//! One session per caller identity at a time. The session carries the full
//! negotiation state: candidate bookings, the selected one, the field being
//! changed, and the pending change awaiting confirmation. It advances at
//! most one stage per valid turn, and is destroyed on commit, cancellation,
//! escalation, or idle expiry.

use serde::{Deserialize, Serialize};

use crate::domain::booking::{ExistingBookingRecord, ModifiableField, PendingChange};
use crate::domain::foundation::{PhoneNumber, StateMachine, Timestamp};

/// Stage of the modification negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationStage {
    /// Several reservations matched the caller; waiting for a reference.
    SelectingBooking,

    /// Waiting for which attribute to change.
    SelectingField,

    /// Waiting for (and validating) the new value.
    CollectingNewValue,

    /// Pending change stored; waiting for yes/no.
    AwaitingConfirmation,
}

impl StateMachine for ModificationStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ModificationStage::*;
        matches!(
            (self, target),
            (SelectingBooking, SelectingField)
                | (SelectingField, CollectingNewValue)
                | (CollectingNewValue, AwaitingConfirmation)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ModificationStage::*;
        match self {
            SelectingBooking => vec![SelectingField],
            SelectingField => vec![CollectingNewValue],
            CollectingNewValue => vec![AwaitingConfirmation],
            // terminal by transition; the session is cleared on commit/cancel
            AwaitingConfirmation => vec![],
        }
    }
}

/// Per-caller negotiation state for changing one booking field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationSession {
    /// Caller identity the session is keyed by.
    pub phone: PhoneNumber,

    /// Current stage.
    pub stage: ModificationStage,

    /// Candidate bookings found for this caller.
    pub candidates: Vec<ExistingBookingRecord>,

    /// The booking being modified, once resolved.
    pub selected: Option<ExistingBookingRecord>,

    /// The attribute being changed, once resolved.
    pub field: Option<ModifiableField>,

    /// The validated change awaiting confirmation.
    pub pending: Option<PendingChange>,

    /// User-facing description of the pending change.
    pub description: Option<String>,

    /// A validated dish held while the serving count is still pending.
    pub held_dish: Option<String>,

    /// Last turn that touched this session, for idle expiry.
    pub last_active: Timestamp,
}

impl ModificationSession {
    /// Opens a session with several candidates to choose among.
    pub fn selecting_booking(
        phone: PhoneNumber,
        candidates: Vec<ExistingBookingRecord>,
    ) -> Self {
        Self {
            phone,
            stage: ModificationStage::SelectingBooking,
            candidates,
            selected: None,
            field: None,
            pending: None,
            description: None,
            held_dish: None,
            last_active: Timestamp::now(),
        }
    }

    /// Opens a session with the single matching booking pre-selected.
    pub fn selecting_field(phone: PhoneNumber, booking: ExistingBookingRecord) -> Self {
        Self {
            phone,
            stage: ModificationStage::SelectingField,
            candidates: vec![booking.clone()],
            selected: Some(booking),
            field: None,
            pending: None,
            description: None,
            held_dish: None,
            last_active: Timestamp::now(),
        }
    }

    /// Marks the session as touched now.
    pub fn touch(&mut self) {
        self.last_active = Timestamp::now();
    }

    /// True once the session has sat idle longer than `idle_secs`.
    pub fn is_expired(&self, now: Timestamp, idle_secs: u64) -> bool {
        now.duration_since(&self.last_active).num_seconds() >= idle_secs as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use crate::domain::foundation::BookingId;

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("34600111222").unwrap()
    }

    fn booking() -> ExistingBookingRecord {
        ExistingBookingRecord {
            id: BookingId::new(),
            customer_name: "Marta".into(),
            phone: phone(),
            date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            party_size: 4,
            rice: None,
            high_chair_count: 0,
            stroller_count: 0,
        }
    }

    mod stage_machine {
        use super::*;

        #[test]
        fn advances_one_stage_at_a_time() {
            use ModificationStage::*;
            assert!(SelectingBooking.can_transition_to(&SelectingField));
            assert!(SelectingField.can_transition_to(&CollectingNewValue));
            assert!(CollectingNewValue.can_transition_to(&AwaitingConfirmation));
        }

        #[test]
        fn cannot_skip_stages() {
            use ModificationStage::*;
            assert!(!SelectingBooking.can_transition_to(&CollectingNewValue));
            assert!(!SelectingField.can_transition_to(&AwaitingConfirmation));
        }

        #[test]
        fn cannot_move_backwards() {
            use ModificationStage::*;
            assert!(!SelectingField.can_transition_to(&SelectingBooking));
            assert!(!AwaitingConfirmation.can_transition_to(&CollectingNewValue));
        }

        #[test]
        fn awaiting_confirmation_is_terminal() {
            assert!(ModificationStage::AwaitingConfirmation.is_terminal());
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn single_candidate_opens_at_selecting_field() {
            let session = ModificationSession::selecting_field(phone(), booking());
            assert_eq!(session.stage, ModificationStage::SelectingField);
            assert!(session.selected.is_some());
        }

        #[test]
        fn several_candidates_open_at_selecting_booking() {
            let session =
                ModificationSession::selecting_booking(phone(), vec![booking(), booking()]);
            assert_eq!(session.stage, ModificationStage::SelectingBooking);
            assert!(session.selected.is_none());
            assert_eq!(session.candidates.len(), 2);
        }

        #[test]
        fn fresh_session_is_not_expired() {
            let session = ModificationSession::selecting_field(phone(), booking());
            assert!(!session.is_expired(Timestamp::now(), 1800));
        }

        #[test]
        fn idle_session_expires() {
            let mut session = ModificationSession::selecting_field(phone(), booking());
            session.last_active = Timestamp::now().minus_secs(3600);
            assert!(session.is_expired(Timestamp::now(), 1800));
        }

        #[test]
        fn touch_resets_the_idle_clock() {
            let mut session = ModificationSession::selecting_field(phone(), booking());
            session.last_active = Timestamp::now().minus_secs(3600);
            session.touch();
            assert!(!session.is_expired(Timestamp::now(), 1800));
        }
    }
}
