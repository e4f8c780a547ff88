//! Booking-intent snapshot derived from the conversation.
//!
//! A snapshot is a projection over the full turn log: it is recomputed from
//! scratch on every turn and never patched in place. The missing-slot set
//! and stage are derived at construction so they can never drift from the
//! slot values.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::DateRef;

/// The four slots a fresh booking needs before confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Date,
    Time,
    PartySize,
    RiceDecision,
}

/// Where the fresh-booking dialogue stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStage {
    /// One of date, time, or party size is still unknown.
    CollectingInfo,

    /// Date, time, and party size are known; rice is not yet decided.
    AwaitingRiceDecision,

    /// All four slots resolved; waiting for the caller to confirm.
    AwaitingConfirmation,
}

/// The rice slot distinguishes "not yet answered" from "answered: none",
/// so the flow never re-asks a caller who already declined.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RiceDecision {
    /// The caller has not addressed rice yet.
    #[default]
    Undecided,

    /// The caller explicitly declined rice.
    Declined,

    /// A dish was named; servings may still be pending.
    Chosen {
        dish: String,
        servings: Option<u32>,
    },
}

impl RiceDecision {
    /// True once the caller has answered the rice question either way.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, RiceDecision::Undecided)
    }
}

/// Child-related extras. Observations are additive across turns: restating
/// them needs no correction marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extras {
    /// High chairs requested.
    pub high_chair_count: u32,

    /// Whether stroller space was requested.
    pub stroller_space_requested: bool,
}

/// Structured booking intent as of the latest turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSnapshot {
    /// Requested date, as stated.
    pub date: Option<DateRef>,

    /// Requested time of day.
    pub time: Option<NaiveTime>,

    /// Number of diners.
    pub party_size: Option<u32>,

    /// Rice decision.
    pub rice: RiceDecision,

    /// Child-related extras.
    pub extras: Extras,

    /// Slots still unresolved, in canonical order.
    pub missing: Vec<SlotKind>,

    /// Dialogue stage implied by the slots.
    pub stage: SnapshotStage,
}

impl BookingSnapshot {
    /// Builds a snapshot from resolved slot values, deriving the missing
    /// set and stage.
    pub fn from_slots(
        date: Option<DateRef>,
        time: Option<NaiveTime>,
        party_size: Option<u32>,
        rice: RiceDecision,
        extras: Extras,
    ) -> Self {
        let mut missing = Vec::new();
        if date.is_none() {
            missing.push(SlotKind::Date);
        }
        if time.is_none() {
            missing.push(SlotKind::Time);
        }
        if party_size.is_none() {
            missing.push(SlotKind::PartySize);
        }
        if !rice.is_resolved() {
            missing.push(SlotKind::RiceDecision);
        }

        let core_resolved = date.is_some() && time.is_some() && party_size.is_some();
        let stage = if missing.is_empty() {
            SnapshotStage::AwaitingConfirmation
        } else if core_resolved {
            SnapshotStage::AwaitingRiceDecision
        } else {
            SnapshotStage::CollectingInfo
        };

        Self {
            date,
            time,
            party_size,
            rice,
            extras,
            missing,
            stage,
        }
    }

    /// An empty snapshot: nothing resolved yet.
    pub fn empty() -> Self {
        Self::from_slots(None, None, None, RiceDecision::Undecided, Extras::default())
    }

    /// User-facing summary of what has been gathered, for the confirmation
    /// prompt.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(date) = &self.date {
            parts.push(date.describe());
        }
        if let Some(time) = &self.time {
            parts.push(format!("a las {}", time.format("%H:%M")));
        }
        if let Some(n) = self.party_size {
            parts.push(format!("{n} personas"));
        }
        match &self.rice {
            RiceDecision::Undecided => {}
            RiceDecision::Declined => parts.push("sin arroz".to_string()),
            RiceDecision::Chosen { dish, servings } => match servings {
                Some(n) => parts.push(format!("{dish} ({n} raciones)")),
                None => parts.push(dish.clone()),
            },
        }
        if self.extras.high_chair_count > 0 {
            parts.push(format!("{} tronas", self.extras.high_chair_count));
        }
        if self.extras.stroller_space_requested {
            parts.push("espacio para carrito".to_string());
        }
        parts.join(", ")
    }
}
