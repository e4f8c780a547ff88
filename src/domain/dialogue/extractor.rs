//! Slot extraction over the full turn log.
//!
//! `SlotExtractor::extract` is a pure projection: same turns in, same
//! snapshot out. It always rescans the complete history instead of patching
//! previous state, which is what makes corrections reliably overwrite stale
//! values no matter how many interruptions or topic changes intervene.
//!
//! Replacement policy for date, time, and party size: the first turn that
//! states a value sets it; after that, only a turn carrying a correction
//! marker may replace it. A bald restatement (or an incidental day name in
//! an unrelated question) leaves the known value untouched.

use super::lexicon;
use super::{BookingSnapshot, ConversationTurn, Extras, RiceDecision};

/// Derives a [`BookingSnapshot`] from an ordered turn sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotExtractor;

impl SlotExtractor {
    /// Creates an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Recomputes the snapshot from the full turn sequence.
    pub fn extract(&self, turns: &[ConversationTurn]) -> BookingSnapshot {
        let mut date = None;
        let mut time = None;
        let mut party_size = None;
        let mut rice = RiceDecision::Undecided;
        let mut extras = Extras::default();
        let mut assistant_asked_rice = false;

        for turn in turns {
            if turn.is_assistant() {
                let norm = lexicon::normalize(turn.text());
                if lexicon::mentions_rice(&norm) {
                    assistant_asked_rice = true;
                }
                continue;
            }

            let norm = lexicon::normalize(turn.text());
            let corrected = lexicon::has_correction_marker(&norm);

            if let Some(stated) = lexicon::parse_date_ref(&norm) {
                if date.is_none() || corrected {
                    date = Some(stated);
                }
            }
            if let Some(stated) = lexicon::parse_time(&norm) {
                if time.is_none() || corrected {
                    time = Some(stated);
                }
            }
            if let Some(stated) = lexicon::parse_party_size(&norm) {
                if party_size.is_none() || corrected {
                    party_size = Some(stated);
                }
            }

            Self::collect_rice(&norm, assistant_asked_rice, &mut rice);
            Self::collect_extras(&norm, &mut extras);
        }

        BookingSnapshot::from_slots(date, time, party_size, rice, extras)
    }

    /// Rice handling. An explicit decline phrase always counts; a bare "no"
    /// counts only once the assistant has raised rice, since outside that
    /// context it answers something else.
    fn collect_rice(norm: &str, assistant_asked_rice: bool, rice: &mut RiceDecision) {
        if lexicon::is_rice_decline(norm)
            || (assistant_asked_rice && lexicon::is_bare_no(norm))
        {
            *rice = RiceDecision::Declined;
            return;
        }

        if let Some(dish) = lexicon::extract_dish_phrase(norm) {
            let servings = match rice {
                RiceDecision::Chosen { servings, .. } => *servings,
                _ => None,
            };
            *rice = RiceDecision::Chosen { dish, servings };
        }

        if let Some(count) = lexicon::parse_servings(norm) {
            if let RiceDecision::Chosen { servings, .. } = rice {
                *servings = Some(count);
            }
        }
    }

    /// Extras are additive observations: the latest mention wins without
    /// needing a correction marker.
    fn collect_extras(norm: &str, extras: &mut Extras) {
        if let Some(count) = lexicon::parse_high_chairs(norm) {
            extras.high_chair_count = count;
        }
        if lexicon::mentions_stroller(norm) {
            extras.stroller_space_requested = true;
        }
    }
}
