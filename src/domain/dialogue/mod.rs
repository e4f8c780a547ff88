//! Dialogue domain module.
//!
//! The conversation turn log, the lexicon for parsing caller turns, and the
//! slot extractor that projects the log into a booking-intent snapshot.

mod date_ref;
mod extractor;
pub mod lexicon;
mod snapshot;
mod turn;

pub use date_ref::{DateRef, RelativeDay};
pub use extractor::SlotExtractor;
pub use snapshot::{BookingSnapshot, Extras, RiceDecision, SlotKind, SnapshotStage};
pub use turn::{ConversationTurn, TurnLog, TurnRole};
