//! Lazy-reference resolution against candidate bookings.
//!
//! Callers rarely name a reservation by identifier; they say "la segunda",
//! "la del sábado", "la de las 21:00", "la de 6 personas", or "la del
//! 12/09". Resolution is an ordered chain of partial matchers evaluated in
//! fixed precedence, stopping at the first strategy that actually selects a
//! booking. A strategy that parses something but matches no candidate falls
//! through to the next one.

use chrono::Datelike;

use crate::domain::booking::ExistingBookingRecord;
use crate::domain::dialogue::{lexicon, DateRef};

/// One way of reading a booking reference.
struct Strategy {
    name: &'static str,
    matches: fn(&str, &ExistingBookingRecord, usize) -> bool,
}

/// Precedence order: ordinal, weekday, time, party size, explicit date.
static STRATEGIES: &[Strategy] = &[
    Strategy { name: "ordinal", matches: by_ordinal },
    Strategy { name: "weekday", matches: by_weekday },
    Strategy { name: "time", matches: by_time },
    Strategy { name: "party_size", matches: by_party_size },
    Strategy { name: "explicit_date", matches: by_explicit_date },
];

fn by_ordinal(norm: &str, _booking: &ExistingBookingRecord, index: usize) -> bool {
    lexicon::parse_ordinal(norm) == Some(index + 1)
}

fn by_weekday(norm: &str, booking: &ExistingBookingRecord, _index: usize) -> bool {
    lexicon::parse_weekday(norm) == Some(booking.date.weekday())
}

fn by_time(norm: &str, booking: &ExistingBookingRecord, _index: usize) -> bool {
    lexicon::parse_time(norm) == Some(booking.time)
}

fn by_party_size(norm: &str, booking: &ExistingBookingRecord, _index: usize) -> bool {
    lexicon::parse_party_reference(norm) == Some(booking.party_size)
}

fn by_explicit_date(norm: &str, booking: &ExistingBookingRecord, _index: usize) -> bool {
    match lexicon::parse_explicit_date(norm) {
        Some(DateRef::DayMonth { day, month }) => {
            booking.date.day() == day && booking.date.month() == month
        }
        Some(DateRef::Explicit { date }) => booking.date == date,
        _ => false,
    }
}

/// Resolves a caller's reference to an index into `candidates`.
///
/// Returns the matched index and the name of the strategy that matched
/// (for logging), or `None` to re-prompt.
pub fn resolve_booking_reference(
    text: &str,
    candidates: &[ExistingBookingRecord],
) -> Option<(usize, &'static str)> {
    let norm = lexicon::normalize(text);
    for strategy in STRATEGIES {
        let hit = candidates
            .iter()
            .enumerate()
            .find(|(i, booking)| (strategy.matches)(&norm, booking, *i));
        if let Some((index, _)) = hit {
            return Some((index, strategy.name));
        }
    }
    None
}
