//! Lexical tables and parsers for caller turns.
//!
//! All matching runs over a normalized form: lowercased, accent-folded,
//! tokenized on whitespace with edge punctuation trimmed. Tables carry both
//! Spanish and English forms because callers mix the two freely.
//!
//! Parsers here recognize shapes only; authoritative validation (menu
//! dishes, availability) is delegated to the collaborator ports.

use chrono::{NaiveTime, Weekday};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{DateRef, RelativeDay};

/// Lexical cues that signal the caller is revising a previously stated
/// value rather than restating it.
static CORRECTION_MARKERS: &[&str] = &[
    "mejor",
    "espera",
    "en realidad",
    "al final",
    "mas bien",
    "perdon",
    "perdona",
    "me he equivocado",
    "me equivoque",
    "rectifico",
    "actually",
    "wait",
    "better",
    "sorry",
    "instead",
    "scratch that",
    "my mistake",
    "i meant",
    "make that",
];

static AFFIRMATIVES: &[&str] = &[
    "si", "vale", "ok", "okay", "claro", "perfecto", "confirmo", "confirma", "confirmar",
    "confirm", "confirmed", "correcto", "yes", "yep", "sure", "genial", "adelante", "eso es",
    "de acuerdo",
];

static NEGATIVE_LEADS: &[&str] = &["no", "nope", "que va"];

static CANCEL_PHRASES: &[&str] = &[
    "cancela",
    "cancelar",
    "cancelalo",
    "cancel",
    "dejalo",
    "olvidalo",
    "deja estar",
    "nada nada",
    "forget it",
    "never mind",
    "leave it",
];

static RESERVATION_WORDS: &[&str] = &["reserva", "reservation", "booking", "mesa"];

static MODIFICATION_VERBS: &[&str] = &["cambiar", "cambia", "cambio", "change", "move", "mover"];

static STANDALONE_MODIFICATION_VERBS: &[&str] = &[
    "modificar",
    "modifica",
    "modify",
    "reschedule",
    "reprogramar",
];

static RICE_WORDS: &[&str] = &["arroz", "paella", "rice"];

static RICE_DECLINE_PHRASES: &[&str] = &[
    "sin arroz",
    "no arroz",
    "nada de arroz",
    "no queremos arroz",
    "no rice",
    "without rice",
    "no paella",
    "sin paella",
];

static ADULT_WORDS: &[&str] = &["adultos", "adulto", "adults", "adult", "mayores", "grandes"];

static CHILD_WORDS: &[&str] = &["ninos", "nino", "ninas", "nina", "children", "child", "kids", "kid", "peques"];

static PEOPLE_WORDS: &[&str] = &[
    "personas",
    "persona",
    "people",
    "persons",
    "pax",
    "comensales",
];

static HIGH_CHAIR_WORDS: &[&str] = &["trona", "tronas", "highchair", "highchairs"];

static STROLLER_WORDS: &[&str] = &[
    "carrito",
    "carritos",
    "cochecito",
    "cochecitos",
    "stroller",
    "strollers",
    "pram",
    "buggy",
];

static SERVING_WORDS: &[&str] = &["racion", "raciones", "serving", "servings", "portion", "portions"];

static NUMBER_WORDS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (word, n) in [
        ("un", 1u32),
        ("uno", 1),
        ("una", 1),
        ("dos", 2),
        ("tres", 3),
        ("cuatro", 4),
        ("cinco", 5),
        ("seis", 6),
        ("siete", 7),
        ("ocho", 8),
        ("nueve", 9),
        ("diez", 10),
        ("once", 11),
        ("doce", 12),
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
        ("eleven", 11),
        ("twelve", 12),
    ] {
        m.insert(word, n);
    }
    m
});

static WEEKDAYS: Lazy<HashMap<&'static str, Weekday>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (word, day) in [
        ("lunes", Weekday::Mon),
        ("martes", Weekday::Tue),
        ("miercoles", Weekday::Wed),
        ("jueves", Weekday::Thu),
        ("viernes", Weekday::Fri),
        ("sabado", Weekday::Sat),
        ("domingo", Weekday::Sun),
        ("monday", Weekday::Mon),
        ("tuesday", Weekday::Tue),
        ("wednesday", Weekday::Wed),
        ("thursday", Weekday::Thu),
        ("friday", Weekday::Fri),
        ("saturday", Weekday::Sat),
        ("sunday", Weekday::Sun),
    ] {
        m.insert(word, day);
    }
    m
});

static ORDINAL_WORDS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (word, n) in [
        ("primera", 1usize),
        ("primero", 1),
        ("segunda", 2),
        ("segundo", 2),
        ("tercera", 3),
        ("tercero", 3),
        ("cuarta", 4),
        ("cuarto", 4),
        ("quinta", 5),
        ("quinto", 5),
        ("sexta", 6),
        ("sexto", 6),
        ("first", 1),
        ("second", 2),
        ("third", 3),
        ("fourth", 4),
        ("fifth", 5),
        ("sixth", 6),
    ] {
        m.insert(word, n);
    }
    m
});

/// Lowercases and folds Spanish accented characters to their base letters.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            _ => c,
        })
        .collect()
}

/// Splits normalized text into tokens, trimming edge punctuation but keeping
/// interior characters like the colon in "14:00".
pub fn tokens(norm: &str) -> Vec<&str> {
    norm.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// True if `phrase` appears in `norm` on word boundaries.
fn contains_phrase(norm: &str, phrase: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = norm[start..].find(phrase) {
        let at = start + pos;
        let end = at + phrase.len();
        let boundary_before = at == 0
            || !norm[..at].chars().next_back().map_or(false, |c| c.is_alphanumeric());
        let boundary_after =
            end == norm.len() || !norm[end..].chars().next().map_or(false, |c| c.is_alphanumeric());
        if boundary_before && boundary_after {
            return true;
        }
        start = at + 1;
    }
    false
}

fn contains_any(norm: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(norm, p))
}

/// True if the turn carries a correction marker.
pub fn has_correction_marker(norm: &str) -> bool {
    contains_any(norm, CORRECTION_MARKERS)
}

/// Parses a digit token or a number word.
pub fn word_number(token: &str) -> Option<u32> {
    if token.chars().all(|c| c.is_ascii_digit()) && !token.is_empty() {
        return token.parse().ok();
    }
    NUMBER_WORDS.get(token).copied()
}

/// Finds a date reference anywhere in the turn.
///
/// Precedence: explicit day/month pattern, then relative terms, then
/// weekday names.
pub fn parse_date_ref(norm: &str) -> Option<DateRef> {
    if let Some(date_ref) = parse_explicit_date(norm) {
        return Some(date_ref);
    }
    if let Some(day) = parse_relative_day(norm) {
        return Some(DateRef::Relative { day });
    }
    parse_weekday(norm).map(|weekday| DateRef::Weekday { weekday })
}

/// Finds a weekday name.
pub fn parse_weekday(norm: &str) -> Option<Weekday> {
    tokens(norm)
        .into_iter()
        .find_map(|t| WEEKDAYS.get(t).copied())
}

/// Finds a relative-day term.
pub fn parse_relative_day(norm: &str) -> Option<RelativeDay> {
    if contains_phrase(norm, "pasado manana") || contains_phrase(norm, "day after tomorrow") {
        return Some(RelativeDay::DayAfterTomorrow);
    }
    if contains_phrase(norm, "manana") || contains_phrase(norm, "tomorrow") {
        return Some(RelativeDay::Tomorrow);
    }
    if contains_phrase(norm, "hoy") || contains_phrase(norm, "today") {
        return Some(RelativeDay::Today);
    }
    None
}

/// Finds a d/m or d/m/y pattern, e.g. "12/09" or "12/09/2026".
pub fn parse_explicit_date(norm: &str) -> Option<DateRef> {
    for token in tokens(norm) {
        let sep = if token.contains('/') {
            '/'
        } else if token.contains('-') {
            '-'
        } else {
            continue;
        };
        let parts: Vec<&str> = token.split(sep).collect();
        if parts.len() < 2 || parts.len() > 3 {
            continue;
        }
        if !parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())) {
            continue;
        }
        let day: u32 = parts[0].parse().ok()?;
        let month: u32 = parts[1].parse().ok()?;
        if day == 0 || day > 31 || month == 0 || month > 12 {
            continue;
        }
        if parts.len() == 3 {
            let mut year: i32 = parts[2].parse().ok()?;
            if year < 100 {
                year += 2000;
            }
            if let Some(date) = chrono::NaiveDate::from_ymd_opt(year, month, day) {
                return Some(DateRef::Explicit { date });
            }
            continue;
        }
        return Some(DateRef::DayMonth { day, month });
    }
    None
}

/// Finds a time of day.
///
/// Accepts "14:00", "14h", "2pm", "2:30pm", and "a las 2" / "at 2" forms.
/// Bare hours up to 11 without an am marker are read as afternoon/evening,
/// matching how lunch and dinner times are said colloquially.
pub fn parse_time(norm: &str) -> Option<NaiveTime> {
    let toks = tokens(norm);

    for (i, token) in toks.iter().enumerate() {
        // "14:00" or "2:30pm"
        if token.contains(':') {
            if let Some(time) = parse_clock_token(token) {
                return Some(time);
            }
        }
        // "2pm" / "11am" / "14h"
        if let Some(time) = parse_suffixed_hour(token) {
            return Some(time);
        }
        // "a las 2" / "at 2" (optionally followed by am/pm)
        let anchors_hour = (*token == "las" && i > 0 && toks[i - 1] == "a") || *token == "at";
        if anchors_hour {
            if let Some(next) = toks.get(i + 1) {
                if let Some(time) = next
                    .contains(':')
                    .then(|| parse_clock_token(next))
                    .flatten()
                {
                    return Some(time);
                }
                if let Some(hour) = word_number(next).filter(|h| *h <= 23) {
                    let meridiem = toks
                        .get(i + 2)
                        .copied()
                        .filter(|m| *m == "pm" || *m == "am");
                    return Some(apply_meridiem(hour, 0, meridiem)?);
                }
            }
        }
    }
    None
}

fn parse_clock_token(token: &str) -> Option<NaiveTime> {
    let (clock, meridiem) = split_meridiem(token);
    let mut parts = clock.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute_part = parts.next()?;
    let minute: u32 = minute_part.trim_end_matches('h').parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if meridiem.is_some() {
        return apply_meridiem(hour, minute, meridiem);
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_suffixed_hour(token: &str) -> Option<NaiveTime> {
    let (body, meridiem) = split_meridiem(token);
    if meridiem.is_some() {
        let hour: u32 = body.parse().ok()?;
        return apply_meridiem(hour, 0, meridiem);
    }
    // "14h"
    let body = token.strip_suffix('h')?;
    let hour: u32 = body.parse().ok()?;
    NaiveTime::from_hms_opt(hour, 0, 0)
}

fn split_meridiem(token: &str) -> (&str, Option<&str>) {
    if let Some(body) = token.strip_suffix("pm") {
        (body, Some("pm"))
    } else if let Some(body) = token.strip_suffix("am") {
        (body, Some("am"))
    } else {
        (token, None)
    }
}

/// Maps an hour plus optional meridiem marker onto a 24h time. Without a
/// marker, hours 1-11 are pushed to the afternoon/evening.
fn apply_meridiem(hour: u32, minute: u32, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour = match meridiem {
        Some("pm") if hour < 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        Some(_) => hour,
        None if (1..=11).contains(&hour) => hour + 12,
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Finds a party size.
///
/// Compound mentions sum ("4 adultos y 2 niños" → 6). Otherwise a number
/// next to a people-word, or "para N" / "for N" / "somos N" forms.
pub fn parse_party_size(norm: &str) -> Option<u32> {
    let toks = tokens(norm);

    // numbers immediately before adult/child words are summed
    let mut compound: Option<u32> = None;
    for (i, token) in toks.iter().enumerate() {
        let is_headcount_word =
            ADULT_WORDS.contains(token) || CHILD_WORDS.contains(token);
        if is_headcount_word && i > 0 {
            if let Some(n) = word_number(toks[i - 1]) {
                compound = Some(compound.unwrap_or(0) + n);
            }
        }
    }
    if compound.is_some() {
        return compound;
    }

    // "6 personas" / "6 people"
    for (i, token) in toks.iter().enumerate() {
        if PEOPLE_WORDS.contains(token) && i > 0 {
            if let Some(n) = word_number(toks[i - 1]) {
                return Some(n);
            }
        }
    }

    // "para 4" / "for 4" / "somos 6" / "we are 6" / "seremos 6"
    for (i, token) in toks.iter().enumerate() {
        let anchors_count = matches!(*token, "para" | "for" | "somos" | "seremos")
            || (*token == "are" && i > 0 && toks[i - 1] == "we");
        if anchors_count {
            if let Some(next) = toks.get(i + 1) {
                if let Some(n) = word_number(next) {
                    return Some(n);
                }
            }
        }
    }

    None
}

/// Finds the first standalone count in the turn (digits or number word),
/// skipping clock and date tokens.
pub fn parse_count(norm: &str) -> Option<u32> {
    tokens(norm)
        .into_iter()
        .filter(|t| !t.contains(':') && !t.contains('/'))
        .find_map(word_number)
}

/// Finds a serving count: a number immediately before a serving word.
pub fn parse_servings(norm: &str) -> Option<u32> {
    let toks = tokens(norm);
    for (i, token) in toks.iter().enumerate() {
        if SERVING_WORDS.contains(token) && i > 0 {
            if let Some(n) = word_number(toks[i - 1]) {
                return Some(n);
            }
        }
    }
    None
}

/// True if the turn reads as agreement.
pub fn is_affirmative(norm: &str) -> bool {
    !is_negative(norm) && tokens(norm).iter().any(|t| AFFIRMATIVES.contains(t))
}

/// True if the turn reads as refusal: a leading "no" or a cancel phrase.
pub fn is_negative(norm: &str) -> bool {
    let toks = tokens(norm);
    toks.first().map_or(false, |t| NEGATIVE_LEADS.contains(t))
        || contains_any(norm, CANCEL_PHRASES)
}

/// True if the whole turn is essentially just "no".
pub fn is_bare_no(norm: &str) -> bool {
    let toks = tokens(norm);
    match toks.as_slice() {
        ["no"] | ["nope"] => true,
        ["no", rest @ ..] => rest.iter().all(|t| matches!(*t, "gracias" | "thanks" | "thank")),
        _ => false,
    }
}

/// True if the caller is abandoning the current flow.
pub fn is_cancel_request(norm: &str) -> bool {
    contains_any(norm, CANCEL_PHRASES)
}

/// True if the turn mentions rice at all.
pub fn mentions_rice(norm: &str) -> bool {
    tokens(norm).iter().any(|t| RICE_WORDS.contains(t))
}

/// True if the turn explicitly declines rice ("sin arroz", "no rice").
pub fn is_rice_decline(norm: &str) -> bool {
    contains_any(norm, RICE_DECLINE_PHRASES)
}

/// Captures a dish phrase anchored on "arroz" or "paella".
///
/// Recognizes the shape only; the menu validator decides whether the phrase
/// names a real dish. A bare "arroz" is a topic mention, not a dish.
pub fn extract_dish_phrase(norm: &str) -> Option<String> {
    if is_rice_decline(norm) {
        return None;
    }
    let toks = tokens(norm);
    let anchor = toks
        .iter()
        .position(|t| *t == "arroz" || *t == "paella")?;

    let mut phrase = vec![toks[anchor]];
    for token in toks.iter().skip(anchor + 1).take(3) {
        if word_number(token).is_some() {
            break;
        }
        if SERVING_WORDS.contains(token)
            || PEOPLE_WORDS.contains(token)
            || matches!(*token, "para" | "y" | "por" | "gracias" | "please" | "for")
        {
            break;
        }
        phrase.push(token);
    }

    if phrase.len() == 1 && phrase[0] == "arroz" {
        return None;
    }
    Some(phrase.join(" "))
}

/// True if the turn asks to modify an existing reservation.
pub fn detects_modification_intent(norm: &str) -> bool {
    if contains_any(norm, STANDALONE_MODIFICATION_VERBS) {
        return true;
    }
    contains_any(norm, MODIFICATION_VERBS) && contains_any(norm, RESERVATION_WORDS)
}

/// Finds an ordinal reference ("la segunda", "first", bare "2").
///
/// A bare digit counts only when it is not part of a people phrase, so
/// "la de 6 personas" is not read as the sixth item.
pub fn parse_ordinal(norm: &str) -> Option<usize> {
    let toks = tokens(norm);
    for token in &toks {
        if let Some(n) = ORDINAL_WORDS.get(token) {
            return Some(*n);
        }
    }
    for (i, token) in toks.iter().enumerate() {
        if token.chars().all(|c| c.is_ascii_digit()) && token.len() == 1 {
            let followed_by_people = toks
                .get(i + 1)
                .map_or(false, |next| PEOPLE_WORDS.contains(next));
            let preceded_by_de = i > 0 && matches!(toks[i - 1], "de" | "for");
            if !followed_by_people && !preceded_by_de {
                return token.parse().ok();
            }
        }
    }
    None
}

/// Finds a party-size reference used to pick among bookings
/// ("la de 6", "the one for 6", "6 personas").
pub fn parse_party_reference(norm: &str) -> Option<u32> {
    if let Some(n) = parse_party_size(norm) {
        return Some(n);
    }
    let toks = tokens(norm);
    for (i, token) in toks.iter().enumerate() {
        if matches!(*token, "de" | "for") {
            if let Some(n) = toks.get(i + 1).and_then(|t| word_number(t)) {
                return Some(n);
            }
        }
    }
    None
}

/// Finds a high-chair request, returning the count (default 1).
pub fn parse_high_chairs(norm: &str) -> Option<u32> {
    let toks = tokens(norm);
    let at = toks.iter().enumerate().position(|(i, t)| {
        HIGH_CHAIR_WORDS.contains(t)
            || (matches!(*t, "chair" | "chairs") && i > 0 && toks[i - 1] == "high")
    })?;
    // look back for a count, skipping over the "high" of "high chair"
    let lookback_from = if at > 0 && toks[at - 1] == "high" { at - 1 } else { at };
    let count = lookback_from
        .checked_sub(1)
        .and_then(|i| word_number(toks[i]));
    Some(count.unwrap_or(1))
}

/// True if the turn asks for stroller space.
pub fn mentions_stroller(norm: &str) -> bool {
    tokens(norm).iter().any(|t| STROLLER_WORDS.contains(t))
}
