//! Per-field collection behavior for the modification flow.
//!
//! Each modifiable attribute has its own parse/validate/describe behavior
//! and its own availability-recheck policy, implemented as one handler per
//! tag behind a common trait. The state machine stores only the field
//! identifier and dispatches here, so each field's rules stay isolated and
//! independently testable.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::DialogueConfig;
use crate::domain::booking::{ExistingBookingRecord, ModifiableField, PendingChange, RiceSelection};
use crate::domain::dialogue::lexicon;
use crate::domain::foundation::DomainError;
use crate::ports::{AvailabilityOracle, AvailabilityVerdict, MenuValidator, MenuVerdict};

/// Collaborators and thresholds a handler may need.
pub struct FieldContext<'a> {
    pub availability: &'a dyn AvailabilityOracle,
    pub menu: &'a dyn MenuValidator,
    pub config: &'a DialogueConfig,
    pub today: NaiveDate,
}

/// What a collection turn produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectOutcome {
    /// New value validated; move to confirmation.
    Advance {
        change: PendingChange,
        description: String,
        reply: String,
    },

    /// A valid dish was named but servings are still pending; stay in
    /// place holding the dish.
    HoldDish { dish: String, reply: String },

    /// The turn could not be used; stay in place and ask again.
    Reprompt { reply: String },

    /// The request cannot be completed in-band; end the session and hand
    /// off to a human.
    Escalate { reply: String },
}

/// Collection behavior for one modifiable attribute.
#[async_trait]
pub trait FieldHandler: Send + Sync {
    /// The attribute this handler collects.
    fn field(&self) -> ModifiableField;

    /// Prompt asking for the new value.
    fn prompt(&self, booking: &ExistingBookingRecord) -> String;

    /// Interprets one caller turn as a new value for this field.
    async fn collect(
        &self,
        input: &str,
        booking: &ExistingBookingRecord,
        held_dish: Option<&str>,
        ctx: &FieldContext<'_>,
    ) -> Result<CollectOutcome, DomainError>;
}

/// Returns the handler for a field.
pub fn handler_for(field: ModifiableField) -> &'static dyn FieldHandler {
    match field {
        ModifiableField::Date => &DateField,
        ModifiableField::Time => &TimeField,
        ModifiableField::PartySize => &PartySizeField,
        ModifiableField::Rice => &RiceField,
        ModifiableField::HighChairs => &HighChairsField,
        ModifiableField::Strollers => &StrollersField,
    }
}

fn confirm_reply(description: &str) -> String {
    format!("Quedaría así: {description}. ¿Lo confirmo?")
}

/// Turns an unavailable verdict into a negotiating re-prompt.
fn unavailable_reply(verdict: &AvailabilityVerdict) -> String {
    let mut reply = verdict
        .message
        .clone()
        .unwrap_or_else(|| "No hay disponibilidad para esa opción.".to_string());
    if !verdict.suggested_hours.is_empty() {
        let hours: Vec<String> = verdict
            .suggested_hours
            .iter()
            .map(|h| h.format("%H:%M").to_string())
            .collect();
        reply.push_str(&format!(" Podría ser a las {}.", hours.join(" o a las ")));
    }
    if let Some(date) = verdict.suggested_date {
        reply.push_str(&format!(" También queda sitio el {}.", date.format("%d/%m")));
    }
    reply.push_str(" ¿Qué prefieres?");
    reply
}

fn handoff_reply(verdict: &AvailabilityVerdict) -> String {
    let mut reply = verdict
        .message
        .clone()
        .unwrap_or_else(|| "Ese cambio no lo podemos gestionar por aquí.".to_string());
    reply.push_str(" Llámanos por teléfono y lo vemos, te paso el contacto.");
    reply
}

// ─────────────────────────────────────────────────────────────────────────
// Date
// ─────────────────────────────────────────────────────────────────────────

struct DateField;

#[async_trait]
impl FieldHandler for DateField {
    fn field(&self) -> ModifiableField {
        ModifiableField::Date
    }

    fn prompt(&self, booking: &ExistingBookingRecord) -> String {
        format!(
            "Ahora mismo la reserva es para el {}. ¿Para qué día la cambio?",
            booking.date.format("%d/%m")
        )
    }

    async fn collect(
        &self,
        input: &str,
        booking: &ExistingBookingRecord,
        _held_dish: Option<&str>,
        ctx: &FieldContext<'_>,
    ) -> Result<CollectOutcome, DomainError> {
        let norm = lexicon::normalize(input);
        let Some(stated) = lexicon::parse_date_ref(&norm) else {
            return Ok(date_reprompt());
        };
        let Some(date) = stated.resolve(ctx.today) else {
            return Ok(date_reprompt());
        };

        let verdict = ctx
            .availability
            .evaluate(date, booking.party_size, booking.time)
            .await?;
        Ok(scheduling_outcome(
            verdict,
            PendingChange::Date { date },
        ))
    }
}

fn date_reprompt() -> CollectOutcome {
    CollectOutcome::Reprompt {
        reply: "No he entendido el día. Dime por ejemplo \"el sábado\" o \"el 12/09\".".to_string(),
    }
}

/// Shared date/time/party-size logic: available → advance, hand-off
/// reasons → escalate, capacity → negotiate.
fn scheduling_outcome(verdict: AvailabilityVerdict, change: PendingChange) -> CollectOutcome {
    if verdict.is_available {
        let description = change.describe();
        let reply = confirm_reply(&description);
        return CollectOutcome::Advance {
            change,
            description,
            reply,
        };
    }
    match verdict.reason {
        Some(reason) if reason.requires_handoff() => CollectOutcome::Escalate {
            reply: handoff_reply(&verdict),
        },
        _ => CollectOutcome::Reprompt {
            reply: unavailable_reply(&verdict),
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Time
// ─────────────────────────────────────────────────────────────────────────

struct TimeField;

#[async_trait]
impl FieldHandler for TimeField {
    fn field(&self) -> ModifiableField {
        ModifiableField::Time
    }

    fn prompt(&self, booking: &ExistingBookingRecord) -> String {
        format!(
            "La reserva está a las {}. ¿A qué hora la cambio?",
            booking.time.format("%H:%M")
        )
    }

    async fn collect(
        &self,
        input: &str,
        booking: &ExistingBookingRecord,
        _held_dish: Option<&str>,
        ctx: &FieldContext<'_>,
    ) -> Result<CollectOutcome, DomainError> {
        let norm = lexicon::normalize(input);
        let Some(time) = lexicon::parse_time(&norm) else {
            return Ok(CollectOutcome::Reprompt {
                reply: "No he entendido la hora. Dime por ejemplo \"a las 14:00\".".to_string(),
            });
        };

        let verdict = ctx
            .availability
            .evaluate(booking.date, booking.party_size, time)
            .await?;
        Ok(scheduling_outcome(verdict, PendingChange::Time { time }))
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Party size
// ─────────────────────────────────────────────────────────────────────────

struct PartySizeField;

#[async_trait]
impl FieldHandler for PartySizeField {
    fn field(&self) -> ModifiableField {
        ModifiableField::PartySize
    }

    fn prompt(&self, booking: &ExistingBookingRecord) -> String {
        format!(
            "La reserva es para {} personas. ¿Cuántos seréis?",
            booking.party_size
        )
    }

    async fn collect(
        &self,
        input: &str,
        booking: &ExistingBookingRecord,
        _held_dish: Option<&str>,
        ctx: &FieldContext<'_>,
    ) -> Result<CollectOutcome, DomainError> {
        let norm = lexicon::normalize(input);
        let count = lexicon::parse_party_size(&norm).or_else(|| lexicon::parse_count(&norm));
        let Some(party_size) = count.filter(|n| *n > 0) else {
            return Ok(CollectOutcome::Reprompt {
                reply: "No he entendido cuántos seréis. Dime un número de personas.".to_string(),
            });
        };

        if party_size > ctx.config.large_group_threshold {
            return Ok(CollectOutcome::Escalate {
                reply: format!(
                    "Para grupos de más de {} personas lo organizamos por teléfono. \
                     Te paso el contacto y lo cerramos por ahí.",
                    ctx.config.large_group_threshold
                ),
            });
        }

        let verdict = ctx
            .availability
            .evaluate(booking.date, party_size, booking.time)
            .await?;
        Ok(scheduling_outcome(
            verdict,
            PendingChange::PartySize { party_size },
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Rice
// ─────────────────────────────────────────────────────────────────────────

struct RiceField;

/// Cancelling the pre-order is distinct from the session-level cancel; the
/// phrases here all mention rice.
fn wants_rice_removed(norm: &str) -> bool {
    if lexicon::is_rice_decline(norm) {
        return true;
    }
    lexicon::mentions_rice(norm)
        && ["quitar", "quita", "cancelar", "cancela", "remove", "cancel"]
            .iter()
            .any(|w| norm.contains(w))
}

#[async_trait]
impl FieldHandler for RiceField {
    fn field(&self) -> ModifiableField {
        ModifiableField::Rice
    }

    fn prompt(&self, booking: &ExistingBookingRecord) -> String {
        match &booking.rice {
            Some(rice) => format!(
                "Tenéis encargado {}. ¿Qué arroz quieres, o lo quito?",
                rice.describe()
            ),
            None => "¿Qué arroz quieres encargar y para cuántas raciones?".to_string(),
        }
    }

    async fn collect(
        &self,
        input: &str,
        booking: &ExistingBookingRecord,
        held_dish: Option<&str>,
        ctx: &FieldContext<'_>,
    ) -> Result<CollectOutcome, DomainError> {
        let norm = lexicon::normalize(input);

        if wants_rice_removed(&norm) {
            let change = PendingChange::Rice { rice: None };
            let description = change.describe();
            let reply = confirm_reply(&description);
            return Ok(CollectOutcome::Advance {
                change,
                description,
                reply,
            });
        }

        let servings = lexicon::parse_servings(&norm).or_else(|| lexicon::parse_count(&norm));

        if let Some(phrase) = lexicon::extract_dish_phrase(&norm) {
            return match ctx.menu.validate(&phrase).await? {
                MenuVerdict::Rejected { message } => {
                    Ok(CollectOutcome::Reprompt { reply: message })
                }
                MenuVerdict::Valid { canonical_name } => {
                    self.with_dish(&canonical_name, servings, booking, ctx)
                }
            };
        }

        // no dish in this turn: a bare serving count only applies when a
        // dish is already pending or on the booking
        let current_dish = held_dish
            .map(str::to_string)
            .or_else(|| booking.rice.as_ref().map(|r| r.dish_name().to_string()));
        match (current_dish, servings) {
            (Some(dish), Some(_)) => self.with_dish(&dish, servings, booking, ctx),
            (Some(dish), None) => Ok(CollectOutcome::Reprompt {
                reply: format!("¿Cuántas raciones de {dish} preparo?"),
            }),
            (None, _) => Ok(CollectOutcome::Reprompt {
                reply: "Dime primero qué arroz quieres y te pregunto las raciones.".to_string(),
            }),
        }
    }
}

impl RiceField {
    /// A validated dish, with or without a serving count yet.
    fn with_dish(
        &self,
        dish: &str,
        servings: Option<u32>,
        booking: &ExistingBookingRecord,
        ctx: &FieldContext<'_>,
    ) -> Result<CollectOutcome, DomainError> {
        let min = ctx.config.min_rice_servings;
        let max = booking.party_size;
        match servings {
            Some(n) if n >= min && n <= max => {
                let rice = RiceSelection::new(dish, n, max)?;
                let change = PendingChange::Rice { rice: Some(rice) };
                let description = change.describe();
                let reply = confirm_reply(&description);
                Ok(CollectOutcome::Advance {
                    change,
                    description,
                    reply,
                })
            }
            Some(n) => Ok(CollectOutcome::HoldDish {
                dish: dish.to_string(),
                reply: format!(
                    "Las raciones tienen que estar entre {min} y {max} \
                     (sois {max}); {n} no me encaja. ¿Cuántas pongo?"
                ),
            }),
            None => Ok(CollectOutcome::HoldDish {
                dish: dish.to_string(),
                reply: format!("{dish}, apuntado. ¿Cuántas raciones?"),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// High chairs / strollers
// ─────────────────────────────────────────────────────────────────────────

struct HighChairsField;

#[async_trait]
impl FieldHandler for HighChairsField {
    fn field(&self) -> ModifiableField {
        ModifiableField::HighChairs
    }

    fn prompt(&self, booking: &ExistingBookingRecord) -> String {
        format!(
            "Tenéis {} tronas reservadas. ¿Cuántas necesitáis?",
            booking.high_chair_count
        )
    }

    async fn collect(
        &self,
        input: &str,
        _booking: &ExistingBookingRecord,
        _held_dish: Option<&str>,
        ctx: &FieldContext<'_>,
    ) -> Result<CollectOutcome, DomainError> {
        Ok(collect_extra_count(
            input,
            ctx.config.max_extra_count,
            "tronas",
            |count| PendingChange::HighChairs { count },
        ))
    }
}

struct StrollersField;

#[async_trait]
impl FieldHandler for StrollersField {
    fn field(&self) -> ModifiableField {
        ModifiableField::Strollers
    }

    fn prompt(&self, booking: &ExistingBookingRecord) -> String {
        format!(
            "Tenéis espacio para {} carritos. ¿Cuántos traeréis?",
            booking.stroller_count
        )
    }

    async fn collect(
        &self,
        input: &str,
        _booking: &ExistingBookingRecord,
        _held_dish: Option<&str>,
        ctx: &FieldContext<'_>,
    ) -> Result<CollectOutcome, DomainError> {
        Ok(collect_extra_count(
            input,
            ctx.config.max_extra_count,
            "carritos",
            |count| PendingChange::Strollers { count },
        ))
    }
}

/// Extras share the same integer-in-range rule. Zero is a valid answer; it
/// clears the extra.
fn collect_extra_count(
    input: &str,
    max: u32,
    noun: &str,
    make_change: impl Fn(u32) -> PendingChange,
) -> CollectOutcome {
    let norm = lexicon::normalize(input);
    let count = lexicon::parse_count(&norm).or_else(|| {
        // "ninguna" / "none" read as zero
        ["ninguna", "ninguno", "none", "cero", "zero"]
            .iter()
            .any(|w| norm.contains(w))
            .then_some(0)
    });
    match count {
        Some(n) if n <= max => {
            let change = make_change(n);
            let description = change.describe();
            let reply = confirm_reply(&description);
            CollectOutcome::Advance {
                change,
                description,
                reply,
            }
        }
        Some(n) => CollectOutcome::Reprompt {
            reply: format!("Podemos reservar como mucho {max} {noun}; {n} son demasiados."),
        },
        None => CollectOutcome::Reprompt {
            reply: format!("¿Cuántos {noun}? Dime un número de 0 a {max}."),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::UnavailabilityReason;
    use chrono::{NaiveDate, NaiveTime};
    use std::sync::Mutex;

    use crate::domain::foundation::{BookingId, PhoneNumber};

    struct ScriptedOracle {
        verdict: AvailabilityVerdict,
        calls: Mutex<Vec<(NaiveDate, u32, NaiveTime)>>,
    }

    impl ScriptedOracle {
        fn returning(verdict: AvailabilityVerdict) -> Self {
            Self { verdict, calls: Mutex::new(Vec::new()) }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AvailabilityOracle for ScriptedOracle {
        async fn evaluate(
            &self,
            date: NaiveDate,
            party_size: u32,
            time: NaiveTime,
        ) -> Result<AvailabilityVerdict, DomainError> {
            self.calls.lock().unwrap().push((date, party_size, time));
            Ok(self.verdict.clone())
        }
    }

    struct ScriptedMenu {
        verdict: MenuVerdict,
    }

    #[async_trait]
    impl MenuValidator for ScriptedMenu {
        async fn validate(&self, _free_text: &str) -> Result<MenuVerdict, DomainError> {
            Ok(self.verdict.clone())
        }
    }

    fn booking() -> ExistingBookingRecord {
        ExistingBookingRecord {
            id: BookingId::new(),
            customer_name: "Marta".into(),
            phone: PhoneNumber::parse("34600111222").unwrap(),
            date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            party_size: 4,
            rice: None,
            high_chair_count: 0,
            stroller_count: 0,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 11).unwrap()
    }

    fn ctx<'a>(
        oracle: &'a ScriptedOracle,
        menu: &'a ScriptedMenu,
        config: &'a DialogueConfig,
    ) -> FieldContext<'a> {
        FieldContext { availability: oracle, menu, config, today: today() }
    }

    fn valid_menu() -> ScriptedMenu {
        ScriptedMenu {
            verdict: MenuVerdict::Valid { canonical_name: "Arroz Negro".into() },
        }
    }

    mod date_field {
        use super::*;

        #[tokio::test]
        async fn available_date_advances_with_pending_change() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Date)
                .collect("el domingo", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            // next Sunday after Wednesday 2026-02-11
            let expected = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
            match outcome {
                CollectOutcome::Advance { change, .. } => {
                    assert_eq!(change, PendingChange::Date { date: expected });
                }
                other => panic!("expected Advance, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn recheck_uses_existing_time_and_party() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            handler_for(ModifiableField::Date)
                .collect("el domingo", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            let calls = oracle.calls.lock().unwrap();
            assert_eq!(calls.len(), 1);
            let (_, party, time) = calls[0];
            assert_eq!(party, 4);
            assert_eq!(time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        }

        #[tokio::test]
        async fn unparseable_date_reprompts_without_oracle_call() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Date)
                .collect("pues no sé", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            assert!(matches!(outcome, CollectOutcome::Reprompt { .. }));
            assert_eq!(oracle.call_count(), 0);
        }

        #[tokio::test]
        async fn capacity_conflict_offers_alternatives_and_reprompts() {
            let verdict = AvailabilityVerdict::unavailable(UnavailabilityReason::NoCapacity)
                .with_suggested_hours(vec![NaiveTime::from_hms_opt(21, 0, 0).unwrap()]);
            let oracle = ScriptedOracle::returning(verdict);
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Date)
                .collect("el domingo", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::Reprompt { reply } => assert!(reply.contains("21:00")),
                other => panic!("expected Reprompt, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn same_day_rejection_escalates() {
            let verdict = AvailabilityVerdict::unavailable(UnavailabilityReason::SameDay)
                .with_message("Para hoy no cogemos reservas por aquí.");
            let oracle = ScriptedOracle::returning(verdict);
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Date)
                .collect("hoy", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            assert!(matches!(outcome, CollectOutcome::Escalate { .. }));
        }
    }

    mod party_size_field {
        use super::*;

        #[tokio::test]
        async fn large_group_escalates_without_availability_call() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::PartySize)
                .collect("25", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            assert!(matches!(outcome, CollectOutcome::Escalate { .. }));
            assert_eq!(oracle.call_count(), 0);
        }

        #[tokio::test]
        async fn threshold_itself_is_still_in_band() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::PartySize)
                .collect("10", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            assert!(matches!(outcome, CollectOutcome::Advance { .. }));
        }

        #[tokio::test]
        async fn new_size_rechecks_existing_date_and_time() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            handler_for(ModifiableField::PartySize)
                .collect("somos 6", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            let calls = oracle.calls.lock().unwrap();
            assert_eq!(calls[0].0, booking().date);
            assert_eq!(calls[0].1, 6);
            assert_eq!(calls[0].2, booking().time);
        }
    }

    mod rice_field {
        use super::*;

        fn no_oracle() -> ScriptedOracle {
            ScriptedOracle::returning(AvailabilityVerdict::available())
        }

        #[tokio::test]
        async fn remove_rice_advances_immediately() {
            let oracle = no_oracle();
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Rice)
                .collect("quita el arroz", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::Advance { change, .. } => {
                    assert_eq!(change, PendingChange::Rice { rice: None });
                }
                other => panic!("expected Advance, got {other:?}"),
            }
            // rice changes never re-check availability
            assert_eq!(oracle.call_count(), 0);
        }

        #[tokio::test]
        async fn valid_dish_without_servings_holds() {
            let oracle = no_oracle();
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Rice)
                .collect("arroz negro", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::HoldDish { dish, .. } => assert_eq!(dish, "Arroz Negro"),
                other => panic!("expected HoldDish, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn held_dish_plus_servings_advances() {
            let oracle = no_oracle();
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Rice)
                .collect("3 raciones", &booking(), Some("Arroz Negro"), &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::Advance { change, .. } => match change {
                    PendingChange::Rice { rice: Some(rice) } => {
                        assert_eq!(rice.dish_name(), "Arroz Negro");
                        assert_eq!(rice.servings(), 3);
                    }
                    other => panic!("expected rice change, got {other:?}"),
                },
                other => panic!("expected Advance, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn bare_servings_without_any_dish_reprompts() {
            // no held dish and no rice on the booking: "3 raciones" is out
            // of context
            let oracle = no_oracle();
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Rice)
                .collect("3 raciones", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            assert!(matches!(outcome, CollectOutcome::Reprompt { .. }));
        }

        #[tokio::test]
        async fn bare_servings_updates_existing_booking_rice() {
            let oracle = no_oracle();
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let mut with_rice = booking();
            with_rice.rice = Some(RiceSelection::new("Arroz a Banda", 2, 4).unwrap());
            let outcome = handler_for(ModifiableField::Rice)
                .collect("3 raciones", &with_rice, None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::Advance { change, .. } => match change {
                    PendingChange::Rice { rice: Some(rice) } => {
                        assert_eq!(rice.dish_name(), "Arroz a Banda");
                        assert_eq!(rice.servings(), 3);
                    }
                    other => panic!("expected rice change, got {other:?}"),
                },
                other => panic!("expected Advance, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn servings_above_party_size_holds_with_range_reply() {
            let oracle = no_oracle();
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Rice)
                .collect("arroz negro, 9 raciones", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::HoldDish { reply, .. } => assert!(reply.contains('9')),
                other => panic!("expected HoldDish, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn rejected_dish_relays_menu_message() {
            let oracle = no_oracle();
            let menu = ScriptedMenu {
                verdict: MenuVerdict::Rejected {
                    message: "Ese arroz no lo tenemos.".into(),
                },
            };
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Rice)
                .collect("arroz de pato", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::Reprompt { reply } => {
                    assert_eq!(reply, "Ese arroz no lo tenemos.")
                }
                other => panic!("expected Reprompt, got {other:?}"),
            }
        }
    }

    mod extras_fields {
        use super::*;

        #[tokio::test]
        async fn in_range_count_advances() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::HighChairs)
                .collect("2", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::Advance { change, .. } => {
                    assert_eq!(change, PendingChange::HighChairs { count: 2 });
                }
                other => panic!("expected Advance, got {other:?}"),
            }
            assert_eq!(oracle.call_count(), 0);
        }

        #[tokio::test]
        async fn out_of_range_count_reprompts() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Strollers)
                .collect("5 carritos", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            assert!(matches!(outcome, CollectOutcome::Reprompt { .. }));
        }

        #[tokio::test]
        async fn none_reads_as_zero() {
            let oracle = ScriptedOracle::returning(AvailabilityVerdict::available());
            let menu = valid_menu();
            let config = DialogueConfig::default();
            let outcome = handler_for(ModifiableField::Strollers)
                .collect("ninguno", &booking(), None, &ctx(&oracle, &menu, &config))
                .await
                .unwrap();

            match outcome {
                CollectOutcome::Advance { change, .. } => {
                    assert_eq!(change, PendingChange::Strollers { count: 0 });
                }
                other => panic!("expected Advance, got {other:?}"),
            }
        }
    }
}
