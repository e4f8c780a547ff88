//! The booking-modification state machine.
//!
//! Drives the multi-turn flow: locate booking(s) → select field → collect
//! and validate the new value → confirm → commit. Consumes the availability
//! oracle and menu validator through their ports; never touches the booking
//! store except for the single update of a confirmed change.
//!
//! Failure semantics: an unparseable or unsupported turn re-prompts in
//! place and never advances or discards session state. The only exits are a
//! commit, an explicit cancellation, or an escalation hand-off. Collaborator
//! errors and timeouts read as "change rejected, re-prompt" with the
//! session left untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::DialogueConfig;
use crate::domain::booking::ModifiableField;
use crate::domain::dialogue::lexicon;
use crate::domain::foundation::{DomainError, PhoneNumber, StateMachine};
use crate::ports::{AvailabilityOracle, BookingStore, MenuValidator, MessagingGateway};

use super::fields::{handler_for, CollectOutcome, FieldContext};
use super::reference::resolve_booking_reference;
use super::{ModificationSession, ModificationStage};

/// Result of feeding one turn to the machine: the surviving session (None
/// when the flow ended) and the reply to send.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session: Option<ModificationSession>,
    pub reply: String,
}

impl TurnOutcome {
    fn open(session: ModificationSession, reply: impl Into<String>) -> Self {
        Self { session: Some(session), reply: reply.into() }
    }

    fn closed(reply: impl Into<String>) -> Self {
        Self { session: None, reply: reply.into() }
    }
}

const APOLOGY: &str =
    "Perdona, ahora mismo no puedo comprobarlo. ¿Me lo repites en un momento?";

/// Multi-turn negotiation for changing one field of an existing reservation.
pub struct ModificationStateMachine {
    store: Arc<dyn BookingStore>,
    availability: Arc<dyn AvailabilityOracle>,
    menu: Arc<dyn MenuValidator>,
    gateway: Arc<dyn MessagingGateway>,
    config: DialogueConfig,
}

impl ModificationStateMachine {
    /// Wires the machine to its collaborators.
    pub fn new(
        store: Arc<dyn BookingStore>,
        availability: Arc<dyn AvailabilityOracle>,
        menu: Arc<dyn MenuValidator>,
        gateway: Arc<dyn MessagingGateway>,
        config: DialogueConfig,
    ) -> Self {
        Self { store, availability, menu, gateway, config }
    }

    /// Opens a modification flow for a caller.
    ///
    /// Zero bookings → "not found", no session. One → field selection.
    /// Several → booking selection.
    pub async fn start(&self, phone: &PhoneNumber) -> TurnOutcome {
        let found = self
            .with_timeout("booking_store", self.store.find_by_phone(phone))
            .await;
        let bookings = match found {
            Ok(bookings) => bookings,
            Err(err) => {
                warn!(phone = %phone, error = %err, "booking lookup failed");
                return TurnOutcome::closed(APOLOGY);
            }
        };

        match bookings.len() {
            0 => TurnOutcome::closed(
                "No encuentro ninguna reserva con este número de teléfono. \
                 ¿Seguro que la hiciste con este número?",
            ),
            1 => {
                let booking = bookings.into_iter().next().expect("one booking");
                info!(phone = %phone, booking = %booking.id, "modification session opened");
                let reply = format!(
                    "He encontrado tu reserva: {}. {}",
                    booking.summary(),
                    field_menu()
                );
                TurnOutcome::open(
                    ModificationSession::selecting_field(phone.clone(), booking),
                    reply,
                )
            }
            _ => {
                info!(
                    phone = %phone,
                    candidates = bookings.len(),
                    "modification session opened with several candidates"
                );
                let reply = format!(
                    "Tienes varias reservas:\n{}\n¿Cuál quieres cambiar?",
                    candidate_list(&bookings)
                );
                TurnOutcome::open(
                    ModificationSession::selecting_booking(phone.clone(), bookings),
                    reply,
                )
            }
        }
    }

    /// Feeds one caller turn to an open session.
    pub async fn handle_turn(
        &self,
        mut session: ModificationSession,
        text: &str,
        today: NaiveDate,
    ) -> TurnOutcome {
        session.touch();
        let norm = lexicon::normalize(text);

        // a session-level cancel is honored at any stage, except that in
        // the rice flow "cancela el arroz" belongs to the field handler
        let rice_turn = session.field == Some(ModifiableField::Rice)
            && lexicon::mentions_rice(&norm);
        if lexicon::is_cancel_request(&norm) && !rice_turn {
            info!(phone = %session.phone, "modification cancelled by caller");
            return TurnOutcome::closed("Vale, lo dejo todo como estaba.");
        }

        match session.stage {
            ModificationStage::SelectingBooking => self.select_booking(session, text),
            ModificationStage::SelectingField => self.select_field(session, &norm),
            ModificationStage::CollectingNewValue => {
                self.collect_value(session, text, today).await
            }
            ModificationStage::AwaitingConfirmation => self.confirm(session, &norm).await,
        }
    }

    fn select_booking(&self, mut session: ModificationSession, text: &str) -> TurnOutcome {
        match resolve_booking_reference(text, &session.candidates) {
            Some((index, strategy)) => {
                let booking = session.candidates[index].clone();
                debug!(
                    phone = %session.phone,
                    booking = %booking.id,
                    strategy,
                    "candidate booking resolved"
                );
                let reply = format!("La del {}. {}", booking.summary(), field_menu());
                session.selected = Some(booking);
                match session.stage.transition_to(ModificationStage::SelectingField) {
                    Ok(stage) => session.stage = stage,
                    Err(err) => {
                        warn!(error = %err, "stage transition rejected");
                        return TurnOutcome::open(session, APOLOGY);
                    }
                }
                TurnOutcome::open(session, reply)
            }
            None => {
                let reply = format!(
                    "No sé a cuál te refieres. Dime cuál de estas:\n{}",
                    candidate_list(&session.candidates)
                );
                TurnOutcome::open(session, reply)
            }
        }
    }

    fn select_field(&self, mut session: ModificationSession, norm: &str) -> TurnOutcome {
        let Some(booking) = session.selected.clone() else {
            warn!(phone = %session.phone, "field selection without a selected booking");
            return TurnOutcome::closed(APOLOGY);
        };
        match parse_field(norm) {
            Some(field) => {
                debug!(phone = %session.phone, ?field, "field to modify resolved");
                session.field = Some(field);
                match session.stage.transition_to(ModificationStage::CollectingNewValue) {
                    Ok(stage) => session.stage = stage,
                    Err(err) => {
                        warn!(error = %err, "stage transition rejected");
                        return TurnOutcome::open(session, APOLOGY);
                    }
                }
                let reply = handler_for(field).prompt(&booking);
                TurnOutcome::open(session, reply)
            }
            None => TurnOutcome::open(session, field_menu()),
        }
    }

    async fn collect_value(
        &self,
        mut session: ModificationSession,
        text: &str,
        today: NaiveDate,
    ) -> TurnOutcome {
        let (Some(field), Some(booking)) = (session.field, session.selected.clone()) else {
            warn!(phone = %session.phone, "collection without field or booking");
            return TurnOutcome::closed(APOLOGY);
        };

        let ctx = FieldContext {
            availability: &*self.availability,
            menu: &*self.menu,
            config: &self.config,
            today,
        };
        let held_dish = session.held_dish.clone();
        let collected = self
            .with_timeout(
                "field_collection",
                handler_for(field).collect(text, &booking, held_dish.as_deref(), &ctx),
            )
            .await;

        let outcome = match collected {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(phone = %session.phone, ?field, error = %err, "collection failed");
                return TurnOutcome::open(session, APOLOGY);
            }
        };

        match outcome {
            CollectOutcome::Advance { change, description, reply } => {
                debug!(phone = %session.phone, ?field, "pending change stored");
                session.pending = Some(change);
                session.description = Some(description);
                session.held_dish = None;
                match session.stage.transition_to(ModificationStage::AwaitingConfirmation) {
                    Ok(stage) => session.stage = stage,
                    Err(err) => {
                        warn!(error = %err, "stage transition rejected");
                        return TurnOutcome::open(session, APOLOGY);
                    }
                }
                TurnOutcome::open(session, reply)
            }
            CollectOutcome::HoldDish { dish, reply } => {
                session.held_dish = Some(dish);
                TurnOutcome::open(session, reply)
            }
            CollectOutcome::Reprompt { reply } => TurnOutcome::open(session, reply),
            CollectOutcome::Escalate { reply } => {
                info!(phone = %session.phone, ?field, "escalated to human contact");
                self.send_contact_card(&session.phone).await;
                TurnOutcome::closed(reply)
            }
        }
    }

    async fn confirm(&self, session: ModificationSession, norm: &str) -> TurnOutcome {
        if lexicon::is_negative(norm) {
            info!(phone = %session.phone, "pending change discarded");
            return TurnOutcome::closed("Vale, no cambio nada. La reserva queda como estaba.");
        }
        if !lexicon::is_affirmative(norm) {
            let description = session
                .description
                .clone()
                .unwrap_or_else(|| "el cambio".to_string());
            let reply = format!("¿Te confirmo {description}? Dime sí o no.");
            return TurnOutcome::open(session, reply);
        }

        // the session is cleared whether or not the update lands; a caller
        // retrying will reopen a fresh flow against current data
        let (Some(booking), Some(change)) = (&session.selected, &session.pending) else {
            warn!(phone = %session.phone, "confirmation without a pending change");
            return TurnOutcome::closed(APOLOGY);
        };

        let updated = self
            .with_timeout("booking_store", self.store.update(&booking.id, change))
            .await;
        match updated {
            Ok(true) => {
                info!(phone = %session.phone, booking = %booking.id, "change committed");
                let description = session
                    .description
                    .clone()
                    .unwrap_or_else(|| change.describe());
                TurnOutcome::closed(format!("¡Hecho! He apuntado {description}."))
            }
            Ok(false) => {
                warn!(phone = %session.phone, booking = %booking.id, "booking vanished on update");
                TurnOutcome::closed(
                    "No he encontrado la reserva al ir a cambiarla. \
                     Llámanos y lo revisamos, perdona las molestias.",
                )
            }
            Err(err) => {
                warn!(phone = %session.phone, error = %err, "update failed");
                TurnOutcome::closed(
                    "No he podido guardar el cambio, perdona. \
                     Vuelve a intentarlo en un rato o llámanos.",
                )
            }
        }
    }

    /// Best-effort contact-card push; a gateway failure only logs.
    async fn send_contact_card(&self, phone: &PhoneNumber) {
        let card = self.config.contact_card();
        let sent = self
            .with_timeout("messaging_gateway", self.gateway.send_contact_card(phone, &card))
            .await;
        if let Err(err) = sent {
            warn!(phone = %phone, error = %err, "contact card delivery failed");
        }
    }

    async fn with_timeout<T>(
        &self,
        collaborator: &'static str,
        fut: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        let limit = Duration::from_millis(self.config.collaborator_timeout_ms);
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::timeout(collaborator)),
        }
    }
}

/// The "what do you want to change" menu, built from the field order.
fn field_menu() -> String {
    let labels: Vec<&str> = ModifiableField::ALL.iter().map(|f| f.label()).collect();
    let (last, rest) = labels.split_last().expect("fields are non-empty");
    format!("¿Qué quieres cambiar: {} o {}?", rest.join(", "), last)
}

fn candidate_list(bookings: &[crate::domain::booking::ExistingBookingRecord]) -> String {
    bookings
        .iter()
        .enumerate()
        .map(|(i, b)| format!("{}. {}", i + 1, b.summary()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolves which attribute the caller wants to change, by keyword or by
/// position in the offered menu.
fn parse_field(norm: &str) -> Option<ModifiableField> {
    let toks = lexicon::tokens(norm);
    let has = |words: &[&str]| toks.iter().any(|t| words.contains(t));

    if has(&["fecha", "dia", "date", "day"]) {
        return Some(ModifiableField::Date);
    }
    if has(&["hora", "time", "hour"]) {
        return Some(ModifiableField::Time);
    }
    if has(&["personas", "gente", "comensales", "people", "party", "size", "cuantos", "somos"]) {
        return Some(ModifiableField::PartySize);
    }
    if has(&["arroz", "paella", "rice"]) {
        return Some(ModifiableField::Rice);
    }
    if has(&["trona", "tronas", "highchair", "highchairs"]) || norm.contains("high chair") {
        return Some(ModifiableField::HighChairs);
    }
    if has(&["carrito", "carritos", "cochecito", "stroller", "strollers", "pram", "buggy"]) {
        return Some(ModifiableField::Strollers);
    }

    lexicon::parse_ordinal(norm)
        .filter(|n| (1..=ModifiableField::ALL.len()).contains(n))
        .map(|n| ModifiableField::ALL[n - 1])
}
