//! Dialogue orchestrator.
//!
//! The single entry point exposed to the transport layer. Routes each
//! inbound turn to the fresh-booking slot-filling flow or, when a
//! modification session is open, to the modification state machine, and
//! returns the next assistant utterance.
//!
//! Turns for the same caller are serialized through a per-identity async
//! lock (no global lock), because extraction and the state machine are
//! history-order-dependent: a near-simultaneous duplicate delivery must not
//! interleave.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::DialogueConfig;
use crate::domain::dialogue::{lexicon, SlotExtractor, TurnRole};
use crate::domain::foundation::{DomainError, PhoneNumber, Timestamp};
use crate::domain::modification::{ModificationStateMachine, TurnOutcome};
use crate::ports::{MessagingGateway, Responder, SessionStore};

/// Media kinds the dialogue cannot process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
    Video,
    Sticker,
    Document,
    Location,
    Contact,
    Other,
}

/// What arrived in an inbound turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnContent {
    /// An ordinary text message.
    Text(String),

    /// Anything the dialogue cannot read; handled with a hand-off.
    Unsupported(MediaKind),
}

const UNSUPPORTED_REPLY: &str =
    "Por aquí solo puedo atender mensajes de texto. Si lo prefieres, \
     llámanos y te atendemos; te paso el contacto.";

const APOLOGY: &str =
    "Perdona, he tenido un problema al consultar tus datos. \
     ¿Me lo repites en un momento?";

/// Per-identity lock map: same caller strictly in arrival order, different
/// callers fully independent.
#[derive(Default)]
struct IdentityLocks {
    locks: Mutex<HashMap<PhoneNumber, Arc<tokio::sync::Mutex<()>>>>,
}

impl IdentityLocks {
    fn handle(&self, phone: &PhoneNumber) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        locks
            .entry(phone.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Routes inbound turns and emits assistant utterances.
pub struct DialogueOrchestrator {
    sessions: Arc<dyn SessionStore>,
    responder: Arc<dyn Responder>,
    gateway: Arc<dyn MessagingGateway>,
    machine: ModificationStateMachine,
    extractor: SlotExtractor,
    config: DialogueConfig,
    identity_locks: IdentityLocks,
}

impl DialogueOrchestrator {
    /// Wires the orchestrator to its collaborators.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        responder: Arc<dyn Responder>,
        gateway: Arc<dyn MessagingGateway>,
        machine: ModificationStateMachine,
        config: DialogueConfig,
    ) -> Self {
        Self {
            sessions,
            responder,
            gateway,
            machine,
            extractor: SlotExtractor::new(),
            config,
            identity_locks: IdentityLocks::default(),
        }
    }

    /// Processes one inbound turn and returns the assistant utterance.
    pub async fn process_turn(
        &self,
        phone: &PhoneNumber,
        content: TurnContent,
        push_name: &str,
    ) -> Result<String, DomainError> {
        let handle = self.identity_locks.handle(phone);
        let _guard = handle.lock().await;

        match content {
            TurnContent::Unsupported(kind) => self.handle_unsupported(phone, kind).await,
            TurnContent::Text(text) => self.handle_text(phone, &text, push_name).await,
        }
    }

    /// Convenience wrapper for plain text turns.
    pub async fn process_text(
        &self,
        phone: &PhoneNumber,
        text: &str,
        push_name: &str,
    ) -> Result<String, DomainError> {
        self.process_turn(phone, TurnContent::Text(text.to_string()), push_name)
            .await
    }

    /// Unsupported content: canned hand-off plus contact card. The session,
    /// if any, stays as it was so the caller can resume with text.
    async fn handle_unsupported(
        &self,
        phone: &PhoneNumber,
        kind: MediaKind,
    ) -> Result<String, DomainError> {
        info!(phone = %phone, ?kind, "unsupported content handed off");
        let card = self.config.contact_card();
        let sent = self
            .with_timeout("messaging_gateway", self.gateway.send_contact_card(phone, &card))
            .await;
        if let Err(err) = sent {
            warn!(phone = %phone, error = %err, "contact card delivery failed");
        }
        Ok(UNSUPPORTED_REPLY.to_string())
    }

    async fn handle_text(
        &self,
        phone: &PhoneNumber,
        text: &str,
        push_name: &str,
    ) -> Result<String, DomainError> {
        self.record_turn(phone, TurnRole::User, text).await;

        let session = match self
            .with_timeout("session_store", self.sessions.load_session(phone))
            .await
        {
            Ok(session) => session,
            Err(err) => {
                warn!(phone = %phone, error = %err, "session load failed");
                return Ok(APOLOGY.to_string());
            }
        };

        // an idle session must not survive; a stale "yes" months later
        // would otherwise confirm a forgotten change
        let session = match session {
            Some(session)
                if session.is_expired(Timestamp::now(), self.config.session_idle_secs) =>
            {
                info!(phone = %phone, "expired modification session discarded");
                self.persist_outcome_session(phone, None).await;
                None
            }
            other => other,
        };

        let norm = lexicon::normalize(text);
        let modification_intent = lexicon::detects_modification_intent(&norm);
        let reply = if modification_intent {
            // only one session per identity: a fresh modification intent
            // restarts an open session instead of feeding it
            if session.is_some() {
                info!(phone = %phone, "open modification session restarted");
            } else {
                debug!(phone = %phone, "modification intent detected");
            }
            let outcome = self.machine.start(phone).await;
            self.apply_outcome(phone, outcome).await
        } else if let Some(session) = session {
            let today = Timestamp::now().date();
            let outcome = self.machine.handle_turn(session, text, today).await;
            self.apply_outcome(phone, outcome).await
        } else {
            self.fresh_booking_reply(phone, push_name).await
        };

        self.record_turn(phone, TurnRole::Assistant, &reply).await;
        Ok(reply)
    }

    /// Fresh-booking branch: recompute the snapshot over the full history
    /// and let the responder phrase the next utterance.
    async fn fresh_booking_reply(&self, phone: &PhoneNumber, push_name: &str) -> String {
        let history = match self
            .with_timeout("session_store", self.sessions.history(phone))
            .await
        {
            Ok(history) => history,
            Err(err) => {
                warn!(phone = %phone, error = %err, "history load failed");
                return APOLOGY.to_string();
            }
        };

        let snapshot = self.extractor.extract(&history);
        debug!(
            phone = %phone,
            stage = ?snapshot.stage,
            missing = snapshot.missing.len(),
            "snapshot recomputed"
        );

        match self
            .with_timeout(
                "responder",
                self.responder.reply(&history, &snapshot, push_name),
            )
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!(phone = %phone, error = %err, "responder failed");
                APOLOGY.to_string()
            }
        }
    }

    /// Persists the machine outcome and returns its reply.
    async fn apply_outcome(&self, phone: &PhoneNumber, outcome: TurnOutcome) -> String {
        let TurnOutcome { session, reply } = outcome;
        self.persist_outcome_session(phone, session).await;
        reply
    }

    async fn persist_outcome_session(
        &self,
        phone: &PhoneNumber,
        session: Option<crate::domain::modification::ModificationSession>,
    ) {
        let result = match &session {
            Some(session) => {
                self.with_timeout("session_store", self.sessions.save_session(session))
                    .await
            }
            None => {
                self.with_timeout("session_store", self.sessions.clear_session(phone))
                    .await
            }
        };
        if let Err(err) = result {
            warn!(phone = %phone, error = %err, "session persistence failed");
        }
    }

    /// History is best-effort: a failed append degrades extraction but must
    /// not break the conversation.
    async fn record_turn(&self, phone: &PhoneNumber, role: TurnRole, text: &str) {
        let appended = self
            .with_timeout("session_store", self.sessions.append_turn(phone, role, text))
            .await;
        if let Err(err) = appended {
            warn!(phone = %phone, error = %err, "turn append failed");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryBookingStore, InMemorySessionStore, RecordingMessagingGateway,
        RuleBasedAvailability, StaticMenuValidator, TemplateResponder,
    };
    use crate::domain::booking::ExistingBookingRecord;
    use crate::domain::foundation::BookingId;
    use chrono::{Duration as ChronoDuration, NaiveTime};

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("34600111222").unwrap()
    }

    struct Fixture {
        orchestrator: DialogueOrchestrator,
        bookings: Arc<InMemoryBookingStore>,
        sessions: Arc<InMemorySessionStore>,
        gateway: Arc<RecordingMessagingGateway>,
    }

    fn fixture() -> Fixture {
        let bookings = Arc::new(InMemoryBookingStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let gateway = Arc::new(RecordingMessagingGateway::new());
        let today = Timestamp::now().date();
        let availability = Arc::new(RuleBasedAvailability::with_defaults(today));
        let config = DialogueConfig::default();
        let machine = ModificationStateMachine::new(
            bookings.clone(),
            availability,
            Arc::new(StaticMenuValidator::new()),
            gateway.clone(),
            config.clone(),
        );
        let orchestrator = DialogueOrchestrator::new(
            sessions.clone(),
            Arc::new(TemplateResponder::new()),
            gateway.clone(),
            machine,
            config,
        );
        Fixture { orchestrator, bookings, sessions, gateway }
    }

    async fn seed_booking(fixture: &Fixture) -> BookingId {
        let date = Timestamp::now().date() + ChronoDuration::days(5);
        fixture
            .bookings
            .insert(ExistingBookingRecord {
                id: BookingId::new(),
                customer_name: "Marta".into(),
                phone: phone(),
                date,
                time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                party_size: 4,
                rice: None,
                high_chair_count: 0,
                stroller_count: 0,
            })
            .await
    }

    #[tokio::test]
    async fn fresh_turn_gets_a_slot_question() {
        let fixture = fixture();
        let reply = fixture
            .orchestrator
            .process_text(&phone(), "hola, quiero reservar mesa", "Marta")
            .await
            .unwrap();
        assert!(reply.contains("¿Qué día"));
    }

    #[tokio::test]
    async fn modification_intent_opens_a_session() {
        let fixture = fixture();
        seed_booking(&fixture).await;

        let reply = fixture
            .orchestrator
            .process_text(&phone(), "quiero cambiar mi reserva", "Marta")
            .await
            .unwrap();

        assert!(reply.contains("¿Qué quieres cambiar"));
        assert_eq!(fixture.sessions.session_count().await, 1);
    }

    #[tokio::test]
    async fn modification_intent_without_bookings_reports_not_found() {
        let fixture = fixture();
        let reply = fixture
            .orchestrator
            .process_text(&phone(), "quiero cambiar mi reserva", "Marta")
            .await
            .unwrap();

        assert!(reply.contains("No encuentro"));
        assert_eq!(fixture.sessions.session_count().await, 0);
    }

    #[tokio::test]
    async fn unsupported_content_hands_off_and_preserves_session() {
        let fixture = fixture();
        seed_booking(&fixture).await;
        fixture
            .orchestrator
            .process_text(&phone(), "quiero cambiar mi reserva", "Marta")
            .await
            .unwrap();

        let reply = fixture
            .orchestrator
            .process_turn(&phone(), TurnContent::Unsupported(MediaKind::Audio), "Marta")
            .await
            .unwrap();

        assert!(reply.contains("mensajes de texto"));
        assert_eq!(fixture.gateway.sent_cards().await.len(), 1);
        // the open session is untouched
        assert_eq!(fixture.sessions.session_count().await, 1);
    }

    #[tokio::test]
    async fn expired_session_is_discarded_and_turn_reroutes() {
        let fixture = fixture();
        seed_booking(&fixture).await;
        fixture
            .orchestrator
            .process_text(&phone(), "quiero cambiar mi reserva", "Marta")
            .await
            .unwrap();

        // age the stored session past the idle limit
        let mut session = fixture
            .sessions
            .load_session(&phone())
            .await
            .unwrap()
            .unwrap();
        session.last_active = Timestamp::now().minus_secs(7200);
        fixture.sessions.save_session(&session).await.unwrap();

        // "sí" must not confirm anything stale; it falls through to the
        // fresh-booking flow
        let reply = fixture
            .orchestrator
            .process_text(&phone(), "sí", "Marta")
            .await
            .unwrap();

        assert_eq!(fixture.sessions.session_count().await, 0);
        assert!(!reply.contains("Hecho"));
    }

    #[tokio::test]
    async fn repeated_modification_intent_restarts_the_session() {
        let fixture = fixture();
        seed_booking(&fixture).await;
        fixture
            .orchestrator
            .process_text(&phone(), "quiero cambiar mi reserva", "Marta")
            .await
            .unwrap();
        fixture
            .orchestrator
            .process_text(&phone(), "la hora", "Marta")
            .await
            .unwrap();

        // a fresh intent mid-flow reopens from the top
        let reply = fixture
            .orchestrator
            .process_text(&phone(), "quiero cambiar mi reserva", "Marta")
            .await
            .unwrap();

        assert!(reply.contains("¿Qué quieres cambiar"));
        let session = fixture
            .sessions
            .load_session(&phone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.field, None);
    }

    #[tokio::test]
    async fn history_accumulates_both_roles() {
        let fixture = fixture();
        fixture
            .orchestrator
            .process_text(&phone(), "el sábado para 4", "Marta")
            .await
            .unwrap();

        let history = fixture.sessions.history(&phone()).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_user());
        assert!(history[1].is_assistant());
    }
}
