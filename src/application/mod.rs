//! Application layer.
//!
//! The dialogue orchestrator: the entry point the transport layer calls
//! with inbound turns.

mod orchestrator;

pub use orchestrator::{DialogueOrchestrator, MediaKind, TurnContent};
