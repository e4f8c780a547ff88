//! Responder adapters.

mod template;

pub use template::TemplateResponder;
