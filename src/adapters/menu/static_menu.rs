//! Static menu validator adapter.
//!
//! Resolves free-text dish mentions against a fixed rice menu with aliases.
//! A deterministic stand-in for the production menu service.

use async_trait::async_trait;

use crate::domain::dialogue::lexicon;
use crate::domain::foundation::DomainError;
use crate::ports::{MenuValidator, MenuVerdict};

/// One dish with the phrases callers use for it.
struct MenuEntry {
    canonical: &'static str,
    aliases: &'static [&'static str],
}

static MENU: &[MenuEntry] = &[
    MenuEntry {
        canonical: "Paella Valenciana",
        aliases: &["paella valenciana", "valenciana", "paella"],
    },
    MenuEntry {
        canonical: "Arroz Negro",
        aliases: &["arroz negro", "negro", "black rice"],
    },
    MenuEntry {
        canonical: "Arroz a Banda",
        aliases: &["arroz a banda", "a banda", "banda"],
    },
    MenuEntry {
        canonical: "Arroz del Senyoret",
        aliases: &["arroz del senyoret", "senyoret", "senoret", "del senyoret"],
    },
    MenuEntry {
        canonical: "Paella de Verduras",
        aliases: &["paella de verduras", "verduras", "vegetal", "vegetariana", "vegetarian"],
    },
    MenuEntry {
        canonical: "Arroz con Bogavante",
        aliases: &["arroz con bogavante", "bogavante", "con bogavante", "lobster"],
    },
];

/// Menu validator over the fixed rice list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMenuValidator;

impl StaticMenuValidator {
    /// Creates the validator.
    pub fn new() -> Self {
        Self
    }

    fn rejection_message() -> String {
        let names: Vec<&str> = MENU.iter().map(|e| e.canonical).collect();
        format!(
            "Ese arroz no está en la carta. Tenemos: {}.",
            names.join(", ")
        )
    }

    /// Longest alias match wins, so "arroz negro" does not fall through to
    /// the generic "paella" alias.
    fn resolve(text: &str) -> Option<&'static str> {
        let norm = lexicon::normalize(text);
        let mut best: Option<(&'static str, usize)> = None;
        for entry in MENU {
            for alias in entry.aliases {
                if norm.contains(alias) {
                    let better = best.map_or(true, |(_, len)| alias.len() > len);
                    if better {
                        best = Some((entry.canonical, alias.len()));
                    }
                }
            }
        }
        best.map(|(canonical, _)| canonical)
    }
}

#[async_trait]
impl MenuValidator for StaticMenuValidator {
    async fn validate(&self, free_text: &str) -> Result<MenuVerdict, DomainError> {
        match Self::resolve(free_text) {
            Some(canonical) => Ok(MenuVerdict::Valid {
                canonical_name: canonical.to_string(),
            }),
            None => Ok(MenuVerdict::Rejected {
                message: Self::rejection_message(),
            }),
        }
    }
}
