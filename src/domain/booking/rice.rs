//! Rice selection value object.
//!
//! Rice dishes are ordered ahead of time with a serving count; the kitchen
//! needs both before the day of the reservation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// A rice dish chosen for a reservation, with its serving count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiceSelection {
    /// Canonical dish name as validated by the menu.
    dish_name: String,

    /// Number of servings ordered.
    servings: u32,
}

impl RiceSelection {
    /// Minimum servings the kitchen prepares per rice order.
    pub const MIN_SERVINGS: u32 = 2;

    /// Creates a rice selection.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the dish name is blank
    /// - `OutOfRange` if servings is below the kitchen minimum or above
    ///   `max_servings` (normally the party size)
    pub fn new(
        dish_name: impl Into<String>,
        servings: u32,
        max_servings: u32,
    ) -> Result<Self, ValidationError> {
        let dish_name = dish_name.into();
        if dish_name.trim().is_empty() {
            return Err(ValidationError::empty_field("dish_name"));
        }
        if servings < Self::MIN_SERVINGS || servings > max_servings {
            return Err(ValidationError::out_of_range(
                "servings",
                Self::MIN_SERVINGS as i64,
                max_servings as i64,
                servings as i64,
            ));
        }
        Ok(Self { dish_name, servings })
    }

    /// Reconstitutes a selection from persistence (no validation).
    pub fn reconstitute(dish_name: String, servings: u32) -> Self {
        Self { dish_name, servings }
    }

    /// Returns the canonical dish name.
    pub fn dish_name(&self) -> &str {
        &self.dish_name
    }

    /// Returns the serving count.
    pub fn servings(&self) -> u32 {
        self.servings
    }

    /// Human-readable description, e.g. "Arroz Negro (4 raciones)".
    pub fn describe(&self) -> String {
        format!("{} ({} raciones)", self.dish_name, self.servings)
    }
}
