//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for an existing reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random BookingId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a BookingId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Caller identity: the phone number the conversation is keyed by.
///
/// Digits plus an optional leading `+`. Messaging-provider identities arrive
/// as bare digit strings; both forms normalize to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses and normalizes a phone number.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the input has no digits
    /// - `InvalidFormat` if non-digit characters remain after stripping
    ///   separators, or the digit count is outside 7-15
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '(' && *c != ')' && *c != '.')
            .collect();

        let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
        if digits.is_empty() {
            return Err(ValidationError::empty_field("phone"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "phone",
                format!("'{raw}' contains non-digit characters"),
            ));
        }
        if digits.len() < 7 || digits.len() > 15 {
            return Err(ValidationError::invalid_format(
                "phone",
                format!("expected 7-15 digits, got {}", digits.len()),
            ));
        }

        Ok(Self(digits.to_string()))
    }

    /// Returns the normalized digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
