//! Rule-based availability oracle adapter.
//!
//! A deterministic stand-in for the production availability service. It
//! enforces the restaurant's booking policy (no same-day changes in-band, a
//! bounded booking window, fixed service hours, a per-slot capacity) over
//! an in-memory occupancy map, and suggests alternatives the way the real
//! service does.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::{AvailabilityOracle, AvailabilityVerdict, UnavailabilityReason};

/// Policy knobs for the rule-based oracle.
#[derive(Debug, Clone)]
pub struct AvailabilityRules {
    /// How many days ahead bookings are accepted.
    pub window_days: i64,

    /// Sittings offered each day.
    pub service_hours: Vec<NaiveTime>,

    /// Diners that fit in one sitting.
    pub seats_per_sitting: u32,
}

impl Default for AvailabilityRules {
    fn default() -> Self {
        let hours = [(13, 0), (13, 30), (14, 0), (14, 30), (15, 0), (20, 30), (21, 0), (21, 30), (22, 0)];
        Self {
            window_days: 30,
            service_hours: hours
                .iter()
                .map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0).unwrap())
                .collect(),
            seats_per_sitting: 40,
        }
    }
}

/// Rule-based availability oracle with an in-memory occupancy map.
#[derive(Clone)]
pub struct RuleBasedAvailability {
    rules: AvailabilityRules,
    today: NaiveDate,
    occupancy: Arc<RwLock<HashMap<(NaiveDate, NaiveTime), u32>>>,
}

impl RuleBasedAvailability {
    /// Creates an oracle with the given policy, anchored at `today`.
    pub fn new(rules: AvailabilityRules, today: NaiveDate) -> Self {
        Self {
            rules,
            today,
            occupancy: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Default policy anchored at `today`.
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self::new(AvailabilityRules::default(), today)
    }

    /// Records diners already seated at a sitting (for tests and seeding).
    pub async fn occupy(&self, date: NaiveDate, time: NaiveTime, seats: u32) {
        let mut occupancy = self.occupancy.write().await;
        *occupancy.entry((date, time)).or_insert(0) += seats;
    }

    async fn free_hours(&self, date: NaiveDate, party_size: u32) -> Vec<NaiveTime> {
        let occupancy = self.occupancy.read().await;
        self.rules
            .service_hours
            .iter()
            .copied()
            .filter(|hour| {
                let taken = occupancy.get(&(date, *hour)).copied().unwrap_or(0);
                taken + party_size <= self.rules.seats_per_sitting
            })
            .collect()
    }
}

#[async_trait]
impl AvailabilityOracle for RuleBasedAvailability {
    async fn evaluate(
        &self,
        date: NaiveDate,
        party_size: u32,
        time: NaiveTime,
    ) -> Result<AvailabilityVerdict, DomainError> {
        if date <= self.today {
            return Ok(AvailabilityVerdict::unavailable(UnavailabilityReason::SameDay)
                .with_message(
                    "Para hoy no puedo gestionar cambios por aquí; llámanos y lo vemos.",
                ));
        }
        if date > self.today + Duration::days(self.rules.window_days) {
            return Ok(
                AvailabilityVerdict::unavailable(UnavailabilityReason::OutsideWindow)
                    .with_message(format!(
                        "Solo cogemos reservas con {} días de antelación como mucho.",
                        self.rules.window_days
                    )),
            );
        }

        let free = self.free_hours(date, party_size).await;
        if !self.rules.service_hours.contains(&time) {
            return Ok(
                AvailabilityVerdict::unavailable(UnavailabilityReason::NoCapacity)
                    .with_suggested_hours(free)
                    .with_message("A esa hora no damos servicio."),
            );
        }
        if !free.contains(&time) {
            let mut verdict =
                AvailabilityVerdict::unavailable(UnavailabilityReason::NoCapacity)
                    .with_suggested_hours(free.clone())
                    .with_message("A esa hora estamos completos.");
            if free.is_empty() {
                verdict = verdict.with_suggested_date(date + Duration::days(1));
            }
            return Ok(verdict);
        }

        Ok(AvailabilityVerdict::available())
    }
}
