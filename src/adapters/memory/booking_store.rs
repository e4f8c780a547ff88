//! In-memory booking store adapter.
//!
//! Backs the `BookingStore` port with a plain map. Useful for testing and
//! development; production wires a real reservations backend here.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::{ExistingBookingRecord, PendingChange};
use crate::domain::foundation::{BookingId, DomainError, PhoneNumber};
use crate::ports::BookingStore;

/// In-memory reservation storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    bookings: Arc<RwLock<HashMap<BookingId, ExistingBookingRecord>>>,
}

impl InMemoryBookingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a reservation, returning its id.
    pub async fn insert(&self, record: ExistingBookingRecord) -> BookingId {
        let id = record.id;
        self.bookings.write().await.insert(id, record);
        id
    }

    /// Number of stored reservations.
    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Vec<ExistingBookingRecord>, DomainError> {
        let bookings = self.bookings.read().await;
        let mut found: Vec<ExistingBookingRecord> = bookings
            .values()
            .filter(|b| &b.phone == phone)
            .cloned()
            .collect();
        found.sort_by_key(|b| (b.date, b.time));
        Ok(found)
    }

    async fn get_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<ExistingBookingRecord>, DomainError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn update(
        &self,
        id: &BookingId,
        change: &PendingChange,
    ) -> Result<bool, DomainError> {
        let mut bookings = self.bookings.write().await;
        match bookings.get(id) {
            Some(record) => {
                let updated = change.apply_to(record);
                bookings.insert(*id, updated);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
