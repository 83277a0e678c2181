//! In-memory card store.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{RepriseError, RepriseResult};
use crate::traits::CardStore;
use crate::types::Card;

/// Card store backed by a `HashMap` behind an async `RwLock`.
///
/// Fetch-and-compare plus write happen under one write lock, which gives the
/// same at-most-one-commit-per-generation guarantee a row lock would.
#[derive(Default)]
pub struct InMemoryCardStore {
    cards: RwLock<HashMap<Uuid, Card>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `cards`.
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let cards = cards.into_iter().map(|card| (card.id, card)).collect();
        Self {
            cards: RwLock::new(cards),
        }
    }

    pub async fn len(&self) -> usize {
        self.cards.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cards.read().await.is_empty()
    }
}

/// Commit timestamp strictly after the previous generation.
fn next_generation(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn create(&self, card: Card) -> RepriseResult<Card> {
        let mut cards = self.cards.write().await;
        if cards.contains_key(&card.id) {
            return Err(RepriseError::store(format!("card {} already exists", card.id)));
        }
        debug!(card_id = %card.id, owner_id = %card.owner_id, "Inserting card");
        cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn get_by_id(&self, id: Uuid) -> RepriseResult<Option<Card>> {
        let cards = self.cards.read().await;
        Ok(cards.get(&id).cloned())
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> RepriseResult<Vec<Card>> {
        let cards = self.cards.read().await;
        let mut owned: Vec<Card> = cards
            .values()
            .filter(|card| card.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn update(
        &self,
        id: Uuid,
        expected_updated_at: DateTime<Utc>,
        mut card: Card,
    ) -> RepriseResult<Card> {
        if card.id != id {
            return Err(RepriseError::validation_field(
                "id",
                format!("card ID {} does not match {}", card.id, id),
            ));
        }

        let mut cards = self.cards.write().await;
        let stored = cards.get_mut(&id).ok_or_else(|| RepriseError::not_found(id))?;

        if stored.updated_at != expected_updated_at {
            debug!(
                card_id = %id,
                expected = %expected_updated_at,
                actual = %stored.updated_at,
                "Rejecting stale card update"
            );
            return Err(RepriseError::conflict(id));
        }
        if stored.owner_id != card.owner_id {
            return Err(RepriseError::validation_field("owner_id", "owner ID cannot change"));
        }

        card.created_at = stored.created_at;
        card.updated_at = next_generation(stored.updated_at);
        *stored = card.clone();

        debug!(card_id = %id, updated_at = %card.updated_at, "Committed card update");
        Ok(card)
    }

    async fn delete(&self, id: Uuid) -> RepriseResult<()> {
        let mut cards = self.cards.write().await;
        match cards.remove(&id) {
            Some(_) => {
                debug!(card_id = %id, "Deleted card");
                Ok(())
            }
            None => Err(RepriseError::not_found(id)),
        }
    }
}
