//! Card store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::due::DueFilter;
use crate::error::RepriseResult;
use crate::types::Card;

#[cfg(test)]
use mockall::automock;

/// Persistence contract for cards - every storage backend implements this.
///
/// Writes are guarded by the card's `updated_at`: `update` commits only if
/// the stored card still carries the generation the caller fetched, so at
/// most one concurrent review of the same card wins.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Insert a new card.
    async fn create(&self, card: Card) -> RepriseResult<Card>;

    /// Get a card by ID.
    async fn get_by_id(&self, id: Uuid) -> RepriseResult<Option<Card>>;

    /// All cards owned by a user, oldest first.
    async fn get_by_owner(&self, owner_id: Uuid) -> RepriseResult<Vec<Card>>;

    /// Replace a card if its stored `updated_at` equals `expected_updated_at`.
    ///
    /// Returns the committed card, whose `updated_at` is the new generation.
    /// Fails with `Conflict` when the generation moved and `CardNotFound`
    /// when the card is gone.
    async fn update(
        &self,
        id: Uuid,
        expected_updated_at: DateTime<Utc>,
        card: Card,
    ) -> RepriseResult<Card>;

    /// Delete a card by ID.
    async fn delete(&self, id: Uuid) -> RepriseResult<()>;

    /// Cards matching a due filter, oldest first.
    ///
    /// The default scans the owner's cards; backends with a query language
    /// should push the predicate down instead.
    async fn get_due(&self, filter: &DueFilter) -> RepriseResult<Vec<Card>> {
        let cards = self.get_by_owner(filter.owner_id).await?;
        Ok(cards.into_iter().filter(|card| filter.matches(card)).collect())
    }
}
