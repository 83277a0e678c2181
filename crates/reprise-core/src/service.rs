//! Card service.
//!
//! Orchestrates the collaborators around the pure engine: fetch the card from
//! the store, authorize the requester against that fetched instance, run the
//! scheduler, and write the result back guarded by the fetched generation.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{DueConfig, EngineConfig};
use crate::due::DueFilter;
use crate::error::{RepriseError, RepriseResult};
use crate::guard::{authorize, AuthorizedCard};
use crate::scheduler::Sm2Scheduler;
use crate::traits::CardStore;
use crate::types::{Card, CardEdit, NewCard, Quality};

/// Flashcard operations for one store.
pub struct CardService {
    store: Arc<dyn CardStore>,
    scheduler: Sm2Scheduler,
    due: DueConfig,
}

impl CardService {
    /// Create a service with the given configuration.
    pub fn new(store: Arc<dyn CardStore>, config: EngineConfig) -> RepriseResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            scheduler: Sm2Scheduler::with_config(config.scheduler)?,
            due: config.due,
        })
    }

    /// Create a service with the classic SM-2 parameters.
    pub fn with_defaults(store: Arc<dyn CardStore>) -> Self {
        Self {
            store,
            scheduler: Sm2Scheduler::new(),
            due: DueConfig::default(),
        }
    }

    pub fn scheduler(&self) -> &Sm2Scheduler {
        &self.scheduler
    }

    /// Create a card with the initial scheduling state.
    pub async fn create_card(&self, request: NewCard) -> RepriseResult<Card> {
        let card = self.scheduler.new_card(request, Utc::now())?;
        let saved = self.store.create(card).await?;

        info!(
            card_id = %saved.id,
            owner_id = %saved.owner_id,
            deck_id = %saved.deck_id,
            "Card created"
        );
        Ok(saved)
    }

    /// Get one card the requester owns.
    pub async fn get_card(&self, id: Uuid, requester_id: Uuid) -> RepriseResult<Card> {
        Ok(self.fetch_authorized(id, requester_id).await?.into_card())
    }

    /// All cards of a user, oldest first.
    pub async fn cards_for_owner(&self, owner_id: Uuid) -> RepriseResult<Vec<Card>> {
        let cards = self.store.get_by_owner(owner_id).await?;
        info!(owner_id = %owner_id, card_count = cards.len(), "Retrieved cards for owner");
        Ok(cards)
    }

    /// Change a card's content or deck. Scheduling state is kept as is.
    pub async fn edit_card(&self, id: Uuid, requester_id: Uuid, edit: CardEdit) -> RepriseResult<Card> {
        edit.validate()?;
        let authorized = self.fetch_authorized(id, requester_id).await?;
        let generation = authorized.updated_at;

        let mut card = authorized.into_card();
        card.apply_edit(edit);
        let saved = self.commit(card, generation).await?;

        info!(card_id = %id, deck_id = %saved.deck_id, "Card edited");
        Ok(saved)
    }

    /// Delete a card the requester owns.
    pub async fn delete_card(&self, id: Uuid, requester_id: Uuid) -> RepriseResult<()> {
        let authorized = self.fetch_authorized(id, requester_id).await?;
        self.store.delete(authorized.id).await?;

        info!(card_id = %id, "Card deleted");
        Ok(())
    }

    /// Record a review now.
    pub async fn review_card(&self, id: Uuid, requester_id: Uuid, quality: i32) -> RepriseResult<Card> {
        self.review_card_at(id, requester_id, quality, Utc::now()).await
    }

    /// Record a review at an explicit time.
    ///
    /// Quality is checked before anything is fetched. The stored card changes
    /// only if every step succeeds and no other write landed in between.
    pub async fn review_card_at(
        &self,
        id: Uuid,
        requester_id: Uuid,
        quality: i32,
        now: DateTime<Utc>,
    ) -> RepriseResult<Card> {
        let rating = Quality::try_from(quality)?;
        let authorized = self.fetch_authorized(id, requester_id).await?;

        let reviewed = self.scheduler.review_with(&authorized, rating, now)?;
        let saved = self.commit(reviewed, authorized.updated_at).await?;

        info!(
            card_id = %id,
            quality,
            outcome = %rating.outcome(),
            ease_factor = saved.ease_factor,
            interval_days = saved.interval_days,
            repetition_count = saved.repetition_count,
            next_review_at = ?saved.next_review_at,
            "Card reviewed"
        );
        Ok(saved)
    }

    /// Interval each quality rating would give the card.
    pub async fn preview_intervals(&self, id: Uuid, requester_id: Uuid) -> RepriseResult<[u32; 6]> {
        let authorized = self.fetch_authorized(id, requester_id).await?;
        Ok(self.scheduler.preview_intervals(&authorized))
    }

    /// Cards due now for a user.
    pub async fn due_cards(&self, owner_id: Uuid) -> RepriseResult<Vec<Card>> {
        self.due_cards_at(owner_id, Utc::now()).await
    }

    /// Cards due at `now` for a user, capped by the session limit.
    pub async fn due_cards_at(&self, owner_id: Uuid, now: DateTime<Utc>) -> RepriseResult<Vec<Card>> {
        let mut due = self.store.get_due(&DueFilter::new(owner_id, now)).await?;
        if let Some(limit) = self.due.session_limit {
            due.truncate(limit);
        }

        info!(owner_id = %owner_id, due_card_count = due.len(), "Retrieved due cards for owner");
        Ok(due)
    }

    async fn fetch_authorized(&self, id: Uuid, requester_id: Uuid) -> RepriseResult<AuthorizedCard> {
        let card = match self.store.get_by_id(id).await? {
            Some(card) => card,
            None => {
                warn!(card_id = %id, "Card not found");
                return Err(RepriseError::not_found(id));
            }
        };

        authorize(card, requester_id).map_err(|e| {
            warn!(card_id = %id, requester_id = %requester_id, "Rejected access to card owned by another user");
            e
        })
    }

    async fn commit(&self, card: Card, generation: DateTime<Utc>) -> RepriseResult<Card> {
        let id = card.id;
        self.store.update(id, generation, card).await.map_err(|e| {
            if matches!(e, RepriseError::Conflict { .. }) {
                warn!(card_id = %id, "Concurrent modification, update discarded");
            }
            e
        })
    }
}
