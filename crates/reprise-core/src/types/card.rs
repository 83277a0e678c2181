//! Flashcard value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RepriseError, RepriseResult};

/// Ease factor every card starts with.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Floor for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval every card starts with, in days.
pub const INITIAL_INTERVAL_DAYS: u32 = 1;

/// A flashcard together with its SM-2 scheduling state.
///
/// The scheduling fields (`ease_factor`, `interval_days`, `repetition_count`,
/// `last_reviewed_at`, `next_review_at`) change only through
/// [`Sm2Scheduler::review`](crate::scheduler::Sm2Scheduler::review).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Containing deck.
    pub deck_id: Uuid,
    /// Question side.
    pub front: String,
    /// Answer side.
    pub back: String,
    /// SM-2 ease factor, never below 1.3.
    pub ease_factor: f64,
    /// Current interval in days, never below 1.
    pub interval_days: u32,
    /// Consecutive successful reviews since the last failure.
    pub repetition_count: u32,
    /// When the card was last reviewed.
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// When the card is next due. `None` means due now.
    pub next_review_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last write timestamp, used as the store generation.
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Create a never-reviewed card.
    pub fn new(
        owner_id: Uuid,
        deck_id: Uuid,
        front: impl Into<String>,
        back: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            deck_id,
            front: front.into(),
            back: back.into(),
            ease_factor: INITIAL_EASE_FACTOR,
            interval_days: INITIAL_INTERVAL_DAYS,
            repetition_count: 0,
            last_reviewed_at: None,
            next_review_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the card is due at `now`.
    ///
    /// A card that has never been scheduled is always due; otherwise it is due
    /// once `now` reaches `next_review_at` (inclusive).
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review_at {
            None => true,
            Some(next) => next <= now,
        }
    }

    /// Whether the card has never been reviewed.
    pub fn is_new(&self) -> bool {
        self.last_reviewed_at.is_none()
    }

    /// Check the scheduling invariants.
    pub fn validate(&self) -> RepriseResult<()> {
        if !self.ease_factor.is_finite() || self.ease_factor < MIN_EASE_FACTOR {
            return Err(RepriseError::invalid_card(
                self.id,
                format!("ease factor {} is below {}", self.ease_factor, MIN_EASE_FACTOR),
            ));
        }
        if self.interval_days < 1 {
            return Err(RepriseError::invalid_card(self.id, "interval must be at least 1 day"));
        }
        Ok(())
    }

    /// Apply a content edit. Scheduling fields are left alone.
    pub(crate) fn apply_edit(&mut self, edit: CardEdit) {
        if let Some(front) = edit.front {
            self.front = front;
        }
        if let Some(back) = edit.back {
            self.back = back;
        }
        if let Some(deck_id) = edit.deck_id {
            self.deck_id = deck_id;
        }
    }
}

/// Request to create a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub owner_id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
}

impl NewCard {
    pub fn new(owner_id: Uuid, deck_id: Uuid, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            owner_id,
            deck_id,
            front: front.into(),
            back: back.into(),
        }
    }

    /// Reject requests with nil identifiers.
    pub fn validate(&self) -> RepriseResult<()> {
        if self.owner_id.is_nil() {
            return Err(RepriseError::validation_field("owner_id", "owner ID is required"));
        }
        if self.deck_id.is_nil() {
            return Err(RepriseError::validation_field("deck_id", "deck ID is required"));
        }
        Ok(())
    }
}

/// Content edit for an existing card.
///
/// Only content and deck membership are editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<Uuid>,
}

impl CardEdit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the front text.
    pub fn with_front(mut self, front: impl Into<String>) -> Self {
        self.front = Some(front.into());
        self
    }

    /// Set the back text.
    pub fn with_back(mut self, back: impl Into<String>) -> Self {
        self.back = Some(back.into());
        self
    }

    /// Move the card to another deck.
    pub fn with_deck(mut self, deck_id: Uuid) -> Self {
        self.deck_id = Some(deck_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none() && self.deck_id.is_none()
    }

    pub fn validate(&self) -> RepriseResult<()> {
        if self.is_empty() {
            return Err(RepriseError::empty_edit());
        }
        if self.deck_id.is_some_and(|id| id.is_nil()) {
            return Err(RepriseError::validation_field("deck_id", "deck ID is required"));
        }
        Ok(())
    }
}
