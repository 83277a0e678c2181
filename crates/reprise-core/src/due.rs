//! Due-card selection.
//!
//! A card is due at `t` when it has never been scheduled or when
//! `next_review_at <= t`. The predicate is exposed as a [`DueFilter`] value so
//! a store can translate it into its own query instead of scanning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Card;

/// Declarative due-card predicate for one owner at one reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueFilter {
    /// Only cards owned by this user.
    pub owner_id: Uuid,
    /// Reference time; the boundary is inclusive.
    pub as_of: DateTime<Utc>,
}

impl DueFilter {
    pub fn new(owner_id: Uuid, as_of: DateTime<Utc>) -> Self {
        Self { owner_id, as_of }
    }

    /// Whether `card` satisfies the filter.
    pub fn matches(&self, card: &Card) -> bool {
        card.owner_id == self.owner_id && card.is_due(self.as_of)
    }
}

/// Keep the cards that are due at `now`, in their original order.
pub fn select_due<I>(cards: I, now: DateTime<Utc>) -> Vec<Card>
where
    I: IntoIterator<Item = Card>,
{
    cards.into_iter().filter(|card| card.is_due(now)).collect()
}

/// Number of cards due at `now`.
pub fn count_due<'a, I>(cards: I, now: DateTime<Utc>) -> usize
where
    I: IntoIterator<Item = &'a Card>,
{
    cards.into_iter().filter(|card| card.is_due(now)).count()
}

/// Earliest scheduled review strictly after `now`.
///
/// Returns `None` when no card is scheduled in the future.
pub fn next_due_at<'a, I>(cards: I, now: DateTime<Utc>) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = &'a Card>,
{
    cards
        .into_iter()
        .filter_map(|card| card.next_review_at)
        .filter(|next| *next > now)
        .min()
}
