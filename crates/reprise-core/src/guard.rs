//! Ownership authorization.
//!
//! Every mutation goes through [`authorize`], which consumes the card the
//! caller already fetched and hands back an [`AuthorizedCard`]. Mutating code
//! paths accept only that token, so the instance that was checked is the
//! instance that gets changed.

use std::ops::Deref;

use uuid::Uuid;

use crate::error::{RepriseError, RepriseResult};
use crate::types::Card;

/// A fetched card whose owner matched the requester.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizedCard {
    card: Card,
    requester_id: Uuid,
}

impl AuthorizedCard {
    /// The user the check was performed for.
    pub fn requester_id(&self) -> Uuid {
        self.requester_id
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn into_card(self) -> Card {
        self.card
    }
}

impl Deref for AuthorizedCard {
    type Target = Card;

    fn deref(&self) -> &Self::Target {
        &self.card
    }
}

/// Check that `requester_id` owns `card`.
pub fn authorize(card: Card, requester_id: Uuid) -> RepriseResult<AuthorizedCard> {
    if card.owner_id != requester_id {
        return Err(RepriseError::unauthorized(card.id, requester_id));
    }
    Ok(AuthorizedCard { card, requester_id })
}
