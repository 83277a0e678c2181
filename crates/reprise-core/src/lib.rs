//! reprise-core - SM-2 spaced-repetition scheduling for flashcards.
//!
//! This crate provides the card model, the SM-2 scheduler, due-card
//! selection, ownership authorization, and a [`CardService`] that runs them
//! against any [`CardStore`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use reprise_core::{CardService, InMemoryCardStore, NewCard};
//!
//! let service = CardService::with_defaults(Arc::new(InMemoryCardStore::new()));
//!
//! let card = service.create_card(NewCard::new(user, deck, "hola", "hello")).await?;
//! let reviewed = service.review_card(card.id, user, 4).await?;
//!
//! let due = service.due_cards(user).await?;
//! ```

pub mod config;
pub mod due;
pub mod error;
pub mod guard;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{DueConfig, EngineConfig};
pub use due::{select_due, DueFilter};
pub use error::{ErrorCode, RepriseError, RepriseResult};
pub use guard::{authorize, AuthorizedCard};
pub use scheduler::{review_card, SchedulerConfig, Sm2Scheduler};
pub use service::CardService;
pub use store::InMemoryCardStore;
pub use traits::CardStore;
pub use types::{Card, CardEdit, NewCard, Quality, ReviewOutcome};
