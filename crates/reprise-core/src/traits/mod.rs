//! Collaborator contracts.

mod card_store;

pub use card_store::*;
