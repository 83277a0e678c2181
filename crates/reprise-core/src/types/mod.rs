//! Core types for reprise.

mod card;
mod quality;

pub use card::*;
pub use quality::*;
