//! Review quality ratings.
//!
//! SM-2 rates each recall attempt on a 0-5 scale:
//! - 0: Complete blackout
//! - 1: Incorrect, but the answer was recognized
//! - 2: Incorrect, but the answer seemed easy to recall
//! - 3: Correct with serious difficulty
//! - 4: Correct after hesitation
//! - 5: Perfect response

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{RepriseError, RepriseResult};

/// Highest quality rating.
pub const MAX_QUALITY: u8 = 5;

/// Lowest quality that counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;

/// A validated SM-2 quality rating in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Validate a raw rating.
    pub fn new(value: i64) -> RepriseResult<Self> {
        if (0..=i64::from(MAX_QUALITY)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RepriseError::invalid_quality(value))
        }
    }

    /// Every valid rating, lowest first.
    pub fn all() -> impl Iterator<Item = Quality> {
        (0..=MAX_QUALITY).map(Quality)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether the rating counts as a successful recall.
    pub fn is_passing(self) -> bool {
        self.0 >= PASSING_QUALITY
    }

    pub fn outcome(self) -> ReviewOutcome {
        if self.is_passing() {
            ReviewOutcome::Success
        } else {
            ReviewOutcome::Failure
        }
    }
}

impl TryFrom<i64> for Quality {
    type Error = RepriseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl TryFrom<i32> for Quality {
    type Error = RepriseError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Quality::new(i64::from(value))
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Result class of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewOutcome {
    /// Quality 3-5; the repetition streak continues.
    Success,
    /// Quality 0-2; the card is relearned from the start.
    Failure,
}
