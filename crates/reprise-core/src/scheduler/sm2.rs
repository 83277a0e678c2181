//! SM-2 review scheduling.
//!
//! Every review first recomputes the ease factor from the quality rating:
//!
//! ```text
//! EF' = max(EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), 1.3)
//! ```
//!
//! then branches on the outcome:
//! - Quality 0-2: the streak resets and the card comes back after one day.
//! - Quality 3-5: the streak grows; intervals go 1 day, 6 days, then the
//!   previous interval multiplied by `EF'`.

use chrono::{DateTime, Duration, Utc};

use super::SchedulerConfig;
use crate::error::{RepriseError, RepriseResult};
use crate::types::{Card, NewCard, Quality, MAX_QUALITY};

/// Scheduling fields produced by one review.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    ease_factor: f64,
    interval_days: u32,
    repetition_count: u32,
}

/// SM-2 scheduler.
///
/// Stateless apart from its parameters; safe to share across threads and to
/// call concurrently for different cards.
#[derive(Debug, Clone, Default)]
pub struct Sm2Scheduler {
    config: SchedulerConfig,
}

impl Sm2Scheduler {
    /// Create a scheduler with the classic SM-2 parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler with custom parameters.
    pub fn with_config(config: SchedulerConfig) -> RepriseResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build a never-reviewed card from a creation request.
    pub fn new_card(&self, request: NewCard, now: DateTime<Utc>) -> RepriseResult<Card> {
        request.validate()?;
        let mut card = Card::new(request.owner_id, request.deck_id, request.front, request.back, now);
        card.ease_factor = self.config.initial_ease_factor;
        card.interval_days = self.config.first_interval_days;
        Ok(card)
    }

    /// Review a card with a raw quality rating.
    ///
    /// Fails with `InvalidQuality` when `quality` is outside `0..=5`. On any
    /// error the input card is untouched and no partial state is returned.
    pub fn review(&self, card: &Card, quality: i32, now: DateTime<Utc>) -> RepriseResult<Card> {
        let quality = Quality::try_from(quality)?;
        self.review_with(card, quality, now)
    }

    /// Review a card with an already validated rating.
    pub fn review_with(&self, card: &Card, quality: Quality, now: DateTime<Utc>) -> RepriseResult<Card> {
        card.validate()?;

        let next = self.transition(card, quality);
        let next_review_at = now
            .checked_add_signed(Duration::days(i64::from(next.interval_days)))
            .ok_or_else(|| RepriseError::schedule_overflow(card.id, next.interval_days))?;

        let mut reviewed = card.clone();
        reviewed.ease_factor = next.ease_factor;
        reviewed.interval_days = next.interval_days;
        reviewed.repetition_count = next.repetition_count;
        reviewed.last_reviewed_at = Some(now);
        reviewed.next_review_at = Some(next_review_at);
        Ok(reviewed)
    }

    /// Interval each quality 0..=5 would produce for `card`.
    ///
    /// Used to show the user what each rating does before they choose one.
    pub fn preview_intervals(&self, card: &Card) -> [u32; 6] {
        let mut intervals = [0; 6];
        for quality in Quality::all() {
            intervals[quality.value() as usize] = self.transition(card, quality).interval_days;
        }
        intervals
    }

    /// Updated ease factor for a rating, floored at the configured minimum.
    pub fn next_ease_factor(&self, ease_factor: f64, quality: Quality) -> f64 {
        let distance = f64::from(MAX_QUALITY - quality.value());
        let updated = ease_factor + (0.1 - distance * (0.08 + distance * 0.02));
        updated.max(self.config.min_ease_factor)
    }

    fn transition(&self, card: &Card, quality: Quality) -> Transition {
        let ease_factor = self.next_ease_factor(card.ease_factor, quality);

        if !quality.is_passing() {
            return Transition {
                ease_factor,
                interval_days: self.config.failure_interval_days,
                repetition_count: 0,
            };
        }

        let repetition_count = card.repetition_count.saturating_add(1);
        let interval_days = match repetition_count {
            1 => self.config.first_interval_days,
            2 => self.config.second_interval_days,
            // f64 -> u32 `as` saturates, the clamp keeps it in range
            _ => ((f64::from(card.interval_days) * ease_factor).round() as u32)
                .clamp(1, self.config.max_interval_days),
        };

        Transition {
            ease_factor,
            interval_days,
            repetition_count,
        }
    }
}

/// Review a card with the default SM-2 parameters.
pub fn review_card(card: &Card, quality: i32, now: DateTime<Utc>) -> RepriseResult<Card> {
    Sm2Scheduler::new().review(card, quality, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    const EPSILON: f64 = 1e-9;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn card_with(ease_factor: f64, interval_days: u32, repetition_count: u32) -> Card {
        let mut card = Card::new(Uuid::new_v4(), Uuid::new_v4(), "front", "back", fixed_now());
        card.ease_factor = ease_factor;
        card.interval_days = interval_days;
        card.repetition_count = repetition_count;
        card
    }

    #[test]
    fn test_first_review_perfect() {
        let now = fixed_now();
        let card = card_with(2.5, 1, 0);

        let reviewed = review_card(&card, 5, now).unwrap();

        assert!((reviewed.ease_factor - 2.6).abs() < EPSILON);
        assert_eq!(reviewed.repetition_count, 1);
        assert_eq!(reviewed.interval_days, 1);
        assert_eq!(reviewed.last_reviewed_at, Some(now));
        assert_eq!(reviewed.next_review_at, Some(now + Duration::days(1)));
    }

    #[test]
    fn test_failure_after_streak() {
        let now = fixed_now();
        let card = card_with(2.5, 6, 2);

        let reviewed = review_card(&card, 2, now).unwrap();

        // 2.5 + (0.1 - 3 * (0.08 + 3 * 0.02)) = 2.18
        assert!((reviewed.ease_factor - 2.18).abs() < EPSILON);
        assert_eq!(reviewed.repetition_count, 0);
        assert_eq!(reviewed.interval_days, 1);
        assert_eq!(reviewed.next_review_at, Some(now + Duration::days(1)));
    }

    #[test]
    fn test_second_success_is_six_days() {
        let reviewed = review_card(&card_with(2.5, 1, 1), 4, fixed_now()).unwrap();
        assert_eq!(reviewed.repetition_count, 2);
        assert_eq!(reviewed.interval_days, 6);
    }

    #[test]
    fn test_third_success_multiplies_by_new_ease() {
        let card = card_with(2.5, 6, 2);

        let good = review_card(&card, 4, fixed_now()).unwrap();
        assert_eq!(good.repetition_count, 3);
        assert_eq!(good.interval_days, 15); // 6 * 2.5

        let perfect = review_card(&card, 5, fixed_now()).unwrap();
        assert_eq!(perfect.interval_days, 16); // round(6 * 2.6)

        let hard = review_card(&card, 3, fixed_now()).unwrap();
        assert_eq!(hard.interval_days, 14); // round(6 * 2.36)
    }

    #[test]
    fn test_ease_floor_holds_for_every_quality() {
        for ease in [1.3, 1.35, 1.8, 2.5, 3.4] {
            for reps in [0, 1, 2, 7] {
                for quality in 0..=5 {
                    let card = card_with(ease, 4, reps);
                    let reviewed = review_card(&card, quality, fixed_now()).unwrap();
                    assert!(
                        reviewed.ease_factor >= 1.3,
                        "ease {} after q={} from {}",
                        reviewed.ease_factor,
                        quality,
                        ease
                    );
                }
            }
        }
    }

    #[test]
    fn test_failures_always_reset() {
        for quality in 0..3 {
            for reps in [0, 1, 2, 10] {
                let reviewed = review_card(&card_with(2.2, 40, reps), quality, fixed_now()).unwrap();
                assert_eq!(reviewed.repetition_count, 0);
                assert_eq!(reviewed.interval_days, 1);
            }
        }
    }

    #[test]
    fn test_ease_updated_on_failure_from_pre_review_value() {
        let card = card_with(2.0, 10, 4);
        let reviewed = review_card(&card, 0, fixed_now()).unwrap();
        // 2.0 + (0.1 - 5 * (0.08 + 5 * 0.02)) = 1.2, floored
        assert!((reviewed.ease_factor - 1.3).abs() < EPSILON);

        let reviewed = review_card(&card, 1, fixed_now()).unwrap();
        // 2.0 + (0.1 - 4 * (0.08 + 4 * 0.02)) = 1.46
        assert!((reviewed.ease_factor - 1.46).abs() < EPSILON);
    }

    #[test]
    fn test_streak_interval_uses_previous_interval() {
        for reps in [2, 3, 8] {
            for quality in 3..=5 {
                let card = card_with(2.1, 9, reps);
                let scheduler = Sm2Scheduler::new();
                let ease = scheduler.next_ease_factor(card.ease_factor, Quality::new(quality.into()).unwrap());
                let reviewed = scheduler.review(&card, quality, fixed_now()).unwrap();
                assert_eq!(reviewed.interval_days, (9.0 * ease).round() as u32);
                assert_eq!(reviewed.repetition_count, reps + 1);
            }
        }
    }

    #[test]
    fn test_next_review_is_last_review_plus_interval() {
        let now = fixed_now();
        for reps in [0, 1, 2, 5] {
            for quality in 0..=5 {
                let reviewed = review_card(&card_with(2.5, 12, reps), quality, now).unwrap();
                let last = reviewed.last_reviewed_at.unwrap();
                assert_eq!(
                    reviewed.next_review_at.unwrap(),
                    last + Duration::days(i64::from(reviewed.interval_days))
                );
            }
        }
    }

    #[test]
    fn test_invalid_quality_leaves_card_untouched() {
        let card = card_with(2.5, 6, 2);
        let snapshot = serde_json::to_vec(&card).unwrap();

        for quality in [-1, 6, 42, i32::MIN, i32::MAX] {
            let err = review_card(&card, quality, fixed_now()).unwrap_err();
            assert!(matches!(err, RepriseError::InvalidQuality { .. }));
        }
        assert_eq!(serde_json::to_vec(&card).unwrap(), snapshot);
    }

    #[test]
    fn test_invalid_card_is_rejected() {
        let card = card_with(1.0, 6, 2);
        let err = review_card(&card, 4, fixed_now()).unwrap_err();
        assert!(matches!(err, RepriseError::InvalidCard { .. }));
    }

    #[test]
    fn test_review_is_deterministic() {
        let card = card_with(2.3, 11, 3);
        let a = review_card(&card, 4, fixed_now()).unwrap();
        let b = review_card(&card, 4, fixed_now()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_review_keeps_identity_and_content() {
        let card = card_with(2.5, 1, 0);
        let reviewed = review_card(&card, 3, fixed_now()).unwrap();
        assert_eq!(reviewed.id, card.id);
        assert_eq!(reviewed.owner_id, card.owner_id);
        assert_eq!(reviewed.deck_id, card.deck_id);
        assert_eq!(reviewed.front, card.front);
        assert_eq!(reviewed.created_at, card.created_at);
        assert_eq!(reviewed.updated_at, card.updated_at);
    }

    #[test]
    fn test_interval_capped() {
        let card = card_with(3.0, 36_000, 5);
        let reviewed = review_card(&card, 5, fixed_now()).unwrap();
        assert_eq!(reviewed.interval_days, 36_500);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let card = card_with(2.5, 6, 2);
        let err = review_card(&card, 4, DateTime::<Utc>::MAX_UTC).unwrap_err();
        assert!(matches!(err, RepriseError::ScheduleOverflow { interval_days: 15, .. }));
    }

    #[test]
    fn test_preview_intervals() {
        let scheduler = Sm2Scheduler::new();
        assert_eq!(scheduler.preview_intervals(&card_with(2.5, 1, 0)), [1, 1, 1, 1, 1, 1]);
        assert_eq!(scheduler.preview_intervals(&card_with(2.5, 1, 1)), [1, 1, 1, 6, 6, 6]);
        assert_eq!(scheduler.preview_intervals(&card_with(2.5, 6, 2)), [1, 1, 1, 14, 15, 16]);
    }

    #[test]
    fn test_custom_config() {
        let config = SchedulerConfig {
            second_interval_days: 4,
            failure_interval_days: 2,
            ..Default::default()
        };
        let scheduler = Sm2Scheduler::with_config(config).unwrap();

        let second = scheduler.review(&card_with(2.5, 1, 1), 4, fixed_now()).unwrap();
        assert_eq!(second.interval_days, 4);

        let failed = scheduler.review(&card_with(2.5, 4, 2), 1, fixed_now()).unwrap();
        assert_eq!(failed.interval_days, 2);
        assert_eq!(failed.next_review_at, Some(fixed_now() + Duration::days(2)));
    }

    #[test]
    fn test_new_card_uses_config() {
        let scheduler = Sm2Scheduler::with_config(SchedulerConfig {
            initial_ease_factor: 2.2,
            ..Default::default()
        })
        .unwrap();
        let request = NewCard::new(Uuid::new_v4(), Uuid::new_v4(), "q", "a");
        let card = scheduler.new_card(request, fixed_now()).unwrap();
        assert_eq!(card.ease_factor, 2.2);
        assert_eq!(card.interval_days, 1);
        assert!(card.next_review_at.is_none());

        let bad = NewCard::new(Uuid::nil(), Uuid::new_v4(), "q", "a");
        assert!(scheduler.new_card(bad, fixed_now()).is_err());
    }
}
