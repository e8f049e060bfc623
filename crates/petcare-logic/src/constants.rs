//! Tuning constants shared by the pet model, the decay tick and the session layer.
//!
//! Intervals and cooldowns are in milliseconds so they compose directly with
//! epoch-millisecond timestamps.

/// Minimum time between two successful `play` actions.
pub const PLAY_COOLDOWN_MS: i64 = 60_000;

/// Minimum time between two successful vet visits.
pub const VET_COOLDOWN_MS: i64 = 60_000;

/// Timestamp value meaning "this action has never been performed".
pub const NEVER: i64 = 0;

/// Default interval between two decay ticks.
pub const DECAY_INTERVAL_MS: u64 = 60_000;

/// Default interval between two sleep-recovery sub-ticks.
pub const RECOVERY_INTERVAL_MS: u64 = 1_000;

/// Sleep restored by one recovery sub-tick.
pub const RECOVERY_STEP: i32 = 5;

/// Health lost when sleep decays to zero and the pet collapses.
pub const EXHAUSTION_PENALTY: i32 = 2;

/// Health lost when fullness decays to zero.
pub const STARVATION_PENALTY: i32 = 1;

/// Happiness decay multiplier while the pet is hungry.
pub const HUNGRY_HAPPINESS_MULTIPLIER: i32 = 2;

/// Score awarded for feeding or giving a gift.
pub const CARE_SCORE: u32 = 5;

/// Score awarded for a correct mini-game answer.
pub const QUIZ_SCORE: u32 = 10;

/// Happiness gained from one play action.
pub const PLAY_VALUE: u32 = 1;

/// Health gained, sleep and fullness spent by one exercise action.
pub const EXERCISE_VALUES: (u32, u32, u32) = (1, 1, 1);

/// Returns true when `value` is strictly below 25% of `max`.
///
/// This is the "critical" band for sleep, fullness and happiness, the hunger
/// threshold, and the sick threshold for health.
pub fn below_quarter(value: i32, max: i32) -> bool {
    (value as i64) * 4 < max as i64
}

/// Returns true when `value` is at least `max / 2`, rounded down (the anger
/// exit threshold).
pub fn at_least_half(value: i32, max: i32) -> bool {
    value >= max / 2
}
