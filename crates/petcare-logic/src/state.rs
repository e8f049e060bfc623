//! Behavioral states derived from the vital statistics.
//!
//! The four flags are never set directly. [`derive_states`] recomputes them
//! from the statistics, using the previous flags only where hysteresis needs
//! memory:
//!
//! | State | Enters when | Leaves when |
//! |-------|-------------|-------------|
//! | dead | health <= 0 | health > 0 |
//! | sleeping | sleep <= 0 | sleep >= max |
//! | hungry | fullness < 25% of max | fullness >= 25% of max |
//! | angry | happiness <= 0 | happiness >= 50% of max |
//!
//! While dead the other three flags keep their last values.

use serde::{Deserialize, Serialize};

use crate::constants::{at_least_half, below_quarter};
use crate::pet_type::PetType;
use crate::vitals::VitalStatistics;

/// Raw derived flags, as stored alongside the statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetStates {
    pub dead: bool,
    pub sleeping: bool,
    pub hungry: bool,
    pub angry: bool,
}

/// Recompute the derived flags after a statistic changed.
pub fn derive_states(stats: &VitalStatistics, pet_type: &PetType, previous: PetStates) -> PetStates {
    let dead = stats.health <= 0;
    if dead {
        return PetStates {
            dead: true,
            ..previous
        };
    }

    let sleeping = if stats.sleep <= 0 {
        true
    } else if stats.sleep >= pet_type.max_sleep() {
        false
    } else {
        previous.sleeping
    };

    let hungry = below_quarter(stats.fullness, pet_type.max_fullness());

    let angry = if stats.happiness <= 0 {
        true
    } else if at_least_half(stats.happiness, pet_type.max_happiness()) {
        false
    } else {
        previous.angry
    };

    PetStates {
        dead,
        sleeping,
        hungry,
        angry,
    }
}

/// What the pet looks like right now, in display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Dead,
    Sleeping,
    Hungry,
    Angry,
    /// Health below 25% of max.
    Sick,
    Idle,
}

impl Mood {
    pub fn from_states(states: PetStates, stats: &VitalStatistics, pet_type: &PetType) -> Self {
        if states.dead {
            Mood::Dead
        } else if states.sleeping {
            Mood::Sleeping
        } else if states.hungry {
            Mood::Hungry
        } else if states.angry {
            Mood::Angry
        } else if below_quarter(stats.health, pet_type.max_health()) {
            Mood::Sick
        } else {
            Mood::Idle
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Dead => "dead",
            Mood::Sleeping => "sleeping",
            Mood::Hungry => "hungry",
            Mood::Angry => "angry",
            Mood::Sick => "sick",
            Mood::Idle => "idle",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
