//! The four vital statistics of a pet.
//!
//! `VitalStatistics` is a plain bag of signed counters. It enforces no
//! bounds: the owning [`Pet`](crate::pet::Pet) clamps after every delta, so
//! out-of-range values never escape a Pet method.

use serde::{Deserialize, Serialize};

/// One of the four vital statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VitalStat {
    Health,
    Sleep,
    Fullness,
    Happiness,
}

impl VitalStat {
    /// All statistics in record order.
    pub const ALL: [VitalStat; 4] = [
        VitalStat::Health,
        VitalStat::Sleep,
        VitalStat::Fullness,
        VitalStat::Happiness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VitalStat::Health => "health",
            VitalStat::Sleep => "sleep",
            VitalStat::Fullness => "fullness",
            VitalStat::Happiness => "happiness",
        }
    }
}

impl std::fmt::Display for VitalStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw statistic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalStatistics {
    pub health: i32,
    pub sleep: i32,
    pub fullness: i32,
    pub happiness: i32,
}

impl VitalStatistics {
    pub fn new(health: i32, sleep: i32, fullness: i32, happiness: i32) -> Self {
        Self {
            health,
            sleep,
            fullness,
            happiness,
        }
    }

    pub fn get(&self, stat: VitalStat) -> i32 {
        match stat {
            VitalStat::Health => self.health,
            VitalStat::Sleep => self.sleep,
            VitalStat::Fullness => self.fullness,
            VitalStat::Happiness => self.happiness,
        }
    }

    /// Overwrite a statistic. Used by clamping and by load.
    pub fn set(&mut self, stat: VitalStat, value: i32) {
        *self.slot(stat) = value;
    }

    /// Apply a positive delta without clamping.
    pub fn increase(&mut self, stat: VitalStat, amount: i32) {
        let slot = self.slot(stat);
        *slot = slot.saturating_add(amount);
    }

    /// Apply a negative delta without clamping.
    pub fn decrease(&mut self, stat: VitalStat, amount: i32) {
        let slot = self.slot(stat);
        *slot = slot.saturating_sub(amount);
    }

    fn slot(&mut self, stat: VitalStat) -> &mut i32 {
        match stat {
            VitalStat::Health => &mut self.health,
            VitalStat::Sleep => &mut self.sleep,
            VitalStat::Fullness => &mut self.fullness,
            VitalStat::Happiness => &mut self.happiness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_do_not_clamp() {
        let mut v = VitalStatistics::new(5, 5, 5, 5);
        v.decrease(VitalStat::Sleep, 8);
        assert_eq!(v.sleep, -3);
        v.increase(VitalStat::Happiness, 100);
        assert_eq!(v.happiness, 105);
        // Other counters untouched
        assert_eq!(v.health, 5);
        assert_eq!(v.fullness, 5);
    }

    #[test]
    fn test_get_set_every_stat() {
        let mut v = VitalStatistics::default();
        for (i, stat) in VitalStat::ALL.iter().enumerate() {
            v.set(*stat, i as i32 + 1);
        }
        assert_eq!(v, VitalStatistics::new(1, 2, 3, 4));
        assert_eq!(v.get(VitalStat::Fullness), 3);
    }
}
