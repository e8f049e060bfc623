//! The pet aggregate: statistics, species, cooldowns, derived states and
//! inventories.
//!
//! Every mutation goes through [`Pet::settle`], which clamps all four
//! statistics to `[0, max]` and recomputes the derived flags, so no caller
//! ever observes an out-of-range value or a stale flag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{NEVER, PLAY_COOLDOWN_MS, VET_COOLDOWN_MS};
use crate::items::{Inventory, InventoryError, ItemKind};
use crate::pet_type::PetType;
use crate::state::{derive_states, Mood, PetStates};
use crate::vitals::{VitalStat, VitalStatistics};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetError {
    #[error("pet name must not be empty")]
    EmptyName,
    #[error("pet name `{0}` contains a reserved character")]
    ReservedCharacter(String),
    #[error("{stat} = {value} is outside 0..={max}")]
    OutOfBounds { stat: VitalStat, value: i32, max: i32 },
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Result of a cooldown-gated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Performed(String),
    /// Nothing changed; the action is ready again in `remaining_secs`.
    CoolingDown { remaining_secs: i64 },
}

impl ActionOutcome {
    pub fn is_performed(&self) -> bool {
        matches!(self, ActionOutcome::Performed(_))
    }

    pub fn message(&self) -> String {
        match self {
            ActionOutcome::Performed(msg) => msg.clone(),
            ActionOutcome::CoolingDown { remaining_secs } => {
                format!("You need to wait {remaining_secs} seconds before doing that again.")
            }
        }
    }
}

/// Everything needed to rebuild a pet, field for field.
///
/// `states` holds the raw flags as last derived; [`Pet::from_snapshot`]
/// uses them only as hysteresis history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetSnapshot {
    pub name: String,
    pub pet_type: PetType,
    pub vitals: VitalStatistics,
    pub last_play: i64,
    pub last_vet_visit: i64,
    pub states: PetStates,
    pub food: Inventory,
    pub gifts: Inventory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    name: String,
    pet_type: PetType,
    vitals: VitalStatistics,
    last_play: i64,
    last_vet_visit: i64,
    states: PetStates,
    food: Inventory,
    gifts: Inventory,
}

fn validate_name(name: &str) -> Result<(), PetError> {
    if name.trim().is_empty() {
        return Err(PetError::EmptyName);
    }
    if name.contains(|c: char| matches!(c, ',' | '\n' | '\r')) {
        return Err(PetError::ReservedCharacter(name.to_string()));
    }
    Ok(())
}

/// Milliseconds still to wait, or `None` when the action is ready.
fn cooldown_remaining(last: i64, now: i64, cooldown: i64) -> Option<i64> {
    if last == NEVER {
        return None;
    }
    let elapsed = now.saturating_sub(last).max(0);
    if elapsed >= cooldown {
        None
    } else {
        Some(cooldown - elapsed)
    }
}

fn amount(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl Pet {
    /// A fresh pet at half of every maximum, with the starter inventories.
    pub fn new(name: impl Into<String>, pet_type: PetType) -> Result<Self, PetError> {
        let name = name.into();
        validate_name(&name)?;
        let vitals = VitalStatistics::new(
            pet_type.max_health() / 2,
            pet_type.max_sleep() / 2,
            pet_type.max_fullness() / 2,
            pet_type.max_happiness() / 2,
        );
        let mut pet = Self {
            name,
            pet_type,
            vitals,
            last_play: NEVER,
            last_vet_visit: NEVER,
            states: PetStates::default(),
            food: Inventory::starter(ItemKind::Food)?,
            gifts: Inventory::starter(ItemKind::Gift)?,
        };
        pet.settle();
        Ok(pet)
    }

    /// Rebuild a pet from persisted values. Out-of-range statistics are
    /// rejected, not clamped.
    pub fn from_snapshot(snapshot: PetSnapshot) -> Result<Self, PetError> {
        validate_name(&snapshot.name)?;
        for stat in VitalStat::ALL {
            let value = snapshot.vitals.get(stat);
            let max = snapshot.pet_type.max(stat);
            if !(0..=max).contains(&value) {
                return Err(PetError::OutOfBounds { stat, value, max });
            }
        }
        let mut pet = Self {
            name: snapshot.name,
            pet_type: snapshot.pet_type,
            vitals: snapshot.vitals,
            last_play: snapshot.last_play,
            last_vet_visit: snapshot.last_vet_visit,
            states: snapshot.states,
            food: snapshot.food,
            gifts: snapshot.gifts,
        };
        pet.settle();
        Ok(pet)
    }

    pub fn snapshot(&self) -> PetSnapshot {
        PetSnapshot {
            name: self.name.clone(),
            pet_type: self.pet_type.clone(),
            vitals: self.vitals,
            last_play: self.last_play,
            last_vet_visit: self.last_vet_visit,
            states: self.states,
            food: self.food.clone(),
            gifts: self.gifts.clone(),
        }
    }

    // ---- accessors ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pet_type(&self) -> &PetType {
        &self.pet_type
    }

    pub fn vitals(&self) -> VitalStatistics {
        self.vitals
    }

    pub fn stat(&self, stat: VitalStat) -> i32 {
        self.vitals.get(stat)
    }

    pub fn last_play(&self) -> i64 {
        self.last_play
    }

    pub fn last_vet_visit(&self) -> i64 {
        self.last_vet_visit
    }

    /// Raw flags, including the values frozen at death.
    pub fn raw_states(&self) -> PetStates {
        self.states
    }

    pub fn is_dead(&self) -> bool {
        self.states.dead
    }

    pub fn is_sleeping(&self) -> bool {
        !self.states.dead && self.states.sleeping
    }

    pub fn is_hungry(&self) -> bool {
        !self.states.dead && self.states.hungry
    }

    pub fn is_angry(&self) -> bool {
        !self.states.dead && self.states.angry
    }

    pub fn mood(&self) -> Mood {
        Mood::from_states(self.states, &self.vitals, &self.pet_type)
    }

    pub fn food_inventory(&self) -> &Inventory {
        &self.food
    }

    pub fn gift_inventory(&self) -> &Inventory {
        &self.gifts
    }

    pub fn inventory_mut(&mut self, kind: ItemKind) -> &mut Inventory {
        match kind {
            ItemKind::Food => &mut self.food,
            ItemKind::Gift => &mut self.gifts,
        }
    }

    // ---- actions ----

    pub fn feed(&mut self, food_value: u32) {
        self.raise(VitalStat::Fullness, food_value);
    }

    pub fn give_gift(&mut self, gift_value: u32) {
        self.raise(VitalStat::Happiness, gift_value);
    }

    pub fn go_to_bed(&mut self) {
        self.vitals.set(VitalStat::Sleep, self.pet_type.max_sleep());
        self.settle();
    }

    /// Gain health at the cost of sleep and fullness.
    pub fn exercise(&mut self, health_value: u32, sleep_value: u32, fullness_value: u32) {
        self.raise(VitalStat::Health, health_value);
        self.lower(VitalStat::Sleep, sleep_value);
        self.lower(VitalStat::Fullness, fullness_value);
    }

    pub fn play(&mut self, now: i64, play_value: u32) -> ActionOutcome {
        if let Some(remaining) = cooldown_remaining(self.last_play, now, PLAY_COOLDOWN_MS) {
            return ActionOutcome::CoolingDown {
                remaining_secs: remaining / 1000,
            };
        }
        self.raise(VitalStat::Happiness, play_value);
        self.last_play = now;
        ActionOutcome::Performed("You played with your pet!".to_string())
    }

    pub fn take_to_vet(&mut self, now: i64) -> ActionOutcome {
        if let Some(remaining) = cooldown_remaining(self.last_vet_visit, now, VET_COOLDOWN_MS) {
            return ActionOutcome::CoolingDown {
                remaining_secs: remaining / 1000,
            };
        }
        self.vitals.set(VitalStat::Health, self.pet_type.max_health());
        self.settle();
        self.last_vet_visit = now;
        ActionOutcome::Performed("Your pet visited the vet!".to_string())
    }

    /// Reset every statistic to its maximum. Clears `dead` unless the
    /// species has a zero health maximum.
    pub fn revive(&mut self) {
        for stat in VitalStat::ALL {
            self.vitals.set(stat, self.pet_type.max(stat));
        }
        self.settle();
    }

    /// Overwrite one statistic, clamped, and re-derive the flags.
    pub fn set_stat(&mut self, stat: VitalStat, value: i32) {
        self.vitals.set(stat, value);
        self.settle();
    }

    /// Lower a statistic by `amount`, clamp and re-derive. Used by the decay tick.
    pub fn drain(&mut self, stat: VitalStat, amount: i32) {
        self.vitals.decrease(stat, amount);
        self.settle();
    }

    /// Raise a statistic, capped at its maximum.
    pub fn raise(&mut self, stat: VitalStat, value: u32) {
        let room = (self.pet_type.max(stat) - self.vitals.get(stat)).max(0);
        self.vitals.increase(stat, amount(value).min(room));
        self.settle();
    }

    /// Lower a statistic by at most its current value.
    pub fn lower(&mut self, stat: VitalStat, value: u32) {
        let current = self.vitals.get(stat).max(0);
        self.vitals.decrease(stat, amount(value).min(current));
        self.settle();
    }

    fn settle(&mut self) {
        for stat in VitalStat::ALL {
            let clamped = self.vitals.get(stat).clamp(0, self.pet_type.max(stat));
            self.vitals.set(stat, clamped);
        }
        self.states = derive_states(&self.vitals, &self.pet_type, self.states);
    }
}
