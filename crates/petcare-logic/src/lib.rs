//! Pure pet simulation logic for petcare.
//!
//! Everything here works on plain values: no clock, no filesystem, no
//! timers. Time enters as epoch-millisecond arguments and ticks are
//! explicit function calls, so the whole model is unit-testable with
//! simulated time.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actions`] | Player actions and the state checks that refuse them |
//! | [`constants`] | Cooldowns, intervals, penalties, thresholds |
//! | [`decay`] | Decay tick, sleep-recovery sub-tick, transition events |
//! | [`items`] | Item catalog and per-pet inventories |
//! | [`minigame`] | Arithmetic quiz |
//! | [`pet`] | The pet aggregate and its actions |
//! | [`pet_type`] | Species maxima and decay rates |
//! | [`state`] | Derived flags with hysteresis, display mood |
//! | [`vitals`] | The four raw statistic counters |

pub mod actions;
pub mod constants;
pub mod decay;
pub mod items;
pub mod minigame;
pub mod pet;
pub mod pet_type;
pub mod state;
pub mod vitals;
