//! petcare Core - pet session engine
//!
//! Wraps the pure model from `petcare-logic` with everything that touches
//! the outside world: time, save files, configuration and playtime limits.
//!
//! # Architecture
//!
//! - **Session**: owns one pet, runs decay and recovery ticks from injected
//!   elapsed time, applies player actions, keeps score
//! - **Scheduler**: the two tick timers, consumed in due-time order
//! - **Persistence**: the flat save record and numbered save slots
//! - **Gate**: yes/no playtime rules consulted before a session runs
//!
//! # Example
//!
//! ```rust
//! use petcare_core::prelude::*;
//! use petcare_logic::pet_type::species;
//!
//! let pet = Pet::new("Biscuit", species("Sunny").unwrap()).unwrap();
//! let clock = ManualClock::new(1_700_000_000_000);
//! let mut session = Session::new(pet, clock, &GameConfig::default());
//!
//! session.feed("Apple").unwrap();
//! session.advance(60_000); // one decay tick
//! let pet = session.end();
//! assert!(pet.stat(VitalStat::Fullness) <= pet.pet_type().max_fullness());
//! ```

pub mod clock;
pub mod config;
pub mod gate;
pub mod persistence;
pub mod scheduler;
pub mod session;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::GameConfig;
    pub use crate::gate::{AlwaysOpen, PlaytimeLimits, SessionGate};
    pub use crate::persistence::{SaveSlots, SlotError};
    pub use crate::session::{ActionError, Session};
    pub use petcare_logic::pet::{ActionOutcome, Pet};
    pub use petcare_logic::vitals::VitalStat;
}
