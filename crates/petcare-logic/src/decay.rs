//! The decay tick and the sleep-recovery sub-tick.
//!
//! Both are pure functions of the pet: no clock, no timers. The scheduler in
//! `petcare-core` decides when to call them and reacts to the returned
//! [`TickReport`].
//!
//! One decay tick, in order:
//!
//! 1. Sleeping pets do not lose sleep; the report asks for recovery instead.
//! 2. Otherwise sleep drops by the species rate. Reaching zero costs
//!    [`EXHAUSTION_PENALTY`] health, puts the pet to sleep and counts as
//!    critical.
//! 3. Fullness drops; sitting at zero costs [`STARVATION_PENALTY`] health.
//! 4. Happiness drops, doubled while hungry.
//! 5. Unless asleep, health drops by the number of critical statistics.
//!
//! Every step is clamped and re-derived before the next one reads the
//! flags. All steps run even if the pet dies partway through; the report
//! marks the tick terminal afterwards.

use serde::{Deserialize, Serialize};

use crate::constants::{
    below_quarter, EXHAUSTION_PENALTY, HUNGRY_HAPPINESS_MULTIPLIER, STARVATION_PENALTY,
};
use crate::pet::Pet;
use crate::state::PetStates;
use crate::vitals::VitalStat;

/// A state change worth telling the player about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetEvent {
    FellAsleep,
    WokeUp,
    BecameHungry,
    NoLongerHungry,
    BecameAngry,
    CalmedDown,
    Died,
}

impl PetEvent {
    pub fn message(self) -> &'static str {
        match self {
            PetEvent::FellAsleep => "Your pet has fallen asleep due to exhaustion.",
            PetEvent::WokeUp => "Your pet woke up feeling rested.",
            PetEvent::BecameHungry => "Your pet is hungry!",
            PetEvent::NoLongerHungry => "Your pet is no longer hungry.",
            PetEvent::BecameAngry => "Your pet is angry!",
            PetEvent::CalmedDown => "Your pet has calmed down.",
            PetEvent::Died => "Your pet has died.",
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub events: Vec<PetEvent>,
    /// Statistics in the critical band this tick.
    pub critical_count: i32,
    /// The pet is asleep and the recovery sub-tick should run.
    pub needs_recovery: bool,
    /// The pet is dead; no further ticks should be scheduled.
    pub terminal: bool,
}

/// Events implied by the flag changes between two derivations.
pub fn transition_events(before: PetStates, after: PetStates) -> Vec<PetEvent> {
    if after.dead {
        return if before.dead { Vec::new() } else { vec![PetEvent::Died] };
    }
    let mut events = Vec::new();
    match (before.sleeping, after.sleeping) {
        (false, true) => events.push(PetEvent::FellAsleep),
        (true, false) => events.push(PetEvent::WokeUp),
        _ => {}
    }
    match (before.hungry, after.hungry) {
        (false, true) => events.push(PetEvent::BecameHungry),
        (true, false) => events.push(PetEvent::NoLongerHungry),
        _ => {}
    }
    match (before.angry, after.angry) {
        (false, true) => events.push(PetEvent::BecameAngry),
        (true, false) => events.push(PetEvent::CalmedDown),
        _ => {}
    }
    events
}

fn finish(pet: &Pet, before: PetStates, mut report: TickReport) -> TickReport {
    report.events = transition_events(before, pet.raw_states());
    report.terminal = pet.is_dead();
    report.needs_recovery = !report.terminal && pet.is_sleeping();
    report
}

/// Age the pet by one decay interval.
pub fn decay_tick(pet: &mut Pet) -> TickReport {
    let before = pet.raw_states();
    let mut report = TickReport::default();
    if pet.is_dead() {
        report.terminal = true;
        return report;
    }
    let pet_type = pet.pet_type().clone();

    // Sleep
    if !pet.is_sleeping() {
        pet.drain(VitalStat::Sleep, pet_type.sleep_decay_rate());
        if pet.stat(VitalStat::Sleep) <= 0 {
            pet.drain(VitalStat::Health, EXHAUSTION_PENALTY);
            report.critical_count += 1;
        } else if below_quarter(pet.stat(VitalStat::Sleep), pet_type.max_sleep()) {
            report.critical_count += 1;
        }
    }

    // Fullness
    pet.drain(VitalStat::Fullness, pet_type.fullness_decay_rate());
    if pet.stat(VitalStat::Fullness) <= 0 {
        pet.drain(VitalStat::Health, STARVATION_PENALTY);
    }
    if below_quarter(pet.stat(VitalStat::Fullness), pet_type.max_fullness())
        || pet.stat(VitalStat::Fullness) == 0
    {
        report.critical_count += 1;
    }

    // Happiness, after hunger was re-derived
    let multiplier = if pet.is_hungry() {
        HUNGRY_HAPPINESS_MULTIPLIER
    } else {
        1
    };
    pet.drain(
        VitalStat::Happiness,
        pet_type.happiness_decay_rate().saturating_mul(multiplier),
    );
    if below_quarter(pet.stat(VitalStat::Happiness), pet_type.max_happiness())
        || pet.stat(VitalStat::Happiness) == 0
    {
        report.critical_count += 1;
    }

    if !pet.is_sleeping() {
        pet.drain(VitalStat::Health, report.critical_count);
    }

    finish(pet, before, report)
}

/// One sleep-recovery sub-tick: restore `step` sleep while the pet sleeps.
/// Reaching the maximum wakes the pet.
pub fn recovery_tick(pet: &mut Pet, step: u32) -> TickReport {
    let before = pet.raw_states();
    if pet.is_sleeping() {
        pet.raise(VitalStat::Sleep, step);
    }
    finish(pet, before, TickReport::default())
}

/// Apply up to `n` decay ticks, stopping after the one that kills the pet.
pub fn run_ticks(pet: &mut Pet, n: usize) -> Vec<TickReport> {
    let mut reports = Vec::with_capacity(n);
    for _ in 0..n {
        if pet.is_dead() {
            break;
        }
        let report = decay_tick(pet);
        let terminal = report.terminal;
        reports.push(report);
        if terminal {
            break;
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet_type::PetType;
    use crate::vitals::VitalStatistics;

    fn pet(t: PetType, h: i32, s: i32, f: i32, hp: i32) -> Pet {
        let mut p = Pet::new("Rex", t).unwrap();
        p.set_stat(VitalStat::Health, h);
        p.set_stat(VitalStat::Sleep, s);
        p.set_stat(VitalStat::Fullness, f);
        p.set_stat(VitalStat::Happiness, hp);
        p
    }

    fn hundred() -> PetType {
        PetType::new("Dog", 100, 100, 100, 100, 5, 5, 5, 0).unwrap()
    }

    #[test]
    fn test_healthy_tick_only_decays() {
        let mut p = pet(hundred(), 80, 80, 80, 80);
        let report = decay_tick(&mut p);
        assert_eq!(p.vitals(), VitalStatistics::new(80, 75, 75, 75));
        assert_eq!(report, TickReport::default());
    }

    #[test]
    fn test_no_sleep_decay_while_sleeping() {
        let mut p = pet(hundred(), 80, 0, 80, 80);
        p.set_stat(VitalStat::Sleep, 40);
        assert!(p.is_sleeping());
        let report = decay_tick(&mut p);
        assert_eq!(p.stat(VitalStat::Sleep), 40);
        assert!(report.needs_recovery);
        // No neglect penalty while asleep
        assert_eq!(p.stat(VitalStat::Health), 80);
    }

    #[test]
    fn test_hunger_doubles_happiness_decay() {
        let mut fed = pet(hundred(), 80, 80, 80, 80);
        let mut hungry = pet(hundred(), 80, 80, 20, 80);
        decay_tick(&mut fed);
        decay_tick(&mut hungry);
        assert_eq!(fed.stat(VitalStat::Happiness), 75);
        assert_eq!(hungry.stat(VitalStat::Happiness), 70);
    }

    #[test]
    fn test_hunger_from_this_tick_doubles() {
        // 27 - 5 = 22 < 25 so the pet is hungry before happiness decays
        let mut p = pet(hundred(), 80, 80, 27, 80);
        let report = decay_tick(&mut p);
        assert_eq!(p.stat(VitalStat::Happiness), 70);
        assert_eq!(report.events, vec![PetEvent::BecameHungry]);
        assert_eq!(report.critical_count, 1);
        assert_eq!(p.stat(VitalStat::Health), 79);
    }

    #[test]
    fn test_exhaustion_crossing() {
        let mut p = pet(hundred(), 80, 3, 80, 80);
        let report = decay_tick(&mut p);
        assert_eq!(p.stat(VitalStat::Sleep), 0);
        assert!(p.is_sleeping());
        assert_eq!(report.events, vec![PetEvent::FellAsleep]);
        assert_eq!(report.critical_count, 1);
        assert!(report.needs_recovery);
        // Exhaustion penalty only; critical penalty skipped while asleep
        assert_eq!(p.stat(VitalStat::Health), 78);
    }

    #[test]
    fn test_starvation_and_critical_penalties_compound() {
        let mut p = pet(hundred(), 50, 20, 3, 6);
        let report = decay_tick(&mut p);
        // sleep 15 (critical), fullness 0 (-1, critical), happiness 6-10 -> 0 (critical)
        assert_eq!(report.critical_count, 3);
        assert_eq!(p.stat(VitalStat::Health), 50 - 1 - 3);
        assert!(p.is_angry());
        assert!(report.events.contains(&PetEvent::BecameAngry));
    }

    #[test]
    fn test_death_is_terminal() {
        let mut p = pet(hundred(), 2, 20, 3, 6);
        let report = decay_tick(&mut p);
        assert!(report.terminal);
        assert_eq!(report.events, vec![PetEvent::Died]);
        assert!(p.is_dead());
        assert_eq!(p.stat(VitalStat::Health), 0);

        let again = decay_tick(&mut p);
        assert!(again.terminal);
        assert!(again.events.is_empty());
    }

    #[test]
    fn test_fatal_tick_still_decays_every_stat() {
        // Exhaustion kills on the sleep step; fullness and happiness still drop
        let mut p = pet(hundred(), 2, 3, 80, 80);
        let report = decay_tick(&mut p);
        assert!(report.terminal);
        assert_eq!(report.events, vec![PetEvent::Died]);
        assert_eq!(p.vitals(), VitalStatistics::new(0, 0, 75, 75));
    }

    #[test]
    fn test_recovery_wakes_at_max() {
        let t = PetType::new("Dog", 100, 12, 100, 100, 5, 5, 5, 0).unwrap();
        let mut p = pet(t, 80, 0, 80, 80);
        assert!(p.is_sleeping());

        let r1 = recovery_tick(&mut p, 5);
        assert_eq!(p.stat(VitalStat::Sleep), 5);
        assert!(r1.needs_recovery);
        recovery_tick(&mut p, 5);
        let r3 = recovery_tick(&mut p, 5);
        assert_eq!(p.stat(VitalStat::Sleep), 12);
        assert!(!p.is_sleeping());
        assert!(!r3.needs_recovery);
        assert_eq!(r3.events, vec![PetEvent::WokeUp]);

        // Awake pets are left alone
        let r4 = recovery_tick(&mut p, 5);
        assert_eq!(r4, TickReport::default());
    }

    #[test]
    fn test_run_ticks_stops_at_death() {
        let brock = crate::pet_type::species("Brock").unwrap();
        let mut p = Pet::new("Rock", brock).unwrap();
        let reports = run_ticks(&mut p, 1000);
        assert!(reports.len() < 1000);
        assert!(reports.last().unwrap().terminal);
        assert!(p.is_dead());
        assert_eq!(
            reports.iter().filter(|r| r.events.contains(&PetEvent::Died)).count(),
            1
        );
    }

    #[test]
    fn test_transition_events_dead_suppresses_others() {
        let before = PetStates::default();
        let after = PetStates {
            dead: true,
            sleeping: true,
            hungry: true,
            angry: true,
        };
        assert_eq!(transition_events(before, after), vec![PetEvent::Died]);
        assert_eq!(
            transition_events(
                PetStates {
                    hungry: true,
                    angry: true,
                    ..before
                },
                before
            ),
            vec![PetEvent::NoLongerHungry, PetEvent::CalmedDown]
        );
    }
}
