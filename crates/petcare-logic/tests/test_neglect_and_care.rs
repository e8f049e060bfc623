//! Integration tests for the pet lifecycle across many ticks.
//!
//! Exercises: Pet::new → decay_tick / recovery_tick → actions → death → revive
//!
//! All tests are pure logic: ticks are explicit calls and time is a number.

use petcare_logic::actions::{check_action, PlayerAction, Refusal};
use petcare_logic::decay::{decay_tick, recovery_tick, run_ticks, PetEvent};
use petcare_logic::pet::Pet;
use petcare_logic::pet_type::{builtin_species, PetType};
use petcare_logic::state::Mood;
use petcare_logic::vitals::VitalStat;

// ── Helpers ────────────────────────────────────────────────────────────

fn sturdy() -> PetType {
    PetType::new("Sturdy", 100, 40, 60, 50, 3, 4, 2, 0).unwrap()
}

fn all_in_bounds(pet: &Pet) -> bool {
    VitalStat::ALL
        .iter()
        .all(|s| (0..=pet.pet_type().max(*s)).contains(&pet.stat(*s)))
}

// ── Neglect ────────────────────────────────────────────────────────────

#[test]
fn every_builtin_species_dies_of_neglect() {
    for species in builtin_species().unwrap() {
        let mut pet = Pet::new("Neglected", species.clone()).unwrap();
        let reports = run_ticks(&mut pet, 500);
        assert!(pet.is_dead(), "{} survived 500 ticks", species.type_name());
        assert!(reports.last().unwrap().terminal);
        assert!(all_in_bounds(&pet));
    }
}

#[test]
fn bounds_hold_across_a_long_neglect_run() {
    let mut pet = Pet::new("Rex", sturdy()).unwrap();
    for _ in 0..200 {
        let report = decay_tick(&mut pet);
        assert!(all_in_bounds(&pet));
        assert_eq!(report.terminal, pet.is_dead());
        if report.terminal {
            break;
        }
        while pet.is_sleeping() {
            recovery_tick(&mut pet, 5);
            assert!(all_in_bounds(&pet));
        }
    }
    assert!(pet.is_dead());
}

#[test]
fn exhaustion_then_recovery_then_actions_resume() {
    let mut pet = Pet::new("Rex", sturdy()).unwrap();
    pet.set_stat(VitalStat::Sleep, 4);

    let report = decay_tick(&mut pet);
    assert!(report.events.contains(&PetEvent::FellAsleep));
    assert_eq!(
        check_action(&pet, PlayerAction::Feed),
        Some(Refusal::Sleeping)
    );

    let mut subticks = 0;
    let mut woke = false;
    while report.needs_recovery && !woke {
        let r = recovery_tick(&mut pet, 5);
        subticks += 1;
        woke = r.events.contains(&PetEvent::WokeUp);
    }
    // 40 sleep at 5 per sub-tick
    assert_eq!(subticks, 8);
    assert_eq!(pet.stat(VitalStat::Sleep), 40);
    assert_eq!(check_action(&pet, PlayerAction::Feed), None);
}

// ── Care ───────────────────────────────────────────────────────────────

#[test]
fn regular_care_keeps_the_pet_alive() {
    let mut pet = Pet::new("Rex", sturdy()).unwrap();
    let mut now = 1_700_000_000_000_i64;
    for _ in 0..300 {
        let report = decay_tick(&mut pet);
        assert!(!report.terminal);
        now += 60_000;

        if check_action(&pet, PlayerAction::Feed).is_none() {
            pet.feed(4);
        }
        if check_action(&pet, PlayerAction::GiveGift).is_none() {
            pet.give_gift(2);
        }
        if check_action(&pet, PlayerAction::Play).is_none() {
            pet.play(now, 1);
        }
        if check_action(&pet, PlayerAction::GoToBed).is_none()
            && pet.stat(VitalStat::Sleep) < 20
        {
            pet.go_to_bed();
        }
        if check_action(&pet, PlayerAction::Vet).is_none() {
            pet.take_to_vet(now);
        }
    }
    assert!(!pet.is_dead());
    assert_eq!(pet.mood(), Mood::Idle);
}

#[test]
fn revival_after_death_gives_a_full_pet() {
    let mut pet = Pet::new("Rex", sturdy()).unwrap();
    run_ticks(&mut pet, 1000);
    assert!(pet.is_dead());
    assert_eq!(check_action(&pet, PlayerAction::Save), Some(Refusal::Dead));

    pet.revive();
    assert!(!pet.is_dead());
    for stat in VitalStat::ALL {
        assert_eq!(pet.stat(stat), pet.pet_type().max(stat));
    }
    assert_eq!(pet.mood(), Mood::Idle);
}
