//! Headless validation harness.
//!
//! Sweeps the pure model and the session engine in-process with simulated
//! time and prints a pass/fail summary. No terminal input, no save files.

use petcare_core::clock::ManualClock;
use petcare_core::config::GameConfig;
use petcare_core::persistence::{read_pet, write_pet};
use petcare_core::session::Session;
use petcare_logic::decay::{decay_tick, run_ticks};
use petcare_logic::items::{catalog, ItemKind};
use petcare_logic::pet::Pet;
use petcare_logic::pet_type::{builtin_species, PetType};
use petcare_logic::vitals::VitalStat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Test harness ────────────────────────────────────────────────────────

pub struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

/// Run every validation group. Returns true when all checks passed.
pub fn run(verbose: bool) -> bool {
    println!("=== petcare Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Bundled catalogs
    results.extend(validate_catalogs(verbose));

    // 2. Bounds under random actions
    results.extend(validate_bounds(verbose));

    // 3. Derived states
    results.extend(validate_state_machine(verbose));

    // 4. Decay tick rules
    results.extend(validate_decay(verbose));

    // 5. Neglect to death per species
    results.extend(validate_neglect(verbose));

    // 6. Save record round trip
    results.extend(validate_persistence(verbose));

    // 7. Session timers
    results.extend(validate_session(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    failed == 0
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn test_type() -> Option<PetType> {
    PetType::new("Harness", 100, 100, 100, 100, 5, 5, 5, 0).ok()
}

fn pet_at(h: i32, s: i32, f: i32, hp: i32) -> Option<Pet> {
    let mut pet = Pet::new("Tester", test_type()?).ok()?;
    pet.set_stat(VitalStat::Health, h);
    pet.set_stat(VitalStat::Sleep, s);
    pet.set_stat(VitalStat::Fullness, f);
    pet.set_stat(VitalStat::Happiness, hp);
    Some(pet)
}

fn in_bounds(pet: &Pet) -> bool {
    VitalStat::ALL
        .iter()
        .all(|s| (0..=pet.pet_type().max(*s)).contains(&pet.stat(*s)))
}

// ── 1. Catalogs ─────────────────────────────────────────────────────────

fn validate_catalogs(verbose: bool) -> Vec<TestResult> {
    println!("--- Catalogs ---");
    let mut results = Vec::new();

    match builtin_species() {
        Ok(species) => {
            results.push(check(
                "species_loaded",
                species.len() == 3,
                format!("{} species", species.len()),
            ));
            if verbose {
                for t in &species {
                    println!(
                        "  {}: max {}/{}/{}/{} decay f{} s{} h{}",
                        t.type_name(),
                        t.max_health(),
                        t.max_sleep(),
                        t.max_fullness(),
                        t.max_happiness(),
                        t.fullness_decay_rate(),
                        t.sleep_decay_rate(),
                        t.happiness_decay_rate()
                    );
                }
            }
        }
        Err(e) => results.push(check("species_loaded", false, e.to_string())),
    }

    match catalog() {
        Ok(items) => {
            let foods = items.iter().filter(|i| i.kind == ItemKind::Food).count();
            let gifts = items.len() - foods;
            results.push(check(
                "items_loaded",
                foods == 3 && gifts == 3,
                format!("{foods} foods, {gifts} gifts"),
            ));
            results.push(check(
                "items_have_value",
                items.iter().all(|i| i.value > 0),
                "every item restores something",
            ));
        }
        Err(e) => results.push(check("items_loaded", false, e.to_string())),
    }
    results
}

// ── 2. Bounds ───────────────────────────────────────────────────────────

fn validate_bounds(verbose: bool) -> Vec<TestResult> {
    println!("--- Bounds ---");
    let mut results = Vec::new();
    let Some(mut pet) = pet_at(50, 50, 50, 50) else {
        results.push(check("bounds_setup", false, "could not build pet"));
        return results;
    };

    let mut rng = StdRng::seed_from_u64(2024);
    let mut now = 1_700_000_000_000_i64;
    let mut violations = 0;
    let rounds = 5_000;
    for _ in 0..rounds {
        now += rng.gen_range(0..90_000);
        let amount = rng.gen_range(0..250);
        match rng.gen_range(0..7) {
            0 => pet.feed(amount),
            1 => pet.give_gift(amount),
            2 => pet.go_to_bed(),
            3 => pet.exercise(amount, rng.gen_range(0..250), rng.gen_range(0..250)),
            4 => {
                pet.play(now, amount);
            }
            5 => {
                pet.take_to_vet(now);
            }
            _ => {
                decay_tick(&mut pet);
                if pet.is_dead() {
                    pet.revive();
                }
            }
        }
        if !in_bounds(&pet) {
            violations += 1;
        }
        if pet.is_dead() != (pet.stat(VitalStat::Health) == 0) {
            violations += 1;
        }
    }
    if verbose {
        println!("  {rounds} random actions, final {:?}", pet.vitals());
    }
    results.push(check(
        "bounds_random_actions",
        violations == 0,
        format!("{violations} violations in {rounds} actions"),
    ));

    if let Some(mut fed) = pet_at(50, 50, 50, 50) {
        fed.feed(20);
        let first = fed.stat(VitalStat::Fullness);
        fed.feed(60);
        let second = fed.stat(VitalStat::Fullness);
        results.push(check(
            "bounds_feed_caps",
            first == 70 && second == 100,
            format!("50 -> {first} -> {second}"),
        ));
    }
    results
}

// ── 3. State machine ────────────────────────────────────────────────────

fn validate_state_machine(_verbose: bool) -> Vec<TestResult> {
    println!("--- State Machine ---");
    let mut results = Vec::new();

    if let Some(mut pet) = pet_at(50, 0, 50, 50) {
        let entered = pet.is_sleeping();
        pet.set_stat(VitalStat::Sleep, 99);
        let held = pet.is_sleeping();
        pet.set_stat(VitalStat::Sleep, 100);
        let left = !pet.is_sleeping();
        results.push(check(
            "state_sleep_hysteresis",
            entered && held && left,
            format!("enter {entered}, hold at 99 {held}, leave at 100 {left}"),
        ));
    }

    if let Some(mut pet) = pet_at(50, 50, 50, 0) {
        let entered = pet.is_angry();
        pet.set_stat(VitalStat::Happiness, 49);
        let held = pet.is_angry();
        pet.set_stat(VitalStat::Happiness, 50);
        let left = !pet.is_angry();
        results.push(check(
            "state_anger_hysteresis",
            entered && held && left,
            format!("enter {entered}, hold at 49 {held}, leave at 50 {left}"),
        ));
    }

    if let Some(mut pet) = pet_at(50, 50, 24, 50) {
        let hungry = pet.is_hungry();
        pet.set_stat(VitalStat::Fullness, 25);
        let fed = !pet.is_hungry();
        pet.set_stat(VitalStat::Fullness, 24);
        let again = pet.is_hungry();
        results.push(check(
            "state_hunger_single_threshold",
            hungry && fed && again,
            "flips at 25% in both directions",
        ));
    }

    if let Some(mut pet) = pet_at(50, 0, 0, 0) {
        let alive = !pet.is_dead();
        pet.set_stat(VitalStat::Health, 0);
        results.push(check(
            "state_only_health_kills",
            alive && pet.is_dead(),
            "zero sleep/fullness/happiness alone never kill",
        ));
    }
    results
}

// ── 4. Decay ────────────────────────────────────────────────────────────

fn validate_decay(_verbose: bool) -> Vec<TestResult> {
    println!("--- Decay ---");
    let mut results = Vec::new();

    if let Some(mut sleeping) = pet_at(80, 0, 80, 80) {
        sleeping.set_stat(VitalStat::Sleep, 40);
        let report = decay_tick(&mut sleeping);
        results.push(check(
            "decay_no_sleep_loss_while_asleep",
            sleeping.stat(VitalStat::Sleep) == 40 && report.needs_recovery,
            format!("sleep {} after tick", sleeping.stat(VitalStat::Sleep)),
        ));
    }

    if let (Some(mut fed), Some(mut hungry)) = (pet_at(80, 80, 80, 80), pet_at(80, 80, 20, 80)) {
        decay_tick(&mut fed);
        decay_tick(&mut hungry);
        let fed_loss = 80 - fed.stat(VitalStat::Happiness);
        let hungry_loss = 80 - hungry.stat(VitalStat::Happiness);
        results.push(check(
            "decay_hunger_doubles_happiness",
            hungry_loss == 2 * fed_loss,
            format!("fed -{fed_loss}, hungry -{hungry_loss}"),
        ));
    }

    if let Some(mut neglected) = pet_at(50, 20, 3, 6) {
        let report = decay_tick(&mut neglected);
        results.push(check(
            "decay_critical_penalty",
            report.critical_count == 3 && neglected.stat(VitalStat::Health) == 46,
            format!(
                "{} critical, health {}",
                report.critical_count,
                neglected.stat(VitalStat::Health)
            ),
        ));
    }
    results
}

// ── 5. Neglect ──────────────────────────────────────────────────────────

fn validate_neglect(verbose: bool) -> Vec<TestResult> {
    println!("--- Neglect ---");
    let mut results = Vec::new();
    let species = builtin_species().unwrap_or_default();
    for t in species {
        let name = t.type_name().to_lowercase();
        let Ok(mut pet) = Pet::new("Neglected", t) else {
            continue;
        };
        let reports = run_ticks(&mut pet, 1_000);
        if verbose {
            println!("  {name}: dead after {} ticks", reports.len());
        }
        results.push(check(
            &format!("neglect_{name}_dies"),
            pet.is_dead() && in_bounds(&pet),
            format!("{} ticks", reports.len()),
        ));
    }
    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();
    let Some(mut pet) = pet_at(40, 0, 20, 0) else {
        return results;
    };
    pet.play(1_700_000_000_000, 1);

    let mut buf = Vec::new();
    let outcome = write_pet(&mut buf, &pet).and_then(|_| read_pet(buf.as_slice()));
    match outcome {
        Ok(back) => results.push(check(
            "persistence_round_trip",
            back == pet,
            format!("{} bytes", buf.len()),
        )),
        Err(e) => results.push(check("persistence_round_trip", false, e.to_string())),
    }
    results
}

// ── 7. Session ──────────────────────────────────────────────────────────

fn validate_session(_verbose: bool) -> Vec<TestResult> {
    println!("--- Session ---");
    let mut results = Vec::new();
    let Some(t) = test_type() else {
        return results;
    };
    let Ok(pet) = Pet::new("Timer", t) else {
        return results;
    };
    let config = GameConfig::default();
    let clock = ManualClock::new(1_700_000_000_000);
    let mut session = Session::with_rng(pet, clock, &config, StdRng::seed_from_u64(5));

    let ticks = session.advance(config.decay_interval_ms * 10 - 1);
    results.push(check(
        "session_decay_interval",
        ticks == 9,
        format!("{ticks} ticks in just under 10 intervals"),
    ));

    session.pause();
    let paused = session.advance(config.decay_interval_ms * 10);
    session.resume();
    results.push(check(
        "session_pause",
        paused == 0,
        format!("{paused} ticks while paused"),
    ));

    let mut guard = 0;
    while session.is_running() && guard < 100_000 {
        session.advance(config.decay_interval_ms);
        guard += 1;
    }
    let after_death = session.advance(config.decay_interval_ms * 100);
    results.push(check(
        "session_death_stops_timers",
        session.pet().is_dead() && after_death == 0,
        format!("dead after {guard} more intervals"),
    ));
    results
}
