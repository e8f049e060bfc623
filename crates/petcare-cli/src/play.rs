//! Interactive play loop.
//!
//! Reads one command per line from stdin while a ticker feeds wall-clock
//! time into the session. The playtime gate is checked on entry and every
//! [`GATE_CHECK`] after that; a closed gate ends the session. Leaving the
//! loop for any reason saves the pet and records the playtime.

use std::time::Duration;

use anyhow::{bail, Context};
use petcare_core::clock::{Clock, SystemClock};
use petcare_core::config::GameConfig;
use petcare_core::gate::PlaytimeLimits;
use petcare_core::persistence::SaveSlots;
use petcare_core::session::{QuizOutcome, Session};
use petcare_logic::pet::Pet;
use petcare_logic::pet_type::species;
use petcare_logic::vitals::VitalStat;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_millis(250);
const GATE_CHECK: Duration = Duration::from_secs(30);

const HELP: &str = "\
Commands:
  feed <food>      give the pet something to eat
  gift <gift>      give the pet a present
  bed              put the pet to bed
  exercise         go for a run
  play             play with the pet
  vet              visit the vet
  quiz             answer a maths question for a reward
  answer <n>       answer the current question
  status           show the pet's statistics
  inventory        list food and gifts
  pause | resume   stop or restart time
  save             save without quitting
  help             show this list
  quit             save and leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Feed(String),
    Gift(String),
    Bed,
    Exercise,
    Play,
    Vet,
    Quiz,
    Answer(i32),
    Status,
    Inventory,
    Pause,
    Resume,
    Save,
    Help,
    Quit,
}

/// Parse one input line. Item names may contain spaces.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let needs_arg = |what: &str| {
        if rest.is_empty() {
            Err(format!("{word} needs {what}"))
        } else {
            Ok(rest.to_string())
        }
    };
    let command = match word.to_lowercase().as_str() {
        "feed" | "f" => Command::Feed(needs_arg("a food")?),
        "gift" | "g" => Command::Gift(needs_arg("a gift")?),
        "bed" | "sleep" => Command::Bed,
        "exercise" | "ex" => Command::Exercise,
        "play" | "p" => Command::Play,
        "vet" => Command::Vet,
        "quiz" | "q" => Command::Quiz,
        "answer" | "a" => {
            let text = needs_arg("a number")?;
            let n = text
                .parse()
                .map_err(|_| format!("{text} is not a whole number"))?;
            Command::Answer(n)
        }
        "status" | "s" => Command::Status,
        "inventory" | "inv" | "i" => Command::Inventory,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "save" => Command::Save,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => return Err("type help for a list of commands".into()),
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(command)
}

/// Play with the pet in `slot`, adopting `(species, name)` into it first if given.
pub async fn run(
    config: &GameConfig,
    slot: u8,
    adopt: Option<(String, String)>,
) -> anyhow::Result<()> {
    let clock = SystemClock;
    let slots = SaveSlots::new(&config.save_dir);
    let limits_path = config.limits_path();
    let mut limits = PlaytimeLimits::load(&limits_path)
        .with_context(|| format!("loading {}", limits_path.display()))?;

    if let Some(reason) = limits.block_reason(clock.local_now()) {
        println!("You can't play right now: {reason}.");
        return Ok(());
    }

    let pet = match adopt {
        Some((species_name, name)) => {
            if slots.is_occupied(slot) {
                bail!("slot {slot} already holds a pet");
            }
            let Some(pet_type) = species(&species_name) else {
                bail!("unknown species: {species_name}");
            };
            let pet = Pet::new(name, pet_type)?;
            slots.save(slot, &pet)?;
            pet
        }
        None => slots.load(slot)?,
    };
    if pet.is_dead() {
        println!(
            "{} has died. Run `petcare revive --slot {slot}` to bring them back.",
            pet.name()
        );
        return Ok(());
    }

    let mut session = Session::new(pet, clock, config);
    println!("{}", status_line(&session));
    println!("Type help for a list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut gate = time::interval(GATE_CHECK);
    gate.tick().await;

    let started = Instant::now();
    let mut last = started;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Save) => match slots.save(slot, session.pet()) {
                        Ok(()) => println!("Saved to slot {slot}."),
                        Err(e) => println!("Could not save: {e}"),
                    },
                    Ok(command) => handle(&mut session, command),
                    Err(message) => println!("{message}"),
                }
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last).as_millis();
                let elapsed = u64::try_from(elapsed).unwrap_or(u64::MAX);
                last += Duration::from_millis(elapsed);
                session.advance(elapsed);
            }
            _ = gate.tick() => {
                if let Some(reason) = limits.block_reason(clock.local_now()) {
                    println!("Time to stop: {reason}.");
                    break;
                }
            }
        }

        for event in session.drain_events() {
            println!("* {}", event.message());
        }
        if !session.is_running() {
            println!("{} has died.", session.pet().name());
            break;
        }
    }

    let score = session.score();
    let pet = session.end();
    slots.save(slot, &pet)?;
    let played = started.elapsed().as_secs();
    limits.record_session(clock.local_now(), played);
    limits
        .save(&limits_path)
        .with_context(|| format!("saving {}", limits_path.display()))?;
    println!("Saved {} to slot {slot}. Score this session: {score}.", pet.name());
    Ok(())
}

fn handle<C: Clock>(session: &mut Session<C>, command: Command) {
    let result = match command {
        Command::Feed(item) => session.feed(&item).map(|o| o.message()),
        Command::Gift(item) => session.give_gift(&item).map(|o| o.message()),
        Command::Bed => session.go_to_bed().map(|o| o.message()),
        Command::Exercise => session.exercise().map(|o| o.message()),
        Command::Play => session.play().map(|o| o.message()),
        Command::Vet => session.take_to_vet().map(|o| o.message()),
        Command::Quiz => session.ask_question().map(|q| q.to_string()),
        Command::Answer(n) => session.answer(n).map(|outcome| match outcome {
            QuizOutcome::Correct { reward: Some(item) } => {
                format!("Correct! You found a {item}.")
            }
            QuizOutcome::Correct { reward: None } => "Correct!".to_string(),
            QuizOutcome::Incorrect { expected } => format!("Not quite, it was {expected}."),
        }),
        Command::Status => Ok(status(session)),
        Command::Inventory => Ok(inventory(session.pet())),
        Command::Pause => {
            session.pause();
            Ok("Time is paused.".to_string())
        }
        Command::Resume => {
            session.resume();
            Ok("Time is running again.".to_string())
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Save | Command::Quit => return,
    };
    match result {
        Ok(message) => println!("{message}"),
        Err(e) => println!("{e}"),
    }
}

fn status_line<C: Clock>(session: &Session<C>) -> String {
    let pet = session.pet();
    format!(
        "{} the {} is {}.",
        pet.name(),
        pet.pet_type().type_name(),
        pet.mood()
    )
}

fn status<C: Clock>(session: &Session<C>) -> String {
    let pet = session.pet();
    let mut out = status_line(session);
    for stat in VitalStat::ALL {
        out.push_str(&format!(
            "\n  {:<10} {:>3}/{}",
            stat.label(),
            pet.stat(stat),
            pet.pet_type().max(stat)
        ));
    }
    out.push_str(&format!("\n  Score      {}", session.score()));
    if session.is_paused() {
        out.push_str("\n  (paused)");
    }
    out
}

fn inventory(pet: &Pet) -> String {
    let list = |inv: &petcare_logic::items::Inventory| {
        let entries: Vec<String> = inv.iter().map(|(name, n)| format!("{name} x{n}")).collect();
        if entries.is_empty() {
            "nothing".to_string()
        } else {
            entries.join(", ")
        }
    };
    format!(
        "Food:  {}\nGifts: {}",
        list(pet.food_inventory()),
        list(pet.gift_inventory())
    )
}
