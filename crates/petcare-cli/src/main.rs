//! petcare - look after a virtual pet in the terminal.
//!
//! Usage:
//!   petcare play --slot 1 --species Sunny --name Biscuit
//!   petcare play --slot 1
//!   petcare simulate --species Brock --ticks 200
//!   petcare revive --slot 1
//!   petcare limits daily 60
//!   petcare harness --verbose

mod harness;
mod play;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{NaiveTime, Weekday};
use clap::{Parser, Subcommand};
use petcare_core::clock::ManualClock;
use petcare_core::config::GameConfig;
use petcare_core::gate::{format_duration, PlaytimeLimits, QuietHours};
use petcare_core::persistence::{ReviveOutcome, SaveSlots};
use petcare_core::session::Session;
use petcare_logic::pet::Pet;
use petcare_logic::pet_type::species;
use petcare_logic::vitals::VitalStat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Look after a virtual pet", long_about = None)]
struct Args {
    /// Path to the game config file
    #[arg(long, global = true, default_value = "petcare.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play with the pet in a save slot, adopting a new one if species and name are given
    Play {
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        slot: u8,
        /// Species for a new pet (Brock, Sunny or Berry)
        #[arg(long, requires = "name")]
        species: Option<String>,
        /// Name for a new pet
        #[arg(long, requires = "species")]
        name: Option<String>,
    },
    /// Run decay ticks on a fresh pet without any care and print each one
    Simulate {
        #[arg(long, default_value = "Sunny")]
        species: String,
        #[arg(long, default_value = "Subject")]
        name: String,
        #[arg(long, default_value_t = 100)]
        ticks: usize,
        /// Save the result into this slot
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        slot: Option<u8>,
    },
    /// Restore a dead pet in a save slot to full statistics
    Revive {
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        slot: u8,
    },
    /// Show or change the playtime limits
    Limits {
        #[command(subcommand)]
        command: LimitsCommands,
    },
    /// Run the headless validation harness
    Harness {
        #[arg(long)]
        verbose: bool,
    },
}

#[derive(Subcommand, Debug)]
enum LimitsCommands {
    /// Print the rules and usage statistics
    Show,
    /// Block play between two times of day (HH:MM)
    QuietHours {
        #[arg(value_parser = parse_time)]
        start: NaiveTime,
        #[arg(value_parser = parse_time)]
        end: NaiveTime,
    },
    /// Remove the quiet hours
    ClearQuietHours,
    /// Daily playtime quota in minutes, 0 to remove
    Daily { minutes: u64 },
    /// Weekly playtime quota in minutes, 0 to remove
    Weekly { minutes: u64 },
    /// Disallow play on a weekday
    Block {
        #[arg(value_parser = parse_weekday)]
        day: Weekday,
    },
    /// Allow play on a weekday again
    Unblock {
        #[arg(value_parser = parse_weekday)]
        day: Weekday,
    },
    /// Clear the usage statistics
    ResetUsage,
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.parse::<Weekday>()
        .map_err(|_| format!("unknown weekday: {s}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = GameConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    match args.command {
        Commands::Play {
            slot,
            species,
            name,
        } => {
            let adopt = species.zip(name);
            play::run(&config, slot, adopt).await?;
        }
        Commands::Simulate {
            species,
            name,
            ticks,
            slot,
        } => simulate(&config, &species, &name, ticks, slot)?,
        Commands::Revive { slot } => {
            let slots = SaveSlots::new(&config.save_dir);
            match slots.revive(slot)? {
                ReviveOutcome::Revived => println!("The pet in slot {slot} is back on its feet!"),
                ReviveOutcome::NotDead => println!("The pet in slot {slot} is not dead."),
            }
        }
        Commands::Limits { command } => limits(&config.limits_path(), command)?,
        Commands::Harness { verbose } => {
            if !harness::run(verbose) {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn simulate(
    config: &GameConfig,
    species_name: &str,
    name: &str,
    ticks: usize,
    slot: Option<u8>,
) -> anyhow::Result<()> {
    let Some(pet_type) = species(species_name) else {
        bail!("unknown species: {species_name}");
    };
    let pet = Pet::new(name, pet_type)?;
    let clock = ManualClock::new(chrono::Utc::now().timestamp_millis());
    let mut session = Session::new(pet, clock, config);

    println!("{:>5}  {:>6} {:>6} {:>6} {:>6}  mood", "tick", "health", "sleep", "food", "happy");
    for tick in 1..=ticks {
        session.advance(config.decay_interval_ms);
        let pet = session.pet();
        println!(
            "{:>5}  {:>6} {:>6} {:>6} {:>6}  {}",
            tick,
            pet.stat(VitalStat::Health),
            pet.stat(VitalStat::Sleep),
            pet.stat(VitalStat::Fullness),
            pet.stat(VitalStat::Happiness),
            pet.mood()
        );
        for event in session.drain_events() {
            println!("       {}", event.message());
        }
        if !session.is_running() {
            break;
        }
    }

    let pet = session.end();
    if let Some(slot) = slot {
        SaveSlots::new(&config.save_dir).save(slot, &pet)?;
        println!("Saved {} to slot {slot}.", pet.name());
    }
    Ok(())
}

fn limits(path: &Path, command: LimitsCommands) -> anyhow::Result<()> {
    let mut limits = PlaytimeLimits::load(path)
        .with_context(|| format!("loading {}", path.display()))?;

    match command {
        LimitsCommands::Show => {
            print_limits(&limits);
            return Ok(());
        }
        LimitsCommands::QuietHours { start, end } => {
            if start >= end {
                bail!("quiet hours must start before they end");
            }
            limits.quiet_hours = Some(QuietHours { start, end });
        }
        LimitsCommands::ClearQuietHours => limits.quiet_hours = None,
        LimitsCommands::Daily { minutes } => {
            limits.daily_limit_secs = (minutes > 0).then_some(minutes * 60);
        }
        LimitsCommands::Weekly { minutes } => {
            limits.weekly_limit_secs = (minutes > 0).then_some(minutes * 60);
        }
        LimitsCommands::Block { day } => {
            if !limits.blocked_days.contains(&day) {
                limits.blocked_days.push(day);
            }
        }
        LimitsCommands::Unblock { day } => limits.blocked_days.retain(|d| *d != day),
        LimitsCommands::ResetUsage => limits.reset_usage(),
    }

    limits
        .save(path)
        .with_context(|| format!("saving {}", path.display()))?;
    print_limits(&limits);
    Ok(())
}

fn print_limits(limits: &PlaytimeLimits) {
    let off = || "off".to_string();
    println!(
        "Quiet hours:   {}",
        limits
            .quiet_hours
            .map(|q| format!("{} - {}", q.start.format("%H:%M"), q.end.format("%H:%M")))
            .unwrap_or_else(off)
    );
    println!(
        "Daily limit:   {}",
        limits.daily_limit_secs.map(format_duration).unwrap_or_else(off)
    );
    println!(
        "Weekly limit:  {}",
        limits.weekly_limit_secs.map(format_duration).unwrap_or_else(off)
    );
    let days: Vec<String> = limits.blocked_days.iter().map(|d| d.to_string()).collect();
    println!(
        "Blocked days:  {}",
        if days.is_empty() { off() } else { days.join(", ") }
    );

    let usage = &limits.usage;
    println!();
    println!("Sessions:      {}", usage.session_count);
    println!("Total time:    {}", format_duration(usage.total_secs));
    println!("Average:       {}", format_duration(usage.average_session_secs()));
    if let Some(day) = usage.last_played {
        println!("Last played:   {day}");
    }
}
