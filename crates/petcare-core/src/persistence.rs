//! Save/Load functionality for persisting a pet
//!
//! A save file is a header line followed by one comma-separated record of
//! 24 fields (see [`HEADER`]). Loading is strict: every field must parse,
//! the duplicated type name and statistics must agree, and the result must
//! pass the same validation as a freshly built pet. Nothing is repaired.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use petcare_logic::items::{is_valid_item_name, Inventory};
use petcare_logic::pet::{Pet, PetError, PetSnapshot};
use petcare_logic::pet_type::{PetType, PetTypeError, PetTypeSpec};
use petcare_logic::state::PetStates;
use petcare_logic::vitals::VitalStatistics;
use thiserror::Error;

/// Column names of the record, in order.
pub const HEADER: &str = "typeName,maxHealth,maxSleep,maxFullness,maxHappiness,\
fullnessDecayRate,sleepDecayRate,happinessDecayRate,healthDecayRate,name,type,vitalStats,\
lastPlay,lastVetVisit,isSleeping,isHungry,isAngry,isDead,health,sleep,fullness,happiness,\
foodInventory,giftInventory";

/// Number of fields in one record.
pub const FIELD_COUNT: usize = 24;

/// Number of save slots.
pub const SLOT_COUNT: u8 = 3;

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file has no pet record")]
    MissingRecord,
    #[error("expected {expected} fields, found {0}", expected = FIELD_COUNT)]
    FieldCount(usize),
    #[error("field {index} ({name}) has invalid value `{value}`")]
    InvalidField {
        index: usize,
        name: &'static str,
        value: String,
    },
    #[error("inconsistent record: {0}")]
    Inconsistent(String),
    #[error("invalid pet type: {0}")]
    PetType(#[from] PetTypeError),
    #[error("invalid pet: {0}")]
    Pet(#[from] PetError),
    #[error("slot must be between 1 and {max}", max = SLOT_COUNT)]
    NoSuchSlot,
}

/// A save failure tagged with the slot it happened in.
#[derive(Debug, Error)]
#[error("slot {slot}: {source}")]
pub struct SlotError {
    pub slot: u8,
    #[source]
    pub source: SaveError,
}

const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "typeName",
    "maxHealth",
    "maxSleep",
    "maxFullness",
    "maxHappiness",
    "fullnessDecayRate",
    "sleepDecayRate",
    "happinessDecayRate",
    "healthDecayRate",
    "name",
    "type",
    "vitalStats",
    "lastPlay",
    "lastVetVisit",
    "isSleeping",
    "isHungry",
    "isAngry",
    "isDead",
    "health",
    "sleep",
    "fullness",
    "happiness",
    "foodInventory",
    "giftInventory",
];

fn encode_inventory(inventory: &Inventory) -> String {
    inventory
        .iter()
        .map(|(name, qty)| format!("{name}:{qty}"))
        .collect::<Vec<_>>()
        .join(";")
}

/// Encode a pet as one record line, without the header.
pub fn encode_record(pet: &Pet) -> String {
    let t = pet.pet_type();
    let v = pet.vitals();
    let s = pet.raw_states();
    let fields = [
        t.type_name().to_string(),
        t.max_health().to_string(),
        t.max_sleep().to_string(),
        t.max_fullness().to_string(),
        t.max_happiness().to_string(),
        t.fullness_decay_rate().to_string(),
        t.sleep_decay_rate().to_string(),
        t.happiness_decay_rate().to_string(),
        t.health_decay_rate().to_string(),
        pet.name().to_string(),
        t.type_name().to_string(),
        format!("{}|{}|{}|{}", v.health, v.sleep, v.fullness, v.happiness),
        pet.last_play().to_string(),
        pet.last_vet_visit().to_string(),
        s.sleeping.to_string(),
        s.hungry.to_string(),
        s.angry.to_string(),
        s.dead.to_string(),
        v.health.to_string(),
        v.sleep.to_string(),
        v.fullness.to_string(),
        v.happiness.to_string(),
        encode_inventory(pet.food_inventory()),
        encode_inventory(pet.gift_inventory()),
    ];
    fields.join(",")
}

/// Typed access to the split fields of one record.
struct Fields<'a> {
    raw: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn invalid(&self, index: usize) -> SaveError {
        SaveError::InvalidField {
            index,
            name: FIELD_NAMES[index],
            value: self.raw[index].to_string(),
        }
    }

    fn text(&self, index: usize) -> &'a str {
        self.raw[index]
    }

    fn int(&self, index: usize) -> Result<i32, SaveError> {
        self.raw[index].parse().map_err(|_| self.invalid(index))
    }

    fn long(&self, index: usize) -> Result<i64, SaveError> {
        self.raw[index].parse().map_err(|_| self.invalid(index))
    }

    fn flag(&self, index: usize) -> Result<bool, SaveError> {
        match self.raw[index] {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(self.invalid(index)),
        }
    }

    fn stat_block(&self, index: usize) -> Result<VitalStatistics, SaveError> {
        let parts: Vec<i32> = self.raw[index]
            .split('|')
            .map(|p| p.parse::<i32>())
            .collect::<Result<_, _>>()
            .map_err(|_| self.invalid(index))?;
        match parts[..] {
            [h, s, f, hp] => Ok(VitalStatistics::new(h, s, f, hp)),
            _ => Err(self.invalid(index)),
        }
    }

    fn inventory(&self, index: usize) -> Result<Inventory, SaveError> {
        let raw = self.raw[index];
        if raw.is_empty() {
            return Ok(Inventory::new());
        }
        let mut inventory = Inventory::new();
        for entry in raw.split(';') {
            let (name, qty) = entry.split_once(':').ok_or_else(|| self.invalid(index))?;
            let qty: u32 = qty.parse().map_err(|_| self.invalid(index))?;
            if !is_valid_item_name(name) || inventory.iter().any(|(n, _)| n == name) {
                return Err(self.invalid(index));
            }
            inventory.add(name, qty).map_err(|_| self.invalid(index))?;
        }
        Ok(inventory)
    }
}

/// Decode one record line (without the header).
pub fn decode_record(line: &str) -> Result<Pet, SaveError> {
    let raw: Vec<&str> = line.trim_end_matches(|c: char| c == '\r' || c == '\n').split(',').collect();
    if raw.len() != FIELD_COUNT {
        return Err(SaveError::FieldCount(raw.len()));
    }
    let f = Fields { raw };

    let spec = PetTypeSpec {
        type_name: f.text(0).to_string(),
        max_health: f.int(1)?,
        max_sleep: f.int(2)?,
        max_fullness: f.int(3)?,
        max_happiness: f.int(4)?,
        fullness_decay_rate: f.int(5)?,
        sleep_decay_rate: f.int(6)?,
        happiness_decay_rate: f.int(7)?,
        health_decay_rate: f.int(8)?,
    };
    if f.text(10) != spec.type_name {
        return Err(SaveError::Inconsistent(format!(
            "type name `{}` does not match `{}`",
            f.text(10),
            spec.type_name
        )));
    }
    let pet_type: PetType = spec.try_into()?;

    let block = f.stat_block(11)?;
    let vitals = VitalStatistics::new(f.int(18)?, f.int(19)?, f.int(20)?, f.int(21)?);
    if block != vitals {
        return Err(SaveError::Inconsistent(format!(
            "statistics block {block:?} does not match {vitals:?}"
        )));
    }

    let snapshot = PetSnapshot {
        name: f.text(9).to_string(),
        pet_type,
        vitals,
        last_play: f.long(12)?,
        last_vet_visit: f.long(13)?,
        states: PetStates {
            sleeping: f.flag(14)?,
            hungry: f.flag(15)?,
            angry: f.flag(16)?,
            dead: f.flag(17)?,
        },
        food: f.inventory(22)?,
        gifts: f.inventory(23)?,
    };
    Ok(Pet::from_snapshot(snapshot)?)
}

/// Write header and record to a writer
pub fn write_pet<W: Write>(mut writer: W, pet: &Pet) -> Result<(), SaveError> {
    writeln!(writer, "{HEADER}")?;
    writeln!(writer, "{}", encode_record(pet))?;
    writer.flush()?;
    Ok(())
}

/// Read a pet from a reader, skipping the header line
pub fn read_pet<R: Read>(reader: R) -> Result<Pet, SaveError> {
    let mut lines = BufReader::new(reader).lines();
    let _header = lines.next().transpose()?;
    match lines.next().transpose()? {
        Some(line) if !line.trim().is_empty() => decode_record(&line),
        _ => Err(SaveError::MissingRecord),
    }
}

/// What `SaveSlots::revive` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviveOutcome {
    Revived,
    /// The pet was alive; the slot was left untouched.
    NotDead,
}

/// The numbered save files in one directory.
#[derive(Debug, Clone)]
pub struct SaveSlots {
    dir: PathBuf,
}

impl SaveSlots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, slot: u8) -> Result<PathBuf, SlotError> {
        if !(1..=SLOT_COUNT).contains(&slot) {
            return Err(SlotError {
                slot,
                source: SaveError::NoSuchSlot,
            });
        }
        Ok(self.dir.join(format!("slot{slot}.csv")))
    }

    pub fn is_occupied(&self, slot: u8) -> bool {
        self.path(slot).map(|p| p.is_file()).unwrap_or(false)
    }

    pub fn save(&self, slot: u8, pet: &Pet) -> Result<(), SlotError> {
        let path = self.path(slot)?;
        let tag = |source: SaveError| SlotError { slot, source };
        fs::create_dir_all(&self.dir).map_err(|e| tag(e.into()))?;
        let file = fs::File::create(&path).map_err(|e| tag(e.into()))?;
        write_pet(file, pet).map_err(tag)?;
        log::info!("saved {} to {}", pet.name(), path.display());
        Ok(())
    }

    pub fn load(&self, slot: u8) -> Result<Pet, SlotError> {
        let path = self.path(slot)?;
        let tag = |source: SaveError| SlotError { slot, source };
        let file = fs::File::open(&path).map_err(|e| tag(e.into()))?;
        let pet = read_pet(file).map_err(tag)?;
        log::info!("loaded {} from {}", pet.name(), path.display());
        Ok(pet)
    }

    /// Restore a dead pet in `slot` to full statistics and save it back.
    pub fn revive(&self, slot: u8) -> Result<ReviveOutcome, SlotError> {
        let mut pet = self.load(slot)?;
        if !pet.is_dead() {
            return Ok(ReviveOutcome::NotDead);
        }
        pet.revive();
        self.save(slot, &pet)?;
        log::info!("revived {} in slot {slot}", pet.name());
        Ok(ReviveOutcome::Revived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petcare_logic::pet_type::species;
    use petcare_logic::vitals::VitalStat;

    fn sample() -> Pet {
        let mut pet = Pet::new("Biscuit", species("Sunny").unwrap()).unwrap();
        pet.set_stat(VitalStat::Sleep, 0);
        pet.play(1_700_000_000_000, 1);
        pet
    }

    #[test]
    fn test_record_layout() {
        let record = encode_record(&sample());
        let fields: Vec<&str> = record.split(',').collect();
        assert_eq!(fields.len(), FIELD_COUNT);
        assert_eq!(HEADER.split(',').count(), FIELD_COUNT);
        assert_eq!(fields[0], "Sunny");
        assert_eq!(fields[9], "Biscuit");
        assert_eq!(fields[10], "Sunny");
        assert_eq!(fields[11], "3|0|3|4");
        assert_eq!(fields[12], "1700000000000");
        assert_eq!(fields[13], "0");
        assert_eq!(&fields[14..18], ["true", "false", "false", "false"]);
        assert_eq!(fields[22], "Apple:3;Banana:2;Carrot:5");
        assert_eq!(fields[23], "Ball:1;Puzzle:1;Toy Mouse:2");
    }

    #[test]
    fn test_round_trip_is_exact() {
        let pet = sample();
        let mut buf = Vec::new();
        write_pet(&mut buf, &pet).unwrap();
        let back = read_pet(buf.as_slice()).unwrap();
        assert_eq!(back, pet);
    }

    #[test]
    fn test_empty_inventory_round_trip() {
        let pet = sample();
        let mut snap = pet.snapshot();
        snap.food = Inventory::new();
        let pet = Pet::from_snapshot(snap).unwrap();
        let record = encode_record(&pet);
        assert!(record.contains(",,Ball:1"));
        assert_eq!(decode_record(&record).unwrap(), pet);
    }

    #[test]
    fn test_field_count_checked() {
        let record = encode_record(&sample());
        let short = record.rsplit_once(',').unwrap().0;
        assert!(matches!(decode_record(short), Err(SaveError::FieldCount(23))));
    }

    #[test]
    fn test_mismatched_duplicates_rejected() {
        let record = encode_record(&sample());
        let bad_type = record.replacen(",Sunny,", ",Brock,", 1);
        assert!(matches!(
            decode_record(&bad_type),
            Err(SaveError::Inconsistent(_))
        ));
        let bad_block = record.replace("3|0|3|4", "3|0|3|5");
        assert!(matches!(
            decode_record(&bad_block),
            Err(SaveError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_bad_fields_rejected() {
        let record = encode_record(&sample());
        let mut fields: Vec<String> = record.split(',').map(String::from).collect();
        fields[14] = "yes".into();
        assert!(matches!(
            decode_record(&fields.join(",")),
            Err(SaveError::InvalidField { index: 14, .. })
        ));

        let mut fields: Vec<String> = record.split(',').map(String::from).collect();
        fields[22] = "Apple=3".into();
        assert!(matches!(
            decode_record(&fields.join(",")),
            Err(SaveError::InvalidField { index: 22, .. })
        ));

        let mut fields: Vec<String> = record.split(',').map(String::from).collect();
        fields[1] = "-7".into();
        assert!(matches!(
            decode_record(&fields.join(",")),
            Err(SaveError::PetType(_))
        ));
    }

    #[test]
    fn test_out_of_bounds_stats_rejected() {
        let record = encode_record(&sample());
        let over = record
            .replace("3|0|3|4", "3|0|9|4")
            .replace(",3,0,3,4,", ",3,0,9,4,");
        assert!(matches!(
            decode_record(&over),
            Err(SaveError::Pet(PetError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_header_only_file() {
        let text = format!("{HEADER}\n");
        assert!(matches!(
            read_pet(text.as_bytes()),
            Err(SaveError::MissingRecord)
        ));
    }
}
