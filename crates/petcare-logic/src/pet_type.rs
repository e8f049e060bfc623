//! Per-species configuration: statistic maxima and decay rates.
//!
//! A [`PetType`] is immutable once built and is validated at construction:
//! negative maxima or decay rates are rejected with [`PetTypeError`]. The
//! built-in species ship as JSON in `data/pet_types.json`.
//!
//! ```
//! use petcare_logic::pet_type::{species, PetType};
//!
//! let brock = species("Brock").unwrap();
//! assert_eq!(brock.max_sleep(), 6);
//! assert!(PetType::new("Odd", -1, 5, 5, 5, 1, 1, 1, 0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vitals::VitalStat;

const SPECIES_JSON: &str = include_str!("../../../data/pet_types.json");

/// Rejected pet type configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetTypeError {
    #[error("pet type name must not be empty")]
    EmptyName,
    #[error("pet type name `{0}` contains a reserved character")]
    ReservedCharacter(String),
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: i32 },
    #[error("species catalog is malformed: {0}")]
    Catalog(String),
}

/// Unvalidated pet type fields, as found in JSON catalogs and save records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetTypeSpec {
    pub type_name: String,
    pub max_health: i32,
    pub max_sleep: i32,
    pub max_fullness: i32,
    pub max_happiness: i32,
    pub fullness_decay_rate: i32,
    pub sleep_decay_rate: i32,
    pub happiness_decay_rate: i32,
    pub health_decay_rate: i32,
}

/// Validated, immutable species configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PetTypeSpec", into = "PetTypeSpec")]
pub struct PetType {
    type_name: String,
    max_health: i32,
    max_sleep: i32,
    max_fullness: i32,
    max_happiness: i32,
    fullness_decay_rate: i32,
    sleep_decay_rate: i32,
    happiness_decay_rate: i32,
    health_decay_rate: i32,
}

impl PetType {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_name: impl Into<String>,
        max_health: i32,
        max_sleep: i32,
        max_fullness: i32,
        max_happiness: i32,
        fullness_decay_rate: i32,
        sleep_decay_rate: i32,
        happiness_decay_rate: i32,
        health_decay_rate: i32,
    ) -> Result<Self, PetTypeError> {
        PetTypeSpec {
            type_name: type_name.into(),
            max_health,
            max_sleep,
            max_fullness,
            max_happiness,
            fullness_decay_rate,
            sleep_decay_rate,
            happiness_decay_rate,
            health_decay_rate,
        }
        .try_into()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn max_sleep(&self) -> i32 {
        self.max_sleep
    }

    pub fn max_fullness(&self) -> i32 {
        self.max_fullness
    }

    pub fn max_happiness(&self) -> i32 {
        self.max_happiness
    }

    pub fn fullness_decay_rate(&self) -> i32 {
        self.fullness_decay_rate
    }

    pub fn sleep_decay_rate(&self) -> i32 {
        self.sleep_decay_rate
    }

    pub fn happiness_decay_rate(&self) -> i32 {
        self.happiness_decay_rate
    }

    /// Carried for persistence; the decay tick drains health through
    /// penalties instead of a flat rate.
    pub fn health_decay_rate(&self) -> i32 {
        self.health_decay_rate
    }

    /// Upper bound for a statistic.
    pub fn max(&self, stat: VitalStat) -> i32 {
        match stat {
            VitalStat::Health => self.max_health,
            VitalStat::Sleep => self.max_sleep,
            VitalStat::Fullness => self.max_fullness,
            VitalStat::Happiness => self.max_happiness,
        }
    }
}

impl TryFrom<PetTypeSpec> for PetType {
    type Error = PetTypeError;

    fn try_from(spec: PetTypeSpec) -> Result<Self, Self::Error> {
        if spec.type_name.trim().is_empty() {
            return Err(PetTypeError::EmptyName);
        }
        if spec.type_name.contains(|c: char| matches!(c, ',' | '\n' | '\r')) {
            return Err(PetTypeError::ReservedCharacter(spec.type_name));
        }
        let fields = [
            ("max_health", spec.max_health),
            ("max_sleep", spec.max_sleep),
            ("max_fullness", spec.max_fullness),
            ("max_happiness", spec.max_happiness),
            ("fullness_decay_rate", spec.fullness_decay_rate),
            ("sleep_decay_rate", spec.sleep_decay_rate),
            ("happiness_decay_rate", spec.happiness_decay_rate),
            ("health_decay_rate", spec.health_decay_rate),
        ];
        if let Some((field, value)) = fields.into_iter().find(|(_, v)| *v < 0) {
            return Err(PetTypeError::Negative { field, value });
        }

        Ok(Self {
            type_name: spec.type_name,
            max_health: spec.max_health,
            max_sleep: spec.max_sleep,
            max_fullness: spec.max_fullness,
            max_happiness: spec.max_happiness,
            fullness_decay_rate: spec.fullness_decay_rate,
            sleep_decay_rate: spec.sleep_decay_rate,
            happiness_decay_rate: spec.happiness_decay_rate,
            health_decay_rate: spec.health_decay_rate,
        })
    }
}

impl From<PetType> for PetTypeSpec {
    fn from(t: PetType) -> Self {
        Self {
            type_name: t.type_name,
            max_health: t.max_health,
            max_sleep: t.max_sleep,
            max_fullness: t.max_fullness,
            max_happiness: t.max_happiness,
            fullness_decay_rate: t.fullness_decay_rate,
            sleep_decay_rate: t.sleep_decay_rate,
            happiness_decay_rate: t.happiness_decay_rate,
            health_decay_rate: t.health_decay_rate,
        }
    }
}

/// The built-in species, in catalog order.
pub fn builtin_species() -> Result<Vec<PetType>, PetTypeError> {
    serde_json::from_str(SPECIES_JSON).map_err(|e| PetTypeError::Catalog(e.to_string()))
}

/// Look up a built-in species by name (case-insensitive).
pub fn species(name: &str) -> Option<PetType> {
    builtin_species()
        .ok()?
        .into_iter()
        .find(|t| t.type_name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let all = builtin_species().unwrap();
        let names: Vec<_> = all.iter().map(|t| t.type_name()).collect();
        assert_eq!(names, ["Brock", "Sunny", "Berry"]);

        let sunny = &all[1];
        assert_eq!(sunny.max_health(), 7);
        assert_eq!(sunny.max_sleep(), 5);
        assert_eq!(sunny.max_fullness(), 7);
        assert_eq!(sunny.max_happiness(), 6);
        assert_eq!(sunny.sleep_decay_rate(), 1);
        assert_eq!(sunny.happiness_decay_rate(), 2);
    }

    #[test]
    fn test_species_lookup_is_case_insensitive() {
        assert_eq!(species("berry").unwrap().type_name(), "Berry");
        assert!(species("Dragon").is_none());
    }

    #[test]
    fn test_negative_values_rejected() {
        let err = PetType::new("Dog", 10, 10, 10, 10, 1, -2, 1, 0).unwrap_err();
        assert_eq!(
            err,
            PetTypeError::Negative {
                field: "sleep_decay_rate",
                value: -2
            }
        );
        assert!(PetType::new("Dog", 0, 0, 0, 0, 0, 0, 0, 0).is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(
            PetType::new("  ", 1, 1, 1, 1, 0, 0, 0, 0).unwrap_err(),
            PetTypeError::EmptyName
        );
        assert!(matches!(
            PetType::new("Dog,Cat", 1, 1, 1, 1, 0, 0, 0, 0),
            Err(PetTypeError::ReservedCharacter(_))
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"type_name":"X","max_health":-5,"max_sleep":1,"max_fullness":1,
            "max_happiness":1,"fullness_decay_rate":0,"sleep_decay_rate":0,
            "happiness_decay_rate":0,"health_decay_rate":0}"#;
        assert!(serde_json::from_str::<PetType>(json).is_err());
    }

    #[test]
    fn test_max_per_stat() {
        let t = PetType::new("T", 1, 2, 3, 4, 0, 0, 0, 0).unwrap();
        let maxima: Vec<i32> = VitalStat::ALL.iter().map(|s| t.max(*s)).collect();
        assert_eq!(maxima, vec![1, 2, 3, 4]);
    }
}
