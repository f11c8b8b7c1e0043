//! Organism status record and its transition rules.
//!
//! A [`Status`] is only changed through [`Status::apply`], which enforces:
//!
//! - vitality stays within [0, 100]; reaching 0 kills with [`DeathCause::ZeroVitality`];
//! - age reaching the lifespan is capped there and kills with [`DeathCause::MaxAge`];
//! - clearing `alive` directly kills with [`DeathCause::Other`];
//! - death is terminal and the first recorded cause is kept.

use crate::errors::OrganismError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const MAX_VITALITY: f64 = 100.0;
pub const DEFAULT_LIFESPAN: f64 = 100.0;
pub const DEFAULT_FITNESS: f64 = 100.0;

/// Why an organism died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Vitality dropped to zero.
    ZeroVitality,
    /// Age reached the lifespan.
    MaxAge,
    /// Killed directly.
    Other,
}

impl DeathCause {
    /// Short stable code used in reports.
    pub const fn code(self) -> &'static str {
        match self {
            Self::ZeroVitality => "death01",
            Self::MaxAge => "death02",
            Self::Other => "death03",
        }
    }
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A status field value, as returned by lookups and stored for custom fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Death(Option<DeathCause>),
}

impl StatusValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for StatusValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for StatusValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for StatusValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One requested status change.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    Alive(bool),
    Vitality(f64),
    Age(f64),
    Lifespan(f64),
    Fitness(f64),
    /// `Some(cause)` kills a living organism with that cause.
    Death(Option<DeathCause>),
    /// Any other named field; a plain assignment. Built-in names are
    /// converted to their typed update.
    Custom(String, StatusValue),
}

/// Names of the typed status fields.
pub const BUILTIN_FIELDS: [&str; 6] = ["alive", "vitality", "age", "lifespan", "fitness", "death"];

impl StatusUpdate {
    /// Typed update for a built-in field name, `None` when the name is not
    /// built in or the value has the wrong type.
    pub fn typed(name: &str, value: &StatusValue) -> Option<Self> {
        let update = match (name, value) {
            ("alive", StatusValue::Bool(b)) => Self::Alive(*b),
            ("vitality", StatusValue::Number(n)) => Self::Vitality(*n),
            ("age", StatusValue::Number(n)) => Self::Age(*n),
            ("lifespan", StatusValue::Number(n)) => Self::Lifespan(*n),
            ("fitness", StatusValue::Number(n)) => Self::Fitness(*n),
            ("death", StatusValue::Death(cause)) => Self::Death(*cause),
            _ => return None,
        };
        Some(update)
    }
}

/// Vitality, age and fitness of an organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    alive: bool,
    vitality: f64,
    age: f64,
    lifespan: f64,
    fitness: f64,
    death: Option<DeathCause>,
    #[serde(default)]
    custom: BTreeMap<String, StatusValue>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            alive: true,
            vitality: MAX_VITALITY,
            age: 0.0,
            lifespan: DEFAULT_LIFESPAN,
            fitness: DEFAULT_FITNESS,
            death: None,
            custom: BTreeMap::new(),
        }
    }
}

impl Status {
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn vitality(&self) -> f64 {
        self.vitality
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn lifespan(&self) -> f64 {
        self.lifespan
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death
    }

    /// Apply one update, enforcing the transition rules.
    ///
    /// Non-finite numbers and non-positive lifespans are ignored.
    pub fn apply(&mut self, update: StatusUpdate) {
        match update {
            StatusUpdate::Alive(true) => {}
            StatusUpdate::Alive(false) => self.kill(DeathCause::Other),
            StatusUpdate::Vitality(v) if v.is_finite() => {
                self.vitality = v.clamp(0.0, MAX_VITALITY);
                if self.vitality <= 0.0 {
                    self.kill(DeathCause::ZeroVitality);
                }
            }
            StatusUpdate::Age(a) if a.is_finite() => {
                self.age = a.max(0.0);
                self.check_age();
            }
            StatusUpdate::Lifespan(l) if l.is_finite() && l > 0.0 => {
                self.lifespan = l;
                self.check_age();
            }
            StatusUpdate::Fitness(f) if f.is_finite() => self.fitness = f,
            StatusUpdate::Death(Some(cause)) => self.kill(cause),
            StatusUpdate::Death(None) => {}
            StatusUpdate::Custom(name, value) => {
                if !BUILTIN_FIELDS.contains(&name.as_str()) {
                    self.custom.insert(name, value);
                } else if let Some(typed) = StatusUpdate::typed(&name, &value) {
                    self.apply(typed);
                } else {
                    log::debug!("Ignoring {value:?} for status field {name}");
                }
            }
            ignored => log::debug!("Ignoring status update {ignored:?}"),
        }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Result<StatusValue, OrganismError> {
        let value = match name {
            "alive" => StatusValue::Bool(self.alive),
            "vitality" => StatusValue::Number(self.vitality),
            "age" => StatusValue::Number(self.age),
            "lifespan" => StatusValue::Number(self.lifespan),
            "fitness" => StatusValue::Number(self.fitness),
            "death" => StatusValue::Death(self.death),
            other => self
                .custom
                .get(other)
                .cloned()
                .ok_or_else(|| OrganismError::UnknownStatusField(other.to_string()))?,
        };
        Ok(value)
    }

    fn check_age(&mut self) {
        if self.age >= self.lifespan {
            self.age = self.lifespan;
            self.kill(DeathCause::MaxAge);
        }
    }

    fn kill(&mut self, cause: DeathCause) {
        if self.alive {
            self.alive = false;
            self.death = Some(cause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default() {
        let status = Status::default();
        assert!(status.is_alive());
        assert_eq!(status.vitality(), 100.0);
        assert_eq!(status.age(), 0.0);
        assert_eq!(status.lifespan(), 100.0);
        assert_eq!(status.fitness(), 100.0);
        assert_eq!(status.death_cause(), None);
    }

    #[test]
    fn test_vitality_is_clamped() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Vitality(250.0));
        assert_eq!(status.vitality(), 100.0);
        assert!(status.is_alive());

        status.apply(StatusUpdate::Vitality(42.5));
        assert_eq!(status.vitality(), 42.5);
    }

    #[test]
    fn test_zero_vitality_kills() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Vitality(-5.0));

        assert!(!status.is_alive());
        assert_eq!(status.vitality(), 0.0);
        assert_eq!(status.death_cause(), Some(DeathCause::ZeroVitality));
    }

    #[test]
    fn test_max_age_kills() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Age(150.0));

        assert!(!status.is_alive());
        assert_eq!(status.age(), 100.0);
        assert_eq!(status.death_cause(), Some(DeathCause::MaxAge));
    }

    #[test]
    fn test_shortened_lifespan_kills_old_organism() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Age(60.0));
        assert!(status.is_alive());

        status.apply(StatusUpdate::Lifespan(50.0));
        assert!(!status.is_alive());
        assert_eq!(status.age(), 50.0);
        assert_eq!(status.death_cause(), Some(DeathCause::MaxAge));
    }

    #[test]
    fn test_direct_kill() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Alive(false));
        assert_eq!(status.death_cause(), Some(DeathCause::Other));
    }

    #[test]
    fn test_death_is_terminal() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Vitality(0.0));
        status.apply(StatusUpdate::Alive(true));
        status.apply(StatusUpdate::Age(1000.0));
        status.apply(StatusUpdate::Vitality(80.0));

        assert!(!status.is_alive());
        assert_eq!(status.death_cause(), Some(DeathCause::ZeroVitality));
        // Field assignments still land on a dead record
        assert_eq!(status.vitality(), 80.0);
    }

    #[test]
    fn test_invalid_numbers_are_ignored() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Vitality(f64::NAN));
        status.apply(StatusUpdate::Lifespan(0.0));
        status.apply(StatusUpdate::Fitness(f64::INFINITY));

        assert_eq!(status, Status::default());
    }

    #[test]
    fn test_get_builtin_and_custom_fields() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Custom("colour".into(), "red".into()));
        status.apply(StatusUpdate::Fitness(3.5));

        assert_eq!(status.get("alive").unwrap(), StatusValue::Bool(true));
        assert_eq!(status.get("fitness").unwrap().as_f64(), Some(3.5));
        assert_eq!(status.get("death").unwrap(), StatusValue::Death(None));
        assert_eq!(status.get("colour").unwrap(), StatusValue::from("red"));
        assert_eq!(
            status.get("wings"),
            Err(OrganismError::UnknownStatusField("wings".into()))
        );
    }

    #[test]
    fn test_custom_builtin_name_follows_rules() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Custom("age".into(), 150.0.into()));

        assert_eq!(status.get("age").unwrap().as_f64(), Some(100.0));
        assert!(!status.is_alive());
        assert_eq!(status.death_cause(), Some(DeathCause::MaxAge));
        assert!(status.custom.is_empty());
    }

    #[test]
    fn test_custom_builtin_name_wrong_type_is_ignored() {
        let mut status = Status::default();
        status.apply(StatusUpdate::Custom("vitality".into(), "high".into()));
        status.apply(StatusUpdate::Custom("alive".into(), 0.0.into()));

        assert_eq!(status, Status::default());
    }

    #[test]
    fn test_death_codes() {
        assert_eq!(DeathCause::ZeroVitality.code(), "death01");
        assert_eq!(DeathCause::MaxAge.code(), "death02");
        assert_eq!(DeathCause::Other.to_string(), "death03");
    }
}
