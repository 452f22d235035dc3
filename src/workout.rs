//! Logged workout data as it is stored per day.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::units::WeightUnit;

/// All logged days keyed by `YYYY-MM-DD`.
pub type DayHistory = BTreeMap<String, Vec<ExerciseEntry>>;

/// Canonical history key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// A single performed set. `None` reps or weight means the field was left
/// empty and the set does no work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: String,
    #[serde(default, deserialize_with = "loose_reps")]
    pub reps: Option<u32>,
    #[serde(default, deserialize_with = "loose_weight")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: WeightUnit,
}

impl WorkoutSet {
    pub fn empty(id: impl Into<String>, unit: WeightUnit) -> Self {
        Self {
            id: id.into(),
            reps: None,
            weight: None,
            unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
    /// Precomputed work in joules that replaces the per-set calculation.
    #[serde(
        rename = "customJoules",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_joules: Option<f64>,
    #[serde(rename = "isExpanded", default)]
    pub expanded: bool,
}

impl ExerciseEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: Vec::new(),
            custom_joules: None,
            expanded: false,
        }
    }

    /// Id for a new set, unique among this exercise's sets.
    pub fn next_set_id(&self) -> String {
        let taken: BTreeSet<u64> = self
            .sets
            .iter()
            .filter_map(|s| s.id.parse().ok())
            .collect();
        let id = match taken.last() {
            None => 1,
            Some(&max) => match max.checked_add(1) {
                Some(next) => next,
                // At the top of the range, take the lowest free number.
                None => (1..).find(|n| !taken.contains(n)).unwrap_or(0),
            },
        };
        id.to_string()
    }

    /// Append an empty set, reusing the unit of the last set.
    pub fn push_empty_set(&mut self, fallback_unit: WeightUnit) {
        let unit = self.sets.last().map_or(fallback_unit, |s| s.unit);
        let id = self.next_set_id();
        self.sets.push(WorkoutSet::empty(id, unit));
    }
}

// Form inputs used to be stored verbatim, so numbers may arrive as strings
// and empty fields as "".
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn into_f64(self) -> Option<f64> {
        let value = match self {
            LooseNumber::Number(n) => n,
            LooseNumber::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

fn loose_weight<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(LooseNumber::into_f64))
}

fn loose_reps<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw
        .and_then(LooseNumber::into_f64)
        .filter(|r| *r >= 0.0 && r.fract() == 0.0 && *r <= u32::MAX as f64)
        .map(|r| r as u32))
}
