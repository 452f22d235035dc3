//! Owner of the logged history and the day currently on screen.

use chrono::{Duration, NaiveDate};

use crate::altitude::{compute_altitude_gain, total_work_joules, work_to_altitude};
use crate::storage::HistoryStore;
use crate::units::WeightUnit;
use crate::workout::{DayHistory, ExerciseEntry, WorkoutSet, date_key, parse_date_key};

pub const DEFAULT_EXERCISES: [&str; 3] = ["Squat", "Bench", "Deadlift"];

/// Holds all workout state. Every change is written through to the store.
pub struct DayTracker<S: HistoryStore> {
    store: S,
    history: DayHistory,
    current: NaiveDate,
    default_unit: WeightUnit,
    default_exercises: Vec<String>,
}

impl<S: HistoryStore> DayTracker<S> {
    pub fn new(
        store: S,
        today: NaiveDate,
        default_unit: WeightUnit,
        default_exercises: Vec<String>,
    ) -> Self {
        let history = store.load();
        let mut tracker = Self {
            store,
            history,
            current: today,
            default_unit,
            default_exercises,
        };
        tracker.go_to(today);
        tracker
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current
    }

    pub fn history(&self) -> &DayHistory {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn exercises(&self) -> &[ExerciseEntry] {
        self.history
            .get(&date_key(self.current))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn set_defaults(&mut self, unit: WeightUnit, exercises: Vec<String>) {
        self.default_unit = unit;
        self.default_exercises = exercises;
    }

    /// Show `date`, creating its default exercises the first time.
    pub fn go_to(&mut self, date: NaiveDate) {
        self.current = date;
        let key = date_key(date);
        if !self.history.contains_key(&key) {
            let day = self.default_day();
            self.history.insert(key, day);
            self.persist();
        }
    }

    pub fn shift_days(&mut self, days: i64) {
        if let Some(date) = self.current.checked_add_signed(Duration::days(days)) {
            self.go_to(date);
        }
    }

    pub fn toggle_expanded(&mut self, exercise: usize) {
        self.edit_exercise(exercise, |ex| ex.expanded = !ex.expanded);
    }

    pub fn add_set(&mut self, exercise: usize) {
        let unit = self.default_unit;
        self.edit_exercise(exercise, |ex| ex.push_empty_set(unit));
    }

    pub fn set_reps(&mut self, exercise: usize, set: usize, reps: Option<u32>) {
        self.edit_set(exercise, set, |s| s.reps = reps);
    }

    pub fn set_weight(&mut self, exercise: usize, set: usize, weight: Option<f64>) {
        self.edit_set(exercise, set, |s| s.weight = weight);
    }

    pub fn toggle_unit(&mut self, exercise: usize, set: usize) {
        self.edit_set(exercise, set, |s| s.unit = s.unit.toggled());
    }

    pub fn set_custom_joules(&mut self, exercise: usize, joules: Option<f64>) {
        self.edit_exercise(exercise, |ex| ex.custom_joules = joules);
    }

    /// Add an exercise to the current day. Blank names are ignored.
    pub fn add_exercise(&mut self, name: &str, custom_joules: Option<f64>) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let mut entry = ExerciseEntry::new(name);
        entry.custom_joules = custom_joules;
        entry.expanded = true;
        entry.push_empty_set(self.default_unit);
        self.current_day_mut().push(entry);
        log::info!("Added exercise {name} on {}", self.current);
        self.persist();
    }

    /// Altitude gained on the day on screen.
    pub fn day_altitude(&self) -> f64 {
        compute_altitude_gain(self.exercises())
    }

    /// Altitude gained over the whole history.
    pub fn total_altitude(&self) -> f64 {
        let joules: f64 = self
            .history
            .values()
            .map(|day| total_work_joules(day))
            .sum();
        work_to_altitude(joules)
    }

    /// Work in joules per stored day, oldest first. Unparseable keys are skipped.
    pub fn daily_work_joules(&self) -> Vec<(NaiveDate, f64)> {
        self.history
            .iter()
            .filter_map(|(key, day)| Some((parse_date_key(key)?, total_work_joules(day))))
            .collect()
    }

    /// Altitude per stored day, oldest first.
    pub fn daily_altitudes(&self) -> Vec<(NaiveDate, f64)> {
        self.daily_work_joules()
            .into_iter()
            .map(|(date, joules)| (date, work_to_altitude(joules)))
            .collect()
    }

    fn default_day(&self) -> Vec<ExerciseEntry> {
        self.default_exercises
            .iter()
            .map(|name| {
                let mut entry = ExerciseEntry::new(name.as_str());
                entry.push_empty_set(self.default_unit);
                entry
            })
            .collect()
    }

    fn current_day_mut(&mut self) -> &mut Vec<ExerciseEntry> {
        let defaults = self.default_day();
        self.history
            .entry(date_key(self.current))
            .or_insert(defaults)
    }

    fn edit_exercise(&mut self, exercise: usize, f: impl FnOnce(&mut ExerciseEntry)) {
        let Some(ex) = self.current_day_mut().get_mut(exercise) else {
            return;
        };
        f(ex);
        self.persist();
    }

    fn edit_set(&mut self, exercise: usize, set: usize, f: impl FnOnce(&mut WorkoutSet)) {
        let Some(s) = self
            .current_day_mut()
            .get_mut(exercise)
            .and_then(|ex| ex.sets.get_mut(set))
        else {
            return;
        };
        f(s);
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.history) {
            log::error!("Failed to save history: {e}");
        }
    }
}
