use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::altitude::{exercise_work_joules, set_work_joules, total_work_joules, work_to_altitude};
use crate::heights::resolve_height;
use crate::units::to_kilograms;
use crate::workout::DayHistory;

/// One logged set, flattened for spreadsheets.
#[derive(Debug, Serialize, PartialEq)]
pub struct SetRow<'a> {
    pub date: &'a str,
    pub exercise: &'a str,
    pub set_id: &'a str,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub unit: &'static str,
    pub weight_kg: f64,
    pub work_joules: f64,
}

/// Work and altitude for one day plus the running total.
#[derive(Debug, Serialize, PartialEq)]
pub struct DaySummary<'a> {
    pub date: &'a str,
    pub work_joules: f64,
    pub altitude_m: f64,
    pub cumulative_altitude_m: f64,
}

/// Flatten the history into per-set rows.
///
/// An exercise with an energy override contributes one extra row without a
/// set id carrying the override; its sets then report zero work.
pub fn set_rows(history: &DayHistory) -> Vec<SetRow<'_>> {
    let mut rows = Vec::new();
    for (date, day) in history {
        for ex in day {
            let overridden = ex.custom_joules.is_some_and(|j| j > 0.0);
            let height = resolve_height(&ex.name);
            for set in &ex.sets {
                rows.push(SetRow {
                    date,
                    exercise: &ex.name,
                    set_id: &set.id,
                    reps: set.reps,
                    weight: set.weight,
                    unit: set.unit.label(),
                    weight_kg: to_kilograms(set.weight, set.unit),
                    work_joules: if overridden {
                        0.0
                    } else {
                        set_work_joules(set, height)
                    },
                });
            }
            if overridden {
                rows.push(SetRow {
                    date,
                    exercise: &ex.name,
                    set_id: "",
                    reps: None,
                    weight: None,
                    unit: "",
                    weight_kg: 0.0,
                    work_joules: exercise_work_joules(ex),
                });
            }
        }
    }
    rows
}

pub fn day_summaries(history: &DayHistory) -> Vec<DaySummary<'_>> {
    let mut cumulative = 0.0;
    history
        .iter()
        .map(|(date, day)| {
            let work = total_work_joules(day);
            cumulative += work;
            DaySummary {
                date,
                work_joules: work,
                altitude_m: work_to_altitude(work),
                cumulative_altitude_m: work_to_altitude(cumulative),
            }
        })
        .collect()
}

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value).map_err(std::io::Error::other)
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

pub fn save_history_csv<P: AsRef<Path>>(path: P, history: &DayHistory) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, &set_rows(history))
}

pub fn save_history_json<P: AsRef<Path>>(path: P, history: &DayHistory) -> std::io::Result<()> {
    write_json(history, path)
}

pub fn save_summary_csv<P: AsRef<Path>>(path: P, history: &DayHistory) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, &day_summaries(history))
}

pub fn save_summary_json<P: AsRef<Path>>(path: P, history: &DayHistory) -> std::io::Result<()> {
    write_json(&day_summaries(history), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::WeightUnit;
    use crate::workout::{ExerciseEntry, WorkoutSet};

    fn history() -> DayHistory {
        let mut squat = ExerciseEntry::new("Squat");
        squat.sets.push(WorkoutSet {
            id: "1".into(),
            reps: Some(10),
            weight: Some(225.0),
            unit: WeightUnit::Lbs,
        });
        squat.sets.push(WorkoutSet::empty("2", WeightUnit::Lbs));
        let mut row = ExerciseEntry::new("Rowing");
        row.custom_joules = Some(5000.0);
        row.sets.push(WorkoutSet {
            id: "1".into(),
            reps: Some(3),
            weight: Some(50.0),
            unit: WeightUnit::Kg,
        });

        let mut history = DayHistory::new();
        history.insert("2025-01-02".into(), vec![row]);
        history.insert("2025-01-01".into(), vec![squat]);
        history
    }

    #[test]
    fn rows_follow_date_order() {
        let h = history();
        let rows = set_rows(&h);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].date, "2025-01-01");
        assert!((rows[0].work_joules - 6007.2).abs() < 0.5);
        assert_eq!(rows[1].work_joules, 0.0);
        assert_eq!(rows[1].reps, None);
        assert_eq!(rows[2].exercise, "Rowing");
        assert_eq!(rows[2].work_joules, 0.0);
        assert_eq!(rows[3].set_id, "");
        assert_eq!(rows[3].work_joules, 5000.0);
    }

    #[test]
    fn summaries_accumulate() {
        let h = history();
        let days = day_summaries(&h);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].altitude_m, 6.75);
        assert_eq!(days[1].altitude_m, 5.62);
        assert_eq!(days[1].cumulative_altitude_m, 12.37);
    }

    #[test]
    fn csv_has_header_and_blank_unset_fields() {
        let h = history();
        let mut buf = Vec::new();
        write_csv(&mut buf, &set_rows(&h)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,exercise,set_id,reps,weight,unit,weight_kg,work_joules")
        );
        let second_set = lines.nth(1).unwrap();
        assert!(second_set.starts_with("2025-01-01,Squat,2,,,lbs,0.0,0.0"));
    }

    #[test]
    fn json_history_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        save_history_json(&path, &history()).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        let loaded: DayHistory = serde_json::from_str(&data).unwrap();
        assert_eq!(loaded, history());

        let summary = dir.path().join("summary.csv");
        save_summary_csv(&summary, &history()).unwrap();
        let text = std::fs::read_to_string(&summary).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
