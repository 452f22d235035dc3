// Converts logged lifting work into boulder altitude.
use crate::heights::resolve_height;
use crate::units::to_kilograms;
use crate::workout::{ExerciseEntry, WorkoutSet};

pub const GRAVITY: f64 = 9.81;
pub const BOULDER_MASS_KG: f64 = 90.7;

/// Work in joules done by one set lifted through `height_m` per rep.
///
/// Sets with no positive weight or no positive rep count do no work.
pub fn set_work_joules(set: &WorkoutSet, height_m: f64) -> f64 {
    let weight_kg = to_kilograms(set.weight, set.unit);
    let reps = set.reps.unwrap_or(0);
    if weight_kg <= 0.0 || reps == 0 {
        return 0.0;
    }
    weight_kg * GRAVITY * height_m * f64::from(reps)
}

/// Work in joules for one exercise.
///
/// A positive `custom_joules` replaces the per-set sum entirely.
pub fn exercise_work_joules(exercise: &ExerciseEntry) -> f64 {
    if let Some(joules) = exercise.custom_joules.filter(|j| *j > 0.0) {
        return joules;
    }
    let height = resolve_height(&exercise.name);
    exercise
        .sets
        .iter()
        .map(|set| set_work_joules(set, height))
        .sum()
}

pub fn total_work_joules(exercises: &[ExerciseEntry]) -> f64 {
    exercises.iter().map(exercise_work_joules).sum()
}

/// Height the boulder would be raised by `joules` of work, rounded to
/// centimeters.
pub fn work_to_altitude(joules: f64) -> f64 {
    round_cm(joules / (BOULDER_MASS_KG * GRAVITY))
}

/// Altitude gain in meters for a list of exercises.
pub fn compute_altitude_gain(exercises: &[ExerciseEntry]) -> f64 {
    work_to_altitude(total_work_joules(exercises))
}

fn round_cm(meters: f64) -> f64 {
    (meters * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::WeightUnit;

    fn set(reps: Option<u32>, weight: Option<f64>, unit: WeightUnit) -> WorkoutSet {
        WorkoutSet {
            id: "1".into(),
            reps,
            weight,
            unit,
        }
    }

    fn exercise(name: &str, sets: Vec<WorkoutSet>) -> ExerciseEntry {
        ExerciseEntry {
            sets,
            ..ExerciseEntry::new(name)
        }
    }

    #[test]
    fn no_exercises_no_altitude() {
        assert_eq!(compute_altitude_gain(&[]), 0.0);
    }

    #[test]
    fn squat_example() {
        let ex = exercise(
            "Squat",
            vec![set(Some(10), Some(225.0), WeightUnit::Lbs)],
        );
        let work = exercise_work_joules(&ex);
        assert!((work - 6007.2).abs() < 0.5);
        assert_eq!(compute_altitude_gain(&[ex]), 6.75);
    }

    #[test]
    fn empty_or_zero_sets_do_no_work() {
        let cases = [
            set(Some(0), Some(100.0), WeightUnit::Kg),
            set(None, Some(100.0), WeightUnit::Kg),
            set(Some(10), Some(0.0), WeightUnit::Kg),
            set(Some(10), Some(-20.0), WeightUnit::Kg),
            set(Some(10), None, WeightUnit::Lbs),
        ];
        for s in &cases {
            assert_eq!(set_work_joules(s, 0.6), 0.0, "{s:?}");
        }
        let ex = exercise("Bench", cases.to_vec());
        assert_eq!(compute_altitude_gain(&[ex]), 0.0);
    }

    #[test]
    fn custom_joules_override_sets() {
        let mut ex = exercise(
            "Deadlift",
            vec![set(Some(5), Some(200.0), WeightUnit::Kg)],
        );
        ex.custom_joules = Some(5000.0);
        assert_eq!(exercise_work_joules(&ex), 5000.0);
        let expected = ((5000.0 / (BOULDER_MASS_KG * GRAVITY)) * 100.0_f64).round() / 100.0;
        assert_eq!(compute_altitude_gain(&[ex]), expected);
        assert_eq!(expected, 5.62);
    }

    #[test]
    fn non_positive_override_falls_back_to_sets() {
        let mut ex = exercise("Bench", vec![set(Some(1), Some(90.7), WeightUnit::Kg)]);
        ex.custom_joules = Some(0.0);
        // 90.7 kg lifted 0.4 m once raises the boulder 0.4 m.
        assert_eq!(compute_altitude_gain(&[ex.clone()]), 0.4);
        ex.custom_joules = Some(-10.0);
        assert_eq!(compute_altitude_gain(&[ex]), 0.4);
    }

    #[test]
    fn exercises_accumulate() {
        let squat = exercise("Back Squat", vec![set(Some(1), Some(90.7), WeightUnit::Kg)]);
        let lunge = exercise(
            "Lunges",
            vec![
                set(Some(2), Some(90.7), WeightUnit::Kg),
                set(Some(1), Some(90.7), WeightUnit::Kg),
            ],
        );
        assert_eq!(compute_altitude_gain(&[squat, lunge]), 1.8);
    }

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(round_cm(0.125), 0.13);
        assert_eq!(round_cm(2.375), 2.38);
        assert_eq!(round_cm(-0.125), -0.13);
        assert_eq!(round_cm(0.124), 0.12);
        // 0.125 m of boulder lift.
        assert_eq!(work_to_altitude(0.125 * BOULDER_MASS_KG * GRAVITY), 0.13);
    }
}
