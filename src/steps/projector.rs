//! Default [`WorkoutProjector`] implementation: one row per set, or a
//! single placeholder row for a workout with no exercises.

use hevy_sync_core::CellValue;
use hevy_sync_delta::WorkoutProjector;
use serde_json::Value;

/// Sheet layout: `id, title, start_time, end_time, exercise_title, set_index, weight_kg, reps`.
pub const WORKOUTS_SHEET: &str = "Workouts";

pub struct HevyWorkoutProjector;

impl WorkoutProjector for HevyWorkoutProjector {
    fn id_column(&self) -> usize {
        0
    }

    fn workout_id(&self, workout: &Value) -> Option<String> {
        workout.get("id").and_then(Value::as_str).map(str::to_string)
    }

    fn project(&self, workout: &Value) -> Vec<Vec<CellValue>> {
        let id = self.workout_id(workout).unwrap_or_default();
        let title = text(workout, "title");
        let start_time = text(workout, "start_time");
        let end_time = text(workout, "end_time");

        let exercises = workout.get("exercises").and_then(Value::as_array);

        let Some(exercises) = exercises.filter(|e| !e.is_empty()) else {
            return vec![vec![
                CellValue::Text(id),
                title,
                start_time,
                end_time,
                CellValue::Empty,
                CellValue::Empty,
                CellValue::Empty,
                CellValue::Empty,
            ]];
        };

        let mut rows = Vec::new();
        for exercise in exercises {
            let exercise_title = text(exercise, "title");
            let sets = exercise.get("sets").and_then(Value::as_array).cloned().unwrap_or_default();

            if sets.is_empty() {
                rows.push(vec![
                    CellValue::Text(id.clone()),
                    title.clone(),
                    start_time.clone(),
                    end_time.clone(),
                    exercise_title,
                    CellValue::Empty,
                    CellValue::Empty,
                    CellValue::Empty,
                ]);
                continue;
            }

            for (index, set) in sets.iter().enumerate() {
                rows.push(vec![
                    CellValue::Text(id.clone()),
                    title.clone(),
                    start_time.clone(),
                    end_time.clone(),
                    exercise_title.clone(),
                    CellValue::Number((index + 1) as f64),
                    number(set, "weight_kg"),
                    number(set, "reps"),
                ]);
            }
        }

        if rows.is_empty() {
            rows.push(vec![
                CellValue::Text(id),
                title,
                start_time,
                end_time,
                CellValue::Empty,
                CellValue::Empty,
                CellValue::Empty,
                CellValue::Empty,
            ]);
        }

        rows
    }
}

fn text(value: &Value, field: &str) -> CellValue {
    match value.get(field).and_then(Value::as_str) {
        Some(s) => CellValue::Text(s.to_string()),
        None => CellValue::Empty,
    }
}

fn number(value: &Value, field: &str) -> CellValue {
    value
        .get(field)
        .and_then(Value::as_f64)
        .map(CellValue::Number)
        .unwrap_or(CellValue::Empty)
}
