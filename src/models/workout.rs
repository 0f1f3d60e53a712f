//! Workout plan model
//!
//! An ordered list of exercises with sets, reps, duration, and calorie
//! estimates. Stored as one row per exercise.

use std::fmt;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::PlanSource;
use crate::db::DbResult;

/// Workout difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(FitnessLevel::Beginner),
            "intermediate" => Some(FitnessLevel::Intermediate),
            "advanced" => Some(FitnessLevel::Advanced),
            _ => None,
        }
    }
}

/// Repetitions: a count, or a description such as "30 sec"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    Count(u32),
    Described(String),
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reps::Count(n) => write!(f, "{}", n),
            Reps::Described(s) => f.write_str(s),
        }
    }
}

impl Reps {
    /// Parse a stored reps column back into a count when it is numeric
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<u32>() {
            Ok(n) => Reps::Count(n),
            Err(_) => Reps::Described(s.to_string()),
        }
    }
}

/// One exercise in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub name: String,
    pub sets: u32,
    pub reps: Reps,
    pub duration_minutes: u32,
    pub calories: u32,
    pub muscle_groups: Vec<String>,
    pub instructions: String,
}

/// A complete workout plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub name: String,
    pub duration_minutes: u32,
    pub difficulty: String,
    pub exercises: Vec<WorkoutExercise>,
    /// Always the sum of the exercise calories
    pub estimated_calories: u32,
    pub description: String,
    pub equipment_needed: Vec<String>,
    pub tips: String,
    pub source: PlanSource,
}

impl WorkoutPlan {
    /// Sum of exercise calories, saturating at `u32::MAX`
    pub fn total_exercise_calories(exercises: &[WorkoutExercise]) -> u32 {
        exercises.iter().fold(0u32, |total, e| total.saturating_add(e.calories))
    }
}

/// Caller-specified workout customization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomWorkoutRequest {
    pub duration_minutes: u32,
    pub difficulty: FitnessLevel,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Free-form style such as "full_body" or "cardio_hiit"
    pub workout_type: String,
}

/// One stored exercise row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub workout_name: String,
    pub exercise_name: String,
    pub sets: u32,
    pub reps: Reps,
    pub duration: u32,
    pub calories_burned: u32,
    pub completed: bool,
    pub created_at: String,
}

/// A stored day's workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub user_id: i64,
    pub date: String,
    pub workout_name: String,
    pub exercises: Vec<WorkoutPlanEntry>,
    pub total_duration: u32,
    pub total_calories: u32,
    pub completed_count: usize,
}

impl WorkoutPlanEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let reps: String = row.get("reps")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            workout_name: row.get("workout_name")?,
            exercise_name: row.get("exercise_name")?,
            sets: row.get("sets")?,
            reps: Reps::parse(&reps),
            duration: row.get("duration")?,
            calories_burned: row.get("calories_burned")?,
            completed: row.get::<_, i32>("completed")? != 0,
            created_at: row.get("created_at")?,
        })
    }

    /// List a user's exercise rows for one date, in plan order
    pub fn list_for_day(conn: &Connection, user_id: i64, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM workout_plans WHERE user_id = ?1 AND date = ?2 ORDER BY id")?;
        let entries = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Mark an exercise row completed (or not). Returns false if the row does
    /// not belong to the user.
    pub fn set_completed(
        conn: &Connection,
        user_id: i64,
        id: i64,
        completed: bool,
    ) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE workout_plans SET completed = ?1 WHERE id = ?2 AND user_id = ?3",
            params![completed as i32, id, user_id],
        )?;
        Ok(rows > 0)
    }
}

impl WorkoutPlan {
    /// Replace everything stored for the user and date with this plan.
    ///
    /// Runs delete-then-insert in one transaction and returns the number of
    /// exercise rows written.
    pub fn replace_for_day(
        &self,
        conn: &mut Connection,
        user_id: i64,
        date: &str,
    ) -> DbResult<usize> {
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM workout_plans WHERE user_id = ?1 AND date = ?2",
            params![user_id, date],
        )?;

        for exercise in &self.exercises {
            tx.execute(
                r#"
                INSERT INTO workout_plans
                (user_id, date, workout_name, exercise_name, sets, reps, duration, calories_burned, completed)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)
                "#,
                params![
                    user_id,
                    date,
                    self.name,
                    exercise.name,
                    exercise.sets,
                    exercise.reps.to_string(),
                    exercise.duration_minutes,
                    exercise.calories,
                ],
            )?;
        }

        tx.commit()?;
        Ok(self.exercises.len())
    }
}

impl WorkoutDay {
    /// Load a stored day's workout, or None if nothing was generated for it
    pub fn get(conn: &Connection, user_id: i64, date: &str) -> DbResult<Option<Self>> {
        let exercises = WorkoutPlanEntry::list_for_day(conn, user_id, date)?;
        let workout_name = match exercises.first() {
            Some(first) => first.workout_name.clone(),
            None => return Ok(None),
        };

        Ok(Some(Self {
            user_id,
            date: date.to_string(),
            workout_name,
            total_duration: exercises.iter().fold(0u32, |t, e| t.saturating_add(e.duration)),
            total_calories: exercises
                .iter()
                .fold(0u32, |t, e| t.saturating_add(e.calories_burned)),
            completed_count: exercises.iter().filter(|e| e.completed).count(),
            exercises,
        }))
    }
}
