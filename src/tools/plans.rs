//! Plan MCP Tools
//!
//! Generate, store, and read daily diet and workout plans, and predict
//! calories for a single session.
//!
//! Generation loads the stored profile, runs the recommendation engine, and
//! replaces whatever was stored for that user and date. Database connections
//! are released before the engine is awaited.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::engine::burn;
use crate::models::{
    CalorieBurnQuery, CustomWorkoutRequest, DietDay, DietPlan, FitnessLevel, Gender, Intensity,
    InvalidProfileError, UserProfile, WorkoutDay, WorkoutPlan, WorkoutPlanEntry, WorkoutType,
};
use crate::recommend::RecommendationEngine;
use crate::tools::profiles::require_profile;

// ============================================================================
// Response Structs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GeneratedDietPlan {
    pub user_id: i64,
    pub date: String,
    pub rows_written: usize,
    pub plan: DietPlan,
}

#[derive(Debug, Serialize)]
pub struct GeneratedWorkoutPlan {
    pub user_id: i64,
    pub date: String,
    pub rows_written: usize,
    pub plan: WorkoutPlan,
}

#[derive(Debug, Serialize)]
pub struct CompleteExerciseResponse {
    pub user_id: i64,
    pub exercise_id: i64,
    pub completed: bool,
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct CaloriePrediction {
    pub calories_burned: u32,
    pub workout_type: WorkoutType,
    pub intensity: Intensity,
    pub duration_minutes: u32,
    pub weight_kg: f64,
    pub gender: Gender,
    /// MET used by the rule-based estimate for this session
    pub met_value: f64,
}

/// Raw calorie prediction input. Missing body stats come from the stored profile.
#[derive(Debug, Clone)]
pub struct CaloriePredictionInput {
    pub user_id: i64,
    pub workout_type: String,
    pub intensity: String,
    pub duration_minutes: u32,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub age: Option<u32>,
}

/// Raw custom workout input
#[derive(Debug, Clone)]
pub struct CustomWorkoutInput {
    pub duration_minutes: u32,
    pub difficulty: String,
    pub focus_areas: Vec<String>,
    pub equipment: Vec<String>,
    pub workout_type: String,
}

// ============================================================================
// Helpers
// ============================================================================

/// `YYYY-MM-DD`, defaulting to today's local date
pub fn resolve_date(date: Option<&str>) -> Result<String, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map(|parsed| parsed.format("%Y-%m-%d").to_string())
            .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD.", d)),
        None => Ok(chrono::Local::now().format("%Y-%m-%d").to_string()),
    }
}

fn load_profile(db: &Database, user_id: i64) -> Result<UserProfile, String> {
    require_profile(db, user_id)
}

// ============================================================================
// Diet
// ============================================================================

pub async fn generate_diet_plan(
    db: &Database,
    engine: &RecommendationEngine,
    user_id: i64,
    date: Option<&str>,
) -> Result<GeneratedDietPlan, String> {
    let date = resolve_date(date)?;
    let profile = load_profile(db, user_id)?;

    let mut rng = StdRng::from_entropy();
    let plan = engine
        .produce_plan(&profile, &mut rng)
        .await
        .map_err(|e| format!("Invalid profile: {}", e))?;

    let rows_written = db
        .with_conn_mut(|conn| plan.replace_for_day(conn, user_id, &date))
        .map_err(|e| format!("Failed to save diet plan: {}", e))?;

    info!(user_id, date = %date, rows_written, "Stored diet plan");
    Ok(GeneratedDietPlan { user_id, date, rows_written, plan })
}

pub fn get_diet_plan(db: &Database, user_id: i64, date: Option<&str>) -> Result<Option<DietDay>, String> {
    let date = resolve_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    DietDay::get(&conn, user_id, &date).map_err(|e| format!("Failed to get diet plan: {}", e))
}

// ============================================================================
// Workout
// ============================================================================

pub async fn generate_workout_plan(
    db: &Database,
    engine: &RecommendationEngine,
    user_id: i64,
    date: Option<&str>,
) -> Result<GeneratedWorkoutPlan, String> {
    let date = resolve_date(date)?;
    let profile = load_profile(db, user_id)?;

    let mut rng = StdRng::from_entropy();
    let plan = engine
        .produce_workout(&profile, &mut rng)
        .await
        .map_err(|e| format!("Invalid profile: {}", e))?;

    store_workout(db, user_id, date, plan)
}

pub async fn generate_custom_workout(
    db: &Database,
    engine: &RecommendationEngine,
    user_id: i64,
    date: Option<&str>,
    input: CustomWorkoutInput,
) -> Result<GeneratedWorkoutPlan, String> {
    let date = resolve_date(date)?;
    let difficulty = FitnessLevel::from_str(&input.difficulty).ok_or_else(|| {
        format!("Invalid request: {}", InvalidProfileError::UnknownDifficulty(input.difficulty.clone()))
    })?;
    let request = CustomWorkoutRequest {
        duration_minutes: input.duration_minutes,
        difficulty,
        focus_areas: input.focus_areas,
        equipment: input.equipment,
        workout_type: input.workout_type,
    };
    let profile = load_profile(db, user_id)?;

    let mut rng = StdRng::from_entropy();
    let plan = engine
        .produce_custom_workout(&profile, &request, &mut rng)
        .await
        .map_err(|e| format!("Invalid request: {}", e))?;

    store_workout(db, user_id, date, plan)
}

fn store_workout(
    db: &Database,
    user_id: i64,
    date: String,
    plan: WorkoutPlan,
) -> Result<GeneratedWorkoutPlan, String> {
    let rows_written = db
        .with_conn_mut(|conn| plan.replace_for_day(conn, user_id, &date))
        .map_err(|e| format!("Failed to save workout plan: {}", e))?;

    info!(user_id, date = %date, rows_written, "Stored workout plan");
    Ok(GeneratedWorkoutPlan { user_id, date, rows_written, plan })
}

pub fn get_workout_plan(
    db: &Database,
    user_id: i64,
    date: Option<&str>,
) -> Result<Option<WorkoutDay>, String> {
    let date = resolve_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    WorkoutDay::get(&conn, user_id, &date).map_err(|e| format!("Failed to get workout plan: {}", e))
}

pub fn complete_exercise(
    db: &Database,
    user_id: i64,
    exercise_id: i64,
    completed: bool,
) -> Result<CompleteExerciseResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let updated = WorkoutPlanEntry::set_completed(&conn, user_id, exercise_id, completed)
        .map_err(|e| format!("Failed to update exercise: {}", e))?;

    Ok(CompleteExerciseResponse { user_id, exercise_id, completed, updated })
}

// ============================================================================
// Calorie prediction
// ============================================================================

pub async fn predict_calories(
    db: &Database,
    engine: &RecommendationEngine,
    input: CaloriePredictionInput,
) -> Result<CaloriePrediction, String> {
    // The stored profile only matters when the caller left body stats out
    let stored = if input.weight_kg.is_none() || input.gender.is_none() || input.age.is_none() {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        UserProfile::get(&conn, input.user_id).map_err(|e| format!("Failed to get profile: {}", e))?
    } else {
        None
    };

    let weight_kg = input
        .weight_kg
        .or_else(|| stored.as_ref().map(|p| p.weight_kg))
        .ok_or("weight_kg is required when no profile is stored")?;
    let gender = match input.gender.as_deref() {
        Some(g) => Gender::from_str(g).ok_or_else(|| format!("Invalid gender '{}'. Use male or female.", g))?,
        None => stored
            .as_ref()
            .map(|p| p.gender)
            .ok_or("gender is required when no profile is stored")?,
    };

    let query = CalorieBurnQuery {
        workout_type: WorkoutType::from_str(&input.workout_type),
        intensity: Intensity::from_str(&input.intensity),
        duration_minutes: input.duration_minutes,
        user_weight_kg: weight_kg,
        user_gender: gender,
        user_age: input.age.or_else(|| stored.as_ref().map(|p| p.age)),
    };

    let calories_burned = engine
        .estimate_burn(&query)
        .await
        .map_err(|e| format!("Invalid query: {}", e))?;

    Ok(CaloriePrediction {
        calories_burned,
        workout_type: query.workout_type,
        intensity: query.intensity,
        duration_minutes: query.duration_minutes,
        weight_kg: query.user_weight_kg,
        gender: query.user_gender,
        met_value: burn::met_value(query.workout_type, query.intensity),
    })
}
