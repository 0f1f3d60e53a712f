//! FitSense MCP Server Implementation
//!
//! Implements the MCP server with all FitSense tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::{migrations, Database};
use crate::models::{DailyLogUpdate, UserProfileCreate};
use crate::recommend::RecommendationEngine;
use crate::tools::plans::{self, CaloriePredictionInput, CustomWorkoutInput};
use crate::tools::profiles;
use crate::tools::progress;
use crate::tools::status::StatusTracker;

/// FitSense MCP Service
#[derive(Clone)]
pub struct FitSenseService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    engine: RecommendationEngine,
    tool_router: ToolRouter<FitSenseService>,
}

impl FitSenseService {
    /// `ai_backend` is reported by `fitsense_status`, e.g. "gemini (gemini-2.0-flash-exp)"
    pub fn new(database: Database, engine: RecommendationEngine, ai_backend: Option<String>) -> Self {
        let database_path = database
            .path()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(":memory:"));

        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, ai_backend))),
            database,
            engine,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

fn default_user_id() -> i64 { 1 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveProfileParams {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    pub age: u32,
    /// male or female
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// weight-loss, maintenance, or muscle-gain
    pub goal: String,
    /// vegan or non-vegan
    pub diet_preference: String,
    /// sedentary, light, moderate, or intense
    pub activity_level: String,
    /// 15-30, 30-45, 45-60, or 60+
    pub workout_time: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

// ============================================================================
// Plan Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanDateParams {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CustomWorkoutParams {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub duration_minutes: u32,
    /// beginner, intermediate, or advanced
    pub difficulty: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    /// e.g. full_body, upper_body, cardio_strength
    #[serde(default = "default_workout_type")]
    pub workout_type: String,
}

fn default_workout_type() -> String { "full_body".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompleteExerciseParams {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    /// Exercise row id from get_workout_plan
    pub exercise_id: i64,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool { true }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PredictCaloriesParams {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    /// strength, cardio, or mixed
    pub workout_type: String,
    /// low, moderate, or high
    pub intensity: String,
    pub duration_minutes: u32,
    /// Defaults to the stored profile's weight
    pub weight_kg: Option<f64>,
    /// Defaults to the stored profile's gender
    pub gender: Option<String>,
    pub age: Option<u32>,
}

// ============================================================================
// Progress Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogProgressParams {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub weight_kg: Option<f64>,
    pub calories_consumed: Option<u32>,
    pub calories_burned: Option<u32>,
    pub workouts_completed: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProgressParams {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    /// Number of days, 1-365 (default 30)
    pub days: Option<u32>,
    /// Last day of the series, YYYY-MM-DD, defaults to today
    pub end_date: Option<String>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl FitSenseService {
    // --- Status ---

    #[tool(description = "Get the current status of the FitSense service including build info, database status, generative backend, and process information")]
    async fn fitsense_status(&self) -> Result<CallToolResult, McpError> {
        let schema_version = self.database.with_conn(migrations::get_schema_version).ok();
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(schema_version);
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for producing diet and workout plans. Call this when starting a new planning session or when unsure how to use the plan tools.")]
    fn plan_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PLAN_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PLAN_INSTRUCTIONS)]))
    }

    // --- Profiles ---

    #[tool(description = "Save a user's profile (replaces any previous one). Returns BMI, BMR, TDEE, daily calorie target, and fitness level.")]
    fn save_profile(&self, Parameters(p): Parameters<SaveProfileParams>) -> Result<CallToolResult, McpError> {
        let data = UserProfileCreate {
            age: p.age,
            gender: p.gender,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            goal: p.goal,
            diet_preference: p.diet_preference,
            activity_level: p.activity_level,
            workout_time: p.workout_time,
        };
        let result = profiles::save_profile(&self.database, p.user_id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a user's stored profile with derived energy numbers")]
    fn get_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::get_profile(&self.database, p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(detail) => to_json(&detail),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Profile not found", "user_id": {}}}"#,
                p.user_id
            ))])),
        }
    }

    // --- Diet ---

    #[tool(description = "Generate and store a diet plan (calorie target, macros, breakfast/lunch/dinner) for a date. Replaces any plan already stored for that date.")]
    async fn generate_diet_plan(&self, Parameters(p): Parameters<PlanDateParams>) -> Result<CallToolResult, McpError> {
        let result = plans::generate_diet_plan(&self.database, &self.engine, p.user_id, p.date.as_deref())
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the stored diet plan for a date with meal entries and totals")]
    fn get_diet_plan(&self, Parameters(p): Parameters<PlanDateParams>) -> Result<CallToolResult, McpError> {
        let result = plans::get_diet_plan(&self.database, p.user_id, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(day) => to_json(&day),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "No diet plan for date", "user_id": {}}}"#,
                p.user_id
            ))])),
        }
    }

    // --- Workouts ---

    #[tool(description = "Generate and store a workout sized to the profile's workout time for a date. Replaces any workout already stored for that date.")]
    async fn generate_workout_plan(&self, Parameters(p): Parameters<PlanDateParams>) -> Result<CallToolResult, McpError> {
        let result = plans::generate_workout_plan(&self.database, &self.engine, p.user_id, p.date.as_deref())
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Generate and store a workout with an explicit duration, difficulty, and style for a date")]
    async fn generate_custom_workout(&self, Parameters(p): Parameters<CustomWorkoutParams>) -> Result<CallToolResult, McpError> {
        let input = CustomWorkoutInput {
            duration_minutes: p.duration_minutes,
            difficulty: p.difficulty,
            focus_areas: p.focus_areas,
            equipment: p.equipment,
            workout_type: p.workout_type,
        };
        let result = plans::generate_custom_workout(&self.database, &self.engine, p.user_id, p.date.as_deref(), input)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the stored workout for a date with per-exercise completion")]
    fn get_workout_plan(&self, Parameters(p): Parameters<PlanDateParams>) -> Result<CallToolResult, McpError> {
        let result = plans::get_workout_plan(&self.database, p.user_id, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(day) => to_json(&day),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "No workout for date", "user_id": {}}}"#,
                p.user_id
            ))])),
        }
    }

    #[tool(description = "Mark a stored exercise completed (or not completed with completed=false)")]
    fn complete_exercise(&self, Parameters(p): Parameters<CompleteExerciseParams>) -> Result<CallToolResult, McpError> {
        let result = plans::complete_exercise(&self.database, p.user_id, p.exercise_id, p.completed)
            .map_err(|e| McpError::internal_error(e, None))?;
        if !result.updated {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Exercise not found", "id": {}}}"#,
                p.exercise_id
            ))]));
        }
        to_json(&result)
    }

    // --- Calories ---

    #[tool(description = "Predict calories burned for one session. Weight, gender, and age default to the stored profile.")]
    async fn predict_calories(&self, Parameters(p): Parameters<PredictCaloriesParams>) -> Result<CallToolResult, McpError> {
        let input = CaloriePredictionInput {
            user_id: p.user_id,
            workout_type: p.workout_type,
            intensity: p.intensity,
            duration_minutes: p.duration_minutes,
            weight_kg: p.weight_kg,
            gender: p.gender,
            age: p.age,
        };
        let result = plans::predict_calories(&self.database, &self.engine, input)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Progress ---

    #[tool(description = "Log weight, calories consumed and burned, workouts completed, or notes for a date. Fields left out keep their logged value.")]
    fn log_progress(&self, Parameters(p): Parameters<LogProgressParams>) -> Result<CallToolResult, McpError> {
        let update = DailyLogUpdate {
            weight_kg: p.weight_kg,
            calories_consumed: p.calories_consumed,
            calories_burned: p.calories_burned,
            workouts_completed: p.workouts_completed,
            notes: p.notes,
        };
        let result = progress::log_progress(&self.database, p.user_id, p.date.as_deref(), update)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get logged progress for the last N days (one point per day) with weight change and average calories")]
    fn get_progress(&self, Parameters(p): Parameters<ProgressParams>) -> Result<CallToolResult, McpError> {
        let result = progress::get_progress(&self.database, p.user_id, p.days, p.end_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a day's dashboard: calorie target, planned vs consumed calories, calories burned, and completed vs planned exercises")]
    fn dashboard_stats(&self, Parameters(p): Parameters<PlanDateParams>) -> Result<CallToolResult, McpError> {
        let result = progress::dashboard_stats(&self.database, p.user_id, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FitSenseService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fitsense".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FitSense Recommendation Engine".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FitSense - Diet and workout recommendations from a user profile. \
                 IMPORTANT: Call plan_instructions before planning. \
                 Profiles: save_profile/get_profile (user_id defaults to 1). \
                 Diet: generate_diet_plan/get_diet_plan. \
                 Workouts: generate_workout_plan/generate_custom_workout/get_workout_plan, complete_exercise. \
                 Calories: predict_calories. \
                 Progress: log_progress/get_progress/dashboard_stats. \
                 Dates are YYYY-MM-DD and default to today. Regenerating a plan replaces the stored one."
                    .into(),
            ),
        }
    }
}
