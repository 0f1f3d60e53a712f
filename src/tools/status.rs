//! FitSense Status Tool
//!
//! Provides runtime status information about the FitSense service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Plan workflow instructions for AI assistants
pub const PLAN_INSTRUCTIONS: &str = r#"
# FitSense Plan Instructions

This guide explains how to produce diet and workout plans with the FitSense tools.

## Overview

Every plan is computed from a stored profile:
1. **Profile** - Body stats, goal, diet preference, activity level, workout time
2. **Diet Plan** - Daily calorie target, macro split, and three meals
3. **Workout Plan** - A session sized to the profile's workout time
4. **Calorie Prediction** - Calories burned for a single session
5. **Progress** - Daily logs and a dashboard against the stored plans

All tools take a `user_id` (default 1). Plan tools also take a `date`
(YYYY-MM-DD, default today). Generating a plan for a date replaces whatever
was stored for that date.

---

## Step 1: Save a Profile

**Tool:** `save_profile`

| Field | Values |
|-------|--------|
| `age` | 1-120 |
| `gender` | `male`, `female` |
| `height_cm` | > 0 |
| `weight_kg` | > 0 |
| `goal` | `weight-loss`, `maintenance`, `muscle-gain` |
| `diet_preference` | `vegan`, `non-vegan` |
| `activity_level` | `sedentary`, `light`, `moderate`, `intense` |
| `workout_time` | `15-30`, `30-45`, `45-60`, `60+` |

Unknown values are rejected. The response includes BMI, BMR, TDEE, the daily
calorie target, the resolved fitness level, and the session length in minutes.

**Example:**
```json
{
  "age": 28,
  "gender": "male",
  "height_cm": 175,
  "weight_kg": 75,
  "goal": "weight-loss",
  "diet_preference": "non-vegan",
  "activity_level": "moderate",
  "workout_time": "30-45"
}
```
→ BMR 1703.8, TDEE 2640.8, target 2113 kcal, intermediate, 37 minutes

---

## Step 2: Generate a Diet Plan

**Tool:** `generate_diet_plan`

- Target calories: TDEE minus 20% for weight loss, plus 20% for muscle gain,
  never below 1200
- Macros by goal (protein/carbs/fat): weight loss 30/35/35, maintenance
  25/45/30, muscle gain 35/40/25
- Meals: breakfast 25%, lunch 35%, dinner 40% of the target

Read it back later with `get_diet_plan`.

---

## Step 3: Generate a Workout

**Tool:** `generate_workout_plan` - sized to the profile's workout time

**Tool:** `generate_custom_workout` - explicit length and style

| Field | Notes |
|-------|-------|
| `duration_minutes` | > 0 |
| `difficulty` | `beginner`, `intermediate`, `advanced` |
| `workout_type` | e.g. `full_body`, `cardio_strength` |
| `focus_areas` | optional list |
| `equipment` | optional list |

Styles containing "cardio" mix strength and cardio exercises. Read the stored
session with `get_workout_plan` and tick off exercises with `complete_exercise`
using the exercise `id` from that response.

---

## Step 4: Predict Calories

**Tool:** `predict_calories`

| Field | Values |
|-------|--------|
| `workout_type` | `strength`, `cardio`, `mixed` |
| `intensity` | `low`, `moderate`, `high` |
| `duration_minutes` | > 0 |
| `weight_kg`, `gender`, `age` | optional, taken from the profile when omitted |

Unknown type or intensity uses a MET of 5.0. Results are never below 10 kcal.

---

## Step 5: Track Progress

**Tool:** `log_progress` - any of `weight_kg`, `calories_consumed`,
`calories_burned`, `workouts_completed`, `notes` for a date. Logging the same
date again only overwrites the fields you send.

**Tool:** `get_progress` - one point per day for the last `days` days
(default 30, at most 365) ending on `end_date`, with weight change and
average calories.

**Tool:** `dashboard_stats` - for one date: calorie target, planned meal
calories, consumed and remaining calories, calories burned (logged, else the
planned workout's estimate), and completed vs planned exercises.

---

## Generated vs Rule-Based

When a Gemini API key is configured, plans are generated first and validated.
Any failure (timeout, bad status, malformed answer) falls back to the
deterministic rules. Every plan reports its `source`: `generated` or
`rule_based`.
"#;

/// Runtime status of the FitSense service
#[derive(Debug, Clone, Serialize)]
pub struct FitsenseStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,

    /// Generative backend
    pub ai_enabled: bool,
    pub ai_backend: Option<String>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    ai_backend: Option<String>,
}

impl StatusTracker {
    /// `ai_backend` names the generator (and model) plans are tried with first
    pub fn new(database_path: PathBuf, ai_backend: Option<String>) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            ai_backend,
        }
    }

    /// Get the current status
    pub fn get_status(&self, schema_version: Option<i32>) -> FitsenseStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FitsenseStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            ai_enabled: self.ai_backend.is_some(),
            ai_backend: self.ai_backend.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
