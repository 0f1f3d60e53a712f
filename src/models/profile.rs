//! User profile model
//!
//! The static profile every recommendation is computed from, plus its
//! single-row-per-user storage.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DbResult;

/// Oldest age accepted by the engine
pub const MAX_AGE: u32 = 120;

/// Malformed or missing profile fields. The only error that crosses the
/// recommendation engine boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidProfileError {
    #[error("age must be between 1 and {}, got {0}", MAX_AGE)]
    AgeOutOfRange(u32),

    #[error("height_cm must be a positive number, got {0}")]
    InvalidHeight(f64),

    #[error("weight_kg must be a positive number, got {0}")]
    InvalidWeight(f64),

    #[error("unknown gender '{0}' (expected male or female)")]
    UnknownGender(String),

    #[error("unknown goal '{0}' (expected weight-loss, maintenance, or muscle-gain)")]
    UnknownGoal(String),

    #[error("unknown diet preference '{0}' (expected vegan or non-vegan)")]
    UnknownDietPreference(String),

    #[error("unknown activity level '{0}' (expected sedentary, light, moderate, or intense)")]
    UnknownActivityLevel(String),

    #[error("unknown workout time '{0}' (expected 15-30, 30-45, 45-60, or 60+)")]
    UnknownWorkoutTime(String),

    #[error("unknown difficulty '{0}' (expected beginner, intermediate, or advanced)")]
    UnknownDifficulty(String),

    #[error("workout duration must be at least 1 minute")]
    ZeroDuration,
}

/// Biological sex used by the BMR and burn formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Fitness goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    MuscleGain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::WeightLoss, Goal::Maintenance, Goal::MuscleGain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight-loss",
            Goal::Maintenance => "maintenance",
            Goal::MuscleGain => "muscle-gain",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "weight-loss" => Some(Goal::WeightLoss),
            "maintenance" => Some(Goal::Maintenance),
            "muscle-gain" => Some(Goal::MuscleGain),
            _ => None,
        }
    }
}

/// Dietary preference flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietPreference {
    Vegan,
    NonVegan,
}

impl DietPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietPreference::Vegan => "vegan",
            DietPreference::NonVegan => "non-vegan",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "vegan" => Some(DietPreference::Vegan),
            "non-vegan" => Some(DietPreference::NonVegan),
            _ => None,
        }
    }
}

/// Self-reported daily activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Intense,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Intense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Intense => "intense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "intense" => Some(ActivityLevel::Intense),
            _ => None,
        }
    }
}

/// Available workout time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutTime {
    #[serde(rename = "15-30")]
    Short,
    #[serde(rename = "30-45")]
    Medium,
    #[serde(rename = "45-60")]
    Long,
    #[serde(rename = "60+")]
    Extended,
}

impl WorkoutTime {
    pub const ALL: [WorkoutTime; 4] = [
        WorkoutTime::Short,
        WorkoutTime::Medium,
        WorkoutTime::Long,
        WorkoutTime::Extended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutTime::Short => "15-30",
            WorkoutTime::Medium => "30-45",
            WorkoutTime::Long => "45-60",
            WorkoutTime::Extended => "60+",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "15-30" => Some(WorkoutTime::Short),
            "30-45" => Some(WorkoutTime::Medium),
            "45-60" => Some(WorkoutTime::Long),
            "60+" => Some(WorkoutTime::Extended),
            _ => None,
        }
    }

    /// Representative session length for the bucket
    pub fn minutes(&self) -> u32 {
        match self {
            WorkoutTime::Short => 22,
            WorkoutTime::Medium => 37,
            WorkoutTime::Long => 52,
            WorkoutTime::Extended => 75,
        }
    }
}

/// A user's static profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: Goal,
    pub diet_preference: DietPreference,
    pub activity_level: ActivityLevel,
    pub workout_time: WorkoutTime,
}

/// Raw profile fields as they arrive from a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileCreate {
    pub age: u32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: String,
    pub diet_preference: String,
    pub activity_level: String,
    pub workout_time: String,
}

impl UserProfileCreate {
    /// Parse and validate every field
    pub fn into_profile(self) -> Result<UserProfile, InvalidProfileError> {
        let profile = UserProfile {
            age: self.age,
            gender: Gender::from_str(&self.gender)
                .ok_or(InvalidProfileError::UnknownGender(self.gender))?,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            goal: Goal::from_str(&self.goal).ok_or(InvalidProfileError::UnknownGoal(self.goal))?,
            diet_preference: DietPreference::from_str(&self.diet_preference)
                .ok_or(InvalidProfileError::UnknownDietPreference(self.diet_preference))?,
            activity_level: ActivityLevel::from_str(&self.activity_level)
                .ok_or(InvalidProfileError::UnknownActivityLevel(self.activity_level))?,
            workout_time: WorkoutTime::from_str(&self.workout_time)
                .ok_or(InvalidProfileError::UnknownWorkoutTime(self.workout_time))?,
        };
        profile.validate()?;
        Ok(profile)
    }
}

impl UserProfile {
    /// Check the numeric ranges the enums cannot express
    pub fn validate(&self) -> Result<(), InvalidProfileError> {
        if self.age == 0 || self.age > MAX_AGE {
            return Err(InvalidProfileError::AgeOutOfRange(self.age));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(InvalidProfileError::InvalidHeight(self.height_cm));
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(InvalidProfileError::InvalidWeight(self.weight_kg));
        }
        Ok(())
    }

    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let profile = UserProfileCreate {
            age: row.get("age")?,
            gender: row.get("gender")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            goal: row.get("goal")?,
            diet_preference: row.get("diet_preference")?,
            activity_level: row.get("activity_level")?,
            workout_time: row.get("workout_time")?,
        };
        profile
            .into_profile()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
    }

    /// Get the stored profile for a user
    pub fn get(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or update a user's profile (upsert)
    pub fn save(conn: &Connection, user_id: i64, profile: &UserProfile) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profiles
            (user_id, age, gender, height_cm, weight_kg, goal, diet_preference, activity_level, workout_time)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(user_id) DO UPDATE SET
                age = excluded.age,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                goal = excluded.goal,
                diet_preference = excluded.diet_preference,
                activity_level = excluded.activity_level,
                workout_time = excluded.workout_time,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                profile.age,
                profile.gender.as_str(),
                profile.height_cm,
                profile.weight_kg,
                profile.goal.as_str(),
                profile.diet_preference.as_str(),
                profile.activity_level.as_str(),
                profile.workout_time.as_str(),
            ],
        )?;

        Self::get(conn, user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }
}
