//! Profile MCP Tools
//!
//! Save and read the user profile that every recommendation is computed from.

use serde::Serialize;

use crate::db::Database;
use crate::engine::{energy, fitness};
use crate::models::{FitnessLevel, UserProfile, UserProfileCreate};

/// Profile plus the numbers the rule-based engine derives from it
#[derive(Debug, Serialize)]
pub struct ProfileDetail {
    pub user_id: i64,
    pub profile: UserProfile,
    pub bmi: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: u32,
    pub fitness_level: FitnessLevel,
    pub workout_minutes: u32,
}

impl ProfileDetail {
    fn new(user_id: i64, profile: UserProfile) -> Self {
        let bmr = energy::compute_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
        let tdee = energy::compute_tdee(bmr, profile.activity_level);

        Self {
            user_id,
            bmi: round1(energy::compute_bmi(profile.weight_kg, profile.height_cm)),
            bmr: round1(bmr),
            tdee: round1(tdee),
            target_calories: energy::compute_target_calories(tdee, profile.goal),
            fitness_level: fitness::resolve(profile.activity_level),
            workout_minutes: profile.workout_time.minutes(),
            profile,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Validate and store a profile, replacing any previous one for the user
pub fn save_profile(db: &Database, user_id: i64, data: UserProfileCreate) -> Result<ProfileDetail, String> {
    let profile = data.into_profile().map_err(|e| format!("Invalid profile: {}", e))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let saved = UserProfile::save(&conn, user_id, &profile)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    Ok(ProfileDetail::new(user_id, saved))
}

pub fn get_profile(db: &Database, user_id: i64) -> Result<Option<ProfileDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;

    Ok(profile.map(|p| ProfileDetail::new(user_id, p)))
}

/// Stored profile or a message telling the caller to save one first
pub fn require_profile(db: &Database, user_id: i64) -> Result<UserProfile, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("No profile for user {}. Call save_profile first.", user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        db
    }

    fn raw() -> UserProfileCreate {
        UserProfileCreate {
            age: 28,
            gender: "male".to_string(),
            height_cm: 175.0,
            weight_kg: 75.0,
            goal: "weight-loss".to_string(),
            diet_preference: "non-vegan".to_string(),
            activity_level: "moderate".to_string(),
            workout_time: "30-45".to_string(),
        }
    }

    #[test]
    fn test_save_and_get_profile() {
        let db = test_db();

        let saved = save_profile(&db, 1, raw()).unwrap();
        assert_eq!(saved.target_calories, 2113);
        assert_eq!(saved.bmr, 1703.8);
        assert_eq!(saved.bmi, 24.5);
        assert_eq!(saved.fitness_level, FitnessLevel::Intermediate);
        assert_eq!(saved.workout_minutes, 37);

        let mut update = raw();
        update.weight_kg = 72.0;
        save_profile(&db, 1, update).unwrap();

        let loaded = get_profile(&db, 1).unwrap().unwrap();
        assert_eq!(loaded.profile.weight_kg, 72.0);
        assert!(get_profile(&db, 2).unwrap().is_none());
    }

    #[test]
    fn test_invalid_profile_is_not_stored() {
        let db = test_db();
        let mut bad = raw();
        bad.goal = "bulk".to_string();

        let err = save_profile(&db, 1, bad).unwrap_err();
        assert!(err.contains("unknown goal 'bulk'"));
        assert!(require_profile(&db, 1).unwrap_err().contains("save_profile"));
    }
}
