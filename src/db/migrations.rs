//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    if current_version < 2 {
        migrate_v2(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (2)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILES
        -- One row per user, replaced on every save
        -- ============================================
        CREATE TABLE user_profiles (
            user_id INTEGER PRIMARY KEY,
            age INTEGER NOT NULL CHECK(age BETWEEN 1 AND 120),
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),
            height_cm REAL NOT NULL CHECK(height_cm > 0),
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),
            goal TEXT NOT NULL CHECK(goal IN ('weight-loss', 'maintenance', 'muscle-gain')),
            diet_preference TEXT NOT NULL CHECK(diet_preference IN ('vegan', 'non-vegan')),
            activity_level TEXT NOT NULL CHECK(activity_level IN ('sedentary', 'light', 'moderate', 'intense')),
            workout_time TEXT NOT NULL CHECK(workout_time IN ('15-30', '30-45', '45-60', '60+')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- DIET PLANS
        -- One row per food item per day
        -- ============================================
        CREATE TABLE diet_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,                  -- YYYY-MM-DD
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner')),
            food_item TEXT NOT NULL,
            calories INTEGER NOT NULL DEFAULT 0,
            protein INTEGER NOT NULL DEFAULT 0,  -- grams
            carbs INTEGER NOT NULL DEFAULT 0,    -- grams
            fat INTEGER NOT NULL DEFAULT 0,      -- grams
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_diet_plans_user_date ON diet_plans(user_id, date);

        -- Daily target and macros for a generated diet plan
        CREATE TABLE diet_targets (
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            target_calories INTEGER NOT NULL,
            protein INTEGER NOT NULL,
            carbs INTEGER NOT NULL,
            fat INTEGER NOT NULL,
            recommendations TEXT NOT NULL DEFAULT '',
            source TEXT NOT NULL CHECK(source IN ('generated', 'rule_based')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, date)
        );

        -- ============================================
        -- WORKOUT PLANS
        -- One row per exercise per day
        -- ============================================
        CREATE TABLE workout_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            workout_name TEXT NOT NULL,
            exercise_name TEXT NOT NULL,
            sets INTEGER NOT NULL,
            reps TEXT NOT NULL,                  -- count or description ("30 sec")
            duration INTEGER NOT NULL,           -- minutes
            calories_burned INTEGER NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workout_plans_user_date ON workout_plans(user_id, date);
        "#,
    )?;

    Ok(())
}

/// Migration v2: daily progress logs
fn migrate_v2(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- One row per user per day, merged on every log
        CREATE TABLE daily_logs (
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,                  -- YYYY-MM-DD
            weight_kg REAL CHECK(weight_kg IS NULL OR weight_kg > 0),
            calories_consumed INTEGER CHECK(calories_consumed IS NULL OR calories_consumed >= 0),
            calories_burned INTEGER CHECK(calories_burned IS NULL OR calories_burned >= 0),
            workouts_completed INTEGER CHECK(workouts_completed IS NULL OR workouts_completed >= 0),
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, date)
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}
