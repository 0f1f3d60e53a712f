//! Daily progress log model
//!
//! One row per user per day. Logging the same day again merges: fields left
//! out keep their stored value.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// What the user logged for a day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLogUpdate {
    pub weight_kg: Option<f64>,
    pub calories_consumed: Option<u32>,
    pub calories_burned: Option<u32>,
    pub workouts_completed: Option<u32>,
    pub notes: Option<String>,
}

impl DailyLogUpdate {
    pub fn is_empty(&self) -> bool {
        self.weight_kg.is_none()
            && self.calories_consumed.is_none()
            && self.calories_burned.is_none()
            && self.workouts_completed.is_none()
            && self.notes.is_none()
    }
}

/// Stored log for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLog {
    pub user_id: i64,
    pub date: String,
    pub weight_kg: Option<f64>,
    pub calories_consumed: Option<u32>,
    pub calories_burned: Option<u32>,
    pub workouts_completed: Option<u32>,
    pub notes: Option<String>,
    pub updated_at: String,
}

impl DailyLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            calories_consumed: row.get("calories_consumed")?,
            calories_burned: row.get("calories_burned")?,
            workouts_completed: row.get("workouts_completed")?,
            notes: row.get("notes")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn get(conn: &Connection, user_id: i64, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_logs WHERE user_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![user_id, date], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert the day's log or merge into the existing one
    pub fn upsert(
        conn: &Connection,
        user_id: i64,
        date: &str,
        update: &DailyLogUpdate,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO daily_logs
            (user_id, date, weight_kg, calories_consumed, calories_burned, workouts_completed, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id, date) DO UPDATE SET
                weight_kg = COALESCE(excluded.weight_kg, weight_kg),
                calories_consumed = COALESCE(excluded.calories_consumed, calories_consumed),
                calories_burned = COALESCE(excluded.calories_burned, calories_burned),
                workouts_completed = COALESCE(excluded.workouts_completed, workouts_completed),
                notes = COALESCE(excluded.notes, notes),
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                date,
                update.weight_kg,
                update.calories_consumed,
                update.calories_burned,
                update.workouts_completed,
                update.notes,
            ],
        )?;

        Self::get(conn, user_id, date)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Logs with `from <= date <= to`, oldest first
    pub fn list_range(conn: &Connection, user_id: i64, from: &str, to: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_logs WHERE user_id = ?1 AND date >= ?2 AND date <= ?3 ORDER BY date",
        )?;

        let logs = stmt
            .query_map(params![user_id, from, to], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Most recent logged weight on or before `date`
    pub fn latest_weight(conn: &Connection, user_id: i64, date: &str) -> DbResult<Option<f64>> {
        let result = conn.query_row(
            "SELECT weight_kg FROM daily_logs
             WHERE user_id = ?1 AND date <= ?2 AND weight_kg IS NOT NULL
             ORDER BY date DESC LIMIT 1",
            params![user_id, date],
            |row| row.get(0),
        );
        match result {
            Ok(weight) => Ok(Some(weight)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
