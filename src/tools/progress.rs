//! Progress MCP Tools
//!
//! Daily logs of weight, calories, and workouts, the series over recent days,
//! and a one-day dashboard comparing the stored plans with what was logged.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::engine::energy;
use crate::models::{DailyLog, DailyLogUpdate, DietDay, UserProfile, WorkoutDay};
use crate::tools::plans::resolve_date;

/// Longest series `get_progress` returns
pub const MAX_PROGRESS_DAYS: u32 = 365;

pub const DEFAULT_PROGRESS_DAYS: u32 = 30;

// ============================================================================
// Response Structs
// ============================================================================

/// One day of the series. Days without a log carry only the date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub date: String,
    pub logged: bool,
    pub weight_kg: Option<f64>,
    pub calories_consumed: Option<u32>,
    pub calories_burned: Option<u32>,
    pub workouts_completed: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ProgressSeries {
    pub user_id: i64,
    pub from: String,
    pub to: String,
    pub logged_days: usize,
    /// Last logged weight minus the first, when two or more weights exist
    pub weight_change_kg: Option<f64>,
    pub average_calories_consumed: Option<u32>,
    pub average_calories_burned: Option<u32>,
    pub points: Vec<ProgressPoint>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub user_id: i64,
    pub date: String,
    /// Stored diet target for the day, else the profile's target
    pub calories_target: Option<u32>,
    /// Sum of the day's planned meals
    pub calories_planned: u32,
    pub calories_consumed: u32,
    pub calories_remaining: Option<i64>,
    /// Logged burn, else the planned workout's estimate
    pub calories_burned: u32,
    pub workouts_planned: usize,
    /// Logged count, else exercises marked complete
    pub workouts_completed: usize,
    pub weight_kg: Option<f64>,
    pub logged: bool,
}

// ============================================================================
// Tools
// ============================================================================

/// Record (or merge into) the log for a day
pub fn log_progress(
    db: &Database,
    user_id: i64,
    date: Option<&str>,
    update: DailyLogUpdate,
) -> Result<DailyLog, String> {
    let date = resolve_date(date)?;

    if update.is_empty() {
        return Err("Nothing to log. Provide weight_kg, calories, workouts_completed, or notes.".to_string());
    }
    if let Some(weight) = update.weight_kg {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(format!("weight_kg must be a positive number, got {}", weight));
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let log = DailyLog::upsert(&conn, user_id, &date, &update)
        .map_err(|e| format!("Failed to log progress: {}", e))?;

    info!(user_id, date = %date, "Logged progress");
    Ok(log)
}

/// The `days` days ending on `end` (default today), one point per day
pub fn get_progress(
    db: &Database,
    user_id: i64,
    days: Option<u32>,
    end: Option<&str>,
) -> Result<ProgressSeries, String> {
    let days = days.unwrap_or(DEFAULT_PROGRESS_DAYS);
    if days == 0 || days > MAX_PROGRESS_DAYS {
        return Err(format!("days must be between 1 and {}, got {}", MAX_PROGRESS_DAYS, days));
    }

    let to = resolve_date(end)?;
    let to_date = NaiveDate::parse_from_str(&to, "%Y-%m-%d").map_err(|e| e.to_string())?;
    let from_date = to_date
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .ok_or_else(|| format!("Range of {} days before {} is out of bounds", days, to))?;
    let from = from_date.format("%Y-%m-%d").to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let logs = DailyLog::list_range(&conn, user_id, &from, &to)
        .map_err(|e| format!("Failed to get progress: {}", e))?;

    let weights: Vec<f64> = logs.iter().filter_map(|l| l.weight_kg).collect();
    let weight_change_kg = match (weights.first(), weights.last()) {
        (Some(first), Some(last)) if weights.len() > 1 => Some(((last - first) * 10.0).round() / 10.0),
        _ => None,
    };
    let average_calories_consumed = average(logs.iter().filter_map(|l| l.calories_consumed));
    let average_calories_burned = average(logs.iter().filter_map(|l| l.calories_burned));
    let logged_days = logs.len();

    let mut by_date: BTreeMap<String, DailyLog> =
        logs.into_iter().map(|l| (l.date.clone(), l)).collect();
    let points = from_date
        .iter_days()
        .take(days as usize)
        .map(|day| {
            let date = day.format("%Y-%m-%d").to_string();
            match by_date.remove(&date) {
                Some(log) => ProgressPoint {
                    date,
                    logged: true,
                    weight_kg: log.weight_kg,
                    calories_consumed: log.calories_consumed,
                    calories_burned: log.calories_burned,
                    workouts_completed: log.workouts_completed,
                },
                None => ProgressPoint {
                    date,
                    logged: false,
                    weight_kg: None,
                    calories_consumed: None,
                    calories_burned: None,
                    workouts_completed: None,
                },
            }
        })
        .collect();

    Ok(ProgressSeries {
        user_id,
        from,
        to,
        logged_days,
        weight_change_kg,
        average_calories_consumed,
        average_calories_burned,
        points,
    })
}

/// Planned vs logged numbers for one day (default today)
pub fn dashboard_stats(db: &Database, user_id: i64, date: Option<&str>) -> Result<DashboardStats, String> {
    let date = resolve_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let diet = DietDay::get(&conn, user_id, &date).map_err(|e| format!("Failed to get diet plan: {}", e))?;
    let workout =
        WorkoutDay::get(&conn, user_id, &date).map_err(|e| format!("Failed to get workout plan: {}", e))?;
    let log = DailyLog::get(&conn, user_id, &date).map_err(|e| format!("Failed to get progress: {}", e))?;
    let profile = UserProfile::get(&conn, user_id).map_err(|e| format!("Failed to get profile: {}", e))?;
    let latest_weight = DailyLog::latest_weight(&conn, user_id, &date)
        .map_err(|e| format!("Failed to get progress: {}", e))?;

    let calories_target = diet
        .as_ref()
        .and_then(|d| d.target.as_ref().map(|t| t.target_calories))
        .or_else(|| profile.as_ref().map(energy::target_calories_for));
    let calories_consumed = log.as_ref().and_then(|l| l.calories_consumed).unwrap_or(0);

    Ok(DashboardStats {
        user_id,
        calories_target,
        calories_planned: diet.as_ref().map_or(0, |d| d.totals.calories),
        calories_consumed,
        calories_remaining: calories_target.map(|t| i64::from(t) - i64::from(calories_consumed)),
        calories_burned: log
            .as_ref()
            .and_then(|l| l.calories_burned)
            .unwrap_or_else(|| workout.as_ref().map_or(0, |w| w.total_calories)),
        workouts_planned: workout.as_ref().map_or(0, |w| w.exercises.len()),
        workouts_completed: log
            .as_ref()
            .and_then(|l| l.workouts_completed)
            .map(|n| n as usize)
            .unwrap_or_else(|| workout.as_ref().map_or(0, |w| w.completed_count)),
        weight_kg: latest_weight.or_else(|| profile.as_ref().map(|p| p.weight_kg)),
        logged: log.is_some(),
        date,
    })
}

fn average(values: impl Iterator<Item = u32>) -> Option<u32> {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        return None;
    }
    u32::try_from((sum as f64 / count as f64).round() as u64).ok()
}
