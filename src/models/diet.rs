//! Diet plan model
//!
//! A day's calorie target, macro split, and one item per main meal. Stored
//! flattened as one row per food item so a regenerated plan replaces the
//! whole day.

use std::collections::BTreeMap;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Main meals a plan covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            _ => None,
        }
    }

    /// Share of the daily calorie target given to this meal
    pub fn calorie_share(&self) -> f64 {
        match self {
            MealType::Breakfast => 0.25,
            MealType::Lunch => 0.35,
            MealType::Dinner => 0.40,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

/// Which path produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    /// Validated output of the generative service
    Generated,
    /// Local rule-based fallback
    RuleBased,
}

impl PlanSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanSource::Generated => "generated",
            PlanSource::RuleBased => "rule_based",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "generated" => PlanSource::Generated,
            _ => PlanSource::RuleBased,
        }
    }
}

/// Daily macro targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

impl MacroSplit {
    /// Energy represented by the split (4/4/9 kcal per gram)
    pub fn calories(&self) -> u32 {
        self.protein_g * 4 + self.carbs_g * 4 + self.fat_g * 9
    }
}

/// A single selected meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub name: String,
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    /// Suggested time of day, when the generator provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// A complete diet plan for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    pub target_calories: u32,
    pub macros: MacroSplit,
    pub meals: BTreeMap<MealType, MealItem>,
    pub recommendations: String,
    pub source: PlanSource,
}

/// One stored food item row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietPlanEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub meal_type: MealType,
    pub food_item: String,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub created_at: String,
}

/// Stored per-day target header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietTarget {
    pub target_calories: u32,
    pub macros: MacroSplit,
    pub recommendations: String,
    pub source: PlanSource,
}

/// Summed macros over a day's rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietTotals {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// A stored day with meals grouped by type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietDay {
    pub user_id: i64,
    pub date: String,
    pub target: Option<DietTarget>,
    pub meals: BTreeMap<MealType, Vec<DietPlanEntry>>,
    pub totals: DietTotals,
}

impl DietPlanEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        let meal_type = MealType::from_str(&meal_type_str).unwrap_or(MealType::Dinner);

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            meal_type,
            food_item: row.get("food_item")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            created_at: row.get("created_at")?,
        })
    }

    /// List a user's rows for one date
    pub fn list_for_day(conn: &Connection, user_id: i64, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM diet_plans WHERE user_id = ?1 AND date = ?2 ORDER BY meal_type, id",
        )?;
        let entries = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

impl DietPlan {
    /// Replace everything stored for the user and date with this plan.
    ///
    /// Runs delete-then-insert in one transaction. Returns the number of food
    /// item rows written.
    pub fn replace_for_day(
        &self,
        conn: &mut Connection,
        user_id: i64,
        date: &str,
    ) -> DbResult<usize> {
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM diet_plans WHERE user_id = ?1 AND date = ?2",
            params![user_id, date],
        )?;
        tx.execute(
            "DELETE FROM diet_targets WHERE user_id = ?1 AND date = ?2",
            params![user_id, date],
        )?;

        let mut written = 0;
        for (meal_type, item) in &self.meals {
            tx.execute(
                r#"
                INSERT INTO diet_plans (user_id, date, meal_type, food_item, calories, protein, carbs, fat)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    user_id,
                    date,
                    meal_type.as_str(),
                    item.name,
                    item.calories,
                    item.protein_g,
                    item.carbs_g,
                    item.fat_g,
                ],
            )?;
            written += 1;
        }

        tx.execute(
            r#"
            INSERT INTO diet_targets (user_id, date, target_calories, protein, carbs, fat, recommendations, source)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                user_id,
                date,
                self.target_calories,
                self.macros.protein_g,
                self.macros.carbs_g,
                self.macros.fat_g,
                self.recommendations,
                self.source.as_str(),
            ],
        )?;

        tx.commit()?;
        Ok(written)
    }
}

impl DietTarget {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let source: String = row.get("source")?;
        Ok(Self {
            target_calories: row.get("target_calories")?,
            macros: MacroSplit {
                protein_g: row.get("protein")?,
                carbs_g: row.get("carbs")?,
                fat_g: row.get("fat")?,
            },
            recommendations: row.get("recommendations")?,
            source: PlanSource::from_str(&source),
        })
    }

    pub fn get(conn: &Connection, user_id: i64, date: &str) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM diet_targets WHERE user_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![user_id, date], Self::from_row);
        match result {
            Ok(target) => Ok(Some(target)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl DietDay {
    /// Load a stored day, or None if nothing was generated for it
    pub fn get(conn: &Connection, user_id: i64, date: &str) -> DbResult<Option<Self>> {
        let entries = DietPlanEntry::list_for_day(conn, user_id, date)?;
        let target = DietTarget::get(conn, user_id, date)?;

        if entries.is_empty() && target.is_none() {
            return Ok(None);
        }

        let mut totals = DietTotals::default();
        let mut meals: BTreeMap<MealType, Vec<DietPlanEntry>> = BTreeMap::new();
        for entry in entries {
            totals.calories = totals.calories.saturating_add(entry.calories);
            totals.protein = totals.protein.saturating_add(entry.protein);
            totals.carbs = totals.carbs.saturating_add(entry.carbs);
            totals.fat = totals.fat.saturating_add(entry.fat);
            meals.entry(entry.meal_type).or_default().push(entry);
        }

        Ok(Some(Self {
            user_id,
            date: date.to_string(),
            target,
            meals,
            totals,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};

    fn sample_plan(name_suffix: &str) -> DietPlan {
        let mut meals = BTreeMap::new();
        for meal_type in MealType::ALL {
            meals.insert(
                meal_type,
                MealItem {
                    name: format!("{} {}", meal_type.display_name(), name_suffix),
                    calories: 500,
                    protein_g: 30,
                    carbs_g: 50,
                    fat_g: 15,
                    time: None,
                },
            );
        }
        DietPlan {
            target_calories: 2000,
            macros: MacroSplit { protein_g: 125, carbs_g: 225, fat_g: 66 },
            meals,
            recommendations: String::new(),
            source: PlanSource::RuleBased,
        }
    }

    #[test]
    fn test_meal_shares_sum_to_one() {
        let total: f64 = MealType::ALL.iter().map(|m| m.calorie_share()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_meals_serialize_keyed_by_type() {
        let json = serde_json::to_value(sample_plan("a")).unwrap();
        assert!(json["meals"]["breakfast"].is_object());
        assert!(json["meals"]["lunch"].is_object());
        assert!(json["meals"]["dinner"].is_object());
        assert_eq!(json["source"], "rule_based");
    }

    #[test]
    fn test_replace_for_day_deletes_prior_rows() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn_mut(|conn| {
            migrations::run_migrations(conn)?;

            let written = sample_plan("first").replace_for_day(conn, 1, "2026-01-15")?;
            assert_eq!(written, 3);
            sample_plan("second").replace_for_day(conn, 1, "2026-01-15")?;
            sample_plan("other").replace_for_day(conn, 2, "2026-01-15")?;

            let day = DietDay::get(conn, 1, "2026-01-15")?.unwrap();
            let rows: Vec<_> = day.meals.values().flatten().collect();
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.food_item.ends_with("second")));
            assert_eq!(day.totals.calories, 1500);
            assert_eq!(day.target.unwrap().target_calories, 2000);

            assert!(DietDay::get(conn, 1, "2026-01-16")?.is_none());
            Ok(())
        })
        .unwrap();
    }
}
