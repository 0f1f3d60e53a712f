//! Response validation
//!
//! Generator answers are free text that should hold one JSON object. The text
//! may be wrapped in markdown fences or surrounded by prose; the outermost
//! `{ ... }` is taken and checked against a typed schema before it is turned
//! into an engine type.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::ExternalServiceError;
use crate::engine::burn::MIN_BURN_CALORIES;
use crate::models::{
    DietPlan, FitnessLevel, MacroSplit, MealItem, MealType, PlanSource, Reps, WorkoutExercise,
    WorkoutPlan,
};

/// Strip code fences and cut the text down to its outermost JSON object
pub fn extract_json(text: &str) -> Result<&str, ExternalServiceError> {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&body[start..=end]),
        _ => Err(ExternalServiceError::MalformedJson(
            "no JSON object in response".to_string(),
        )),
    }
}

fn parse_object<T: DeserializeOwned>(text: &str) -> Result<T, ExternalServiceError> {
    let json = extract_json(text)?;
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ExternalServiceError::MalformedJson(e.to_string()))?;

    serde_json::from_value(value).map_err(|e| ExternalServiceError::InvalidField {
        field: "response",
        reason: e.to_string(),
    })
}

/// Non-negative whole number from a JSON number
fn whole(field: &'static str, value: f64) -> Result<u32, ExternalServiceError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ExternalServiceError::InvalidField {
            field,
            reason: format!("expected a non-negative number, got {}", value),
        });
    }
    Ok(value.round().min(f64::from(u32::MAX)) as u32)
}

/// Sum that rejects the answer instead of overflowing
fn checked_total(
    field: &'static str,
    mut values: impl Iterator<Item = u32>,
) -> Result<u32, ExternalServiceError> {
    values
        .try_fold(0u32, u32::checked_add)
        .ok_or_else(|| ExternalServiceError::InvalidField {
            field,
            reason: "total does not fit in 32 bits".to_string(),
        })
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ExternalServiceError> {
    value.ok_or(ExternalServiceError::MissingField(field))
}

fn non_empty(field: &'static str, value: Option<String>) -> Result<String, ExternalServiceError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(ExternalServiceError::InvalidField { field, reason: "empty".to_string() }),
        None => Err(ExternalServiceError::MissingField(field)),
    }
}

// ============================================================================
// Diet
// ============================================================================

#[derive(Debug, Deserialize)]
struct DietResponse {
    target_calories: Option<f64>,
    macros: Option<MacrosResponse>,
    meal_plan: Option<MealPlanResponse>,
    #[serde(default)]
    recommendations: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MacrosResponse {
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MealPlanResponse {
    breakfast: Option<MealResponse>,
    lunch: Option<MealResponse>,
    dinner: Option<MealResponse>,
}

#[derive(Debug, Deserialize)]
struct MealResponse {
    name: Option<String>,
    calories: Option<f64>,
    #[serde(default)]
    protein: f64,
    #[serde(default)]
    carbs: f64,
    #[serde(default)]
    fat: f64,
    #[serde(default)]
    time: Option<String>,
}

impl MealResponse {
    fn into_item(self) -> Result<MealItem, ExternalServiceError> {
        Ok(MealItem {
            name: non_empty("meal_plan.name", self.name)?,
            calories: whole("meal_plan.calories", required("meal_plan.calories", self.calories)?)?,
            protein_g: whole("meal_plan.protein", self.protein)?,
            carbs_g: whole("meal_plan.carbs", self.carbs)?,
            fat_g: whole("meal_plan.fat", self.fat)?,
            time: self.time.filter(|t| !t.trim().is_empty()),
        })
    }
}

/// Validate a diet answer
pub fn parse_diet(text: &str) -> Result<DietPlan, ExternalServiceError> {
    let response: DietResponse = parse_object(text)?;

    let target_calories = whole("target_calories", required("target_calories", response.target_calories)?)?;
    if target_calories == 0 {
        return Err(ExternalServiceError::InvalidField {
            field: "target_calories",
            reason: "must be positive".to_string(),
        });
    }

    let macros = required("macros", response.macros)?;
    let macros = MacroSplit {
        protein_g: whole("macros.protein", required("macros.protein", macros.protein)?)?,
        carbs_g: whole("macros.carbs", required("macros.carbs", macros.carbs)?)?,
        fat_g: whole("macros.fat", required("macros.fat", macros.fat)?)?,
    };

    let plan = required("meal_plan", response.meal_plan)?;
    let mut meals = BTreeMap::new();
    meals.insert(MealType::Breakfast, required("meal_plan.breakfast", plan.breakfast)?.into_item()?);
    meals.insert(MealType::Lunch, required("meal_plan.lunch", plan.lunch)?.into_item()?);
    meals.insert(MealType::Dinner, required("meal_plan.dinner", plan.dinner)?.into_item()?);

    Ok(DietPlan {
        target_calories,
        macros,
        meals,
        recommendations: response.recommendations.unwrap_or_default(),
        source: PlanSource::Generated,
    })
}

// ============================================================================
// Workout
// ============================================================================

#[derive(Debug, Deserialize)]
struct WorkoutResponse {
    name: Option<String>,
    workout_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    duration: Option<f64>,
    total_duration: Option<f64>,
    #[serde(default)]
    difficulty: Option<String>,
    exercises: Option<Vec<ExerciseResponse>>,
    #[serde(default)]
    equipment_needed: Vec<String>,
    #[serde(default)]
    tips: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExerciseResponse {
    name: Option<String>,
    sets: Option<f64>,
    reps: Option<RepsResponse>,
    duration: Option<f64>,
    calories: Option<f64>,
    #[serde(default)]
    instructions: String,
    #[serde(default)]
    muscle_groups: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepsResponse {
    Number(f64),
    Text(String),
}

impl ExerciseResponse {
    fn into_exercise(self) -> Result<WorkoutExercise, ExternalServiceError> {
        let reps = match required("exercises.reps", self.reps)? {
            RepsResponse::Number(n) => Reps::Count(whole("exercises.reps", n)?),
            RepsResponse::Text(s) => Reps::parse(&s),
        };

        Ok(WorkoutExercise {
            name: non_empty("exercises.name", self.name)?,
            sets: whole("exercises.sets", required("exercises.sets", self.sets)?)?,
            reps,
            duration_minutes: whole("exercises.duration", required("exercises.duration", self.duration)?)?,
            calories: whole("exercises.calories", required("exercises.calories", self.calories)?)?,
            muscle_groups: self.muscle_groups,
            instructions: self.instructions,
        })
    }
}

/// Validate a workout answer. Accepts `name` or `workout_name` and `duration`
/// or `total_duration`. Missing duration is the exercise total, missing
/// difficulty is `default_difficulty`, and the calorie total is always
/// recomputed from the exercises.
pub fn parse_workout(
    text: &str,
    default_difficulty: FitnessLevel,
) -> Result<WorkoutPlan, ExternalServiceError> {
    let response: WorkoutResponse = parse_object(text)?;

    let name = non_empty("name", response.name.or(response.workout_name))?;

    let exercises = required("exercises", response.exercises)?;
    if exercises.is_empty() {
        return Err(ExternalServiceError::InvalidField {
            field: "exercises",
            reason: "empty".to_string(),
        });
    }
    let exercises = exercises
        .into_iter()
        .map(ExerciseResponse::into_exercise)
        .collect::<Result<Vec<_>, _>>()?;

    let duration_minutes = match response.duration.or(response.total_duration) {
        Some(d) => whole("duration", d)?,
        None => checked_total("exercises.duration", exercises.iter().map(|e| e.duration_minutes))?,
    };
    let estimated_calories =
        checked_total("exercises.calories", exercises.iter().map(|e| e.calories))?;

    let difficulty = response
        .difficulty
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| default_difficulty.as_str().to_string());

    Ok(WorkoutPlan {
        name,
        duration_minutes,
        difficulty,
        estimated_calories,
        exercises,
        description: response.description.unwrap_or_default(),
        equipment_needed: response.equipment_needed,
        tips: response.tips.unwrap_or_default(),
        source: PlanSource::Generated,
    })
}

// ============================================================================
// Calorie burn
// ============================================================================

#[derive(Debug, Deserialize)]
struct BurnResponse {
    calories_burned: Option<f64>,
}

/// Validate a calorie answer: floored and never below the estimator minimum
pub fn parse_burn(text: &str) -> Result<u32, ExternalServiceError> {
    let response: BurnResponse = parse_object(text)?;
    let calories = required("calories_burned", response.calories_burned)?;
    if !calories.is_finite() {
        return Err(ExternalServiceError::InvalidField {
            field: "calories_burned",
            reason: "not a finite number".to_string(),
        });
    }

    let floored = calories.floor().clamp(0.0, f64::from(u32::MAX)) as u32;
    Ok(floored.max(MIN_BURN_CALORIES))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIET: &str = r#"{
        "target_calories": 2100,
        "macros": {"protein": 157.5, "carbs": 183, "fat": 81},
        "meal_plan": {
            "breakfast": {"name": "Veggie omelette", "calories": 525, "protein": 30, "carbs": 40, "fat": 20, "time": "8:00 AM"},
            "lunch": {"name": "Chicken salad", "calories": 735},
            "dinner": {"name": "Salmon bowl", "calories": 840, "protein": 45, "carbs": 60, "fat": 30}
        },
        "recommendations": "Drink 2-3 liters of water."
    }"#;

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json("{\"a\":1}").unwrap(), "{\"a\":1}");
        assert_eq!(extract_json("```json\n{\"a\":1}\n```").unwrap(), "{\"a\":1}");
        assert_eq!(extract_json("```\n{\"a\":1}\n```").unwrap(), "{\"a\":1}");
        assert_eq!(
            extract_json("Here is your plan: {\"a\": {\"b\": 2}} Enjoy!").unwrap(),
            "{\"a\": {\"b\": 2}}"
        );
        assert!(matches!(extract_json("no json here"), Err(ExternalServiceError::MalformedJson(_))));
        assert!(matches!(extract_json("} {"), Err(ExternalServiceError::MalformedJson(_))));
    }

    #[test]
    fn test_parse_diet() {
        let plan = parse_diet(&format!("```json\n{}\n```", DIET)).unwrap();
        assert_eq!(plan.target_calories, 2100);
        assert_eq!(plan.macros, MacroSplit { protein_g: 158, carbs_g: 183, fat_g: 81 });
        assert_eq!(plan.source, PlanSource::Generated);

        let breakfast = &plan.meals[&MealType::Breakfast];
        assert_eq!(breakfast.time.as_deref(), Some("8:00 AM"));

        let lunch = &plan.meals[&MealType::Lunch];
        assert_eq!(lunch.calories, 735);
        assert_eq!((lunch.protein_g, lunch.carbs_g, lunch.fat_g), (0, 0, 0));
        assert_eq!(lunch.time, None);
    }

    #[test]
    fn test_parse_diet_missing_fields() {
        assert_eq!(
            parse_diet(r#"{"macros": {"protein": 1, "carbs": 1, "fat": 1}}"#).unwrap_err(),
            ExternalServiceError::MissingField("target_calories")
        );

        let no_dinner = DIET.replace(
            r#""dinner": {"name": "Salmon bowl", "calories": 840, "protein": 45, "carbs": 60, "fat": 30}"#,
            r#""snack": {"name": "Apple", "calories": 80}"#,
        );
        assert_eq!(
            parse_diet(&no_dinner).unwrap_err(),
            ExternalServiceError::MissingField("meal_plan.dinner")
        );

        let no_calories = DIET.replace(r#""calories": 735"#, r#""protein": 12"#);
        assert_eq!(
            parse_diet(&no_calories).unwrap_err(),
            ExternalServiceError::MissingField("meal_plan.calories")
        );
    }

    #[test]
    fn test_parse_diet_bad_json() {
        assert!(matches!(
            parse_diet("{\"target_calories\": 2000,"),
            Err(ExternalServiceError::MalformedJson(_))
        ));
        assert!(matches!(
            parse_diet(r#"{"target_calories": "lots"}"#),
            Err(ExternalServiceError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_parse_workout() {
        let text = r#"{
            "workout_name": "Custom Burner",
            "exercises": [
                {"name": "Push-ups", "sets": 3, "reps": "10-12", "duration": 5, "calories": 50},
                {"name": "Squats", "sets": 3, "reps": 15, "duration": 6, "calories": 60, "muscle_groups": ["Legs"]}
            ],
            "total_calories": 999
        }"#;
        let plan = parse_workout(text, FitnessLevel::Intermediate).unwrap();
        assert_eq!(plan.name, "Custom Burner");
        assert_eq!(plan.duration_minutes, 11);
        assert_eq!(plan.difficulty, "intermediate");
        assert_eq!(plan.estimated_calories, 110);
        assert_eq!(plan.exercises[0].reps, Reps::Described("10-12".to_string()));
        assert_eq!(plan.exercises[1].reps, Reps::Count(15));
        assert_eq!(plan.source, PlanSource::Generated);
    }

    #[test]
    fn test_parse_workout_prefers_stated_fields() {
        let text = r#"{"name": "Morning Flow", "duration": 30, "difficulty": "beginner",
            "estimated_calories": 5000, "tips": "Breathe",
            "exercises": [{"name": "Plank", "sets": 2, "reps": "30 sec", "duration": 3, "calories": 15}]}"#;
        let plan = parse_workout(text, FitnessLevel::Advanced).unwrap();
        assert_eq!(plan.duration_minutes, 30);
        assert_eq!(plan.difficulty, "beginner");
        assert_eq!(plan.estimated_calories, 15);
        assert_eq!(plan.tips, "Breathe");
    }

    #[test]
    fn test_parse_workout_rejects() {
        assert_eq!(
            parse_workout(r#"{"exercises": []}"#, FitnessLevel::Beginner).unwrap_err(),
            ExternalServiceError::MissingField("name")
        );
        assert!(matches!(
            parse_workout(r#"{"name": "X", "exercises": []}"#, FitnessLevel::Beginner),
            Err(ExternalServiceError::InvalidField { field: "exercises", .. })
        ));
        assert_eq!(
            parse_workout(
                r#"{"name": "X", "exercises": [{"name": "Run", "sets": 1, "reps": 1, "calories": 10}]}"#,
                FitnessLevel::Beginner
            )
            .unwrap_err(),
            ExternalServiceError::MissingField("exercises.duration")
        );
    }

    #[test]
    fn test_parse_workout_rejects_overflowing_totals() {
        let text = r#"{"name": "Huge", "exercises": [
            {"name": "Run", "sets": 1, "reps": 1, "duration": 10, "calories": 3000000000},
            {"name": "Row", "sets": 1, "reps": 1, "duration": 10, "calories": 3000000000}
        ]}"#;
        assert!(matches!(
            parse_workout(text, FitnessLevel::Beginner),
            Err(ExternalServiceError::InvalidField { field: "exercises.calories", .. })
        ));

        let text = r#"{"name": "Long", "exercises": [
            {"name": "Walk", "sets": 1, "reps": 1, "duration": 4000000000, "calories": 1},
            {"name": "Hike", "sets": 1, "reps": 1, "duration": 4000000000, "calories": 1}
        ]}"#;
        assert!(matches!(
            parse_workout(text, FitnessLevel::Beginner),
            Err(ExternalServiceError::InvalidField { field: "exercises.duration", .. })
        ));
    }

    #[test]
    fn test_parse_burn() {
        assert_eq!(parse_burn(r#"{"calories_burned": 284.9, "explanation": "MET"}"#).unwrap(), 284);
        assert_eq!(parse_burn(r#"{"calories_burned": 3}"#).unwrap(), 10);
        assert_eq!(parse_burn(r#"{"calories_burned": -40}"#).unwrap(), 10);
        assert_eq!(
            parse_burn(r#"{"explanation": "no idea"}"#).unwrap_err(),
            ExternalServiceError::MissingField("calories_burned")
        );
        assert!(parse_burn(r#"{"calories_burned": "250"}"#).is_err());
    }
}
