//! Prompt builders
//!
//! Each prompt describes the user and spells out the exact JSON shape that
//! [`super::parse`] accepts.

use super::{PromptContext, PromptKind};
use crate::engine::energy::compute_bmi;
use crate::models::{CalorieBurnQuery, CustomWorkoutRequest, UserProfile};

pub fn diet_prompt(profile: &UserProfile) -> PromptContext {
    let bmi = compute_bmi(profile.weight_kg, profile.height_cm);

    let prompt = format!(
        r#"You are a professional nutritionist and dietitian. Generate a personalized diet plan based on the following user profile:

User Profile:
- Age: {age} years
- Gender: {gender}
- Height: {height} cm
- Weight: {weight} kg
- BMI: {bmi:.1}
- Goal: {goal}
- Diet Preference: {diet}
- Activity Level: {activity}

Please generate a comprehensive diet plan that includes:
1. Daily calorie target
2. Macro distribution (protein, carbs, fat) in grams
3. Three main meals (breakfast, lunch, dinner) with specific food items
4. Calories, protein, carbs, and fat for each meal
5. Meal timing recommendations
6. Hydration goals

Format the response as a JSON object with this structure:
{{
    "target_calories": number,
    "macros": {{"protein": number, "carbs": number, "fat": number}},
    "meal_plan": {{
        "breakfast": {{"name": "string", "calories": number, "protein": number, "carbs": number, "fat": number, "time": "string"}},
        "lunch": {{"name": "string", "calories": number, "protein": number, "carbs": number, "fat": number, "time": "string"}},
        "dinner": {{"name": "string", "calories": number, "protein": number, "carbs": number, "fat": number, "time": "string"}}
    }},
    "recommendations": "string"
}}

Make sure the total calories match the target and the macros are appropriate for the user's goal."#,
        age = profile.age,
        gender = profile.gender.as_str(),
        height = profile.height_cm,
        weight = profile.weight_kg,
        bmi = bmi,
        goal = profile.goal.as_str(),
        diet = profile.diet_preference.as_str(),
        activity = profile.activity_level.as_str(),
    );

    PromptContext { kind: PromptKind::Diet, prompt }
}

pub fn workout_prompt(profile: &UserProfile) -> PromptContext {
    let prompt = format!(
        r#"You are a certified personal trainer and fitness expert. Generate a personalized workout plan based on the following user profile:

User Profile:
- Age: {age} years
- Gender: {gender}
- Height: {height} cm
- Weight: {weight} kg
- Goal: {goal}
- Activity Level: {activity}
- Available Time: {time} minutes per day

Please generate a workout plan that includes:
1. Workout name and description
2. List of exercises with sets, reps, and duration in minutes
3. Estimated calories burned per exercise
4. Difficulty level appropriate for the user
5. Equipment needed (prefer bodyweight exercises)
6. Progression tips

Format the response as a JSON object with this structure:
{{
    "name": "string",
    "description": "string",
    "duration": number,
    "difficulty": "string",
    "exercises": [
        {{"name": "string", "sets": number, "reps": "string", "duration": number, "calories": number, "instructions": "string", "muscle_groups": ["string"]}}
    ],
    "equipment_needed": ["string"],
    "tips": "string"
}}

Make sure the workout is appropriate for the user's fitness level and time constraints."#,
        age = profile.age,
        gender = profile.gender.as_str(),
        height = profile.height_cm,
        weight = profile.weight_kg,
        goal = profile.goal.as_str(),
        activity = profile.activity_level.as_str(),
        time = profile.workout_time.as_str(),
    );

    PromptContext { kind: PromptKind::Workout, prompt }
}

pub fn custom_workout_prompt(profile: &UserProfile, request: &CustomWorkoutRequest) -> PromptContext {
    let focus = if request.focus_areas.is_empty() {
        "General fitness".to_string()
    } else {
        request.focus_areas.join(", ")
    };
    let equipment = if request.equipment.is_empty() {
        "No equipment".to_string()
    } else {
        request.equipment.join(", ")
    };

    let prompt = format!(
        r#"Generate a custom workout plan with the following requirements:

User Profile:
- Age: {age}
- Height: {height} cm
- Weight: {weight} kg
- Activity Level: {activity}
- Goal: {goal}

Workout Customization:
- Duration: {duration} minutes
- Difficulty: {difficulty}
- Focus Areas: {focus}
- Available Equipment: {equipment}
- Workout Type: {workout_type}

Return ONLY valid JSON without markdown formatting. The response must start with {{ and end with }}:
{{
    "workout_name": "string",
    "exercises": [
        {{"name": "string", "sets": number, "reps": "string", "duration": number, "calories": number, "instructions": "string", "muscle_groups": ["string"]}}
    ],
    "total_duration": {duration},
    "total_calories": number
}}"#,
        age = profile.age,
        height = profile.height_cm,
        weight = profile.weight_kg,
        activity = profile.activity_level.as_str(),
        goal = profile.goal.as_str(),
        duration = request.duration_minutes,
        difficulty = request.difficulty.as_str(),
        focus = focus,
        equipment = equipment,
        workout_type = request.workout_type,
    );

    PromptContext { kind: PromptKind::CustomWorkout, prompt }
}

pub fn calorie_prompt(query: &CalorieBurnQuery) -> PromptContext {
    let age = query
        .user_age
        .map(|a| format!("{} years", a))
        .unwrap_or_else(|| "unknown".to_string());

    let prompt = format!(
        r#"You are a fitness expert with expertise in calorie burn calculations. Calculate the estimated calories burned for this workout:

User Profile:
- Age: {age}
- Gender: {gender}
- Weight: {weight} kg

Workout Details:
- Type: {workout_type}
- Intensity: {intensity}
- Duration: {duration} minutes

Format the response as a JSON object:
{{
    "calories_burned": number,
    "explanation": "string",
    "factors": ["string"]
}}

Use standard MET (Metabolic Equivalent of Task) values and consider the user's weight, age, and gender."#,
        age = age,
        gender = query.user_gender.as_str(),
        weight = query.user_weight_kg,
        workout_type = query.workout_type.as_str(),
        intensity = query.intensity.as_str(),
        duration = query.duration_minutes,
    );

    PromptContext { kind: PromptKind::CalorieBurn, prompt }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ActivityLevel, DietPreference, FitnessLevel, Gender, Goal, Intensity, WorkoutTime,
        WorkoutType,
    };

    fn profile() -> UserProfile {
        UserProfile {
            age: 28,
            gender: Gender::Male,
            height_cm: 175.0,
            weight_kg: 75.0,
            goal: Goal::WeightLoss,
            diet_preference: DietPreference::NonVegan,
            activity_level: ActivityLevel::Moderate,
            workout_time: WorkoutTime::Medium,
        }
    }

    #[test]
    fn test_diet_prompt_includes_profile() {
        let ctx = diet_prompt(&profile());
        assert_eq!(ctx.kind, PromptKind::Diet);
        assert!(ctx.prompt.contains("BMI: 24.5"));
        assert!(ctx.prompt.contains("Goal: weight-loss"));
        assert!(ctx.prompt.contains("Diet Preference: non-vegan"));
        assert!(ctx.prompt.contains("\"target_calories\": number"));
    }

    #[test]
    fn test_workout_prompt_includes_time() {
        let ctx = workout_prompt(&profile());
        assert!(ctx.prompt.contains("Available Time: 30-45 minutes"));
    }

    #[test]
    fn test_custom_prompt_defaults() {
        let request = CustomWorkoutRequest {
            duration_minutes: 25,
            difficulty: FitnessLevel::Advanced,
            focus_areas: Vec::new(),
            equipment: vec!["dumbbells".to_string(), "bench".to_string()],
            workout_type: "full_body".to_string(),
        };
        let ctx = custom_workout_prompt(&profile(), &request);
        assert_eq!(ctx.kind, PromptKind::CustomWorkout);
        assert!(ctx.prompt.contains("Focus Areas: General fitness"));
        assert!(ctx.prompt.contains("Available Equipment: dumbbells, bench"));
        assert!(ctx.prompt.contains("\"total_duration\": 25"));
    }

    #[test]
    fn test_calorie_prompt_without_age() {
        let query = CalorieBurnQuery {
            workout_type: WorkoutType::Mixed,
            intensity: Intensity::Moderate,
            duration_minutes: 37,
            user_weight_kg: 70.0,
            user_gender: Gender::Male,
            user_age: None,
        };
        let ctx = calorie_prompt(&query);
        assert!(ctx.prompt.contains("Age: unknown"));
        assert!(ctx.prompt.contains("Type: mixed"));
        assert!(ctx.prompt.contains("Duration: 37 minutes"));
    }
}
