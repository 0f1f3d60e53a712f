//! Print a diet plan, a workout, and calorie predictions for a sample profile
//! Usage: cargo run --bin sample_plan -- [seed]
//!
//! Uses Gemini when GEMINI_API_KEY is set. A seed makes the rule-based picks
//! repeatable.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use fitsense::config::Config;
use fitsense::engine::{burn, energy};
use fitsense::models::{
    ActivityLevel, CalorieBurnQuery, DietPreference, Gender, Goal, Intensity, UserProfile,
    WorkoutTime, WorkoutType,
};
use fitsense::recommend::RecommendationEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fitsense=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut rng = match std::env::args().nth(1) {
        Some(seed) => StdRng::seed_from_u64(seed.parse()?),
        None => StdRng::from_entropy(),
    };

    let config = Config::from_env();
    let engine = RecommendationEngine::from_config(&config);

    let profile = UserProfile {
        age: 28,
        gender: Gender::Male,
        height_cm: 175.0,
        weight_kg: 75.0,
        goal: Goal::WeightLoss,
        diet_preference: DietPreference::NonVegan,
        activity_level: ActivityLevel::Moderate,
        workout_time: WorkoutTime::Medium,
    };

    let bmr = energy::compute_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
    let tdee = energy::compute_tdee(bmr, profile.activity_level);
    println!("Profile: {:?}", profile);
    println!("BMR {:.2} | TDEE {:.2}", bmr, tdee);
    println!();

    let diet = engine.produce_plan(&profile, &mut rng).await?;
    println!(
        "Diet ({}): {} kcal | protein {}g carbs {}g fat {}g",
        diet.source.as_str(),
        diet.target_calories,
        diet.macros.protein_g,
        diet.macros.carbs_g,
        diet.macros.fat_g
    );
    for (meal_type, item) in &diet.meals {
        println!(
            "  {:<10} {:<40} {:>5} kcal  P{} C{} F{}",
            meal_type.display_name(),
            item.name,
            item.calories,
            item.protein_g,
            item.carbs_g,
            item.fat_g
        );
    }
    println!("  {}", diet.recommendations);
    println!();

    let workout = engine.produce_workout(&profile, &mut rng).await?;
    println!(
        "Workout ({}): {} | {} min | {} | ~{} kcal",
        workout.source.as_str(),
        workout.name,
        workout.duration_minutes,
        workout.difficulty,
        workout.estimated_calories
    );
    for exercise in &workout.exercises {
        println!(
            "  {:<24} {} x {:<12} {:>3} min {:>4} kcal",
            exercise.name, exercise.sets, exercise.reps.to_string(), exercise.duration_minutes, exercise.calories
        );
    }
    println!("  Equipment: {}", workout.equipment_needed.join(", "));
    println!();

    let minutes = profile.workout_time.minutes();
    println!("Calorie predictions ({} min, {} kg):", minutes, profile.weight_kg);
    for workout_type in [WorkoutType::Strength, WorkoutType::Cardio, WorkoutType::Mixed] {
        for intensity in [Intensity::Low, Intensity::Moderate, Intensity::High] {
            let query = CalorieBurnQuery {
                workout_type,
                intensity,
                duration_minutes: minutes,
                user_weight_kg: profile.weight_kg,
                user_gender: profile.gender,
                user_age: Some(profile.age),
            };
            let calories = engine.estimate_burn(&query).await?;
            println!(
                "  {:<9} {:<9} MET {:>4.1} -> {} kcal",
                workout_type.as_str(),
                intensity.as_str(),
                burn::met_value(workout_type, intensity),
                calories
            );
        }
    }

    Ok(())
}
