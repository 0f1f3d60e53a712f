//! Calorie burn estimation
//!
//! calories = MET × weight_kg × hours, adjusted by sex, floored, and never
//! below [`MIN_BURN_CALORIES`].

use crate::models::{CalorieBurnQuery, Gender, Intensity, WorkoutType};

pub const MIN_BURN_CALORIES: u32 = 10;

/// MET used for any pair outside the table
pub const DEFAULT_MET: f64 = 5.0;

pub fn met_value(workout_type: WorkoutType, intensity: Intensity) -> f64 {
    match (workout_type, intensity) {
        (WorkoutType::Strength, Intensity::Low) => 3.0,
        (WorkoutType::Strength, Intensity::Moderate) => 5.0,
        (WorkoutType::Strength, Intensity::High) => 8.0,
        (WorkoutType::Cardio, Intensity::Low) => 4.0,
        (WorkoutType::Cardio, Intensity::Moderate) => 7.0,
        (WorkoutType::Cardio, Intensity::High) => 11.0,
        (WorkoutType::Mixed, Intensity::Low) => 3.5,
        (WorkoutType::Mixed, Intensity::Moderate) => 6.0,
        (WorkoutType::Mixed, Intensity::High) => 9.5,
        _ => DEFAULT_MET,
    }
}

fn gender_multiplier(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 1.1,
        Gender::Female => 0.9,
    }
}

pub fn estimate(
    workout_type: WorkoutType,
    intensity: Intensity,
    duration_minutes: u32,
    weight_kg: f64,
    gender: Gender,
) -> u32 {
    let hours = f64::from(duration_minutes) / 60.0;
    let calories =
        (met_value(workout_type, intensity) * weight_kg * hours * gender_multiplier(gender)).floor();

    if calories.is_nan() || calories < f64::from(MIN_BURN_CALORIES) {
        MIN_BURN_CALORIES
    } else {
        calories as u32
    }
}

pub fn estimate_query(query: &CalorieBurnQuery) -> u32 {
    estimate(
        query.workout_type,
        query.intensity,
        query.duration_minutes,
        query.user_weight_kg,
        query.user_gender,
    )
}
