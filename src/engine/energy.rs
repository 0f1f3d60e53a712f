//! Energy model
//!
//! BMR, TDEE, and goal-adjusted calorie targets.
//!
//! BMR uses the Mifflin-St Jeor equation:
//! - Men:   10 × weight_kg + 6.25 × height_cm − 5 × age + 5
//! - Women: 10 × weight_kg + 6.25 × height_cm − 5 × age − 161

use crate::models::{ActivityLevel, Gender, Goal, UserProfile};

/// Floor applied to every calorie target
pub const MIN_TARGET_CALORIES: u32 = 1200;

/// Basal metabolic rate in kcal/day
pub fn compute_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// TDEE multiplier for an activity level
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Intense => 1.725,
    }
}

/// Total daily energy expenditure in kcal/day
pub fn compute_tdee(bmr: f64, level: ActivityLevel) -> f64 {
    bmr * activity_multiplier(level)
}

/// Calorie adjustment for a goal
pub fn goal_multiplier(goal: Goal) -> f64 {
    match goal {
        Goal::WeightLoss => 0.8,
        Goal::Maintenance => 1.0,
        Goal::MuscleGain => 1.2,
    }
}

/// Goal-adjusted daily target, rounded, never below [`MIN_TARGET_CALORIES`]
pub fn compute_target_calories(tdee: f64, goal: Goal) -> u32 {
    let target = (tdee * goal_multiplier(goal)).round();
    if target.is_nan() || target < f64::from(MIN_TARGET_CALORIES) {
        MIN_TARGET_CALORIES
    } else {
        target as u32
    }
}

/// Body mass index
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Full BMR → TDEE → target chain for a profile
pub fn target_calories_for(profile: &UserProfile) -> u32 {
    let bmr = compute_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
    let tdee = compute_tdee(bmr, profile.activity_level);
    compute_target_calories(tdee, profile.goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DietPreference, WorkoutTime};

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
    fn test_reference_profile_chain() {
        let bmr = compute_bmr(75.0, 175.0, 28, Gender::Male);
        assert!((bmr - 1703.75).abs() < 1e-9);

        let tdee = compute_tdee(bmr, ActivityLevel::Moderate);
        assert!((tdee - 2640.8125).abs() < 1e-6);

        assert_eq!(compute_target_calories(tdee, Goal::WeightLoss), 2113);
        assert_eq!(target_calories_for(&profile()), 2113);
    }

    #[test]
    fn test_female_offset() {
        let male = compute_bmr(60.0, 165.0, 30, Gender::Male);
        let female = compute_bmr(60.0, 165.0, 30, Gender::Female);
        assert!((male - female - 166.0).abs() < 1e-9);
        assert!((female - 1320.25).abs() < 1e-9);
    }

    #[test]
    fn test_activity_multipliers() {
        assert_eq!(activity_multiplier(ActivityLevel::Sedentary), 1.2);
        assert_eq!(activity_multiplier(ActivityLevel::Light), 1.375);
        assert_eq!(activity_multiplier(ActivityLevel::Moderate), 1.55);
        assert_eq!(activity_multiplier(ActivityLevel::Intense), 1.725);
    }

    #[test]
    fn test_target_is_clamped() {
        assert_eq!(compute_target_calories(900.0, Goal::WeightLoss), MIN_TARGET_CALORIES);
        assert_eq!(compute_target_calories(1499.0, Goal::WeightLoss), MIN_TARGET_CALORIES);
        assert_eq!(compute_target_calories(1501.0, Goal::WeightLoss), 1201);
        assert_eq!(compute_target_calories(2000.0, Goal::MuscleGain), 2400);
    }

    #[test]
    fn test_target_positive_for_all_profiles() {
        for age in [1, 18, 45, 80, 120] {
            for weight in [3.0, 45.0, 80.0, 150.0] {
                for level in ActivityLevel::ALL {
                    for goal in Goal::ALL {
                        let mut p = profile();
                        p.age = age;
                        p.weight_kg = weight;
                        p.activity_level = level;
                        p.goal = goal;
                        assert!(target_calories_for(&p) >= MIN_TARGET_CALORIES);
                    }
                }
            }
        }
    }

    #[test]
    fn test_bmi() {
        let bmi = compute_bmi(75.0, 175.0);
        assert!((bmi - 24.489_795_918).abs() < 1e-6);
    }
}
