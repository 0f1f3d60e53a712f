//! Exercise catalog
//!
//! Static strength and cardio exercises, the workout archetype table, and the
//! per-exercise rep and instruction lookups used by the composer.

use crate::models::{FitnessLevel, Goal, Reps, WorkoutTime};

/// A catalog exercise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseCatalogEntry {
    pub name: &'static str,
    pub muscle_groups: &'static [&'static str],
    pub equipment: &'static str,
    pub calories_per_minute: f64,
    pub difficulty_tier: DifficultyTier,
}

/// Which subset an entry belongs to: a fitness level for strength work, an
/// intensity for cardio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyTier {
    Strength(FitnessLevel),
    Cardio(CardioIntensity),
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Strength(level) => level.as_str(),
            DifficultyTier::Cardio(intensity) => intensity.as_str(),
        }
    }
}

/// Cardio subsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardioIntensity {
    Low,
    High,
}

impl CardioIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardioIntensity::Low => "low_intensity",
            CardioIntensity::High => "high_intensity",
        }
    }
}

const fn entry(
    difficulty_tier: DifficultyTier,
    name: &'static str,
    muscle_groups: &'static [&'static str],
    equipment: &'static str,
    calories_per_minute: f64,
) -> ExerciseCatalogEntry {
    ExerciseCatalogEntry { name, muscle_groups, equipment, calories_per_minute, difficulty_tier }
}

const BEGINNER: DifficultyTier = DifficultyTier::Strength(FitnessLevel::Beginner);
const INTERMEDIATE: DifficultyTier = DifficultyTier::Strength(FitnessLevel::Intermediate);
const ADVANCED: DifficultyTier = DifficultyTier::Strength(FitnessLevel::Advanced);
const LOW: DifficultyTier = DifficultyTier::Cardio(CardioIntensity::Low);
const HIGH: DifficultyTier = DifficultyTier::Cardio(CardioIntensity::High);

static STRENGTH_BEGINNER: [ExerciseCatalogEntry; 4] = [
    entry(BEGINNER, "Push-ups", &["chest", "triceps"], "bodyweight", 8.0),
    entry(BEGINNER, "Squats", &["legs", "glutes"], "bodyweight", 10.0),
    entry(BEGINNER, "Plank", &["core"], "bodyweight", 5.0),
    entry(BEGINNER, "Lunges", &["legs", "glutes"], "bodyweight", 9.0),
];

static STRENGTH_INTERMEDIATE: [ExerciseCatalogEntry; 4] = [
    entry(INTERMEDIATE, "Burpees", &["full_body"], "bodyweight", 12.0),
    entry(INTERMEDIATE, "Mountain Climbers", &["core", "cardio"], "bodyweight", 11.0),
    entry(INTERMEDIATE, "Jump Squats", &["legs", "cardio"], "bodyweight", 13.0),
    entry(INTERMEDIATE, "Pike Push-ups", &["shoulders", "triceps"], "bodyweight", 9.0),
];

static STRENGTH_ADVANCED: [ExerciseCatalogEntry; 3] = [
    entry(ADVANCED, "Pistol Squats", &["legs", "core"], "bodyweight", 15.0),
    entry(ADVANCED, "Handstand Push-ups", &["shoulders", "triceps"], "bodyweight", 14.0),
    entry(ADVANCED, "Muscle-ups", &["back", "arms"], "pull_up_bar", 16.0),
];

static CARDIO_LOW: [ExerciseCatalogEntry; 3] = [
    entry(LOW, "Walking", &["cardio"], "none", 4.0),
    entry(LOW, "Light Jogging", &["cardio"], "none", 8.0),
    entry(LOW, "Cycling (leisurely)", &["cardio"], "bicycle", 6.0),
];

static CARDIO_HIGH: [ExerciseCatalogEntry; 3] = [
    entry(HIGH, "Running", &["cardio"], "none", 12.0),
    entry(HIGH, "HIIT Circuit", &["cardio"], "none", 15.0),
    entry(HIGH, "Jump Rope", &["cardio"], "jump_rope", 13.0),
];

pub fn strength_exercises(level: FitnessLevel) -> &'static [ExerciseCatalogEntry] {
    match level {
        FitnessLevel::Beginner => &STRENGTH_BEGINNER,
        FitnessLevel::Intermediate => &STRENGTH_INTERMEDIATE,
        FitnessLevel::Advanced => &STRENGTH_ADVANCED,
    }
}

pub fn cardio_exercises(intensity: CardioIntensity) -> &'static [ExerciseCatalogEntry] {
    match intensity {
        CardioIntensity::Low => &CARDIO_LOW,
        CardioIntensity::High => &CARDIO_HIGH,
    }
}

/// Workout styles for a time bucket and goal. The choice only affects the
/// plan name and whether cardio is mixed in.
pub fn workout_archetypes(time: WorkoutTime, goal: Goal) -> &'static [&'static str] {
    match (time, goal) {
        (WorkoutTime::Short, Goal::WeightLoss) => &["cardio_hiit", "bodyweight_circuit"],
        (WorkoutTime::Short, Goal::MuscleGain) => &["strength_focused", "compound_movements"],
        (WorkoutTime::Short, Goal::Maintenance) => &["balanced_mix"],
        (WorkoutTime::Medium, Goal::WeightLoss) => &["cardio_strength_combo", "circuit_training"],
        (WorkoutTime::Medium, Goal::MuscleGain) => &["strength_training", "progressive_overload"],
        (WorkoutTime::Medium, Goal::Maintenance) => &["full_body_workout"],
        (WorkoutTime::Long, Goal::WeightLoss) => &["extended_cardio", "strength_cardio_split"],
        (WorkoutTime::Long, Goal::MuscleGain) => &["detailed_strength", "muscle_group_focus"],
        (WorkoutTime::Long, Goal::Maintenance) => &["comprehensive_workout"],
        (WorkoutTime::Extended, Goal::WeightLoss) => &["long_cardio_sessions", "detailed_circuits"],
        (WorkoutTime::Extended, Goal::MuscleGain) => &["advanced_strength", "split_routines"],
        (WorkoutTime::Extended, Goal::Maintenance) => &["varied_training"],
    }
}

/// Base repetitions before the goal bonus
pub fn base_reps(exercise: &str) -> Reps {
    match exercise {
        "Push-ups" => Reps::Count(12),
        "Squats" => Reps::Count(15),
        "Lunges" => Reps::Count(10),
        "Plank" => Reps::Described("30 sec".to_string()),
        "Burpees" => Reps::Count(8),
        "Mountain Climbers" => Reps::Count(20),
        _ => Reps::Count(12),
    }
}

pub fn instructions_for(exercise: &str) -> &'static str {
    match exercise {
        "Push-ups" => "Keep your body straight, lower chest to ground, push back up",
        "Squats" => "Feet shoulder-width apart, lower hips back and down, return to standing",
        "Plank" => "Hold body straight from head to heels, engage core muscles",
        "Lunges" => "Step forward, lower hips until both knees at 90 degrees, return to start",
        "Mountain Climbers" => "Start in plank, alternate bringing knees to chest rapidly",
        "Burpees" => "Squat down, jump back to plank, do push-up, jump feet forward, jump up",
        "Running" => "Maintain steady pace, land on midfoot, keep posture upright",
        "Jump Rope" => "Keep elbows close to body, rotate wrists, land softly on balls of feet",
        _ => "Follow proper form and breathing technique",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(strength_exercises(FitnessLevel::Beginner).len(), 4);
        assert_eq!(strength_exercises(FitnessLevel::Intermediate).len(), 4);
        assert_eq!(strength_exercises(FitnessLevel::Advanced).len(), 3);
        assert_eq!(cardio_exercises(CardioIntensity::Low).len(), 3);
        assert_eq!(cardio_exercises(CardioIntensity::High).len(), 3);
    }

    #[test]
    fn test_entries_carry_their_tier() {
        for level in [FitnessLevel::Beginner, FitnessLevel::Intermediate, FitnessLevel::Advanced] {
            assert!(strength_exercises(level)
                .iter()
                .all(|e| e.difficulty_tier == DifficultyTier::Strength(level)));
        }
        for intensity in [CardioIntensity::Low, CardioIntensity::High] {
            assert!(cardio_exercises(intensity)
                .iter()
                .all(|e| e.difficulty_tier == DifficultyTier::Cardio(intensity)));
        }
        assert_eq!(STRENGTH_ADVANCED[0].difficulty_tier.as_str(), "advanced");
        assert_eq!(CARDIO_HIGH[0].difficulty_tier.as_str(), "high_intensity");
    }

    #[test]
    fn test_every_bucket_has_an_archetype() {
        for time in WorkoutTime::ALL {
            for goal in Goal::ALL {
                assert!(!workout_archetypes(time, goal).is_empty());
            }
        }
    }

    #[test]
    fn test_base_reps() {
        assert_eq!(base_reps("Squats"), Reps::Count(15));
        assert_eq!(base_reps("Plank"), Reps::Described("30 sec".to_string()));
        assert_eq!(base_reps("Pistol Squats"), Reps::Count(12));
    }

    #[test]
    fn test_instructions_default() {
        assert_eq!(instructions_for("Muscle-ups"), "Follow proper form and breathing technique");
        assert!(instructions_for("Running").starts_with("Maintain steady pace"));
    }
}
