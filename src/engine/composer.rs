//! Workout composition
//!
//! Builds a rule-based workout from the exercise catalog.
//!
//! The archetype picked for the time bucket and goal decides the plan name and
//! the path:
//! - archetypes containing "cardio" mix up to 4 strength exercises with up to
//!   2 high-intensity cardio exercises
//! - everything else is up to 6 strength exercises
//!
//! Per-exercise duration is the category time floor-divided by the exercise
//! count. Leftover minutes are dropped.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::catalog::{
    base_reps, cardio_exercises, instructions_for, strength_exercises, workout_archetypes,
    CardioIntensity, ExerciseCatalogEntry,
};
use crate::models::{FitnessLevel, Goal, PlanSource, Reps, WorkoutExercise, WorkoutPlan, WorkoutTime};

const MIXED_STRENGTH_COUNT: usize = 4;
const MIXED_CARDIO_COUNT: usize = 2;
const STRENGTH_ONLY_COUNT: usize = 6;

/// Share of the session given to the goal's main category on the mixed path
const PRIMARY_SHARE: f64 = 0.6;

/// Compose a workout for a profile's time bucket
pub fn compose_workout<R: Rng + ?Sized>(
    level: FitnessLevel,
    goal: Goal,
    time: WorkoutTime,
    rng: &mut R,
) -> WorkoutPlan {
    let archetypes = workout_archetypes(time, goal);
    let archetype = archetypes[rng.gen_range(0..archetypes.len())];
    compose_for_minutes(level, goal, archetype, time.minutes(), rng)
}

/// Compose a workout of a given style and length
pub fn compose_for_minutes<R: Rng + ?Sized>(
    level: FitnessLevel,
    goal: Goal,
    archetype: &str,
    minutes: u32,
    rng: &mut R,
) -> WorkoutPlan {
    let strength = strength_exercises(level);
    let mut equipment: Vec<String> = Vec::new();

    let exercises = if archetype.contains("cardio") {
        let (strength_time, cardio_time) = split_mixed_time(minutes, goal);
        let cardio = cardio_exercises(CardioIntensity::High);

        let chosen_strength = sample(strength, MIXED_STRENGTH_COUNT, rng);
        let chosen_cardio = sample(cardio, MIXED_CARDIO_COUNT, rng);
        note_equipment(&mut equipment, &chosen_strength);
        note_equipment(&mut equipment, &chosen_cardio);

        let strength_each = strength_time / chosen_strength.len() as u32;
        let cardio_each = cardio_time / chosen_cardio.len() as u32;

        let mut exercises: Vec<WorkoutExercise> = chosen_strength
            .iter()
            .map(|entry| strength_exercise(entry, 3, strength_each, goal))
            .collect();
        exercises.extend(chosen_cardio.iter().map(|entry| cardio_exercise(entry, cardio_each)));
        exercises
    } else {
        let chosen = sample(strength, STRENGTH_ONLY_COUNT, rng);
        note_equipment(&mut equipment, &chosen);

        let each = minutes / chosen.len() as u32;
        let sets = if goal == Goal::MuscleGain { 3 } else { 2 };
        chosen
            .iter()
            .map(|entry| strength_exercise(entry, sets, each, goal))
            .collect()
    };

    if equipment.is_empty() {
        equipment.push("none".to_string());
    }

    WorkoutPlan {
        name: plan_name(archetype),
        duration_minutes: minutes,
        difficulty: level.as_str().to_string(),
        estimated_calories: WorkoutPlan::total_exercise_calories(&exercises),
        exercises,
        description: format!(
            "{} minute {} session for {}",
            minutes,
            level.as_str(),
            goal.as_str().replace('-', " ")
        ),
        equipment_needed: equipment,
        tips: tips_for(goal).to_string(),
        source: PlanSource::RuleBased,
    }
}

/// (strength, cardio) minutes on the mixed path
pub fn split_mixed_time(minutes: u32, goal: Goal) -> (u32, u32) {
    let primary = (f64::from(minutes) * PRIMARY_SHARE).floor() as u32;
    if goal == Goal::MuscleGain {
        (primary, minutes - primary)
    } else {
        (minutes - primary, primary)
    }
}

/// Reps after the goal bonus. Described reps pass through.
pub fn reps_for(exercise: &str, goal: Goal) -> Reps {
    match base_reps(exercise) {
        Reps::Count(n) => match goal {
            Goal::MuscleGain => Reps::Count(n + 3),
            Goal::WeightLoss => Reps::Count(n + 5),
            Goal::Maintenance => Reps::Count(n),
        },
        described => described,
    }
}

/// "cardio_hiit" -> "Cardio Hiit Training"
pub fn plan_name(archetype: &str) -> String {
    let words: Vec<String> = archetype
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();

    format!("{} Training", words.join(" "))
}

fn tips_for(goal: Goal) -> &'static str {
    match goal {
        Goal::WeightLoss => "Keep rest periods short to hold your heart rate up",
        Goal::MuscleGain => "Focus on controlled reps and add load or reps each week",
        Goal::Maintenance => "Focus on proper form over speed",
    }
}

/// Sample without replacement, taking everything when the subset is small
fn sample<R: Rng + ?Sized>(
    pool: &'static [ExerciseCatalogEntry],
    wanted: usize,
    rng: &mut R,
) -> Vec<&'static ExerciseCatalogEntry> {
    if wanted > pool.len() {
        debug!("Catalog has {} exercises, wanted {}; using all", pool.len(), wanted);
    }
    pool.choose_multiple(rng, wanted.min(pool.len())).collect()
}

fn note_equipment(equipment: &mut Vec<String>, chosen: &[&ExerciseCatalogEntry]) {
    for entry in chosen {
        if entry.equipment != "none" && !equipment.iter().any(|e| e == entry.equipment) {
            equipment.push(entry.equipment.to_string());
        }
    }
}

fn calories(entry: &ExerciseCatalogEntry, duration: u32) -> u32 {
    (entry.calories_per_minute * f64::from(duration)).round() as u32
}

fn strength_exercise(
    entry: &ExerciseCatalogEntry,
    sets: u32,
    duration: u32,
    goal: Goal,
) -> WorkoutExercise {
    WorkoutExercise {
        name: entry.name.to_string(),
        sets,
        reps: reps_for(entry.name, goal),
        duration_minutes: duration,
        calories: calories(entry, duration),
        muscle_groups: entry.muscle_groups.iter().map(|m| m.to_string()).collect(),
        instructions: instructions_for(entry.name).to_string(),
    }
}

fn cardio_exercise(entry: &ExerciseCatalogEntry, duration: u32) -> WorkoutExercise {
    WorkoutExercise {
        name: entry.name.to_string(),
        sets: 1,
        reps: Reps::Described(format!("{} minutes", duration)),
        duration_minutes: duration,
        calories: calories(entry, duration),
        muscle_groups: vec!["cardio".to_string()],
        instructions: instructions_for(entry.name).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_plan_name() {
        assert_eq!(plan_name("cardio_hiit"), "Cardio Hiit Training");
        assert_eq!(plan_name("full_body_workout"), "Full Body Workout Training");
        assert_eq!(plan_name("balanced_mix"), "Balanced Mix Training");
    }

    #[test]
    fn test_reps_goal_bonus() {
        assert_eq!(reps_for("Push-ups", Goal::WeightLoss), Reps::Count(17));
        assert_eq!(reps_for("Push-ups", Goal::MuscleGain), Reps::Count(15));
        assert_eq!(reps_for("Squats", Goal::Maintenance), Reps::Count(15));
        assert_eq!(reps_for("Plank", Goal::WeightLoss), Reps::Described("30 sec".to_string()));
        assert_eq!(reps_for("Jump Squats", Goal::WeightLoss), Reps::Count(17));
    }

    #[test]
    fn test_mixed_time_split() {
        assert_eq!(split_mixed_time(37, Goal::WeightLoss), (15, 22));
        assert_eq!(split_mixed_time(37, Goal::MuscleGain), (22, 15));
        assert_eq!(split_mixed_time(0, Goal::Maintenance), (0, 0));
    }

    #[test]
    fn test_mixed_path() {
        let mut rng = StdRng::seed_from_u64(11);
        let plan = compose_for_minutes(
            FitnessLevel::Beginner,
            Goal::WeightLoss,
            "cardio_strength_combo",
            37,
            &mut rng,
        );

        assert_eq!(plan.name, "Cardio Strength Combo Training");
        assert_eq!(plan.exercises.len(), 6);

        let (strength, cardio) = plan.exercises.split_at(4);
        for ex in strength {
            assert_eq!(ex.sets, 3);
            assert_eq!(ex.duration_minutes, 3);
            assert_ne!(ex.muscle_groups, vec!["cardio".to_string()]);
        }
        for ex in cardio {
            assert_eq!(ex.sets, 1);
            assert_eq!(ex.duration_minutes, 11);
            assert_eq!(ex.reps, Reps::Described("11 minutes".to_string()));
            assert_eq!(ex.muscle_groups, vec!["cardio".to_string()]);
        }

        let names: std::collections::HashSet<_> = plan.exercises.iter().map(|e| &e.name).collect();
        assert_eq!(names.len(), 6);
        assert_eq!(plan.estimated_calories, WorkoutPlan::total_exercise_calories(&plan.exercises));
        assert_eq!(plan.source, PlanSource::RuleBased);
    }

    #[test]
    fn test_strength_path_takes_whole_tier() {
        let mut rng = StdRng::seed_from_u64(5);
        let plan = compose_for_minutes(
            FitnessLevel::Advanced,
            Goal::MuscleGain,
            "strength_training",
            37,
            &mut rng,
        );

        assert_eq!(plan.exercises.len(), 3);
        for ex in &plan.exercises {
            assert_eq!(ex.sets, 3);
            assert_eq!(ex.duration_minutes, 12);
        }
        assert!(plan.equipment_needed.contains(&"pull_up_bar".to_string()));
        assert_eq!(plan.difficulty, "advanced");
    }

    #[test]
    fn test_remainder_minutes_are_dropped() {
        let mut rng = StdRng::seed_from_u64(2);
        let plan = compose_for_minutes(
            FitnessLevel::Beginner,
            Goal::Maintenance,
            "full_body_workout",
            37,
            &mut rng,
        );

        let used: u32 = plan.exercises.iter().map(|e| e.duration_minutes).sum();
        assert_eq!(used, 36);
        assert_eq!(plan.duration_minutes, 37);
        assert!(plan.exercises.iter().all(|e| e.sets == 2));
    }

    #[test]
    fn test_zero_minute_exercises() {
        let mut rng = StdRng::seed_from_u64(9);
        let plan = compose_for_minutes(
            FitnessLevel::Intermediate,
            Goal::Maintenance,
            "balanced_mix",
            3,
            &mut rng,
        );

        assert_eq!(plan.exercises.len(), 4);
        assert!(plan.exercises.iter().all(|e| e.duration_minutes == 0 && e.calories == 0));
        assert_eq!(plan.estimated_calories, 0);
    }

    #[test]
    fn test_compose_never_exceeds_catalog() {
        let mut rng = StdRng::seed_from_u64(21);
        for level in [FitnessLevel::Beginner, FitnessLevel::Intermediate, FitnessLevel::Advanced] {
            for goal in Goal::ALL {
                for time in WorkoutTime::ALL {
                    let plan = compose_workout(level, goal, time, &mut rng);
                    let limit = strength_exercises(level).len() + MIXED_CARDIO_COUNT;
                    assert!(plan.exercises.len() <= limit);
                    assert!(!plan.exercises.is_empty());
                    assert_eq!(plan.duration_minutes, time.minutes());
                    assert_eq!(
                        plan.estimated_calories,
                        WorkoutPlan::total_exercise_calories(&plan.exercises)
                    );
                    assert!(plan.name.ends_with(" Training"));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_workout() {
        let a = compose_workout(
            FitnessLevel::Intermediate,
            Goal::WeightLoss,
            WorkoutTime::Medium,
            &mut StdRng::seed_from_u64(77),
        );
        let b = compose_workout(
            FitnessLevel::Intermediate,
            Goal::WeightLoss,
            WorkoutTime::Medium,
            &mut StdRng::seed_from_u64(77),
        );
        assert_eq!(a, b);
    }
}
