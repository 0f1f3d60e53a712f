//! Macro allocation
//!
//! Splits a calorie target into protein, carbohydrate, and fat grams.

use crate::models::{Goal, MacroSplit};

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Fraction of calories from each macronutrient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroRatios {
    pub fn sum(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }
}

/// Ratio table by goal
pub fn ratios_for(goal: Goal) -> MacroRatios {
    match goal {
        Goal::WeightLoss => MacroRatios { protein: 0.30, carbs: 0.35, fat: 0.35 },
        Goal::MuscleGain => MacroRatios { protein: 0.35, carbs: 0.40, fat: 0.25 },
        Goal::Maintenance => MacroRatios { protein: 0.25, carbs: 0.45, fat: 0.30 },
    }
}

/// Grams of each macro, floored
pub fn allocate(target_calories: u32, goal: Goal) -> MacroSplit {
    let calories = f64::from(target_calories);
    let ratios = ratios_for(goal);

    MacroSplit {
        protein_g: (calories * ratios.protein / KCAL_PER_G_PROTEIN).floor() as u32,
        carbs_g: (calories * ratios.carbs / KCAL_PER_G_CARBS).floor() as u32,
        fat_g: (calories * ratios.fat / KCAL_PER_G_FAT).floor() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratios_sum_to_one() {
        for goal in Goal::ALL {
            assert!((ratios_for(goal).sum() - 1.0).abs() < 1e-12, "{:?}", goal);
        }
    }

    #[test]
    fn test_reference_split() {
        // 2113 kcal weight-loss: 633.9/4, 739.55/4, 739.55/9
        let split = allocate(2113, Goal::WeightLoss);
        assert_eq!(split, MacroSplit { protein_g: 158, carbs_g: 184, fat_g: 82 });
    }

    #[test]
    fn test_maintenance_split() {
        let split = allocate(2000, Goal::Maintenance);
        assert_eq!(split, MacroSplit { protein_g: 125, carbs_g: 225, fat_g: 66 });
    }

    #[test]
    fn test_macro_energy_tracks_target() {
        for goal in Goal::ALL {
            for target in 1200..=5000u32 {
                let split = allocate(target, goal);
                let expected = f64::from(target) * ratios_for(goal).sum();
                let actual = f64::from(split.calories());
                // Flooring loses under one gram of each macro
                assert!(actual <= expected + 1e-6);
                assert!(expected - actual < 17.0);
                if target >= 1700 {
                    assert!((expected - actual) / expected <= 0.01, "{} {:?}", target, goal);
                }
            }
        }
    }
}
