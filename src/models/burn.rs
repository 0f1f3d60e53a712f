//! Calorie burn query
//!
//! Stateless input to the burn estimator.

use serde::{Deserialize, Serialize};

use super::{Gender, InvalidProfileError};

/// Broad workout category for MET lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Mixed,
    /// Anything not in the MET table
    #[serde(other)]
    Other,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Strength => "strength",
            WorkoutType::Cardio => "cardio",
            WorkoutType::Mixed => "mixed",
            WorkoutType::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "strength" => WorkoutType::Strength,
            "cardio" => WorkoutType::Cardio,
            "mixed" => WorkoutType::Mixed,
            _ => WorkoutType::Other,
        }
    }
}

/// Session intensity for MET lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Moderate,
    High,
    #[serde(other)]
    Other,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Moderate => "moderate",
            Intensity::High => "high",
            Intensity::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Intensity::Low,
            "moderate" => Intensity::Moderate,
            "high" => Intensity::High,
            _ => Intensity::Other,
        }
    }
}

/// One calorie burn question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieBurnQuery {
    pub workout_type: WorkoutType,
    pub intensity: Intensity,
    pub duration_minutes: u32,
    pub user_weight_kg: f64,
    pub user_gender: Gender,
    /// Only used to give the generator more context
    #[serde(default)]
    pub user_age: Option<u32>,
}

impl CalorieBurnQuery {
    pub fn validate(&self) -> Result<(), InvalidProfileError> {
        if !(self.user_weight_kg.is_finite() && self.user_weight_kg > 0.0) {
            return Err(InvalidProfileError::InvalidWeight(self.user_weight_kg));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_categories_map_to_other() {
        assert_eq!(WorkoutType::from_str("yoga"), WorkoutType::Other);
        assert_eq!(Intensity::from_str("extreme"), Intensity::Other);
        assert_eq!(WorkoutType::from_str(" Mixed "), WorkoutType::Mixed);

        let parsed: WorkoutType = serde_json::from_str("\"pilates\"").unwrap();
        assert_eq!(parsed, WorkoutType::Other);
    }

    #[test]
    fn test_validate_rejects_bad_weight() {
        let query = CalorieBurnQuery {
            workout_type: WorkoutType::Cardio,
            intensity: Intensity::High,
            duration_minutes: 30,
            user_weight_kg: -1.0,
            user_gender: Gender::Female,
            user_age: None,
        };
        assert_eq!(query.validate(), Err(InvalidProfileError::InvalidWeight(-1.0)));
    }
}
