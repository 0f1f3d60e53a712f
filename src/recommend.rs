//! Recommendation orchestrator
//!
//! Every entry point runs the same protocol:
//!
//! 1. validate the local input (fails fast with [`InvalidProfileError`])
//! 2. ask the generator, bounded by a timeout and a small retry budget
//! 3. validate the answer into the engine type
//! 4. on any external failure, log it and compute the rule-based result
//!
//! Both paths return the same type, so callers never see which one ran
//! except through the `source` field.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::ai::parse::{parse_burn, parse_diet, parse_workout};
use crate::ai::prompts::{calorie_prompt, custom_workout_prompt, diet_prompt, workout_prompt};
use crate::ai::{ExternalServiceError, GeminiGenerator, Generator, PromptContext};
use crate::config::{Config, DEFAULT_AI_RETRIES, DEFAULT_AI_TIMEOUT_SECS};
use crate::engine::{burn, composer, energy, fitness, macros, meals};
use crate::models::{
    CalorieBurnQuery, CustomWorkoutRequest, DietPlan, InvalidProfileError, PlanSource,
    UserProfile, WorkoutPlan,
};

/// Top-level engine: generator first, rule-based fallback
#[derive(Clone)]
pub struct RecommendationEngine {
    generator: Option<Arc<dyn Generator>>,
    timeout: Duration,
    retries: u32,
}

impl std::fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("generator", &self.generator.as_ref().map(|g| g.name()))
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .finish()
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::rule_based()
    }
}

impl RecommendationEngine {
    pub fn new(generator: Option<Arc<dyn Generator>>) -> Self {
        Self {
            generator,
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            retries: DEFAULT_AI_RETRIES,
        }
    }

    /// Engine that never calls out
    pub fn rule_based() -> Self {
        Self::new(None)
    }

    /// Gemini when an API key is configured, rule-based otherwise
    pub fn from_config(config: &Config) -> Self {
        let generator = config.gemini_api_key.as_ref().map(|key| {
            Arc::new(GeminiGenerator::new(key.clone(), config.gemini_model.clone()))
                as Arc<dyn Generator>
        });

        Self::new(generator)
            .with_timeout(config.ai_timeout)
            .with_retries(config.ai_retries)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Name of the configured generator, if any
    pub fn generator_name(&self) -> Option<&'static str> {
        self.generator.as_ref().map(|g| g.name())
    }

    /// Daily diet plan for a profile
    pub async fn produce_plan<R>(
        &self,
        profile: &UserProfile,
        rng: &mut R,
    ) -> Result<DietPlan, InvalidProfileError>
    where
        R: Rng + Send + ?Sized,
    {
        profile.validate()?;

        let plan = match self.attempt(diet_prompt(profile), parse_diet).await {
            Ok(plan) => plan,
            Err(e) => {
                log_fallback("Diet generation", &e);
                rule_based_diet(profile, rng)
            }
        };

        info!(
            target_calories = plan.target_calories,
            source = plan.source.as_str(),
            "Produced diet plan"
        );
        Ok(plan)
    }

    /// Workout plan for a profile's goal and time bucket
    pub async fn produce_workout<R>(
        &self,
        profile: &UserProfile,
        rng: &mut R,
    ) -> Result<WorkoutPlan, InvalidProfileError>
    where
        R: Rng + Send + ?Sized,
    {
        profile.validate()?;
        let level = fitness::resolve(profile.activity_level);

        let plan = match self
            .attempt(workout_prompt(profile), |text| parse_workout(text, level))
            .await
        {
            Ok(plan) => plan,
            Err(e) => {
                log_fallback("Workout generation", &e);
                composer::compose_workout(level, profile.goal, profile.workout_time, rng)
            }
        };

        info!(
            workout = %plan.name,
            exercises = plan.exercises.len(),
            source = plan.source.as_str(),
            "Produced workout plan"
        );
        Ok(plan)
    }

    /// Workout shaped by an explicit request instead of the profile's defaults
    pub async fn produce_custom_workout<R>(
        &self,
        profile: &UserProfile,
        request: &CustomWorkoutRequest,
        rng: &mut R,
    ) -> Result<WorkoutPlan, InvalidProfileError>
    where
        R: Rng + Send + ?Sized,
    {
        profile.validate()?;
        if request.duration_minutes == 0 {
            return Err(InvalidProfileError::ZeroDuration);
        }

        let plan = match self
            .attempt(custom_workout_prompt(profile, request), |text| {
                parse_workout(text, request.difficulty)
            })
            .await
        {
            Ok(plan) => plan,
            Err(e) => {
                log_fallback("Custom workout generation", &e);
                composer::compose_for_minutes(
                    request.difficulty,
                    profile.goal,
                    &request.workout_type,
                    request.duration_minutes,
                    rng,
                )
            }
        };

        info!(
            workout = %plan.name,
            source = plan.source.as_str(),
            "Produced custom workout"
        );
        Ok(plan)
    }

    /// Calories burned for one session, never below 10
    pub async fn estimate_burn(&self, query: &CalorieBurnQuery) -> Result<u32, InvalidProfileError> {
        query.validate()?;

        let calories = match self.attempt(calorie_prompt(query), parse_burn).await {
            Ok(calories) => calories,
            Err(e) => {
                log_fallback("Calorie prediction", &e);
                burn::estimate_query(query)
            }
        };

        debug!(calories, "Estimated calorie burn");
        Ok(calories)
    }

    /// Ask the generator and validate its answer. Transport failures and
    /// timeouts are retried; a malformed answer is returned at once.
    async fn attempt<T, F>(&self, context: PromptContext, parse: F) -> Result<T, ExternalServiceError>
    where
        F: Fn(&str) -> Result<T, ExternalServiceError>,
    {
        let generator = self.generator.as_ref().ok_or(ExternalServiceError::NotConfigured)?;
        let attempts = self.retries.saturating_add(1);
        let mut last_error = ExternalServiceError::NotConfigured;

        for attempt in 1..=attempts {
            debug!(kind = context.kind.as_str(), attempt, "Dispatching prompt");

            let error = match tokio::time::timeout(self.timeout, generator.generate(&context)).await {
                Ok(Ok(text)) => return parse(&text),
                Ok(Err(e)) => e,
                Err(_) => ExternalServiceError::Timeout(self.timeout.as_secs()),
            };

            if !error.is_retryable() {
                return Err(error);
            }
            if attempt < attempts {
                warn!("{} request failed (attempt {}/{}): {}", generator.name(), attempt, attempts, error);
            }
            last_error = error;
        }

        Err(last_error)
    }
}

fn log_fallback(what: &str, error: &ExternalServiceError) {
    match error {
        ExternalServiceError::NotConfigured => debug!("{} skipped, no generator configured", what),
        _ => warn!("{} failed, using rule-based result: {}", what, error),
    }
}

/// Energy model, then macro split, then meal selection
pub fn rule_based_diet<R: Rng + ?Sized>(profile: &UserProfile, rng: &mut R) -> DietPlan {
    let target_calories = energy::target_calories_for(profile);
    let macros = macros::allocate(target_calories, profile.goal);
    let meals = meals::plan_meals(target_calories, profile.diet_preference, rng);

    DietPlan {
        target_calories,
        recommendations: format!(
            "Aim for {} kcal a day with about {} g protein, {} g carbs, and {} g fat. \
             Please consult with a nutritionist for personalized advice.",
            target_calories, macros.protein_g, macros.carbs_g, macros.fat_g
        ),
        macros,
        meals,
        source: PlanSource::RuleBased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::ai::PromptKind;
    use crate::models::{
        ActivityLevel, DietPreference, FitnessLevel, Gender, Goal, Intensity, MealType,
        WorkoutTime, WorkoutType,
    };

    /// Replays canned answers in order, repeating the last one
    struct StubGenerator {
        answers: Vec<Result<String, ExternalServiceError>>,
        calls: AtomicUsize,
    }

    impl StubGenerator {
        fn new(answers: Vec<Result<String, ExternalServiceError>>) -> Arc<Self> {
            Arc::new(Self { answers, calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Generator for StubGenerator {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn generate(&self, _context: &PromptContext) -> Result<String, ExternalServiceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers[n.min(self.answers.len() - 1)].clone()
        }
    }

    /// Never answers
    struct HangingGenerator;

    #[async_trait]
    impl Generator for HangingGenerator {
        fn name(&self) -> &'static str {
            "hanging"
        }

        async fn generate(&self, _context: &PromptContext) -> Result<String, ExternalServiceError> {
            std::future::pending::<()>().await;
            Err(ExternalServiceError::EmptyResponse)
        }
    }

    fn engine(stub: Arc<StubGenerator>) -> RecommendationEngine {
        RecommendationEngine::new(Some(stub as Arc<dyn Generator>))
    }

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

    fn burn_query() -> CalorieBurnQuery {
        CalorieBurnQuery {
            workout_type: WorkoutType::Mixed,
            intensity: Intensity::Moderate,
            duration_minutes: 37,
            user_weight_kg: 70.0,
            user_gender: Gender::Male,
            user_age: Some(28),
        }
    }

    const DIET_ANSWER: &str = r#"```json
{"target_calories": 2050, "macros": {"protein": 150, "carbs": 180, "fat": 80},
 "meal_plan": {"breakfast": {"name": "Oats", "calories": 500, "time": "8:00 AM"},
               "lunch": {"name": "Chicken wrap", "calories": 750},
               "dinner": {"name": "Salmon", "calories": 800}},
 "recommendations": "Drink water"}
```"#;

    const WORKOUT_ANSWER: &str = r#"Sure! {"name": "Lunch Break Burner", "description": "Quick circuit",
        "exercises": [{"name": "Burpees", "sets": 3, "reps": 10, "duration": 10, "calories": 120},
                      {"name": "Plank", "sets": 3, "reps": "45 sec", "duration": 5, "calories": 30}],
        "equipment_needed": ["mat"]}"#;

    #[tokio::test]
    async fn test_rule_based_reference_scenario() {
        let engine = RecommendationEngine::rule_based();
        let mut rng = StdRng::seed_from_u64(1);

        let plan = engine.produce_plan(&profile(), &mut rng).await.unwrap();
        assert_eq!(plan.target_calories, 2113);
        assert_eq!(plan.macros.protein_g, 158);
        assert_eq!(plan.source, PlanSource::RuleBased);
        assert_eq!(plan.meals[&MealType::Breakfast].calories, 528);
        assert_eq!(plan.meals[&MealType::Lunch].calories, 739);
        assert_eq!(plan.meals[&MealType::Dinner].calories, 845);

        let workout = engine.produce_workout(&profile(), &mut rng).await.unwrap();
        assert_eq!(workout.duration_minutes, 37);
        assert_eq!(workout.difficulty, "intermediate");
        assert_eq!(workout.source, PlanSource::RuleBased);

        assert_eq!(engine.estimate_burn(&burn_query()).await.unwrap(), 284);
    }

    #[tokio::test]
    async fn test_generated_diet_is_used() {
        let stub = StubGenerator::new(vec![Ok(DIET_ANSWER.to_string())]);
        let plan = engine(stub.clone())
            .produce_plan(&profile(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(plan.source, PlanSource::Generated);
        assert_eq!(plan.target_calories, 2050);
        assert_eq!(plan.meals[&MealType::Breakfast].name, "Oats");
        assert_eq!(plan.recommendations, "Drink water");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_answer_falls_back_without_retry() {
        let stub = StubGenerator::new(vec![Ok("I cannot help with that".to_string())]);
        let plan = engine(stub.clone())
            .produce_plan(&profile(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(plan.source, PlanSource::RuleBased);
        assert_eq!(plan.target_calories, 2113);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_overflowing_workout_answer_falls_back() {
        let answer = r#"{"name": "Impossible", "exercises": [
            {"name": "Run", "sets": 1, "reps": 1, "duration": 20, "calories": 3000000000},
            {"name": "Row", "sets": 1, "reps": 1, "duration": 17, "calories": 3000000000}]}"#;
        let stub = StubGenerator::new(vec![Ok(answer.to_string())]);
        let workout = engine(stub.clone())
            .produce_workout(&profile(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(workout.source, PlanSource::RuleBased);
        assert_eq!(workout.duration_minutes, 37);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_retried() {
        let stub = StubGenerator::new(vec![
            Err(ExternalServiceError::Transport("connection reset".into())),
            Ok(WORKOUT_ANSWER.to_string()),
        ]);
        let plan = engine(stub.clone())
            .produce_workout(&profile(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(stub.calls(), 2);
        assert_eq!(plan.source, PlanSource::Generated);
        assert_eq!(plan.name, "Lunch Break Burner");
        assert_eq!(plan.duration_minutes, 15);
        assert_eq!(plan.difficulty, "intermediate");
        assert_eq!(plan.estimated_calories, 150);
    }

    #[tokio::test]
    async fn test_retry_budget_is_bounded() {
        let stub = StubGenerator::new(vec![Err(ExternalServiceError::Status {
            status: 503,
            message: "overloaded".into(),
        })]);
        let plan = engine(stub.clone())
            .with_retries(2)
            .produce_workout(&profile(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(stub.calls(), 3);
        assert_eq!(plan.source, PlanSource::RuleBased);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let stub = StubGenerator::new(vec![Err(ExternalServiceError::Status {
            status: 400,
            message: "API key not valid".into(),
        })]);
        let calories = engine(stub.clone()).estimate_burn(&burn_query()).await.unwrap();

        assert_eq!(stub.calls(), 1);
        assert_eq!(calories, 284);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let engine = RecommendationEngine::new(Some(Arc::new(HangingGenerator) as Arc<dyn Generator>))
            .with_timeout(Duration::from_millis(50))
            .with_retries(1);

        let calories = engine.estimate_burn(&burn_query()).await.unwrap();
        assert_eq!(calories, 284);
    }

    #[tokio::test]
    async fn test_generated_burn_is_clamped() {
        let stub = StubGenerator::new(vec![Ok(r#"{"calories_burned": 4.7}"#.to_string())]);
        assert_eq!(engine(stub).estimate_burn(&burn_query()).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_invalid_input_fails_before_any_call() {
        let stub = StubGenerator::new(vec![Ok(DIET_ANSWER.to_string())]);
        let engine = engine(stub.clone());

        let mut bad = profile();
        bad.age = 0;
        let err = engine.produce_plan(&bad, &mut StdRng::seed_from_u64(1)).await.unwrap_err();
        assert_eq!(err, InvalidProfileError::AgeOutOfRange(0));

        let mut query = burn_query();
        query.user_weight_kg = 0.0;
        assert!(engine.estimate_burn(&query).await.is_err());

        let request = CustomWorkoutRequest {
            duration_minutes: 0,
            difficulty: FitnessLevel::Beginner,
            focus_areas: Vec::new(),
            equipment: Vec::new(),
            workout_type: "full_body".to_string(),
        };
        let err = engine
            .produce_custom_workout(&profile(), &request, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert_eq!(err, InvalidProfileError::ZeroDuration);

        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_custom_workout_fallback_uses_request() {
        let request = CustomWorkoutRequest {
            duration_minutes: 40,
            difficulty: FitnessLevel::Advanced,
            focus_areas: vec!["legs".to_string()],
            equipment: Vec::new(),
            workout_type: "cardio_blast".to_string(),
        };
        let plan = RecommendationEngine::rule_based()
            .produce_custom_workout(&profile(), &request, &mut StdRng::seed_from_u64(4))
            .await
            .unwrap();

        assert_eq!(plan.name, "Cardio Blast Training");
        assert_eq!(plan.duration_minutes, 40);
        assert_eq!(plan.difficulty, "advanced");
        // 3 advanced strength + 2 high-intensity cardio
        assert_eq!(plan.exercises.len(), 5);
        assert_eq!(plan.estimated_calories, WorkoutPlan::total_exercise_calories(&plan.exercises));
    }

    #[tokio::test]
    async fn test_custom_workout_generated() {
        let stub = StubGenerator::new(vec![Ok(WORKOUT_ANSWER.replace("\"name\": \"Lunch", "\"workout_name\": \"Lunch"))]);
        let request = CustomWorkoutRequest {
            duration_minutes: 20,
            difficulty: FitnessLevel::Beginner,
            focus_areas: Vec::new(),
            equipment: Vec::new(),
            workout_type: "full_body".to_string(),
        };
        let plan = engine(stub)
            .produce_custom_workout(&profile(), &request, &mut StdRng::seed_from_u64(4))
            .await
            .unwrap();

        assert_eq!(plan.name, "Lunch Break Burner");
        assert_eq!(plan.difficulty, "beginner");
        assert_eq!(plan.source, PlanSource::Generated);
    }

    #[test]
    fn test_prompt_kinds() {
        assert_eq!(diet_prompt(&profile()).kind, PromptKind::Diet);
        assert_eq!(calorie_prompt(&burn_query()).kind, PromptKind::CalorieBurn);
    }
}
