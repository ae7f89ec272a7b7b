// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout and meal plans as served by the plan endpoints.
//!
//! Both plans are keyed by a backend-chosen label (`dag_1`, `breakfast`, ...)
//! and are always replaced wholesale, never merged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::null_to_default;
use super::preferences::{Diet, Goal, Level};

/// One unit of a workout plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct WorkoutBlock {
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub duration_minutes: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub equipment: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub primary_muscles: Vec<String>,
    /// Ordered steps
    #[serde(default, deserialize_with = "null_to_default")]
    pub instructions: Vec<String>,
}

/// Day label → ordered blocks.
pub type WorkoutPlan = BTreeMap<String, Vec<WorkoutBlock>>;

/// Response of `GET /plan/workouts`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutPlanResponse {
    pub goal: Option<Goal>,
    pub level: Option<Level>,
    pub plan: WorkoutPlan,
}

/// A single meal suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct Meal {
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub calories: u32,
    /// Grams
    #[serde(default, deserialize_with = "null_to_default")]
    pub protein: u32,
    /// Grams
    #[serde(default, deserialize_with = "null_to_default")]
    pub carbs: u32,
    /// Grams
    #[serde(default, deserialize_with = "null_to_default")]
    pub fats: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub instructions: String,
    pub diet_type: Diet,
}

/// Meal plan plus its daily calorie total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct MealPlan {
    /// Meal-type label → ordered meals
    pub meals: BTreeMap<String, Vec<Meal>>,
    pub total_daily_calories: u32,
}

/// Response of `GET /plan/meals`.
#[derive(Debug, Clone, Deserialize)]
pub struct MealPlanResponse {
    pub goal: Option<Goal>,
    pub diet_type: Option<Diet>,
    pub plan: BTreeMap<String, Vec<Meal>>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_daily_calories: u32,
}

impl From<MealPlanResponse> for MealPlan {
    fn from(response: MealPlanResponse) -> Self {
        Self {
            meals: response.plan,
            total_daily_calories: response.total_daily_calories,
        }
    }
}
