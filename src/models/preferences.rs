// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness preferences: the local draft and its wire forms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::UserId;

/// Training frequency the backend assumes when none is sent.
pub const DEFAULT_TRAINING_FREQUENCY: u32 = 3;

/// Primary training goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    LoseWeight,
    GetFit,
    BuildStrength,
}

/// Experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
}

/// Dietary preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    #[default]
    Standard,
    Vegetarian,
    HighProtein,
}

macro_rules! wire_enum {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// All values, in display order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Backend wire value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(format!(
                        "unknown {} {:?} (expected one of: {})",
                        stringify!($ty).to_lowercase(),
                        other,
                        [$($wire),+].join(", ")
                    )),
                }
            }
        }
    };
}

wire_enum!(Goal {
    LoseWeight => "lose_weight",
    GetFit => "get_fit",
    BuildStrength => "build_strength",
});

wire_enum!(Level {
    Beginner => "beginner",
    Intermediate => "intermediate",
});

wire_enum!(Diet {
    Standard => "standard",
    Vegetarian => "vegetarian",
    HighProtein => "high_protein",
});

/// Split free-text allergies on commas, trimming entries and dropping empties.
pub fn parse_allergies(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Locally edited preferences, not yet submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct PreferencesDraft {
    pub goal: Goal,
    pub level: Level,
    pub diet: Diet,
    /// Raw comma-separated allergy text as typed
    pub allergies_text: String,
    pub training_frequency: u32,
}

impl Default for PreferencesDraft {
    fn default() -> Self {
        Self {
            goal: Goal::default(),
            level: Level::default(),
            diet: Diet::default(),
            allergies_text: String::new(),
            training_frequency: DEFAULT_TRAINING_FREQUENCY,
        }
    }
}

impl PreferencesDraft {
    /// Parsed allergy list.
    pub fn allergies(&self) -> Vec<String> {
        parse_allergies(&self.allergies_text)
    }

    /// Build the submission body for a user.
    pub fn to_request(&self, user_id: UserId) -> PreferencesRequest {
        PreferencesRequest {
            user_id,
            primary_goal: self.goal,
            experience_level: self.level,
            dietary_preference: self.diet,
            allergies: self.allergies(),
            training_frequency: self.training_frequency,
        }
    }

    /// Replace the draft with preferences stored on the backend.
    ///
    /// Fields the backend left unset keep their current draft value.
    pub fn apply_stored(&mut self, stored: &StoredPreferences) {
        if let Some(goal) = stored.primary_goal {
            self.goal = goal;
        }
        if let Some(level) = stored.experience_level {
            self.level = level;
        }
        if let Some(diet) = stored.dietary_preference {
            self.diet = diet;
        }
        self.allergies_text = stored.allergies.join(", ");
        if let Some(freq) = stored.training_frequency {
            self.training_frequency = freq;
        }
    }
}

/// Body of `POST /preferences`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesRequest {
    pub user_id: UserId,
    pub primary_goal: Goal,
    pub experience_level: Level,
    pub dietary_preference: Diet,
    pub allergies: Vec<String>,
    pub training_frequency: u32,
}

/// Response of `GET /preferences/{user_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredPreferences {
    pub user_id: UserId,
    pub primary_goal: Option<Goal>,
    pub experience_level: Option<Level>,
    pub dietary_preference: Option<Diet>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub training_frequency: Option<u32>,
}
