// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wire and display-state models for the coach API.

pub mod ad;
pub mod machine;
pub mod plan;
pub mod preferences;
pub mod session;
pub mod subscription;

pub use ad::{Advertisement, DailyAd};
pub use machine::{MachineGuide, MACHINE_HINTS};
pub use plan::{Meal, MealPlan, WorkoutBlock, WorkoutPlan};
pub use preferences::{parse_allergies, Diet, Goal, Level, PreferencesDraft, StoredPreferences};
pub use session::{AuthMode, Credentials, Session};
pub use subscription::{Subscription, Tier};

use serde::{Deserialize, Deserializer};

/// Backend user identifier.
pub type UserId = u64;

/// Acknowledgement body returned by mutation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    pub message: Option<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: Option<String>,
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
