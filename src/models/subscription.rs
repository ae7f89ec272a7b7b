// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription tier and state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::UserId;

/// Subscription level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub enum Tier {
    /// Ad-free
    #[serde(rename = "premium")]
    Premium,
    #[serde(rename = "ad-supported")]
    AdSupported,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Premium => "premium",
            Tier::AdSupported => "ad-supported",
        }
    }

    /// Tier a toggle should request given the currently known tier.
    ///
    /// An unknown current tier leads to premium.
    pub fn toggled(current: Option<Tier>) -> Tier {
        match current {
            Some(Tier::Premium) => Tier::AdSupported,
            Some(Tier::AdSupported) | None => Tier::Premium,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative subscription state from `GET /subscription/{user_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct Subscription {
    pub tier: Tier,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub renewal_date: Option<NaiveDate>,
}

/// Body of `POST /subscription`.
#[derive(Debug, Clone, Serialize)]
pub struct SetSubscriptionRequest {
    pub user_id: UserId,
    pub tier: Tier,
}
