// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily advertisement.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::UserId;
use crate::error::ClientError;

/// An advertisement as served to ad-supported users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct Advertisement {
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub id: Option<u64>,
    pub title: String,
    pub body: String,
    pub cta_label: String,
    pub cta_url: Option<String>,
    pub image_url: Option<String>,
}

/// Outcome of `POST /ads/daily`, validated at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyAd {
    /// Nothing to show, e.g. premium users or the daily ad was already served.
    NoAd { message: Option<String> },
    Ad {
        ad: Advertisement,
        served_on: Option<NaiveDate>,
    },
}

/// Body of `POST /ads/daily`.
#[derive(Debug, Serialize)]
pub struct DailyAdRequest {
    pub user_id: UserId,
}

/// Raw response shape; only used to build a [`DailyAd`].
#[derive(Debug, Deserialize)]
pub(crate) struct DailyAdResponse {
    ad: Option<serde_json::Value>,
    message: Option<String>,
    served_on: Option<NaiveDate>,
}

impl TryFrom<DailyAdResponse> for DailyAd {
    type Error = ClientError;

    fn try_from(raw: DailyAdResponse) -> Result<Self, Self::Error> {
        match raw.ad {
            None | Some(serde_json::Value::Null) => Ok(DailyAd::NoAd {
                message: raw.message,
            }),
            Some(value) => {
                let ad = serde_json::from_value(value)
                    .map_err(|e| ClientError::Decode(format!("malformed advertisement: {}", e)))?;
                Ok(DailyAd::Ad {
                    ad,
                    served_on: raw.served_on,
                })
            }
        }
    }
}
