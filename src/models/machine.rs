// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Machine identification guide.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::null_to_default;

/// Hint labels the app offers in place of real image-recognition output.
pub const MACHINE_HINTS: &[&str] = &["leg press", "lat pulldown", "rowing machine"];

/// Structured guide returned by `POST /machines/identify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct MachineGuide {
    pub machine_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub primary_muscles: Vec<String>,
    /// Technique cues
    #[serde(default, deserialize_with = "null_to_default")]
    pub cues: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub instructions: Vec<String>,
    pub label: String,
}

/// Body of `POST /machines/identify`.
#[derive(Debug, Serialize)]
pub struct IdentifyRequest<'a> {
    pub labels: Vec<&'a str>,
}
