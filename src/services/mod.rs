// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend services.

pub mod coach_api;

pub use coach_api::CoachApiClient;
