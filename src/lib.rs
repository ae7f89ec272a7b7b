// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coach client: talk to the AI Coach backend
//!
//! This crate provides a typed client for the coach API and a controller
//! that sequences authentication, preference sync and content fetches while
//! keeping one consistent status for a UI to render.

pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod services;
pub mod status;

pub use config::Config;
pub use controller::{CoachController, StateSnapshot};
pub use error::ClientError;
pub use services::CoachApiClient;
pub use status::{Action, Status};
