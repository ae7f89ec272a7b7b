// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared status signal for controller actions.
//!
//! Every action invocation takes a [`Ticket`]. The status belongs to the most
//! recently started invocation; completions of older invocations are counted
//! but do not overwrite it.

use serde::Serialize;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Controller actions that report through the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Authenticate,
    SavePreferences,
    LoadPreferences,
    WorkoutPlan,
    MealPlan,
    IdentifyMachine,
    DailyAd,
    Subscription,
    ToggleSubscription,
    HealthCheck,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Authenticate => "authenticate",
            Action::SavePreferences => "save_preferences",
            Action::LoadPreferences => "load_preferences",
            Action::WorkoutPlan => "workout_plan",
            Action::MealPlan => "meal_plan",
            Action::IdentifyMachine => "identify_machine",
            Action::DailyAd => "daily_ad",
            Action::Subscription => "subscription",
            Action::ToggleSubscription => "toggle_subscription",
            Action::HealthCheck => "health_check",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user currently sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Busy { action: Action },
    Failed { action: Action, message: String },
}

impl Status {
    pub fn is_busy(&self) -> bool {
        matches!(self, Status::Busy { .. })
    }

    /// Error text, if the owning action failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Status::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Handle for one action invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    action: Action,
}

impl Ticket {
    pub fn action(&self) -> Action {
        self.action
    }
}

/// Status plus the separate informational notice.
#[derive(Debug, Default)]
pub struct StatusBoard {
    status: Status,
    notice: Option<String>,
    owner: u64,
    next_seq: u64,
    in_flight: usize,
}

impl StatusBoard {
    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Number of started actions that have not finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn take_ownership(&mut self, action: Action) -> Ticket {
        self.next_seq += 1;
        self.owner = self.next_seq;
        Ticket {
            seq: self.next_seq,
            action,
        }
    }

    /// Start an action: it becomes the owner, prior error and notice are cleared.
    pub fn begin(&mut self, action: Action) -> Ticket {
        let ticket = self.take_ownership(action);
        self.in_flight += 1;
        self.status = Status::Busy { action };
        self.notice = None;
        ticket
    }

    /// Record an action that failed before doing any work (no busy phase).
    pub fn reject(&mut self, action: Action, message: impl Into<String>) {
        self.take_ownership(action);
        self.status = Status::Failed {
            action,
            message: message.into(),
        };
        self.notice = None;
    }

    /// Whether `ticket` still owns the status.
    pub fn owns(&self, ticket: Ticket) -> bool {
        ticket.seq == self.owner
    }

    /// Finish an action. Returns false when a newer action owns the status
    /// and it was left untouched.
    pub fn finish(&mut self, ticket: Ticket, error: Option<String>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !self.owns(ticket) {
            return false;
        }
        self.status = match error {
            None => Status::Idle,
            Some(message) => Status::Failed {
                action: ticket.action,
                message,
            },
        };
        true
    }

    /// Set the informational notice on behalf of the owning action.
    pub fn notify(&mut self, ticket: Ticket, notice: Option<String>) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        self.notice = notice;
        true
    }

    /// Drop ownership from everything in flight and return to idle.
    pub fn reset(&mut self) {
        self.next_seq += 1;
        self.owner = self.next_seq;
        self.status = Status::Idle;
        self.notice = None;
    }
}
