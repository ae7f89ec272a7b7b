// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and content controller.
//!
//! Owns the session, the local drafts and one display slice per fetcher.
//! Each action follows the same shape: take a ticket on the status board,
//! release the lock, await the backend, then lock again to write its own
//! slice and report completion. The lock is never held across a request.
//!
//! Slices are only written if the session that started the action is still
//! the current one, so a late response cannot leak into a new session. Every
//! logout and every established session bumps a session epoch; a logout
//! followed by a login as the same user is still a new session.

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{
    Advertisement, AuthMode, Credentials, DailyAd, Diet, Goal, Level, MachineGuide, MealPlan,
    PreferencesDraft, Session, Subscription, Tier, UserId, WorkoutPlan,
};
use crate::services::CoachApiClient;
use crate::status::{Action, Status, StatusBoard, Ticket};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Everything the controller keeps in memory.
#[derive(Debug, Default)]
struct ClientState {
    session: Option<Session>,
    auth_mode: AuthMode,
    credentials: Credentials,
    preferences: PreferencesDraft,
    workout_plan: Option<WorkoutPlan>,
    meal_plan: Option<MealPlan>,
    machine_guide: Option<MachineGuide>,
    advertisement: Option<Advertisement>,
    subscription: Option<Subscription>,
    board: StatusBoard,
    epoch: u64,
}

/// Identifies the session an action was started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionKey {
    user_id: UserId,
    epoch: u64,
}

impl ClientState {
    fn user_id(&self) -> Option<UserId> {
        self.session.as_ref().map(|s| s.user_id)
    }

    fn session_key(&self) -> Option<SessionKey> {
        self.user_id().map(|user_id| SessionKey {
            user_id,
            epoch: self.epoch,
        })
    }

    /// True if the session behind `key` is still the current one.
    fn is_current(&self, key: SessionKey) -> bool {
        self.session_key() == Some(key)
    }

    /// Install a new session and return its key.
    fn establish(&mut self, session: Session) -> SessionKey {
        self.epoch += 1;
        let key = SessionKey {
            user_id: session.user_id,
            epoch: self.epoch,
        };
        self.session = Some(session);
        key
    }

    fn clear_user_slices(&mut self) {
        self.workout_plan = None;
        self.meal_plan = None;
        self.machine_guide = None;
        self.advertisement = None;
        self.subscription = None;
    }
}

/// Serializable copy of the display state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct StateSnapshot {
    pub session: Option<Session>,
    pub auth_mode: AuthMode,
    pub email: String,
    pub name: String,
    pub preferences: PreferencesDraft,
    pub allergies: Vec<String>,
    pub workout_plan: Option<WorkoutPlan>,
    pub meal_plan: Option<MealPlan>,
    pub machine_guide: Option<MachineGuide>,
    pub advertisement: Option<Advertisement>,
    pub subscription: Option<Subscription>,
    pub status: Status,
    pub notice: Option<String>,
    pub in_flight: usize,
}

/// Client-side orchestration over the coach API.
///
/// Cheap to clone; clones share state, so actions may run concurrently from
/// several tasks.
#[derive(Clone)]
pub struct CoachController {
    api: CoachApiClient,
    state: Arc<RwLock<ClientState>>,
}

impl CoachController {
    pub fn new(api: CoachApiClient) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(ClientState::default())),
        }
    }

    /// Build the API client from config and wrap it.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(CoachApiClient::new(config)?))
    }

    // ─── Drafts ──────────────────────────────────────────────────

    pub async fn set_auth_mode(&self, mode: AuthMode) {
        self.state.write().await.auth_mode = mode;
    }

    pub async fn set_credentials(&self, credentials: Credentials) {
        self.state.write().await.credentials = credentials;
    }

    pub async fn set_goal(&self, goal: Goal) {
        self.state.write().await.preferences.goal = goal;
    }

    pub async fn set_level(&self, level: Level) {
        self.state.write().await.preferences.level = level;
    }

    pub async fn set_diet(&self, diet: Diet) {
        self.state.write().await.preferences.diet = diet;
    }

    /// Set the free-text, comma-separated allergy field.
    pub async fn set_allergies(&self, text: impl Into<String>) {
        self.state.write().await.preferences.allergies_text = text.into();
    }

    pub async fn set_training_frequency(&self, per_week: u32) {
        self.state.write().await.preferences.training_frequency = per_week;
    }

    // ─── Reads ───────────────────────────────────────────────────

    pub async fn snapshot(&self) -> StateSnapshot {
        let st = self.state.read().await;
        StateSnapshot {
            session: st.session.clone(),
            auth_mode: st.auth_mode,
            email: st.credentials.email.clone(),
            name: st.credentials.name.clone(),
            preferences: st.preferences.clone(),
            allergies: st.preferences.allergies(),
            workout_plan: st.workout_plan.clone(),
            meal_plan: st.meal_plan.clone(),
            machine_guide: st.machine_guide.clone(),
            advertisement: st.advertisement.clone(),
            subscription: st.subscription.clone(),
            status: st.board.status().clone(),
            notice: st.board.notice().map(str::to_string),
            in_flight: st.board.in_flight(),
        }
    }

    pub async fn status(&self) -> Status {
        self.state.read().await.board.status().clone()
    }

    pub async fn notice(&self) -> Option<String> {
        self.state.read().await.board.notice().map(str::to_string)
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    pub async fn user_id(&self) -> Option<UserId> {
        self.state.read().await.user_id()
    }

    /// Content actions are enabled only with a session.
    pub async fn can_use_content(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    // ─── Session ─────────────────────────────────────────────────

    /// Authenticate using the drafted mode and credentials.
    pub async fn submit_auth(&self) -> Result<UserId> {
        let (mode, credentials) = {
            let st = self.state.read().await;
            (st.auth_mode, st.credentials.clone())
        };
        self.authenticate(mode, credentials).await
    }

    /// Register or log in, then sync preferences (register only) and fetch
    /// the subscription for the returned identifier.
    pub async fn authenticate(&self, mode: AuthMode, credentials: Credentials) -> Result<UserId> {
        let (ticket, credentials, preferences) = {
            let mut st = self.state.write().await;
            st.auth_mode = mode;
            st.credentials = credentials;
            let credentials = match st.credentials.validated() {
                Ok(valid) => valid,
                Err(err) => {
                    st.board.reject(Action::Authenticate, err.user_message());
                    return Err(err);
                }
            };
            (
                st.board.begin(Action::Authenticate),
                credentials,
                st.preferences.clone(),
            )
        };

        let result = self.run_authenticate(mode, &credentials, &preferences).await;
        self.finish(ticket, &result).await;
        result
    }

    async fn run_authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
        preferences: &PreferencesDraft,
    ) -> Result<UserId> {
        let auth = match mode {
            AuthMode::Register => self.api.register(credentials).await?,
            AuthMode::Login => self.api.login(credentials).await?,
        };
        let user_id = auth.user_id;

        let key = {
            let mut st = self.state.write().await;
            if st.user_id() != Some(user_id) {
                st.clear_user_slices();
            }
            let name = auth
                .name
                .filter(|n| !n.is_empty())
                .or_else(|| (!credentials.name.is_empty()).then(|| credentials.name.clone()));
            st.establish(Session {
                user_id,
                mode,
                email: auth.email.unwrap_or_else(|| credentials.email.clone()),
                name,
                preferences_synced: mode == AuthMode::Login,
            })
        };
        tracing::info!(user_id, epoch = key.epoch, mode = ?mode, "Session established");

        if mode == AuthMode::Register {
            // Failure here keeps the session; see `save_preferences`.
            self.api
                .set_preferences(&preferences.to_request(user_id))
                .await?;
            self.mark_preferences_synced(key).await;
        }

        self.refresh_subscription(key).await?;
        Ok(user_id)
    }

    /// Tear down the session and every user-bound slice.
    ///
    /// Actions still in flight lose ownership of the status and their
    /// results are discarded.
    pub async fn logout(&self) {
        let mut st = self.state.write().await;
        st.epoch += 1;
        if let Some(session) = st.session.take() {
            tracing::info!(user_id = session.user_id, "Session closed");
        }
        st.clear_user_slices();
        st.board.reset();
    }

    // ─── Preferences ─────────────────────────────────────────────

    /// Submit the preferences draft for the current user.
    pub async fn save_preferences(&self) -> Result<()> {
        let (ticket, key, preferences) = self.begin_for_session(Action::SavePreferences).await?;

        let result = self
            .api
            .set_preferences(&preferences.to_request(key.user_id))
            .await
            .map(|_| ());
        if result.is_ok() {
            self.mark_preferences_synced(key).await;
        }

        self.finish(ticket, &result).await;
        result
    }

    /// Replace the draft with the preferences stored on the backend.
    pub async fn load_preferences(&self) -> Result<()> {
        let (ticket, key, _) = self.begin_for_session(Action::LoadPreferences).await?;

        let result = self.api.get_preferences(key.user_id).await;
        let result = {
            let mut st = self.state.write().await;
            match result {
                Ok(stored) if st.is_current(key) => {
                    st.preferences.apply_stored(&stored);
                    if let Some(session) = st.session.as_mut() {
                        session.preferences_synced = true;
                    }
                    Ok(())
                }
                Ok(_) => Ok(()),
                Err(err) => Err(err),
            }
        };

        self.finish(ticket, &result).await;
        result
    }

    async fn mark_preferences_synced(&self, key: SessionKey) {
        let mut st = self.state.write().await;
        if !st.is_current(key) {
            return;
        }
        if let Some(session) = st.session.as_mut() {
            session.preferences_synced = true;
        }
    }

    // ─── Content fetchers ────────────────────────────────────────

    /// Fetch the workout plan for the drafted goal and level.
    pub async fn fetch_workout_plan(&self) -> Result<()> {
        let (ticket, key, prefs) = self.begin_for_session(Action::WorkoutPlan).await?;

        let result = self
            .api
            .workout_plan(key.user_id, prefs.goal, prefs.level)
            .await;
        let result = {
            let mut st = self.state.write().await;
            result.map(|response| {
                if st.is_current(key) {
                    tracing::info!(
                        user_id = key.user_id,
                        days = response.plan.len(),
                        "Workout plan loaded"
                    );
                    st.workout_plan = Some(response.plan);
                }
            })
        };

        self.finish(ticket, &result).await;
        result
    }

    /// Fetch the meal plan for the drafted goal and diet.
    pub async fn fetch_meal_plan(&self) -> Result<()> {
        let (ticket, key, prefs) = self.begin_for_session(Action::MealPlan).await?;

        let result = self
            .api
            .meal_plan(key.user_id, prefs.goal, prefs.diet)
            .await;
        let result = {
            let mut st = self.state.write().await;
            result.map(|response| {
                if st.is_current(key) {
                    let plan = MealPlan::from(response);
                    tracing::info!(
                        user_id = key.user_id,
                        total_daily_calories = plan.total_daily_calories,
                        "Meal plan loaded"
                    );
                    st.meal_plan = Some(plan);
                }
            })
        };

        self.finish(ticket, &result).await;
        result
    }

    /// Identify a machine from a single hint label.
    ///
    /// On failure any previously shown guide is cleared.
    pub async fn identify_machine(&self, hint: &str) -> Result<()> {
        let (ticket, key, _) = self.begin_for_session(Action::IdentifyMachine).await?;

        let result = self.api.identify_machine(&[hint]).await;
        let result = {
            let mut st = self.state.write().await;
            if st.is_current(key) {
                st.machine_guide = result.as_ref().ok().cloned();
            }
            result.map(|guide| {
                tracing::info!(label = %guide.label, "Machine identified");
            })
        };

        self.finish(ticket, &result).await;
        result
    }

    /// Fetch today's advertisement.
    ///
    /// An informational message from the backend goes to the notice, never
    /// to the error status.
    pub async fn fetch_daily_ad(&self) -> Result<()> {
        let (ticket, key, _) = self.begin_for_session(Action::DailyAd).await?;

        let result = self.api.daily_ad(key.user_id).await;
        let result = {
            let mut st = self.state.write().await;
            result.map(|daily| {
                if !st.is_current(key) {
                    return;
                }
                match daily {
                    DailyAd::Ad { ad, served_on } => {
                        tracing::info!(
                            user_id = key.user_id,
                            title = %ad.title,
                            ?served_on,
                            "Daily ad served"
                        );
                        st.advertisement = Some(ad);
                    }
                    DailyAd::NoAd { message } => {
                        tracing::info!(user_id = key.user_id, message = ?message, "No ad to show");
                        st.advertisement = None;
                        st.board.notify(ticket, message);
                    }
                }
            })
        };

        self.finish(ticket, &result).await;
        result
    }

    /// Fetch the subscription for the session user.
    ///
    /// `user_id` may name the session user explicitly; any other id is
    /// rejected without a request.
    pub async fn fetch_subscription(&self, user_id: Option<UserId>) -> Result<Subscription> {
        let (ticket, key, _) = self.begin_for(Action::Subscription, user_id).await?;

        let result = self.refresh_subscription(key).await;
        self.finish(ticket, &result).await;
        result
    }

    /// Request the opposite tier, then re-read the authoritative state.
    pub async fn toggle_subscription(&self) -> Result<Subscription> {
        let (ticket, key, _) = self.begin_for_session(Action::ToggleSubscription).await?;

        let current = {
            let st = self.state.read().await;
            st.subscription.as_ref().map(|s| s.tier)
        };
        let target = Tier::toggled(current);
        tracing::info!(
            user_id = key.user_id,
            from = ?current,
            to = %target,
            "Changing subscription tier"
        );

        let result = match self.api.set_subscription(key.user_id, target).await {
            Ok(_) => self.refresh_subscription(key).await,
            Err(err) => Err(err),
        };

        self.finish(ticket, &result).await;
        result
    }

    /// GET the subscription and store it, clearing the slice on failure.
    async fn refresh_subscription(&self, key: SessionKey) -> Result<Subscription> {
        let result = self.api.get_subscription(key.user_id).await;

        let mut st = self.state.write().await;
        if st.is_current(key) {
            st.subscription = result.as_ref().ok().cloned();
        }
        result
    }

    // ─── Misc ────────────────────────────────────────────────────

    /// Check backend health. Needs no session; the result goes to the notice.
    pub async fn health_check(&self) -> Result<String> {
        let ticket = self.state.write().await.board.begin(Action::HealthCheck);

        let result = self.api.health().await.map(|health| health.status);
        if let Ok(status) = &result {
            self.state
                .write()
                .await
                .board
                .notify(ticket, Some(format!("Backend status: {}", status)));
        }

        self.finish(ticket, &result).await;
        result
    }

    // ─── Helpers ─────────────────────────────────────────────────

    /// Start a session-guarded action, or record the guard failure.
    async fn begin_for_session(
        &self,
        action: Action,
    ) -> Result<(Ticket, SessionKey, PreferencesDraft)> {
        self.begin_for(action, None).await
    }

    /// Like `begin_for_session`, additionally requiring that an explicitly
    /// requested user is the session user.
    async fn begin_for(
        &self,
        action: Action,
        requested: Option<UserId>,
    ) -> Result<(Ticket, SessionKey, PreferencesDraft)> {
        let mut st = self.state.write().await;
        let Some(key) = st.session_key() else {
            st.board.reject(action, ClientError::LOGIN_REQUIRED);
            tracing::debug!(action = %action, "Rejected without session");
            return Err(ClientError::NotLoggedIn);
        };
        if let Some(requested) = requested.filter(|id| *id != key.user_id) {
            let err = ClientError::Validation(format!(
                "User {} is not the logged-in user.",
                requested
            ));
            st.board.reject(action, err.user_message());
            tracing::debug!(action = %action, requested, "Rejected for another user");
            return Err(err);
        }
        let ticket = st.board.begin(action);
        Ok((ticket, key, st.preferences.clone()))
    }

    /// Report completion to the status board.
    async fn finish<T>(&self, ticket: Ticket, result: &Result<T>) {
        let error = result.as_ref().err().map(ClientError::user_message);
        match &error {
            None => tracing::info!(action = %ticket.action(), "Action completed"),
            Some(message) => {
                tracing::warn!(action = %ticket.action(), error = %message, "Action failed")
            }
        }

        let mut st = self.state.write().await;
        if !st.board.finish(ticket, error) {
            tracing::debug!(
                action = %ticket.action(),
                "Status owned by a newer action; left unchanged"
            );
        }
    }
}
