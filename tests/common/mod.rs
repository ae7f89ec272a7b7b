// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process fake coach backend for integration tests.
//!
//! Serves the coach API on an ephemeral port, records every request and
//! supports per-route scripted replies and delays.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use coach_client::config::Config;
use coach_client::CoachController;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request as seen by the fake backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedCall {
    pub method: String,
    /// Path with the `/api` prefix stripped
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

impl RecordedCall {
    /// `"METHOD /path"`
    #[allow(dead_code)]
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
}

#[derive(Default)]
struct BackendState {
    calls: Vec<RecordedCall>,
    users: HashMap<String, (u64, String)>,
    next_user_id: u64,
    tiers: HashMap<u64, (String, Option<String>)>,
    preferences: HashMap<u64, Value>,
    overrides: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
}

/// Handle to a running fake backend.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<BackendState>>,
}

#[allow(dead_code)]
impl FakeBackend {
    /// All recorded calls, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Recorded routes, e.g. `["POST /users", "GET /subscription/1"]`.
    pub fn routes(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::route).collect()
    }

    /// Always answer `route` with `status` and a raw body.
    pub fn respond_with(&self, route: &str, status: u16, body: impl Into<String>) {
        self.inner.lock().unwrap().overrides.insert(
            route.to_string(),
            Reply {
                status,
                body: body.into(),
            },
        );
    }

    /// Go back to the default behavior for `route`.
    pub fn clear_override(&self, route: &str) {
        self.inner.lock().unwrap().overrides.remove(route);
    }

    /// Delay replies for `route`.
    pub fn delay(&self, route: &str, delay: Duration) {
        self.inner
            .lock()
            .unwrap()
            .delays
            .insert(route.to_string(), delay);
    }

    /// Seed an existing account.
    pub fn add_user(&self, email: &str, password: &str) -> u64 {
        let mut state = self.inner.lock().unwrap();
        state.next_user_id += 1;
        let id = state.next_user_id;
        state
            .users
            .insert(email.to_string(), (id, password.to_string()));
        state.tiers.insert(id, ("ad-supported".to_string(), None));
        id
    }

    /// Force a stored tier.
    pub fn set_tier(&self, user_id: u64, tier: &str, renewal_date: Option<&str>) {
        self.inner
            .lock()
            .unwrap()
            .tiers
            .insert(user_id, (tier.to_string(), renewal_date.map(str::to_string)));
    }
}

/// Start the fake backend and a controller pointed at it.
#[allow(dead_code)]
pub async fn spawn_backend() -> (FakeBackend, CoachController) {
    let backend = FakeBackend::default();
    let app = Router::new().fallback(handle).with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config::with_api_base(&format!("http://{}/api", addr)).unwrap();
    let controller = CoachController::from_config(&config).unwrap();
    (backend, controller)
}

async fn handle(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let query: HashMap<String, String> = uri
        .query()
        .map(|q| {
            q.split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.replace('+', " ")))
                .collect()
        })
        .unwrap_or_default();
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    let route = format!("{} {}", method, path);

    let delay = {
        let mut state = backend.inner.lock().unwrap();
        state.calls.push(RecordedCall {
            method: method.to_string(),
            path: path.clone(),
            query: query.clone(),
            body: body.clone(),
        });
        state.delays.get(&route).copied()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let reply = {
        let mut state = backend.inner.lock().unwrap();
        let scripted = state.overrides.get(&route).cloned();
        match scripted {
            Some(reply) => reply,
            None => default_reply(&mut state, &method, &path, body.unwrap_or(Value::Null)),
        }
    };

    (
        StatusCode::from_u16(reply.status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

fn ok(body: Value) -> Reply {
    status(200, body)
}

fn status(code: u16, body: Value) -> Reply {
    Reply {
        status: code,
        body: body.to_string(),
    }
}

fn default_reply(state: &mut BackendState, method: &Method, path: &str, body: Value) -> Reply {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("POST", ["users"]) => {
            let email = body["email"].as_str().unwrap_or_default().to_string();
            let password = body["password"].as_str().unwrap_or_default().to_string();
            if email.is_empty() || password.is_empty() {
                return status(400, json!({"error": "Email and password are required."}));
            }
            if state.users.contains_key(&email) {
                return status(409, json!({"error": "Email already in use."}));
            }
            state.next_user_id += 1;
            let id = state.next_user_id;
            state.users.insert(email.clone(), (id, password));
            state.tiers.insert(id, ("ad-supported".to_string(), None));
            status(
                201,
                json!({
                    "user_id": id,
                    "email": email,
                    "name": body["name"],
                    "subscription": "ad-supported"
                }),
            )
        }
        ("POST", ["login"]) => {
            let email = body["email"].as_str().unwrap_or_default();
            let password = body["password"].as_str().unwrap_or_default();
            match state.users.get(email) {
                Some((id, stored)) if stored == password => {
                    ok(json!({"user_id": id, "email": email, "name": "Demo Coach"}))
                }
                _ => status(401, json!({"error": "Invalid credentials."})),
            }
        }
        ("POST", ["preferences"]) => {
            let Some(user_id) = body["user_id"].as_u64() else {
                return status(400, json!({"error": "user_id is required."}));
            };
            state.preferences.insert(user_id, body);
            ok(json!({"message": "Preferences updated."}))
        }
        ("GET", ["preferences", id]) => {
            let id: u64 = id.parse().unwrap_or_default();
            match state.preferences.get(&id) {
                Some(stored) => ok(stored.clone()),
                None => status(404, json!({"error": "No preferences found."})),
            }
        }
        ("GET", ["plan", "workouts"]) => ok(json!({
            "goal": "lose_weight",
            "level": "beginner",
            "plan": {
                "dag_1": [{
                    "title": "Brisk walk",
                    "description": "Steady pace outdoors.",
                    "duration_minutes": 30,
                    "equipment": "None",
                    "primary_muscles": ["legs", "core"],
                    "instructions": ["Warm up for 5 minutes", "Walk briskly"],
                    "level": "beginner",
                    "goal": "lose_weight"
                }],
                "dag_2": [{
                    "title": "Bodyweight circuit",
                    "description": "Three rounds.",
                    "duration_minutes": 25,
                    "equipment": "Mat",
                    "primary_muscles": ["full body"],
                    "instructions": ["Squats", "Push-ups", "Plank"],
                    "level": "all",
                    "goal": "lose_weight"
                }]
            }
        })),
        ("GET", ["plan", "meals"]) => ok(json!({
            "goal": "lose_weight",
            "diet_type": "standard",
            "total_daily_calories": 950,
            "plan": {
                "breakfast": [{
                    "title": "Greek yoghurt with berries",
                    "calories": 350,
                    "protein": 25,
                    "carbs": 40,
                    "fats": 8,
                    "instructions": "Mix and serve.",
                    "diet_type": "standard"
                }],
                "dinner": [{
                    "title": "Salmon with vegetables",
                    "calories": 600,
                    "protein": 40,
                    "carbs": 30,
                    "fats": 28,
                    "instructions": "Bake for 20 minutes.",
                    "diet_type": "standard"
                }]
            }
        })),
        ("POST", ["machines", "identify"]) => {
            let labels: Vec<String> = body["labels"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_lowercase))
                        .collect()
                })
                .unwrap_or_default();
            if labels.is_empty() {
                return status(400, json!({"error": "Provide at least one label."}));
            }
            if labels.iter().any(|l| l == "leg press") {
                ok(json!({
                    "machine_name": "Leg press",
                    "primary_muscles": ["quadriceps", "glutes"],
                    "cues": ["Keep your back flat"],
                    "instructions": ["Set the seat", "Press through the heels"],
                    "label": "leg_press"
                }))
            } else {
                status(
                    404,
                    json!({"message": "No exact match.", "labels_tested": labels}),
                )
            }
        }
        ("POST", ["ads", "daily"]) => {
            let user_id = body["user_id"].as_u64().unwrap_or_default();
            match state.tiers.get(&user_id) {
                Some((tier, _)) if tier == "ad-supported" => ok(json!({
                    "ad": {
                        "id": 1,
                        "title": "Try premium",
                        "body": "Unlock personal coaching.",
                        "image_url": "https://example.com/premium.jpg",
                        "cta_label": "Upgrade",
                        "cta_url": "https://example.com/premium",
                        "target_tier": "ad-supported"
                    },
                    "served_on": "2026-10-19"
                })),
                _ => ok(json!({"message": "Premium users see no ads"})),
            }
        }
        ("GET", ["subscription", id]) => {
            let id: u64 = id.parse().unwrap_or_default();
            match state.tiers.get(&id) {
                Some((tier, renewal)) => {
                    ok(json!({"user_id": id, "tier": tier, "renewal_date": renewal}))
                }
                None => status(404, json!({"error": "No subscription found."})),
            }
        }
        ("POST", ["subscription"]) => {
            let user_id = body["user_id"].as_u64().unwrap_or_default();
            let tier = body["tier"].as_str().unwrap_or_default().to_string();
            if user_id == 0 || !(tier == "premium" || tier == "ad-supported") {
                return status(400, json!({"error": "Invalid subscription details."}));
            }
            let renewal = (tier == "premium").then(|| "2026-11-18".to_string());
            state.tiers.insert(user_id, (tier.clone(), renewal.clone()));
            ok(json!({"message": "Subscription updated.", "tier": tier, "renewal_date": renewal}))
        }
        ("GET", ["health"]) => ok(json!({"status": "ok", "time": "2026-10-19T08:00:00"})),
        _ => status(404, json!({"error": "Not found"})),
    }
}
