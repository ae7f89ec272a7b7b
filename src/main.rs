// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach client CLI
//!
//! Authenticates against the coach backend, runs one action and prints the
//! resulting client state as JSON.
//!
//! ```bash
//! coach-client --email demo@coach.se --password demo1234 workouts
//! coach-client --register --name "Demo Coach" --email new@coach.se --password pw meals
//! coach-client --email demo@coach.se --password demo1234 identify "leg press"
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use coach_client::{
    config::Config,
    models::{AuthMode, Credentials, Diet, Goal, Level, MACHINE_HINTS},
    CoachController,
};
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "coach-client")]
#[command(author, version, about = "AI Coach API client")]
struct Cli {
    /// Account email
    #[arg(long, env = "COACH_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "COACH_PASSWORD")]
    password: Option<String>,

    /// Display name (registration only)
    #[arg(long, default_value = "")]
    name: String,

    /// Create the account instead of logging in
    #[arg(long)]
    register: bool,

    /// Primary goal: lose_weight, get_fit, build_strength
    #[arg(long, default_value = "lose_weight")]
    goal: Goal,

    /// Experience level: beginner, intermediate
    #[arg(long, default_value = "beginner")]
    level: Level,

    /// Diet: standard, vegetarian, high_protein
    #[arg(long, default_value = "standard")]
    diet: Diet,

    /// Comma-separated allergies
    #[arg(long, default_value = "")]
    allergies: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the workout plan
    Workouts,
    /// Fetch the meal plan
    Meals,
    /// Identify a gym machine from a hint label
    Identify {
        /// Hint label, e.g. "leg press"
        hint: Option<String>,
    },
    /// Fetch today's advertisement
    Ad,
    /// Show the current subscription
    Subscription,
    /// Switch between premium and ad-supported
    ToggleSubscription,
    /// Save the preference flags to the backend
    Preferences,
    /// Check backend health without logging in
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(api_base = %config.api_base, "Starting coach client");

    let controller =
        CoachController::from_config(&config).context("Failed to create API client")?;

    controller.set_goal(cli.goal).await;
    controller.set_level(cli.level).await;
    controller.set_diet(cli.diet).await;
    controller.set_allergies(cli.allergies.as_str()).await;

    let outcome = run(&controller, &cli).await;
    if let Err(err) = &outcome {
        tracing::error!(error = %err, "Command failed");
    }

    let snapshot = controller.snapshot().await;
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &snapshot)?;
    writeln!(stdout)?;

    outcome.map_err(Into::into)
}

async fn run(controller: &CoachController, cli: &Cli) -> coach_client::error::Result<()> {
    if let Some(Commands::Health) = cli.command {
        return controller.health_check().await.map(|_| ());
    }

    let mode = if cli.register {
        AuthMode::Register
    } else {
        AuthMode::Login
    };
    let credentials = Credentials::new(
        cli.email.clone().unwrap_or_default(),
        cli.password.clone().unwrap_or_default(),
        &cli.name,
    );
    controller.authenticate(mode, credentials).await?;

    match &cli.command {
        None | Some(Commands::Health) => Ok(()),
        Some(Commands::Workouts) => controller.fetch_workout_plan().await,
        Some(Commands::Meals) => controller.fetch_meal_plan().await,
        Some(Commands::Identify { hint }) => {
            let hint = hint.as_deref().unwrap_or(MACHINE_HINTS[0]);
            controller.identify_machine(hint).await
        }
        Some(Commands::Ad) => controller.fetch_daily_ad().await,
        Some(Commands::Subscription) => controller.fetch_subscription(None).await.map(|_| ()),
        Some(Commands::ToggleSubscription) => {
            controller.toggle_subscription().await.map(|_| ())
        }
        Some(Commands::Preferences) => controller.save_preferences().await,
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coach_client=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
