// Event tracker API server
// Decision: Postgres for storage, Slack for chat; both chosen once at startup
// Decision: Notifications to the log channel are optional

use std::sync::Arc;

use anyhow::{Context, Result};
use event_tracker_api::{build_router, AppState, Config};
use event_tracker_core::{
    EventRecorder, GitHubWebhookVerifier, RandomIdGenerator, SlackRequestVerifier,
};
use event_tracker_slack::{SlackClient, SlackLogNotifier};
use event_tracker_storage::{Database, DbEventSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_tracker_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("event-tracker-api starting...");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(?config, "Configuration loaded");

    // Initialize database
    let db = Database::from_url(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db.ensure_schema()
        .await
        .context("Failed to prepare database schema")?;
    tracing::info!("Connected to database");

    let slack = match &config.slack_api_url {
        Some(api_url) => SlackClient::with_base_url(&config.slack_oauth_token, api_url),
        None => SlackClient::new(&config.slack_oauth_token),
    }
    .context("Failed to create Slack client")?;

    let mut recorder = EventRecorder::new(
        Arc::new(DbEventSink::new(db)),
        Arc::new(RandomIdGenerator::new()),
    );
    match &config.slack_log_channel {
        Some(channel) => {
            tracing::info!(channel = %channel, "Slack log channel configured");
            recorder = recorder.with_notifier(Arc::new(SlackLogNotifier::new(
                slack.clone(),
                channel.clone(),
            )));
        }
        None => tracing::info!("Slack log channel not configured, notifications disabled"),
    }

    let state = AppState::new(
        recorder,
        Arc::new(slack),
        GitHubWebhookVerifier::new(config.github_webhook_secret.as_bytes()),
        SlackRequestVerifier::new(config.slack_signing_secret.as_bytes()),
    );

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    let app = build_router(state, &config.api_prefix);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
