use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fraud_risk_sim::analysis::Analyzer;
use fraud_risk_sim::config::Config;
use fraud_risk_sim::handlers::{self, AppState};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The analyzer (local heuristic or prediction API with fallback).
/// - HTTP routes and middleware (CORS, body limit).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraud_risk_sim=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let analyzer = Analyzer::from_config(&config)?;

    let app_state = Arc::new(AppState {
        config: config.clone(),
        analyzer,
    });

    let api_routes = Router::new()
        .route("/api/v1/analyze", post(handlers::analyze_transaction))
        .route("/api/v1/analyze/batch", post(handlers::analyze_batch))
        .route("/api/v1/scenarios", get(handlers::list_scenarios))
        .route("/api/v1/scenarios/:name", post(handlers::analyze_scenario))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload
                .layer(RequestBodyLimitLayer::new(1024 * 1024)),
        );

    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
