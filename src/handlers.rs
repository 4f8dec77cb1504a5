use crate::analysis::Analyzer;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::Transaction;
use crate::presentation::RiskReport;
use crate::scenarios::{format_hour, Scenario};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Scoring and presentation pipeline.
    pub analyzer: Analyzer,
}

/// Body of `POST /api/v1/analyze/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
pub struct BatchAnalyzeResponse {
    pub total_transactions: usize,
    pub blocked_count: usize,
    pub reports: Vec<RiskReport>,
}

/// A preset as listed by `GET /api/v1/scenarios`.
#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub name: &'static str,
    pub time_label: String,
    pub transaction: Transaction,
}

/// Health check endpoint.
///
/// Returns the service status and the active scoring strategy.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "fraud-risk-sim",
            "version": env!("CARGO_PKG_VERSION"),
            "scoring": state.analyzer.strategy().name(),
        })),
    )
}

/// POST /api/v1/analyze
///
/// Scores one transaction and returns the full risk report.
///
/// # Returns
///
/// * `Result<Json<RiskReport>, AppError>` - The report, or 400 for invalid input.
pub async fn analyze_transaction(
    State(state): State<Arc<AppState>>,
    Json(tx): Json<Transaction>,
) -> Result<Json<RiskReport>, AppError> {
    tracing::info!("POST /analyze - {:?}", tx);

    let report = state.analyzer.analyze(&tx).await?;
    Ok(Json(report))
}

/// POST /api/v1/analyze/batch
///
/// Scores several transactions; the prediction API is called once for the
/// whole batch when configured.
pub async fn analyze_batch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BatchAnalyzeRequest>,
) -> Result<Json<BatchAnalyzeResponse>, AppError> {
    tracing::info!("POST /analyze/batch - {} transactions", payload.transactions.len());

    if payload.transactions.is_empty() {
        return Err(AppError::BadRequest(
            "At least one transaction is required".to_string(),
        ));
    }

    let reports = state.analyzer.analyze_batch(&payload.transactions).await?;
    let blocked_count = reports
        .iter()
        .filter(|r| r.decision.decision == crate::presentation::Decision::Blocked)
        .count();

    Ok(Json(BatchAnalyzeResponse {
        total_transactions: reports.len(),
        blocked_count,
        reports,
    }))
}

/// GET /api/v1/scenarios
///
/// Lists the preset transactions offered by the simulator form.
pub async fn list_scenarios() -> Json<Vec<ScenarioSummary>> {
    let scenarios = Scenario::ALL
        .iter()
        .map(|scenario| {
            let transaction = scenario.transaction();
            ScenarioSummary {
                name: scenario.name(),
                time_label: format_hour(transaction.time),
                transaction,
            }
        })
        .collect();

    Json(scenarios)
}

/// POST /api/v1/scenarios/:name
///
/// Loads a preset and analyzes it immediately.
pub async fn analyze_scenario(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RiskReport>, AppError> {
    tracing::info!("POST /scenarios/{}", name);

    let scenario: Scenario = name.parse()?;
    let report = state.analyzer.analyze(&scenario.transaction()).await?;
    Ok(Json(report))
}
