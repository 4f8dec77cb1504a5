use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    BatchPrediction, BatchPredictionRequest, PredictionRequest, RemotePrediction, Transaction,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Client for the external fraud prediction service.
///
/// Speaks the `/predict` and `/predict_batch` JSON endpoints. It makes exactly
/// one attempt per call; fallback is the caller's job.
#[derive(Clone)]
pub struct PredictionClient {
    client: reqwest::Client,
    base_url: String,
    config: Config,
}

impl PredictionClient {
    /// Creates a new `PredictionClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the prediction service, without trailing path.
    /// * `config` - Supplies the request timeout and the fixed demo identifiers.
    pub fn new(base_url: String, config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.prediction_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create prediction client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests a prediction for a single transaction.
    ///
    /// # Returns
    ///
    /// * `Result<RemotePrediction, AppError>` - The parsed prediction, or an error for
    ///   network failures, non-2xx statuses and malformed bodies.
    pub async fn predict(&self, tx: &Transaction) -> Result<RemotePrediction, AppError> {
        let body = PredictionRequest::from_transaction(tx, &self.config, Utc::now());
        let prediction: RemotePrediction = self.post_json("predict", &body).await?;

        if !prediction.has_valid_probability() {
            return Err(AppError::ExternalApiError(format!(
                "Prediction API returned fraud_probability outside [0, 1]: {}",
                prediction.fraud_probability
            )));
        }

        Ok(prediction)
    }

    /// Requests predictions for several transactions in one call.
    pub async fn predict_batch(&self, txs: &[Transaction]) -> Result<BatchPrediction, AppError> {
        let now = Utc::now();
        let body = BatchPredictionRequest {
            transactions: txs
                .iter()
                .map(|tx| PredictionRequest::from_transaction(tx, &self.config, now))
                .collect(),
        };

        self.post_json("predict_batch", &body).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Prediction request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Prediction API returned {}: {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse prediction response: {}", e))
        })
    }
}
