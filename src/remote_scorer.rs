use crate::models::{ScoreOutcome, Transaction};
use crate::prediction_client::PredictionClient;
use crate::scoring::LocalScorer;

/// Scores through the prediction API, degrading to the local heuristic.
///
/// One attempt per call. Any failure (transport, status, body) yields the
/// local score for the same transaction.
#[derive(Clone)]
pub struct RemoteScorer {
    client: PredictionClient,
    fallback: LocalScorer,
}

impl RemoteScorer {
    pub fn new(client: PredictionClient, fallback: LocalScorer) -> Self {
        Self { client, fallback }
    }

    pub fn fallback(&self) -> &LocalScorer {
        &self.fallback
    }

    pub async fn score(&self, tx: &Transaction) -> ScoreOutcome {
        match self.client.predict(tx).await {
            Ok(prediction) => {
                tracing::info!(
                    score = prediction.fraud_probability * 100.0,
                    is_fraud = prediction.is_fraud,
                    threshold = prediction.threshold,
                    risk_level = %prediction.risk_level,
                    "Prediction API response"
                );
                ScoreOutcome::remote(prediction)
            }
            Err(e) => {
                tracing::warn!("Prediction API unavailable, using local scoring: {}", e);
                ScoreOutcome::local(self.fallback.score(tx))
            }
        }
    }

    /// Scores a batch with one `/predict_batch` call.
    ///
    /// Falls back to local scoring for every transaction when the call fails or
    /// the response does not cover each input exactly once.
    pub async fn score_batch(&self, txs: &[Transaction]) -> Vec<ScoreOutcome> {
        if txs.is_empty() {
            return Vec::new();
        }

        let predictions = match self.client.predict_batch(txs).await {
            Ok(batch) => {
                tracing::info!(
                    "Prediction API batch response: {} transactions, {} flagged (threshold {})",
                    batch.total_transactions,
                    batch.fraud_count,
                    batch.threshold
                );
                let predictions = batch.into_predictions(txs.len());
                if predictions.is_none() {
                    tracing::warn!("Batch prediction response does not match the request");
                }
                predictions
            }
            Err(e) => {
                tracing::warn!("Batch prediction failed, using local scoring: {}", e);
                None
            }
        };

        match predictions {
            Some(predictions) => predictions.into_iter().map(ScoreOutcome::remote).collect(),
            None => {
                tracing::debug!("Scoring {} transactions locally", txs.len());
                txs.iter()
                    .map(|tx| ScoreOutcome::local(self.fallback.score(tx)))
                    .collect()
            }
        }
    }
}
