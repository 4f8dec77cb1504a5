use crate::config::Config;
use crate::errors::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ============ Transaction Models ============

/// Categories treated as high risk by both the heuristic and the factor bars.
pub const RISKY_CATEGORIES: [&str; 3] = ["electronics", "travel", "gaming"];

/// Locations treated as high risk by both the heuristic and the factor bars.
pub const RISKY_LOCATIONS: [&str; 2] = ["Nigeria", "Russia"];

/// Kind of money movement being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Purchase,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    /// Wire name used by the prediction API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
        }
    }
}

/// A simulated transaction as entered in the form.
///
/// Created per analysis and owned by the caller; nothing is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount in currency units.
    pub amount: f64,
    /// Account balance before the transaction. May be zero or negative.
    pub balance: f64,
    /// Customer age in years.
    pub age: u32,
    /// Merchant category tag (e.g. "groceries", "electronics").
    pub category: String,
    /// Hour of day, 0-23.
    pub time: u8,
    /// Country or free-form location.
    pub location: String,
    /// Transaction kind.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Checks the input invariants the scoring formula relies on.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(AppError::BadRequest(format!(
                "amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        if !self.balance.is_finite() {
            return Err(AppError::BadRequest("balance must be a finite number".to_string()));
        }
        if self.age == 0 {
            return Err(AppError::BadRequest("age must be positive".to_string()));
        }
        if self.time > 23 {
            return Err(AppError::BadRequest(format!(
                "time must be an hour between 0 and 23, got {}",
                self.time
            )));
        }
        Ok(())
    }

    pub fn has_risky_category(&self) -> bool {
        RISKY_CATEGORIES.contains(&self.category.as_str())
    }

    pub fn has_risky_location(&self) -> bool {
        RISKY_LOCATIONS.contains(&self.location.as_str())
    }

    /// Balance left after the transaction; negative means overdraft.
    pub fn balance_after(&self) -> f64 {
        self.balance - self.amount
    }
}

// ============ Score Models ============

/// Fraud likelihood on a 0-100 scale.
///
/// Always clamped; non-finite inputs collapse to 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RiskScore(f64);

impl RiskScore {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    pub fn new(raw: f64) -> Self {
        if raw.is_finite() {
            Self(raw.clamp(Self::MIN, Self::MAX))
        } else {
            Self(Self::MIN)
        }
    }

    /// Converts a 0-1 probability into a score.
    pub fn from_probability(probability: f64) -> Self {
        Self::new(probability * 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Score rounded for the percentage readout.
    pub fn percentage(&self) -> u8 {
        self.0.round() as u8
    }
}

/// Where a score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Local,
    Remote,
}

/// Result of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub score: RiskScore,
    pub source: ScoreSource,
    /// Raw response when the prediction API answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemotePrediction>,
}

impl ScoreOutcome {
    pub fn local(score: RiskScore) -> Self {
        Self {
            score,
            source: ScoreSource::Local,
            remote: None,
        }
    }

    pub fn remote(prediction: RemotePrediction) -> Self {
        Self {
            score: RiskScore::from_probability(prediction.fraud_probability),
            source: ScoreSource::Remote,
            remote: Some(prediction),
        }
    }
}

// ============ Prediction API Models ============

/// Request body for `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub amount: f64,
    pub old_balance: f64,
    pub new_balance: f64,
    pub age: u32,
    pub category: String,
    pub gender: String,
    pub transaction_type: String,
    pub location: String,
    pub timestamp: String,
    pub customer_id: String,
    pub merchant: String,
}

impl PredictionRequest {
    /// Builds the request for a transaction using the fixed demo identifiers.
    pub fn from_transaction(tx: &Transaction, config: &Config, at: DateTime<Utc>) -> Self {
        Self {
            amount: tx.amount,
            old_balance: tx.balance,
            new_balance: tx.balance_after(),
            age: tx.age,
            category: tx.category.clone(),
            gender: config.demo_gender.clone(),
            transaction_type: tx.transaction_type.as_str().to_string(),
            location: tx.location.clone(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            customer_id: config.demo_customer_id.clone(),
            merchant: config.demo_merchant.clone(),
        }
    }
}

/// Response body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePrediction {
    /// Probability in [0, 1].
    pub fraud_probability: f64,
    pub is_fraud: bool,
    pub threshold: f64,
    /// "LOW", "MEDIUM" or "HIGH".
    pub risk_level: String,
}

impl RemotePrediction {
    pub fn has_valid_probability(&self) -> bool {
        self.fraud_probability.is_finite() && (0.0..=1.0).contains(&self.fraud_probability)
    }
}

/// Request body for `POST /predict_batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionRequest {
    pub transactions: Vec<PredictionRequest>,
}

/// One entry of a batch response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictionItem {
    pub transaction_index: usize,
    pub is_fraud: bool,
    pub fraud_probability: f64,
    pub risk_level: String,
}

/// Response body of `POST /predict_batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPrediction {
    pub threshold: f64,
    pub total_transactions: usize,
    pub fraud_count: usize,
    pub results: Vec<BatchPredictionItem>,
}

impl BatchPrediction {
    /// Splits the batch into per-transaction predictions ordered by input index.
    ///
    /// Returns `None` unless every index in `0..expected` is present exactly once
    /// with a valid probability.
    pub fn into_predictions(self, expected: usize) -> Option<Vec<RemotePrediction>> {
        let mut slots: Vec<Option<RemotePrediction>> = vec![None; expected];
        for item in self.results {
            let slot = slots.get_mut(item.transaction_index)?;
            if slot.is_some() {
                return None;
            }
            let prediction = RemotePrediction {
                fraud_probability: item.fraud_probability,
                is_fraud: item.is_fraud,
                threshold: self.threshold,
                risk_level: item.risk_level,
            };
            if !prediction.has_valid_probability() {
                return None;
            }
            *slot = Some(prediction);
        }
        slots.into_iter().collect()
    }
}
