//! Heuristic fraud scoring.
//!
//! The score is an additive sum of fixed tier contributions plus a small
//! random jitter that stands in for model uncertainty. The jitter comes from a
//! [`JitterSource`] so callers can pin it in tests and demos.

use crate::models::{RiskScore, Transaction, TransactionType};
use rand::Rng;
use serde::Serialize;

/// Half-width of the jitter interval.
pub const JITTER_SPREAD: f64 = 5.0;

/// Supplies the jitter term added to every heuristic score.
pub trait JitterSource {
    /// Returns a value in `[-JITTER_SPREAD, JITTER_SPREAD]`.
    fn sample(&mut self) -> f64;
}

/// Uniform jitter in `[-5, 5)` drawn from any RNG.
pub struct UniformJitter<R: Rng> {
    rng: R,
}

impl<R: Rng> UniformJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> JitterSource for UniformJitter<R> {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(-JITTER_SPREAD..JITTER_SPREAD)
    }
}

/// Constant jitter, used for deterministic scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl FixedJitter {
    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl JitterSource for FixedJitter {
    fn sample(&mut self) -> f64 {
        self.0.clamp(-JITTER_SPREAD, JITTER_SPREAD)
    }
}

/// Per-tier contributions of the heuristic, before jitter and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub amount: f64,
    pub balance: f64,
    pub time: f64,
    pub category: f64,
    pub location: f64,
    pub transaction_type: f64,
    pub age: f64,
}

impl ScoreBreakdown {
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            amount: amount_tier(tx.amount),
            balance: balance_tier(tx.amount, tx.balance),
            time: time_tier(tx.time),
            category: if tx.has_risky_category() { 15.0 } else { 0.0 },
            location: if tx.has_risky_location() { 15.0 } else { 0.0 },
            transaction_type: if tx.transaction_type == TransactionType::Withdrawal
                && tx.amount > 1000.0
            {
                10.0
            } else {
                0.0
            },
            age: if tx.age < 25 || tx.age > 70 { 5.0 } else { 0.0 },
        }
    }

    /// Unclamped sum of all tiers.
    pub fn total(&self) -> f64 {
        self.amount
            + self.balance
            + self.time
            + self.category
            + self.location
            + self.transaction_type
            + self.age
    }
}

pub fn amount_tier(amount: f64) -> f64 {
    if amount > 5000.0 {
        25.0
    } else if amount > 2000.0 {
        15.0
    } else if amount > 1000.0 {
        10.0
    } else {
        0.0
    }
}

/// Balance coverage tier. A balance of zero or below counts as overdraft.
pub fn balance_tier(amount: f64, balance: f64) -> f64 {
    if balance <= 0.0 {
        return 30.0;
    }
    let ratio = amount / balance;
    if ratio > 1.0 {
        30.0
    } else if ratio > 0.8 {
        20.0
    } else if ratio > 0.5 {
        10.0
    } else {
        0.0
    }
}

/// Hour-of-day tier. First matching band wins; bands never add up.
pub fn time_tier(hour: u8) -> f64 {
    match hour {
        0..=4 => 20.0,
        5..=6 | 22..=23 => 10.0,
        _ => 0.0,
    }
}

/// Scores a transaction with the given jitter source.
pub fn calculate_fraud_score(tx: &Transaction, jitter: &mut dyn JitterSource) -> RiskScore {
    let breakdown = ScoreBreakdown::from_transaction(tx);
    let noise = jitter.sample();
    let score = RiskScore::new(breakdown.total() + noise);

    tracing::debug!(
        "Heuristic score {:.2} (tiers {:.0}, jitter {:+.2})",
        score.value(),
        breakdown.total(),
        noise
    );

    score
}

/// How the local scorer picks its jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JitterMode {
    /// Fresh uniform sample per call.
    Uniform,
    /// Same value every call.
    Fixed(f64),
}

/// Stateless local scorer. Safe to share across concurrent analyses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalScorer {
    jitter: JitterMode,
}

impl LocalScorer {
    pub fn new(jitter: JitterMode) -> Self {
        Self { jitter }
    }

    pub fn deterministic() -> Self {
        Self::new(JitterMode::Fixed(0.0))
    }

    pub fn jitter_mode(&self) -> JitterMode {
        self.jitter
    }

    pub fn score(&self, tx: &Transaction) -> RiskScore {
        match self.jitter {
            JitterMode::Uniform => {
                calculate_fraud_score(tx, &mut UniformJitter::new(rand::thread_rng()))
            }
            JitterMode::Fixed(value) => calculate_fraud_score(tx, &mut FixedJitter(value)),
        }
    }
}

impl Default for LocalScorer {
    fn default() -> Self {
        Self::new(JitterMode::Uniform)
    }
}
