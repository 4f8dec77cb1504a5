//! Maps a score and its transaction to display values.
//!
//! Everything here is a pure function of its inputs and is recomputed on every
//! analysis.

use crate::models::{RemotePrediction, RiskScore, ScoreOutcome, ScoreSource, Transaction};
use serde::Serialize;

/// Circumference of the half-circle gauge arc in SVG units.
pub const GAUGE_ARC_LENGTH: f64 = 251.2;

/// Lower bound of the Medium band.
pub const MEDIUM_THRESHOLD: f64 = 30.0;
/// Lower bound of the High band.
pub const HIGH_THRESHOLD: f64 = 70.0;

/// Label shown in place of the risk label when an analysis fails.
pub const ERROR_LABEL: &str = "Analysis Error";
/// Label shown while an analysis is in flight.
pub const PENDING_LABEL: &str = "Analyzing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityColor {
    Success,
    Warning,
    Danger,
}

impl SeverityColor {
    /// CSS custom property the page styles with.
    pub fn token(&self) -> &'static str {
        match self {
            SeverityColor::Success => "--success",
            SeverityColor::Warning => "--warning",
            SeverityColor::Danger => "--danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Buckets any 0-100 value at the 30/70 thresholds.
    pub fn from_value(value: f64) -> Self {
        if value < MEDIUM_THRESHOLD {
            RiskLevel::Low
        } else if value < HIGH_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// Short form used for factor impacts.
    pub fn impact(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn color(&self) -> SeverityColor {
        match self {
            RiskLevel::Low => SeverityColor::Success,
            RiskLevel::Medium => SeverityColor::Warning,
            RiskLevel::High => SeverityColor::Danger,
        }
    }
}

impl From<RiskScore> for RiskLevel {
    fn from(score: RiskScore) -> Self {
        RiskLevel::from_value(score.value())
    }
}

/// Needle and arc position of the half-circle gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeReading {
    /// Needle rotation in degrees, -90 (score 0) to +90 (score 100).
    pub rotation_deg: f64,
    /// Filled share of the arc, 0-1.
    pub arc_fraction: f64,
    /// `stroke-dashoffset` for the fill path.
    pub dash_offset: f64,
}

impl GaugeReading {
    pub fn from_score(score: RiskScore) -> Self {
        let fraction = score.value() / 100.0;
        Self {
            rotation_deg: -90.0 + 180.0 * fraction,
            arc_fraction: fraction,
            dash_offset: GAUGE_ARC_LENGTH - GAUGE_ARC_LENGTH * fraction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    Amount,
    Time,
    Category,
    Balance,
    Location,
}

impl FactorKind {
    pub const ALL: [FactorKind; 5] = [
        FactorKind::Amount,
        FactorKind::Time,
        FactorKind::Category,
        FactorKind::Balance,
        FactorKind::Location,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FactorKind::Amount => "amount",
            FactorKind::Time => "time",
            FactorKind::Category => "category",
            FactorKind::Balance => "balance",
            FactorKind::Location => "location",
        }
    }
}

/// One bar of the risk factor panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorBar {
    pub factor: FactorKind,
    /// Bar width, 0-100.
    pub value: f64,
    pub impact: RiskLevel,
}

impl FactorBar {
    fn new(factor: FactorKind, value: f64) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 100.0)
        } else {
            100.0
        };
        Self {
            factor,
            value,
            impact: RiskLevel::from_value(value),
        }
    }
}

/// Display-only factor values. Derived from the transaction, never from the score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactorBreakdown {
    pub factors: Vec<FactorBar>,
}

impl RiskFactorBreakdown {
    pub fn from_transaction(tx: &Transaction) -> Self {
        let factors = FactorKind::ALL
            .iter()
            .map(|&kind| FactorBar::new(kind, factor_value(kind, tx)))
            .collect();
        Self { factors }
    }

    pub fn get(&self, kind: FactorKind) -> Option<&FactorBar> {
        self.factors.iter().find(|bar| bar.factor == kind)
    }
}

/// Late night and early morning, used by the time bar.
pub fn is_risky_hour(hour: u8) -> bool {
    hour < 5 || hour >= 22
}

fn factor_value(kind: FactorKind, tx: &Transaction) -> f64 {
    match kind {
        FactorKind::Amount => (tx.amount / 5000.0 * 100.0).min(100.0),
        FactorKind::Time => {
            if is_risky_hour(tx.time) {
                80.0
            } else {
                20.0
            }
        }
        FactorKind::Category => {
            if tx.has_risky_category() {
                70.0
            } else {
                30.0
            }
        }
        FactorKind::Balance => {
            if tx.balance <= 0.0 || tx.amount > tx.balance {
                100.0
            } else {
                tx.amount / tx.balance * 100.0
            }
        }
        FactorKind::Location => {
            if tx.has_risky_location() {
                80.0
            } else {
                20.0
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    VerificationRequired,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionIcon {
    Check,
    Warning,
    Danger,
}

impl DecisionIcon {
    /// CSS class list of the icon container.
    pub fn css_class(&self) -> &'static str {
        match self {
            DecisionIcon::Check => "decision-icon",
            DecisionIcon::Warning => "decision-icon warning",
            DecisionIcon::Danger => "decision-icon danger",
        }
    }
}

impl Decision {
    pub fn from_level(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Decision::Approved,
            RiskLevel::Medium => Decision::VerificationRequired,
            RiskLevel::High => Decision::Blocked,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::VerificationRequired => "Additional Verification Required",
            Decision::Blocked => "Blocked",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Decision::Approved => "Transaction Approved",
            Decision::VerificationRequired => "Additional Verification Required",
            Decision::Blocked => "Transaction Blocked",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Decision::Approved => {
                "This transaction appears to be legitimate based on our analysis."
            }
            Decision::VerificationRequired => {
                "This transaction requires additional verification before approval."
            }
            Decision::Blocked => "This transaction has been flagged as potentially fraudulent.",
        }
    }

    pub fn icon(&self) -> DecisionIcon {
        match self {
            Decision::Approved => DecisionIcon::Check,
            Decision::VerificationRequired => DecisionIcon::Warning,
            Decision::Blocked => DecisionIcon::Danger,
        }
    }
}

/// Everything the decision panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionView {
    pub decision: Decision,
    pub label: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: DecisionIcon,
    /// Display confidence, 75-100.
    pub confidence: f64,
}

impl DecisionView {
    pub fn from_score(score: RiskScore) -> Self {
        let decision = Decision::from_level(RiskLevel::from(score));
        Self {
            decision,
            label: decision.label(),
            title: decision.title(),
            description: decision.description(),
            icon: decision.icon(),
            confidence: confidence(score),
        }
    }
}

/// Display confidence in the decision.
///
/// Scores above 50 map to 75-100, scores at or below 50 map to 95-75.
pub fn confidence(score: RiskScore) -> f64 {
    let s = score.value();
    if s > 50.0 {
        75.0 + (s - 50.0) * 0.5
    } else {
        95.0 - s * 0.4
    }
}

/// Complete view model of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub score: RiskScore,
    pub percentage: u8,
    pub level: RiskLevel,
    pub label: &'static str,
    pub color: SeverityColor,
    pub gauge: GaugeReading,
    pub factors: RiskFactorBreakdown,
    pub decision: DecisionView,
    pub source: ScoreSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemotePrediction>,
}

impl RiskReport {
    pub fn new(outcome: ScoreOutcome, tx: &Transaction) -> Self {
        let score = outcome.score;
        let level = RiskLevel::from(score);
        Self {
            score,
            percentage: score.percentage(),
            level,
            label: level.label(),
            color: level.color(),
            gauge: GaugeReading::from_score(score),
            factors: RiskFactorBreakdown::from_transaction(tx),
            decision: DecisionView::from_score(score),
            source: outcome.source,
            remote: outcome.remote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    fn tx() -> Transaction {
        Transaction {
            amount: 2500.0,
            balance: 3000.0,
            age: 22,
            category: "electronics".to_string(),
            time: 23,
            location: "USA".to_string(),
            transaction_type: TransactionType::Purchase,
        }
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_value(29.999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_value(30.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_value(69.999), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_value(70.0), RiskLevel::High);
    }

    #[test]
    fn test_gauge_endpoints() {
        let low = GaugeReading::from_score(RiskScore::new(0.0));
        assert_eq!(low.rotation_deg, -90.0);
        assert_eq!(low.dash_offset, GAUGE_ARC_LENGTH);

        let mid = GaugeReading::from_score(RiskScore::new(50.0));
        assert_eq!(mid.rotation_deg, 0.0);
        assert_eq!(mid.arc_fraction, 0.5);

        let high = GaugeReading::from_score(RiskScore::new(100.0));
        assert_eq!(high.rotation_deg, 90.0);
        assert_eq!(high.dash_offset, 0.0);
    }

    #[test]
    fn test_factor_values() {
        let breakdown = RiskFactorBreakdown::from_transaction(&tx());
        assert_eq!(breakdown.factors.len(), 5);
        assert_eq!(breakdown.get(FactorKind::Amount).unwrap().value, 50.0);
        assert_eq!(breakdown.get(FactorKind::Time).unwrap().value, 80.0);
        assert_eq!(breakdown.get(FactorKind::Category).unwrap().value, 70.0);
        assert_eq!(breakdown.get(FactorKind::Location).unwrap().value, 20.0);

        let balance = breakdown.get(FactorKind::Balance).unwrap();
        assert!((balance.value - 83.333).abs() < 0.01);
        assert_eq!(balance.impact, RiskLevel::High);
    }

    #[test]
    fn test_balance_factor_with_empty_account() {
        let mut t = tx();
        t.balance = 0.0;
        t.amount = 0.0;
        let breakdown = RiskFactorBreakdown::from_transaction(&t);
        assert_eq!(breakdown.get(FactorKind::Balance).unwrap().value, 100.0);
    }

    #[test]
    fn test_confidence_branches() {
        assert_eq!(confidence(RiskScore::new(0.0)), 95.0);
        assert_eq!(confidence(RiskScore::new(50.0)), 75.0);
        assert_eq!(confidence(RiskScore::new(100.0)), 100.0);
        assert_eq!(confidence(RiskScore::new(60.0)), 80.0);
    }

    #[test]
    fn test_decision_mapping() {
        let view = DecisionView::from_score(RiskScore::new(85.0));
        assert_eq!(view.decision, Decision::Blocked);
        assert_eq!(view.label, "Blocked");
        assert_eq!(view.icon.css_class(), "decision-icon danger");

        let view = DecisionView::from_score(RiskScore::new(10.0));
        assert_eq!(view.title, "Transaction Approved");
    }
}
