use crate::config::Config;
use crate::errors::AppError;
use crate::models::{ScoreOutcome, Transaction};
use crate::prediction_client::PredictionClient;
use crate::presentation::RiskReport;
use crate::remote_scorer::RemoteScorer;
use crate::render::{render_report, RenderSink};
use crate::scoring::{JitterMode, LocalScorer};

/// Which scorer feeds the presentation.
#[derive(Clone)]
pub enum ScoringStrategy {
    Local(LocalScorer),
    Remote(RemoteScorer),
}

impl ScoringStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringStrategy::Local(_) => "local",
            ScoringStrategy::Remote(_) => "remote",
        }
    }
}

/// Runs the score -> presentation pipeline.
///
/// Holds no per-analysis state, so concurrent calls never observe each other.
#[derive(Clone)]
pub struct Analyzer {
    strategy: ScoringStrategy,
}

impl Analyzer {
    pub fn new(strategy: ScoringStrategy) -> Self {
        Self { strategy }
    }

    pub fn local(scorer: LocalScorer) -> Self {
        Self::new(ScoringStrategy::Local(scorer))
    }

    /// Builds the analyzer described by `config`: remote when a prediction URL
    /// is set, local otherwise.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let local = LocalScorer::new(match config.score_jitter {
            Some(value) => JitterMode::Fixed(value),
            None => JitterMode::Uniform,
        });

        let strategy = match config.prediction_api_url {
            Some(ref url) => {
                let client = PredictionClient::new(url.clone(), config)?;
                ScoringStrategy::Remote(RemoteScorer::new(client, local))
            }
            None => ScoringStrategy::Local(local),
        };

        tracing::info!("Analyzer using {} scoring", strategy.name());
        Ok(Self::new(strategy))
    }

    pub fn strategy(&self) -> &ScoringStrategy {
        &self.strategy
    }

    pub async fn score(&self, tx: &Transaction) -> ScoreOutcome {
        match &self.strategy {
            ScoringStrategy::Local(scorer) => ScoreOutcome::local(scorer.score(tx)),
            ScoringStrategy::Remote(scorer) => scorer.score(tx).await,
        }
    }

    /// Validates, scores and presents one transaction.
    pub async fn analyze(&self, tx: &Transaction) -> Result<RiskReport, AppError> {
        tx.validate()?;

        let outcome = self.score(tx).await;
        let report = RiskReport::new(outcome, tx);

        tracing::info!(
            "Analyzed {} {} at {}:00: {}% {} ({:?}, {})",
            tx.transaction_type.as_str(),
            tx.amount,
            tx.time,
            report.percentage,
            report.label,
            report.decision.decision,
            self.strategy.name()
        );

        Ok(report)
    }

    /// Runs an analysis and drives `sink` through pending, then result or error.
    pub async fn analyze_into(
        &self,
        tx: &Transaction,
        sink: &mut dyn RenderSink,
    ) -> Option<RiskReport> {
        sink.show_pending();

        match self.analyze(tx).await {
            Ok(report) => {
                render_report(&report, sink);
                Some(report)
            }
            Err(e) => {
                tracing::warn!("Analysis failed: {}", e);
                sink.show_error(&e.to_string());
                None
            }
        }
    }

    /// Analyzes several transactions, using one batch call when remote.
    ///
    /// Every transaction is validated before anything is scored.
    pub async fn analyze_batch(&self, txs: &[Transaction]) -> Result<Vec<RiskReport>, AppError> {
        for (i, tx) in txs.iter().enumerate() {
            tx.validate().map_err(|e| match e {
                AppError::BadRequest(msg) => {
                    AppError::BadRequest(format!("transaction {}: {}", i, msg))
                }
                other => other,
            })?;
        }

        let outcomes: Vec<ScoreOutcome> = match &self.strategy {
            ScoringStrategy::Local(scorer) => txs
                .iter()
                .map(|tx| ScoreOutcome::local(scorer.score(tx)))
                .collect(),
            ScoringStrategy::Remote(scorer) => scorer.score_batch(txs).await,
        };

        let reports: Vec<RiskReport> = outcomes
            .into_iter()
            .zip(txs)
            .map(|(outcome, tx)| RiskReport::new(outcome, tx))
            .collect();

        tracing::info!("Analyzed batch of {} transactions", reports.len());
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::RiskLevel;
    use crate::render::JsonSink;
    use crate::scenarios::Scenario;

    #[tokio::test]
    async fn test_local_analysis_of_presets() {
        let analyzer = Analyzer::local(LocalScorer::deterministic());

        let report = analyzer.analyze(&Scenario::Normal.transaction()).await.unwrap();
        assert_eq!(report.level, RiskLevel::Low);

        let report = analyzer.analyze(&Scenario::Suspicious.transaction()).await.unwrap();
        assert_eq!(report.percentage, 65);
        assert_eq!(report.level, RiskLevel::Medium);

        let report = analyzer.analyze(&Scenario::Edge.transaction()).await.unwrap();
        assert_eq!(report.percentage, 35);
    }

    #[tokio::test]
    async fn test_invalid_input_renders_error() {
        let analyzer = Analyzer::local(LocalScorer::deterministic());
        let mut tx = Scenario::Normal.transaction();
        tx.age = 0;

        let mut sink = JsonSink::new();
        let report = analyzer.analyze_into(&tx, &mut sink).await;

        assert!(report.is_none());
        assert_eq!(sink.into_value()["status"]["label"], "Analysis Error");
    }

    #[tokio::test]
    async fn test_batch_reports_invalid_index() {
        let analyzer = Analyzer::local(LocalScorer::deterministic());
        let mut bad = Scenario::Edge.transaction();
        bad.time = 30;

        let err = analyzer
            .analyze_batch(&[Scenario::Normal.transaction(), bad])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("transaction 1"));
    }

    #[test]
    fn test_from_config_defaults_to_local() {
        let analyzer = Analyzer::from_config(&Config::default()).unwrap();
        assert_eq!(analyzer.strategy().name(), "local");
    }
}
