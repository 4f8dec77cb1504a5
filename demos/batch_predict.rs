use anyhow::Result;
use fraud_risk_sim::analysis::Analyzer;
use fraud_risk_sim::config::Config;
use fraud_risk_sim::models::ScoreSource;
use fraud_risk_sim::scenarios::Scenario;

// Scores every preset in one batch. Set PREDICTION_API_URL to route the batch
// through /predict_batch; otherwise the local heuristic is used.

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Batch Fraud Analysis ===\n");

    let config = Config::from_env()?;
    let analyzer = Analyzer::from_config(&config)?;

    let transactions: Vec<_> = Scenario::ALL.iter().map(|s| s.transaction()).collect();
    let reports = analyzer.analyze_batch(&transactions).await?;

    let mut remote_count = 0;
    for (scenario, report) in Scenario::ALL.iter().zip(&reports) {
        if report.source == ScoreSource::Remote {
            remote_count += 1;
        }
        println!(
            "{:<11} {:>3}%  {:<12} {:<33} confidence {:>3}%",
            scenario.name(),
            report.percentage,
            report.label,
            report.decision.label,
            report.decision.confidence.round()
        );
    }

    println!(
        "\n✓ {} transactions analyzed ({} remote, {} local)",
        reports.len(),
        remote_count,
        reports.len() - remote_count
    );

    Ok(())
}
