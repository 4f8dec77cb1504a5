//! Utility to run preset scenarios through the analyzer and print the panels.
//!
//! Usage: `analyze_scenario [normal|suspicious|fraud|edge]`. Without an
//! argument every preset is analyzed.

use fraud_risk_sim::analysis::Analyzer;
use fraud_risk_sim::config::Config;
use fraud_risk_sim::render::TextSink;
use fraud_risk_sim::scenarios::{format_hour, Scenario};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraud_risk_sim=warn".into()),
        )
        .init();

    let config = Config::from_env()?;
    let analyzer = Analyzer::from_config(&config)?;

    let scenarios = match env::args().nth(1) {
        Some(name) => vec![name.parse::<Scenario>()?],
        None => Scenario::ALL.to_vec(),
    };

    for scenario in scenarios {
        let tx = scenario.transaction();
        println!(
            "=== {} (${} of ${}, {}, {}, {}, {} years, {}) ===",
            scenario,
            tx.amount,
            tx.balance,
            tx.category,
            tx.location,
            tx.transaction_type.as_str(),
            tx.age,
            format_hour(tx.time)
        );

        let mut sink = TextSink::new();
        analyzer.analyze_into(&tx, &mut sink).await;
        println!("{}", sink.into_string());
    }

    Ok(())
}
