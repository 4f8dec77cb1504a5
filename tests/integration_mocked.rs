/// Integration tests with a mocked prediction API
/// Exercises the remote scoring path and its local fallback without a real service
use fraud_risk_sim::analysis::{Analyzer, ScoringStrategy};
use fraud_risk_sim::config::Config;
use fraud_risk_sim::models::ScoreSource;
use fraud_risk_sim::prediction_client::PredictionClient;
use fraud_risk_sim::remote_scorer::RemoteScorer;
use fraud_risk_sim::scenarios::Scenario;
use fraud_risk_sim::scoring::LocalScorer;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create a remote scorer pointed at the mock server
fn create_test_scorer(base_url: String) -> RemoteScorer {
    let config = Config {
        prediction_api_url: Some(base_url.clone()),
        prediction_timeout_secs: 2,
        ..Config::default()
    };
    let client = PredictionClient::new(base_url, &config).expect("client");
    RemoteScorer::new(client, LocalScorer::deterministic())
}

#[tokio::test]
async fn test_remote_prediction_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(serde_json::json!({
            "amount": 2500.0,
            "old_balance": 3000.0,
            "new_balance": 500.0,
            "category": "electronics",
            "transaction_type": "purchase",
            "customer_id": "WEB_DEMO_USER",
            "merchant": "Demo Merchant"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fraud_probability": 0.87,
            "is_fraud": true,
            "threshold": 0.5,
            "risk_level": "HIGH"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scorer = create_test_scorer(mock_server.uri());
    let outcome = scorer.score(&Scenario::Suspicious.transaction()).await;

    assert_eq!(outcome.source, ScoreSource::Remote);
    assert!((outcome.score.value() - 87.0).abs() < 1e-9);
    let remote = outcome.remote.expect("remote details");
    assert!(remote.is_fraud);
    assert_eq!(remote.risk_level, "HIGH");
}

#[tokio::test]
async fn test_server_error_falls_back_to_local_score() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "model not loaded"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scorer = create_test_scorer(mock_server.uri());
    let tx = Scenario::Suspicious.transaction();
    let outcome = scorer.score(&tx).await;

    assert_eq!(outcome.source, ScoreSource::Local);
    assert_eq!(outcome.score, LocalScorer::deterministic().score(&tx));
    assert!(outcome.remote.is_none());
}

#[tokio::test]
async fn test_malformed_body_falls_back_to_local_score() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let scorer = create_test_scorer(mock_server.uri());
    let tx = Scenario::Edge.transaction();
    let outcome = scorer.score(&tx).await;

    assert_eq!(outcome.source, ScoreSource::Local);
    assert_eq!(outcome.score.value(), 35.0);
}

#[tokio::test]
async fn test_out_of_range_probability_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fraud_probability": 87.0,
            "is_fraud": true,
            "threshold": 0.5,
            "risk_level": "HIGH"
        })))
        .mount(&mock_server)
        .await;

    let scorer = create_test_scorer(mock_server.uri());
    let outcome = scorer.score(&Scenario::Normal.transaction()).await;

    assert_eq!(outcome.source, ScoreSource::Local);
    assert_eq!(outcome.score.value(), 0.0);
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    // Nothing listens on port 1
    let scorer = create_test_scorer("http://127.0.0.1:1".to_string());
    let tx = Scenario::Fraud.transaction();
    let outcome = scorer.score(&tx).await;

    assert_eq!(outcome.source, ScoreSource::Local);
    assert_eq!(outcome.score, LocalScorer::deterministic().score(&tx));
    assert_eq!(outcome.score.value(), 100.0);
}

#[tokio::test]
async fn test_batch_prediction_maps_results_by_index() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict_batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "threshold": 0.42,
            "total_transactions": 2,
            "fraud_count": 1,
            "results": [
                {"transaction_index": 1, "is_fraud": true, "fraud_probability": 0.93, "risk_level": "HIGH"},
                {"transaction_index": 0, "is_fraud": false, "fraud_probability": 0.04, "risk_level": "LOW"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scorer = create_test_scorer(mock_server.uri());
    let txs = vec![Scenario::Normal.transaction(), Scenario::Fraud.transaction()];
    let outcomes = scorer.score_batch(&txs).await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.source == ScoreSource::Remote));
    assert!((outcomes[0].score.value() - 4.0).abs() < 1e-9);
    assert!((outcomes[1].score.value() - 93.0).abs() < 1e-9);
    assert_eq!(outcomes[1].remote.as_ref().unwrap().threshold, 0.42);
}

#[tokio::test]
async fn test_incomplete_batch_falls_back_for_every_transaction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict_batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "threshold": 0.5,
            "total_transactions": 1,
            "fraud_count": 0,
            "results": [
                {"transaction_index": 0, "is_fraud": false, "fraud_probability": 0.1, "risk_level": "LOW"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let scorer = create_test_scorer(mock_server.uri());
    let txs = vec![Scenario::Normal.transaction(), Scenario::Fraud.transaction()];
    let outcomes = scorer.score_batch(&txs).await;

    assert!(outcomes.iter().all(|o| o.source == ScoreSource::Local));
    assert_eq!(outcomes[1].score.value(), 100.0);
}

#[tokio::test]
async fn test_analyzer_remote_report_carries_prediction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fraud_probability": 0.3,
            "is_fraud": false,
            "threshold": 0.5,
            "risk_level": "LOW"
        })))
        .mount(&mock_server)
        .await;

    let analyzer = Analyzer::new(ScoringStrategy::Remote(create_test_scorer(mock_server.uri())));
    let report = analyzer
        .analyze(&Scenario::Normal.transaction())
        .await
        .unwrap();

    assert_eq!(report.source, ScoreSource::Remote);
    assert_eq!(report.label, "Medium Risk");
    assert_eq!(report.remote.as_ref().unwrap().risk_level, "LOW");
}

#[tokio::test]
async fn test_analyzer_from_config_selects_remote() {
    let config = Config {
        prediction_api_url: Some("http://localhost:5000".to_string()),
        ..Config::default()
    };
    let analyzer = Analyzer::from_config(&config).unwrap();
    assert_eq!(analyzer.strategy().name(), "remote");
}
