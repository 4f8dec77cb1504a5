use serde::Deserialize;

/// Fixed identifiers sent with every prediction request.
pub const DEFAULT_CUSTOMER_ID: &str = "WEB_DEMO_USER";
pub const DEFAULT_MERCHANT: &str = "Demo Merchant";
pub const DEFAULT_GENDER: &str = "M";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub prediction_api_url: Option<String>, // Local scoring only when unset
    pub prediction_timeout_secs: u64,
    pub score_jitter: Option<f64>,
    pub demo_customer_id: String,
    pub demo_merchant: String,
    pub demo_gender: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            prediction_api_url: None,
            prediction_timeout_secs: 10,
            score_jitter: None,
            demo_customer_id: DEFAULT_CUSTOMER_ID.to_string(),
            demo_merchant: DEFAULT_MERCHANT.to_string(),
            demo_gender: DEFAULT_GENDER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            prediction_api_url: std::env::var("PREDICTION_API_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("PREDICTION_API_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })
                .transpose()?,
            prediction_timeout_secs: std::env::var("PREDICTION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PREDICTION_TIMEOUT_SECS must be a whole number"))?,
            score_jitter: std::env::var("SCORE_JITTER")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|raw| {
                    let value: f64 = raw
                        .trim()
                        .parse()
                        .map_err(|_| anyhow::anyhow!("SCORE_JITTER must be a number"))?;
                    if !(-5.0..=5.0).contains(&value) {
                        anyhow::bail!("SCORE_JITTER must be between -5 and 5");
                    }
                    Ok(value)
                })
                .transpose()?,
            demo_customer_id: std::env::var("DEMO_CUSTOMER_ID")
                .unwrap_or_else(|_| DEFAULT_CUSTOMER_ID.to_string()),
            demo_merchant: std::env::var("DEMO_MERCHANT")
                .unwrap_or_else(|_| DEFAULT_MERCHANT.to_string()),
            demo_gender: std::env::var("DEMO_GENDER")
                .unwrap_or_else(|_| DEFAULT_GENDER.to_string()),
        };

        tracing::info!("Configuration loaded successfully");
        match config.prediction_api_url {
            Some(ref url) => tracing::info!("Prediction API configured: {}", url),
            None => tracing::info!("No PREDICTION_API_URL set, using local scoring"),
        }
        if let Some(jitter) = config.score_jitter {
            tracing::debug!("Score jitter fixed at {}", jitter);
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_local_with_random_jitter() {
        let config = Config::default();
        assert!(config.prediction_api_url.is_none());
        assert!(config.score_jitter.is_none());
        assert_eq!(config.demo_customer_id, "WEB_DEMO_USER");
        assert_eq!(config.demo_merchant, "Demo Merchant");
        assert_eq!(config.prediction_timeout_secs, 10);
    }
}
