use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const ENV_LLM_URL: &str = "URGEFLOW_LLM_URL";
pub const ENV_LLM_TIMEOUT_SECS: &str = "URGEFLOW_LLM_TIMEOUT_SECS";
pub const ENV_LLM_N_PREDICT: &str = "URGEFLOW_LLM_N_PREDICT";
pub const ENV_LLM_TEMPERATURE: &str = "URGEFLOW_LLM_TEMPERATURE";

/// Where and how the text-generation backend is reached.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub n_predict: usize,
    pub temperature: f32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
            n_predict: 512,
            temperature: 0.7,
        }
    }
}

impl GatewayConfig {
    /// Defaults, overridden by whichever URGEFLOW_LLM_* variables are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_LLM_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_LLM_TIMEOUT_SECS) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = parse_var(&lookup, ENV_LLM_N_PREDICT) {
            config.n_predict = n;
        }
        if let Some(t) = parse_var(&lookup, ENV_LLM_TEMPERATURE) {
            config.temperature = t;
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value, keeping default", key, raw);
            None
        }
    }
}
