use std::env;
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

// --- CONFIG AGGREGATOR ---

#[derive(Debug, Clone)]
pub struct Config {
    pub aws: AwsConfig,
    pub controller: ControllerConfig,
}

impl Config {
    pub fn global() -> &'static Config {
        CONFIG.get_or_init(Self::load)
    }

    fn load() -> Self {
        dotenv::dotenv().ok();
        Self {
            aws: AwsConfig::load(),
            controller: ControllerConfig::load(),
        }
    }
}

// --- MODULES ---

// AWS / TRANSPORT
#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    pub profile: Option<String>,
    pub proxy_host: Option<String>,
    pub proxy_port: Option<u16>,
}

impl AwsConfig {
    fn load() -> Self {
        Self {
            region:     get_env("SLUICE_REGION", "us-east-1"),
            profile:    env::var("SLUICE_AWS_PROFILE").ok(),
            proxy_host: env::var("SLUICE_PROXY_HOST").ok(),
            proxy_port: env::var("SLUICE_PROXY_PORT").ok().and_then(|p| p.parse().ok()),
        }
    }
}

// LIFECYCLE CONTROLLER
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    // RECONCILIATION config
    pub max_poll_attempts: u32,
    pub poll_interval_secs: u64,
    // CONSUME config
    pub consume_batch_size: usize,
    pub consume_backoff_ms: u64,
}

impl ControllerConfig {
    fn load() -> Self {
        Self {
            max_poll_attempts:  get_env("SLUICE_POLL_ATTEMPTS", "6"),
            poll_interval_secs: get_env("SLUICE_POLL_INTERVAL_SECS", "9"),
            consume_batch_size: get_env("SLUICE_CONSUME_BATCH", "10"),
            consume_backoff_ms: get_env("SLUICE_CONSUME_BACKOFF_MS", "1000"),
        }
    }
}

// --- PRIVATE HELPER ---

fn get_env<T: std::str::FromStr>(key: &str, default: &str) -> T {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| format!("Config error: {} must be valid", key))
        .unwrap()
}
