use std::time::Duration;

use crate::evaluator::MilestoneStrategy;

pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.dexscreener.com/latest/dex/tokens";
pub const DEFAULT_PREFERRED_DEXES: &str = "raydium,pumpfun,bonkswap,orca,lifinity,meteora";
pub const DEFAULT_CHAIN: &str = "solana";

/// What ingestion does when an announcement's address already has a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the existing row; drop the new announcement.
    Skip,
    /// Append another row anyway. Progress is still keyed by address, so
    /// duplicate rows share milestone state.
    Append,
}

/// Runtime configuration, environment-style.
#[derive(Debug, Clone)]
pub struct Config {
    /// Valuation provider base URL; the asset address is appended as a path
    /// segment.
    pub provider_base_url: String,
    /// Venue allow-list for pair selection, lowercase.
    pub preferred_dexes: Vec<String>,
    /// Milestone strategy: dynamic or a fixed ladder.
    pub strategy: MilestoneStrategy,
    /// Sleep between tracking cycles.
    pub poll_interval: Duration,
    /// Pacing delay before each per-row valuation call.
    pub row_delay: Duration,
    /// Freshness window for cached valuations.
    pub cache_ttl: Duration,
    /// Upper bound on a single provider request.
    pub request_timeout: Duration,
    /// Path of the sqlite record store.
    pub store_path: String,
    /// Chain label used when an announcement carries none.
    pub default_chain: String,
    /// Duplicate-address handling at ingestion.
    pub duplicate_policy: DuplicatePolicy,
    /// Unix socket that receives raw announcement text, if any.
    pub ingest_socket: Option<String>,
    /// Telegram credentials; notifications are disabled when absent.
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Config {
    /// Load from the process environment, falling back to defaults that
    /// match the provider's rate limits.
    pub fn from_env() -> anyhow::Result<Self> {
        let strategy = match std::env::var("MILESTONE_LADDER") {
            Ok(raw) => MilestoneStrategy::parse(&raw)?,
            Err(_) => MilestoneStrategy::Dynamic,
        };

        let duplicate_policy = match std::env::var("INGEST_DUPLICATES")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "append" => DuplicatePolicy::Append,
            _ => DuplicatePolicy::Skip,
        };

        Ok(Self {
            provider_base_url: std::env::var("PROVIDER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_BASE_URL.to_string()),
            preferred_dexes: std::env::var("PREFERRED_DEXES")
                .unwrap_or_else(|_| DEFAULT_PREFERRED_DEXES.to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            strategy,
            poll_interval: Duration::from_secs(env_parse("POLL_INTERVAL_SECS", 300)),
            row_delay: Duration::from_millis(env_parse("ROW_DELAY_MS", 800)),
            cache_ttl: Duration::from_secs(env_parse("VALUATION_CACHE_TTL_SECS", 60)),
            request_timeout: Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", 10)),
            store_path: std::env::var("STORE_PATH")
                .unwrap_or_else(|_| "milestones.db".to_string()),
            default_chain: std::env::var("DEFAULT_CHAIN")
                .unwrap_or_else(|_| DEFAULT_CHAIN.to_string()),
            duplicate_policy,
            ingest_socket: std::env::var("INGEST_SOCKET").ok(),
            telegram_token: std::env::var("TG_TOKEN").ok(),
            telegram_chat_id: std::env::var("CHAT_ID").ok(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
