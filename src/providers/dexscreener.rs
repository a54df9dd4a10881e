//! DexScreener valuation provider
//!
//! Endpoint: `GET <base>/<address>` returning all known trading pairs for
//! the token. Pair selection prefers an allow-list of venues and the most
//! recently updated pair; the valuation is the pair's market cap, falling
//! back to fully-diluted valuation.
//!
//! Every failure mode (network, non-2xx, malformed payload, no pairs)
//! collapses to the `0.0` sentinel at the trait boundary so the tracking
//! loop never sees an error from this provider.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::TrackerError;
use crate::traits::valuation_provider::ValuationProvider;

#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    pairs: Option<Vec<PairData>>,
}

/// One trading pair from the provider payload. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PairData {
    #[serde(rename = "dexId", default)]
    pub dex_id: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<i64>,
    #[serde(rename = "marketCap", default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub fdv: Option<f64>,
}

/// DexScreener-backed provider with a short-TTL per-address cache.
pub struct DexScreenerProvider {
    client: Client,
    base_url: String,
    preferred_dexes: Vec<String>,
    cache_ttl: Duration,
    cache: Arc<DashMap<String, (f64, Instant)>>,
}

impl DexScreenerProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.provider_base_url.trim_end_matches('/').to_string(),
            preferred_dexes: config.preferred_dexes.clone(),
            cache_ttl: config.cache_ttl,
            cache: Arc::new(DashMap::new()),
        })
    }

    async fn fetch_valuation(&self, address: &str) -> anyhow::Result<f64> {
        let url = format!("{}/{}", self.base_url, address);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("provider returned HTTP {status} for {address}");
        }

        let payload: TokenPairsResponse = response.json().await?;
        let pairs = payload.pairs.unwrap_or_default();
        valuation_from_pairs(&pairs, &self.preferred_dexes, address)
    }
}

/// Resolve a pair list to a valuation, or `DataUnavailable` when the
/// provider knows no pairs for the address.
fn valuation_from_pairs(
    pairs: &[PairData],
    preferred_dexes: &[String],
    address: &str,
) -> anyhow::Result<f64> {
    let Some(selected) = select_pair(pairs, preferred_dexes) else {
        return Err(TrackerError::DataUnavailable { address: address.to_string() }.into());
    };
    Ok(pair_valuation(selected))
}

/// Prefer the most recently updated allow-listed pair; fall back to the most
/// recently updated pair overall.
pub fn select_pair<'a>(pairs: &'a [PairData], preferred_dexes: &[String]) -> Option<&'a PairData> {
    let freshest = |subset: Vec<&'a PairData>| {
        subset
            .into_iter()
            .max_by_key(|p| p.updated_at.unwrap_or(0))
    };

    let preferred: Vec<&PairData> = pairs
        .iter()
        .filter(|p| {
            p.dex_id
                .as_deref()
                .is_some_and(|id| preferred_dexes.iter().any(|d| d == id))
        })
        .collect();

    freshest(preferred).or_else(|| freshest(pairs.iter().collect()))
}

/// Market cap, falling back to FDV, else the sentinel.
pub fn pair_valuation(pair: &PairData) -> f64 {
    pair.market_cap
        .filter(|v| *v > 0.0)
        .or(pair.fdv)
        .unwrap_or(0.0)
}

#[async_trait]
impl ValuationProvider for DexScreenerProvider {
    async fn get_valuation(&self, address: &str) -> f64 {
        if let Some(entry) = self.cache.get(address) {
            let (value, fetched_at) = *entry;
            if fetched_at.elapsed() < self.cache_ttl {
                debug!(%address, value, "using cached valuation");
                return value;
            }
        }

        match self.fetch_valuation(address).await {
            Ok(value) => {
                self.cache.insert(address.to_string(), (value, Instant::now()));
                value
            }
            Err(e) => {
                warn!(%address, "failed to fetch valuation: {e:#}");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(dex: &str, updated: i64, mc: Option<f64>, fdv: Option<f64>) -> PairData {
        PairData {
            dex_id: Some(dex.to_string()),
            updated_at: Some(updated),
            market_cap: mc,
            fdv,
        }
    }

    fn dexes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prefers_allow_listed_venue() {
        let pairs = vec![
            pair("shadydex", 200, Some(9_999.0), None),
            pair("raydium", 100, Some(1_000.0), None),
        ];
        let selected = select_pair(&pairs, &dexes(&["raydium", "orca"])).unwrap();
        assert_eq!(selected.dex_id.as_deref(), Some("raydium"));
    }

    #[test]
    fn picks_most_recently_updated_among_preferred() {
        let pairs = vec![
            pair("raydium", 100, Some(1_000.0), None),
            pair("orca", 300, Some(2_000.0), None),
            pair("raydium", 200, Some(3_000.0), None),
        ];
        let selected = select_pair(&pairs, &dexes(&["raydium", "orca"])).unwrap();
        assert_eq!(selected.updated_at, Some(300));
    }

    #[test]
    fn falls_back_to_unfiltered_when_no_preferred_pair() {
        let pairs = vec![
            pair("shadydex", 100, Some(1_000.0), None),
            pair("otherdex", 200, Some(2_000.0), None),
        ];
        let selected = select_pair(&pairs, &dexes(&["raydium"])).unwrap();
        assert_eq!(selected.updated_at, Some(200));
    }

    #[test]
    fn valuation_falls_back_to_fdv() {
        assert_eq!(pair_valuation(&pair("raydium", 0, Some(5_000.0), Some(9_000.0))), 5_000.0);
        assert_eq!(pair_valuation(&pair("raydium", 0, None, Some(9_000.0))), 9_000.0);
        assert_eq!(pair_valuation(&pair("raydium", 0, Some(0.0), Some(9_000.0))), 9_000.0);
        assert_eq!(pair_valuation(&pair("raydium", 0, None, None)), 0.0);
    }

    #[test]
    fn empty_pair_list_is_data_unavailable() {
        let err = valuation_from_pairs(&[], &dexes(&["raydium"]), "addr").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::DataUnavailable { address }) if address == "addr"
        ));
    }

    #[test]
    fn usable_pair_list_yields_its_valuation() {
        let pairs = vec![pair("raydium", 100, Some(5_000.0), None)];
        let value = valuation_from_pairs(&pairs, &dexes(&["raydium"]), "addr").unwrap();
        assert_eq!(value, 5_000.0);
    }

    #[test]
    fn payload_parses_with_missing_fields() {
        let raw = r#"{"pairs":[{"dexId":"raydium","updatedAt":1700000000000,"marketCap":123000.5},{"fdv":42.0}]}"#;
        let payload: TokenPairsResponse = serde_json::from_str(raw).unwrap();
        let pairs = payload.pairs.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].market_cap, Some(123000.5));
        assert!(pairs[1].dex_id.is_none());
    }

    #[test]
    fn null_pairs_payload_is_empty() {
        let payload: TokenPairsResponse = serde_json::from_str(r#"{"pairs":null}"#).unwrap();
        assert!(payload.pairs.unwrap_or_default().is_empty());
    }
}
