use async_trait::async_trait;

/// Trait for live market-valuation sources.
#[async_trait]
pub trait ValuationProvider: Send + Sync {
    /// Get the current valuation for an asset address.
    ///
    /// Returns exactly `0.0` as a sentinel meaning "no usable data this
    /// cycle" (provider outage, no pairs, malformed payload). Callers must
    /// skip the asset for the cycle rather than treat `0.0` as a value.
    async fn get_valuation(&self, address: &str) -> f64;
}
