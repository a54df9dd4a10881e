use crate::utils::helper::abbreviate_usd;

/// A milestone crossing handed to notifiers. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneEvent {
    pub symbol: String,
    pub chain: String,
    pub baseline_value: f64,
    pub all_time_high: f64,
    /// The milestone level that was crossed, e.g. 1.6 or 6.0.
    pub multiple: f64,
    /// True when a lower milestone was already announced for this asset.
    pub is_update: bool,
}

impl MilestoneEvent {
    /// One-line summary used for console output.
    pub fn summary(&self) -> String {
        format!(
            "{}{} hit {:.1}x (baseline {}, ath {}, chain {})",
            if self.is_update { "UPDATE: " } else { "" },
            self.symbol,
            self.multiple,
            abbreviate_usd(self.baseline_value),
            abbreviate_usd(self.all_time_high),
            self.chain,
        )
    }
}
