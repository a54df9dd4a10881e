use crate::error::TrackerError;

/// Column layout of a persisted asset row (positional, 0-indexed).
pub const COL_ADDRESS: usize = 0;
pub const COL_SYMBOL: usize = 1;
pub const COL_CHAIN: usize = 2;
pub const COL_BASELINE_VALUE: usize = 3;
pub const COL_LAST_MULTIPLE_REACHED: usize = 4;
pub const COL_ALL_TIME_HIGH: usize = 5;
pub const COL_LAST_ANNOUNCED_MULTIPLE: usize = 6;

pub const COLUMN_COUNT: usize = 7;

/// One tracked asset and its milestone progress.
///
/// `baseline_value` is fixed at ingestion time and is the denominator for
/// every multiple computation. The three progress fields are only ever
/// advanced by the tracking loop and are monotone non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedAsset {
    pub address: String,
    pub symbol: String,
    pub chain: String,
    pub baseline_value: f64,
    pub last_multiple_reached: f64,
    pub all_time_high: f64,
    pub last_announced_multiple: f64,
}

impl TrackedAsset {
    /// Create a freshly ingested asset with default progress fields.
    ///
    /// `last_announced_multiple` starts at 1.0 so the first crossing at or
    /// above the lowest milestone is always eligible.
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        chain: impl Into<String>,
        baseline_value: f64,
    ) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            chain: chain.into(),
            baseline_value,
            last_multiple_reached: 1.0,
            all_time_high: 0.0,
            last_announced_multiple: 1.0,
        }
    }

    /// Whether the tracking loop should evaluate this row at all.
    pub fn is_trackable(&self) -> bool {
        !self.address.trim().is_empty() && self.baseline_value > 0.0
    }

    /// Current progress fields as a standalone value.
    pub fn progress(&self) -> AssetProgress {
        AssetProgress {
            all_time_high: self.all_time_high,
            last_multiple_reached: self.last_multiple_reached,
            last_announced_multiple: self.last_announced_multiple,
        }
    }

    /// Apply updated progress fields in place.
    pub fn apply_progress(&mut self, progress: &AssetProgress) {
        self.all_time_high = progress.all_time_high;
        self.last_multiple_reached = progress.last_multiple_reached;
        self.last_announced_multiple = progress.last_announced_multiple;
    }

    /// Encode as a store row in column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.address.clone(),
            self.symbol.clone(),
            self.chain.clone(),
            self.baseline_value.to_string(),
            encode_numeric(self.last_multiple_reached),
            encode_numeric(self.all_time_high),
            encode_numeric(self.last_announced_multiple),
        ]
    }

    /// Parse a store row back into an asset.
    pub fn from_row(row: &[String]) -> anyhow::Result<Self> {
        if row.len() < COLUMN_COUNT {
            return Err(TrackerError::MalformedRow {
                reason: format!("expected {} columns, got {}", COLUMN_COUNT, row.len()),
            }
            .into());
        }

        Ok(Self {
            address: row[COL_ADDRESS].trim().to_string(),
            symbol: row[COL_SYMBOL].trim().to_string(),
            chain: row[COL_CHAIN].trim().to_string(),
            baseline_value: parse_numeric(&row[COL_BASELINE_VALUE], "baseline_value")?,
            last_multiple_reached: parse_numeric(
                &row[COL_LAST_MULTIPLE_REACHED],
                "last_multiple_reached",
            )?,
            all_time_high: parse_numeric(&row[COL_ALL_TIME_HIGH], "all_time_high")?,
            last_announced_multiple: parse_numeric(
                &row[COL_LAST_ANNOUNCED_MULTIPLE],
                "last_announced_multiple",
            )?,
        })
    }
}

/// The mutable slice of a tracked asset: everything the tracking loop is
/// allowed to write back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetProgress {
    pub all_time_high: f64,
    pub last_multiple_reached: f64,
    pub last_announced_multiple: f64,
}

impl AssetProgress {
    /// Round every field to the persisted precision so that a written row
    /// re-reads to exactly the values the loop continues with.
    pub fn normalized(&self) -> Self {
        Self {
            all_time_high: round2(self.all_time_high),
            last_multiple_reached: round2(self.last_multiple_reached),
            last_announced_multiple: round2(self.last_announced_multiple),
        }
    }

}

/// Stable string encoding for persisted progress values.
pub fn encode_numeric(value: f64) -> String {
    format!("{:.2}", value)
}

fn parse_numeric(raw: &str, column: &str) -> anyhow::Result<f64> {
    let cleaned = raw.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned.parse::<f64>().map_err(|e| {
        TrackerError::MalformedRow {
            reason: format!("column {column}: {e}: {raw:?}"),
        }
        .into()
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
