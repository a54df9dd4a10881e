//! Pure milestone-crossing decision logic.
//!
//! No I/O happens here: the tracking loop feeds in the persisted state and
//! the latest valuation, and gets back the next persisted state plus an
//! optional crossed level. Running the same inputs twice never re-emits a
//! level, which is what makes the loop safe to re-run with stale state.

use tracing::warn;

use crate::models::asset::AssetProgress;
use crate::models::TrackedAsset;

/// Default fixed ladder of milestone thresholds.
pub const DEFAULT_LADDER: [f64; 5] = [1.5, 2.0, 3.0, 6.0, 9.0];

/// Minimum multiple worth announcing in dynamic mode.
const DYNAMIC_FLOOR: f64 = 1.5;

/// How milestone candidates are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum MilestoneStrategy {
    /// Any 0.1-rounded multiple >= 1.5 that strictly exceeds the
    /// last-announced multiple counts.
    Dynamic,
    /// Only exact ladder entries count; thresholds must be strictly
    /// increasing.
    FixedLadder(Vec<f64>),
}

impl MilestoneStrategy {
    /// Parse the config surface: "dynamic" or a comma-separated ladder.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("dynamic") {
            return Ok(Self::Dynamic);
        }

        let mut ladder = Vec::new();
        for part in raw.split(',') {
            let threshold: f64 = part
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid ladder entry {part:?}: {e}"))?;
            if let Some(&prev) = ladder.last() {
                if threshold <= prev {
                    anyhow::bail!("ladder must be strictly increasing, got {raw:?}");
                }
            }
            ladder.push(threshold);
        }
        if ladder.is_empty() {
            anyhow::bail!("empty milestone ladder");
        }
        Ok(Self::FixedLadder(ladder))
    }
}

impl Default for MilestoneStrategy {
    fn default() -> Self {
        Self::Dynamic
    }
}

/// Result of evaluating one asset against one valuation reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The next persisted state, normalized to storage precision.
    pub progress: AssetProgress,
    /// Whether `progress` differs from the state that was read.
    pub changed: bool,
    /// The milestone level crossed this cycle, if any. At most one level is
    /// emitted per cycle; intermediate thresholds are skipped, never queued.
    pub crossed: Option<f64>,
}

impl Evaluation {
    fn unchanged(asset: &TrackedAsset) -> Self {
        Self { progress: asset.progress(), changed: false, crossed: None }
    }
}

/// Decide whether `current_value` pushes `asset` across a new milestone.
///
/// A `current_value` of exactly 0 is the "no data this cycle" sentinel and
/// leaves the state untouched.
pub fn evaluate(
    asset: &TrackedAsset,
    current_value: f64,
    strategy: &MilestoneStrategy,
) -> Evaluation {
    if current_value == 0.0 {
        return Evaluation::unchanged(asset);
    }

    let new_ath = if current_value > asset.all_time_high {
        current_value
    } else {
        asset.all_time_high
    };

    let multiple = new_ath / asset.baseline_value;
    if asset.baseline_value <= 0.0 || !multiple.is_finite() {
        warn!(
            address = %asset.address,
            baseline = asset.baseline_value,
            "skipping milestone math for asset with unusable baseline"
        );
        return Evaluation::unchanged(asset);
    }

    let candidate = match strategy {
        MilestoneStrategy::Dynamic => {
            let rounded = round1(multiple);
            (rounded >= DYNAMIC_FLOOR && rounded > round1(asset.last_announced_multiple))
                .then_some(rounded)
        }
        MilestoneStrategy::FixedLadder(ladder) => ladder
            .iter()
            .copied()
            .filter(|&m| {
                multiple >= m
                    && m > asset.last_announced_multiple
                    && m >= asset.last_multiple_reached
            })
            .fold(None, |best: Option<f64>, m| {
                Some(best.map_or(m, |b| b.max(m)))
            }),
    };

    // A dynamic candidate is rounded to one decimal and may land slightly
    // above the raw multiple; the running multiple absorbs it so that
    // last_announced_multiple <= last_multiple_reached holds.
    let progress = AssetProgress {
        all_time_high: new_ath,
        last_multiple_reached: multiple
            .max(asset.last_multiple_reached)
            .max(candidate.unwrap_or(f64::MIN)),
        last_announced_multiple: candidate.unwrap_or(asset.last_announced_multiple),
    }
    .normalized();

    Evaluation {
        changed: progress != asset.progress().normalized(),
        progress,
        crossed: candidate,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(baseline: f64, ath: f64, last_multiple: f64, last_announced: f64) -> TrackedAsset {
        TrackedAsset {
            address: "addr".to_string(),
            symbol: "TKN".to_string(),
            chain: "solana".to_string(),
            baseline_value: baseline,
            last_multiple_reached: last_multiple,
            all_time_high: ath,
            last_announced_multiple: last_announced,
        }
    }

    #[test]
    fn sentinel_zero_changes_nothing() {
        let a = asset(1000.0, 5000.0, 5.0, 5.0);
        let eval = evaluate(&a, 0.0, &MilestoneStrategy::Dynamic);
        assert!(!eval.changed);
        assert!(eval.crossed.is_none());
        assert_eq!(eval.progress, a.progress());
    }

    #[test]
    fn zero_baseline_never_crosses() {
        let a = asset(0.0, 0.0, 1.0, 1.0);
        let eval = evaluate(&a, 9999.0, &MilestoneStrategy::Dynamic);
        assert!(eval.crossed.is_none());
        assert!(!eval.changed);
    }

    #[test]
    fn dynamic_sequence_announces_each_level_once() {
        let mut a = asset(1000.0, 0.0, 1.0, 1.0);
        let mut announced = Vec::new();

        for value in [500.0, 1600.0, 3200.0, 9500.0] {
            let eval = evaluate(&a, value, &MilestoneStrategy::Dynamic);
            if let Some(level) = eval.crossed {
                announced.push(level);
            }
            a.apply_progress(&eval.progress);
        }

        assert_eq!(announced, vec![1.6, 3.2, 9.5]);
    }

    #[test]
    fn dynamic_below_floor_is_silent() {
        let a = asset(1000.0, 0.0, 1.0, 1.0);
        let eval = evaluate(&a, 1400.0, &MilestoneStrategy::Dynamic);
        assert!(eval.crossed.is_none());
        // ATH still advances.
        assert!(eval.changed);
        assert_eq!(eval.progress.all_time_high, 1400.0);
    }

    #[test]
    fn evaluating_twice_never_re_emits() {
        let mut a = asset(1000.0, 0.0, 1.0, 1.0);
        let first = evaluate(&a, 1600.0, &MilestoneStrategy::Dynamic);
        assert_eq!(first.crossed, Some(1.6));
        a.apply_progress(&first.progress);

        let second = evaluate(&a, 1600.0, &MilestoneStrategy::Dynamic);
        assert!(second.crossed.is_none());
        assert!(!second.changed);
    }

    #[test]
    fn ladder_tie_break_takes_highest_only() {
        let ladder = MilestoneStrategy::FixedLadder(DEFAULT_LADDER.to_vec());
        let a = asset(1000.0, 0.0, 1.0, 1.0);
        let eval = evaluate(&a, 7200.0, &ladder);
        assert_eq!(eval.crossed, Some(6.0));
    }

    #[test]
    fn ladder_skipped_levels_are_never_queued() {
        let ladder = MilestoneStrategy::FixedLadder(DEFAULT_LADDER.to_vec());
        let mut a = asset(1000.0, 0.0, 1.0, 1.0);

        let eval = evaluate(&a, 7200.0, &ladder);
        a.apply_progress(&eval.progress);

        // Same value next cycle: 1.5, 2 and 3 were skipped and stay skipped.
        let eval = evaluate(&a, 7200.0, &ladder);
        assert!(eval.crossed.is_none());

        // Next crossing announces 9 only.
        let eval = evaluate(&a, 9100.0, &ladder);
        assert_eq!(eval.crossed, Some(9.0));
    }

    #[test]
    fn ath_is_monotone_and_announced_never_exceeds_reached() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for strategy in [
            MilestoneStrategy::Dynamic,
            MilestoneStrategy::FixedLadder(DEFAULT_LADDER.to_vec()),
        ] {
            let mut a = asset(1000.0, 0.0, 1.0, 1.0);
            let mut prev_ath = a.all_time_high;
            let mut prev_announced = a.last_announced_multiple;

            for _ in 0..500 {
                // Occasional sentinel readings mixed into a random walk.
                let value = if rng.gen_bool(0.1) {
                    0.0
                } else {
                    rng.gen_range(1.0..25_000.0)
                };
                let eval = evaluate(&a, value, &strategy);
                a.apply_progress(&eval.progress);

                assert!(a.all_time_high >= prev_ath);
                assert!(a.last_announced_multiple >= prev_announced);
                assert!(a.last_announced_multiple <= a.last_multiple_reached);
                prev_ath = a.all_time_high;
                prev_announced = a.last_announced_multiple;
            }
        }
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!(MilestoneStrategy::parse("dynamic").unwrap(), MilestoneStrategy::Dynamic);
        assert_eq!(MilestoneStrategy::parse("").unwrap(), MilestoneStrategy::Dynamic);
        assert_eq!(
            MilestoneStrategy::parse("1.5, 2, 3, 6, 9").unwrap(),
            MilestoneStrategy::FixedLadder(DEFAULT_LADDER.to_vec())
        );
        assert!(MilestoneStrategy::parse("3,2,1").is_err());
        assert!(MilestoneStrategy::parse("1.5,abc").is_err());
    }
}
