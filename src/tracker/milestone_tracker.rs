use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::evaluator::{evaluate, MilestoneStrategy};
use crate::models::{MilestoneEvent, TrackedAsset};
use crate::traits::{MilestoneNotifier, RecordStore, ValuationProvider};

/// The tracking loop: periodically re-evaluates every tracked asset against
/// the live valuation source and announces newly crossed milestones.
pub struct MilestoneTracker {
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn ValuationProvider>,
    notifier: Arc<dyn MilestoneNotifier>,
    strategy: MilestoneStrategy,
    poll_interval: Duration,
    row_delay: Duration,
}

impl MilestoneTracker {
    pub fn new(
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn ValuationProvider>,
        notifier: Arc<dyn MilestoneNotifier>,
        strategy: MilestoneStrategy,
        poll_interval: Duration,
        row_delay: Duration,
    ) -> Self {
        Self { store, provider, notifier, strategy, poll_interval, row_delay }
    }

    /// Run forever. Only process shutdown ends the loop.
    pub async fn run(&self) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            "starting milestone monitor"
        );

        loop {
            self.run_cycle().await;
            debug!(
                "cycle complete, sleeping {}s before next check",
                self.poll_interval.as_secs()
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One pass over every tracked asset. Per-row failures are logged and
    /// skipped; nothing here aborts the cycle.
    pub async fn run_cycle(&self) {
        let assets = match self.store.read_all().await {
            Ok(assets) => assets,
            Err(e) => {
                self.notifier.notify_error(&e).await;
                return;
            }
        };

        debug!("checking {} tracked assets", assets.len());

        let mut seen: HashSet<String> = HashSet::new();
        for asset in assets {
            if !asset.is_trackable() {
                debug!(address = %asset.address, "skipping untrackable row");
                continue;
            }

            // Duplicate rows share progress by address; a second evaluation
            // against its cycle-start snapshot would re-announce the level
            // the first row just persisted.
            if !seen.insert(asset.address.clone()) {
                debug!(address = %asset.address, "address already evaluated this cycle");
                continue;
            }

            // Pace before every provider call to respect its rate limits.
            tokio::time::sleep(self.row_delay).await;
            let current_value = self.provider.get_valuation(&asset.address).await;
            if current_value == 0.0 {
                debug!(address = %asset.address, "no valuation data this cycle");
                continue;
            }

            self.process_asset(&asset, current_value).await;
        }
    }

    async fn process_asset(&self, asset: &TrackedAsset, current_value: f64) {
        let eval = evaluate(asset, current_value, &self.strategy);

        if let Some(level) = eval.crossed {
            let event = MilestoneEvent {
                symbol: asset.symbol.clone(),
                chain: asset.chain.clone(),
                baseline_value: asset.baseline_value,
                all_time_high: eval.progress.all_time_high,
                multiple: level,
                is_update: asset.last_announced_multiple > 1.0,
            };
            info!(
                symbol = %asset.symbol,
                level,
                "milestone crossed"
            );
            // Delivery failures are handled inside the notifier; the state
            // write below happens regardless so a flaky channel cannot
            // cause re-announcement storms.
            self.notifier.notify(&event).await;
        }

        if eval.changed {
            if let Err(e) = self.store.update_progress(&asset.address, &eval.progress).await {
                warn!(address = %asset.address, "failed to persist progress: {e:#}");
            }
        }
    }
}
