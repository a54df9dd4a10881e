use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

use milestone_tracker::{
    CompositeNotifier, Config, ConsoleNotifier, DexScreenerProvider, IngestionHandler,
    MilestoneNotifier, MilestoneTracker, SqliteRecordStore, TelegramMilestoneNotifier,
};
use milestone_tracker::telegram_notifier::TelegramNotifier;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_max_level(LevelFilter::INFO)
        .with_file(true)
        .with_line_number(true)
        .init();

    dotenvy::dotenv().ok();

    tokio::runtime::Runtime::new()?.block_on(async {
        let config = Config::from_env()?;

        info!("Initializing milestone tracker...");
        info!("Provider base URL: {}", config.provider_base_url);
        info!("Store path: {}", config.store_path);
        info!("Strategy: {:?}", config.strategy);

        let store = Arc::new(SqliteRecordStore::open(&config.store_path)?);
        let provider = Arc::new(DexScreenerProvider::new(&config)?);

        let mut composite = CompositeNotifier::new();
        composite.add_notifier(Arc::new(ConsoleNotifier::new()));

        let telegram = TelegramMilestoneNotifier::new(TelegramNotifier::new(
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
        ));
        if telegram.is_enabled() {
            info!("Telegram notifications enabled");
            composite.add_notifier(Arc::new(telegram));
        } else {
            warn!("Telegram notifications disabled. Set TG_TOKEN and CHAT_ID in .env to enable.");
        }
        let notifier: Arc<dyn MilestoneNotifier> = Arc::new(composite);

        let tracker = Arc::new(MilestoneTracker::new(
            store.clone(),
            provider,
            notifier.clone(),
            config.strategy.clone(),
            config.poll_interval,
            config.row_delay,
        ));

        let tracker_task = tracker.clone();
        tokio::spawn(async move {
            tracker_task.run().await;
        });

        if let Some(socket_path) = config.ingest_socket.clone() {
            let ingestion = IngestionHandler::new(
                store.clone(),
                config.default_chain.clone(),
                config.duplicate_policy,
            );
            tokio::spawn(async move {
                if let Err(e) = ingestion.listen_unix(&socket_path).await {
                    warn!("ingest listener stopped: {e:#}");
                }
            });
        } else {
            warn!("INGEST_SOCKET not set; no announcement intake configured");
        }

        notifier
            .notify_status("🚀 <b>Milestone Tracker Started</b>")
            .await;
        info!("Milestone tracker is running. Press Ctrl+C to stop.");

        tokio::signal::ctrl_c().await?;

        notifier
            .notify_status("🛑 <b>Milestone Tracker Stopped</b>")
            .await;
        info!("Shutting down...");

        Ok(())
    })
}
