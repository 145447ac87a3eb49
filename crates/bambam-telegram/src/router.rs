use std::sync::Arc;

use teloxide::prelude::*;
use tokio::sync::watch;
use tracing::{info, warn};

use bambam_core::{
    config::Config,
    messaging::port::MessagingPort,
    ports::Ledger,
    resources::StaticTexts,
    router::{run_event_loop, AppState},
};

use crate::{updates::TelegramUpdates, TelegramMessenger};

/// Log in, then consume updates one at a time until Ctrl-C.
///
/// Ctrl-C is turned into a shutdown signal for the event loop, which stops
/// at the next poll. An event being handled is never cut short.
///
/// Fails only when the bot token is rejected at startup.
pub async fn run_polling(
    cfg: Arc<Config>,
    texts: Arc<StaticTexts>,
    ledger: Arc<dyn Ledger>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.admin.bot_token.clone());

    let me = bot
        .get_me()
        .await
        .map_err(|e| anyhow::anyhow!("telegram login failed: {e}"))?;
    info!(bot = %me.username(), admins = cfg.admin.admin_ids.len(), "logged in");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = AppState {
        cfg: cfg.clone(),
        texts,
        ledger,
        messenger,
    };
    let mut updates = TelegramUpdates::new(bot, cfg.poll_timeout);

    let (stop_tx, mut stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutting down"),
            Err(e) => warn!(error = %e, "failed to listen for shutdown signal"),
        }
        let _ = stop_tx.send(true);
    });

    run_event_loop(&state, &mut updates, &mut stop_rx).await;

    Ok(())
}
