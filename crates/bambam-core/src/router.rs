//! Event router: the single sequential consumer of chat events.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    config::Config,
    dispatcher::{dispatch_command, is_command, trigger_reply},
    messaging::{
        port::{MessagingPort, UpdateSource},
        types::{ChatEvent, TextMessage},
    },
    ports::Ledger,
    reconciler::{on_left_member, on_new_member},
    resources::StaticTexts,
    Result,
};

/// Pause after a failed poll before asking the platform again.
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(1);

/// Everything a handler may touch. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub texts: Arc<StaticTexts>,
    pub ledger: Arc<dyn Ledger>,
    pub messenger: Arc<dyn MessagingPort>,
}

/// Route one event to the reconciler or the dispatcher.
///
/// An `Err` means this event was abandoned; the caller moves on.
pub async fn handle_event(state: &AppState, event: ChatEvent) -> Result<()> {
    match event {
        ChatEvent::NewMember {
            chat_id,
            user_id,
            username,
        } => {
            info!(chat_id = chat_id.0, user_id = user_id.0, username = %username, "member joined");
            on_new_member(state, chat_id, user_id, &username).await?;
        }
        ChatEvent::LeftMember { chat_id, username } => {
            info!(chat_id = chat_id.0, username = %username, "member left");
            on_left_member(state, chat_id, &username).await?;
        }
        ChatEvent::Text(msg) => {
            info!(
                chat_id = msg.chat_id.0,
                from = %msg.from_username,
                text = %msg.body,
                "message"
            );
            handle_text(state, &msg).await?;
        }
    }
    Ok(())
}

async fn handle_text(state: &AppState, msg: &TextMessage) -> Result<()> {
    if msg.body.is_empty() {
        return Ok(());
    }

    let reply = if is_command(&msg.body) {
        Some(dispatch_command(state, msg).await?)
    } else {
        trigger_reply(&msg.body).map(str::to_string)
    };

    if let Some(reply) = reply {
        state.messenger.send_html(msg.chat_id, &reply).await?;
    }
    Ok(())
}

/// Drain `source` one batch at a time, handling events strictly in order.
///
/// Runs until `shutdown` turns true (or its sender is dropped). The signal
/// is only observed while waiting on the source, so an event in progress
/// and the rest of its batch always run to completion.
pub async fn run_event_loop(
    state: &AppState,
    source: &mut dyn UpdateSource,
    shutdown: &mut watch::Receiver<bool>,
) {
    while !*shutdown.borrow() {
        let polled = tokio::select! {
            polled = source.next_batch() => polled,
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        };

        let batch = match polled {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "failed to fetch updates");
                tokio::select! {
                    _ = tokio::time::sleep(POLL_ERROR_PAUSE) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                continue;
            }
        };

        for event in batch {
            let kind = event.kind();
            let chat_id = event.chat_id();
            if let Err(e) = handle_event(state, event).await {
                warn!(kind, chat_id = chat_id.0, error = %e, "event abandoned");
            }
        }
    }
    info!("event loop stopped");
}
