use tracing::{error, info, warn};

use crate::{
    domain::{ChatId, Partition, UserId},
    messaging::port::MessagingPort,
    replies,
    router::AppState,
    security::is_admin,
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModerationMode {
    Ban,
    Kick,
}

impl ModerationMode {
    /// Command prefix the target argument is stripped from.
    pub fn command(self) -> &'static str {
        match self {
            ModerationMode::Ban => "/ban",
            ModerationMode::Kick => "/kick",
        }
    }
}

/// Result of a moderation request that the bot answers in chat.
///
/// Rejections are ordinary outcomes, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModerationOutcome {
    Denied(ModerationMode),
    NotFound,
    Banned { username: String, user_id: UserId },
    Kicked { username: String, user_id: UserId },
}

impl ModerationOutcome {
    pub fn reply(&self) -> String {
        match self {
            ModerationOutcome::Denied(ModerationMode::Ban) => replies::BAN_DENIED.to_string(),
            ModerationOutcome::Denied(ModerationMode::Kick) => replies::KICK_DENIED.to_string(),
            ModerationOutcome::NotFound => replies::MEMBER_NOT_FOUND.to_string(),
            ModerationOutcome::Banned { username, .. } => replies::banned(username),
            ModerationOutcome::Kicked { username, .. } => replies::kicked(username),
        }
    }
}

/// Remove `user_id` from the chat.
pub async fn kick(messenger: &dyn MessagingPort, chat_id: ChatId, user_id: UserId) -> Result<()> {
    messenger.remove_member(chat_id, user_id).await
}

/// Ban or kick `target` on behalf of `requester`.
///
/// A ban is all-or-nothing: when the removal fails after the banned record
/// was written, the record is retracted before the error is returned.
pub async fn ban_or_kick(
    state: &AppState,
    mode: ModerationMode,
    requester: UserId,
    chat_id: ChatId,
    target: &str,
) -> Result<ModerationOutcome> {
    if !is_admin(requester, state.cfg.admin_ids()) {
        info!(requester = requester.0, ?mode, username = target, "moderation denied");
        return Ok(ModerationOutcome::Denied(mode));
    }

    if target.is_empty() {
        return Ok(ModerationOutcome::NotFound);
    }

    let Some(user_id) = state.ledger.lookup(Partition::Members, target).await? else {
        return Ok(ModerationOutcome::NotFound);
    };

    match mode {
        ModerationMode::Kick => {
            kick(state.messenger.as_ref(), chat_id, user_id).await?;
            info!(username = target, user_id = user_id.0, chat_id = chat_id.0, "member kicked");
            Ok(ModerationOutcome::Kicked {
                username: target.to_string(),
                user_id,
            })
        }
        ModerationMode::Ban => {
            state.ledger.insert(Partition::Banned, user_id, target).await?;

            if let Err(e) = kick(state.messenger.as_ref(), chat_id, user_id).await {
                match state.ledger.retract(Partition::Banned, user_id, target).await {
                    Ok(_) => warn!(username = target, user_id = user_id.0, "removal failed, ban rolled back"),
                    Err(undo) => error!(
                        username = target,
                        user_id = user_id.0,
                        error = %undo,
                        "removal failed and ban could not be rolled back"
                    ),
                }
                return Err(e);
            }

            info!(username = target, user_id = user_id.0, chat_id = chat_id.0, "member banned");
            Ok(ModerationOutcome::Banned {
                username: target.to_string(),
                user_id,
            })
        }
    }
}
