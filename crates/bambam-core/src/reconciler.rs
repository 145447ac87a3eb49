//! Join/leave reconciliation against the ledger.
//!
//! Members who leave keep their record, so a rejoin counts as a return and is
//! not welcomed twice.

use tracing::info;

use crate::{
    domain::{ChatId, Partition, UserId},
    moderation::kick,
    replies,
    router::AppState,
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Username is banned; the banned id was removed again.
    Rejected { banned_id: UserId },
    /// First sighting; recorded and welcomed.
    Registered,
    /// Already known; nothing written or sent.
    Returning,
    /// No username to key the ledger on; welcomed only.
    Anonymous,
}

pub async fn on_new_member(
    state: &AppState,
    chat_id: ChatId,
    user_id: UserId,
    username: &str,
) -> Result<JoinOutcome> {
    if username.is_empty() {
        state.messenger.send_html(chat_id, &replies::welcome()).await?;
        info!(user_id = user_id.0, chat_id = chat_id.0, "member without username joined");
        return Ok(JoinOutcome::Anonymous);
    }

    if let Some(banned_id) = state.ledger.lookup(Partition::Banned, username).await? {
        kick(state.messenger.as_ref(), chat_id, banned_id).await?;
        info!(
            username,
            banned_id = banned_id.0,
            chat_id = chat_id.0,
            "banned member tried to rejoin and was removed"
        );
        return Ok(JoinOutcome::Rejected { banned_id });
    }

    if state
        .ledger
        .lookup(Partition::Members, username)
        .await?
        .is_some()
    {
        info!(username, user_id = user_id.0, "member returned to the group");
        return Ok(JoinOutcome::Returning);
    }

    state
        .ledger
        .insert(Partition::Members, user_id, username)
        .await?;
    state.messenger.send_html(chat_id, &replies::welcome()).await?;
    info!(username, user_id = user_id.0, "new member joined and was registered");
    Ok(JoinOutcome::Registered)
}

pub async fn on_left_member(state: &AppState, chat_id: ChatId, username: &str) -> Result<()> {
    info!(username, chat_id = chat_id.0, "member left the group");
    state.messenger.send_html(chat_id, replies::FAREWELL).await
}
