//! Telegram adapter (teloxide).
//!
//! This crate implements the `bambam-core` MessagingPort and UpdateSource over
//! the Telegram Bot API.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode};

pub mod router;
pub mod updates;

use bambam_core::{
    domain::{ChatId, UserId},
    errors::Error,
    messaging::{port::MessagingPort, types::ChatAdmin},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_user(user_id: UserId) -> Result<teloxide::types::UserId> {
        u64::try_from(user_id.0)
            .map(teloxide::types::UserId)
            .map_err(|_| Error::External(format!("invalid telegram user id: {}", user_id.0)))
    }

    pub(crate) fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    /// Telegram has no plain "kick": ban, then lift the ban so the user may
    /// be re-added later. Permanent bans are enforced through the ledger.
    async fn remove_member(&self, chat_id: ChatId, user_id: UserId) -> Result<()> {
        let chat = Self::tg_chat(chat_id);
        let user = Self::tg_user(user_id)?;

        self.bot
            .ban_chat_member(chat, user)
            .await
            .map_err(Self::map_err)?;
        self.bot
            .unban_chat_member(chat, user)
            .only_if_banned(true)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn list_administrators(&self, chat_id: ChatId) -> Result<Vec<ChatAdmin>> {
        let members = self
            .bot
            .get_chat_administrators(Self::tg_chat(chat_id))
            .await
            .map_err(Self::map_err)?;

        Ok(members
            .into_iter()
            .map(|m| ChatAdmin {
                display_name: m
                    .user
                    .username
                    .clone()
                    .unwrap_or_else(|| m.user.first_name.clone()),
            })
            .collect())
    }
}
