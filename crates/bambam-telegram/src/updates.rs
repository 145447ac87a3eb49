use std::time::Duration;

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{Message, UpdateKind, User},
};
use tracing::{debug, info};

use bambam_core::{
    domain::{ChatId, UserId},
    messaging::{
        port::UpdateSource,
        types::{ChatEvent, TextMessage},
    },
    Result,
};

use crate::TelegramMessenger;

/// Long-polls `getUpdates` and yields events in arrival order.
pub struct TelegramUpdates {
    bot: Bot,
    offset: i32,
    timeout: Duration,
}

impl TelegramUpdates {
    pub fn new(bot: Bot, timeout: Duration) -> Self {
        Self {
            bot,
            offset: 0,
            timeout,
        }
    }
}

#[async_trait]
impl UpdateSource for TelegramUpdates {
    async fn next_batch(&mut self) -> Result<Vec<ChatEvent>> {
        let timeout = u32::try_from(self.timeout.as_secs()).unwrap_or(u32::MAX);
        let updates = self
            .bot
            .get_updates()
            .offset(self.offset)
            .timeout(timeout)
            .await
            .map_err(TelegramMessenger::map_err)?;

        let mut events = Vec::new();
        for update in updates {
            // Acknowledge every update, including kinds we ignore.
            self.offset = update.id + 1;
            match &update.kind {
                UpdateKind::Message(msg) => {
                    let found = events_from_message(msg);
                    if found.is_empty() {
                        info!(
                            chat_id = msg.chat.id.0,
                            from = %msg.from().map(username_of).unwrap_or_default(),
                            kind = content_kind(msg),
                            "message ignored"
                        );
                    }
                    events.extend(found);
                }
                other => debug!(
                    update_id = update.id,
                    kind = update_kind_name(other),
                    "update ignored"
                ),
            }
        }
        Ok(events)
    }
}

fn username_of(user: &User) -> String {
    user.username.clone().unwrap_or_default()
}

fn update_kind_name(kind: &UpdateKind) -> &'static str {
    match kind {
        UpdateKind::Message(_) => "message",
        UpdateKind::EditedMessage(_) => "edited_message",
        UpdateKind::ChannelPost(_) => "channel_post",
        UpdateKind::EditedChannelPost(_) => "edited_channel_post",
        UpdateKind::CallbackQuery(_) => "callback_query",
        UpdateKind::MyChatMember(_) => "my_chat_member",
        UpdateKind::ChatMember(_) => "chat_member",
        _ => "other",
    }
}

/// Short label for what a message carries, used when it yields no event.
pub fn content_kind(msg: &Message) -> &'static str {
    if msg.text().is_some() {
        "text"
    } else if msg.photo().is_some() {
        "photo"
    } else if msg.sticker().is_some() {
        "sticker"
    } else if msg.voice().is_some() {
        "voice"
    } else if msg.video().is_some() {
        "video"
    } else if msg.animation().is_some() {
        "animation"
    } else if msg.document().is_some() {
        "document"
    } else if msg.audio().is_some() {
        "audio"
    } else {
        "other"
    }
}

/// Translate one Telegram message into zero or more core events.
pub fn events_from_message(msg: &Message) -> Vec<ChatEvent> {
    let chat_id = ChatId(msg.chat.id.0);
    let mut events = Vec::new();

    if let Some(users) = msg.new_chat_members() {
        events.extend(users.iter().map(|u| ChatEvent::NewMember {
            chat_id,
            user_id: UserId(u.id.0 as i64),
            username: username_of(u),
        }));
    }

    if let Some(user) = msg.left_chat_member() {
        events.push(ChatEvent::LeftMember {
            chat_id,
            username: username_of(user),
        });
    }

    if let (Some(text), Some(from)) = (msg.text(), msg.from()) {
        if !text.is_empty() {
            events.push(ChatEvent::Text(TextMessage {
                chat_id,
                from_id: UserId(from.id.0 as i64),
                from_username: username_of(from),
                body: text.to_string(),
                is_private: msg.chat.is_private(),
            }));
        }
    }

    events
}
