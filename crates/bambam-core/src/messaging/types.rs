use crate::domain::{ChatId, UserId};

/// Platform-neutral inbound event.
///
/// A missing platform username is reported as an empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    NewMember {
        chat_id: ChatId,
        user_id: UserId,
        username: String,
    },
    LeftMember {
        chat_id: ChatId,
        username: String,
    },
    Text(TextMessage),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub from_id: UserId,
    pub from_username: String,
    pub body: String,
    pub is_private: bool,
}

impl ChatEvent {
    pub fn chat_id(&self) -> ChatId {
        match self {
            ChatEvent::NewMember { chat_id, .. } | ChatEvent::LeftMember { chat_id, .. } => {
                *chat_id
            }
            ChatEvent::Text(t) => t.chat_id,
        }
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatEvent::NewMember { .. } => "new_member",
            ChatEvent::LeftMember { .. } => "left_member",
            ChatEvent::Text(_) => "text",
        }
    }
}

/// One entry of a chat's administrator roster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatAdmin {
    /// Username, or first name when the admin has no username.
    pub display_name: String,
}
