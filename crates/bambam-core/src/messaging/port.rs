use async_trait::async_trait;

use crate::{
    domain::{ChatId, UserId},
    messaging::types::{ChatAdmin, ChatEvent},
    Result,
};

/// Outbound side of the chat platform.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send a message rendered with the platform's HTML subset (`<b>` etc).
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()>;

    /// Remove a member from a chat.
    async fn remove_member(&self, chat_id: ChatId, user_id: UserId) -> Result<()>;

    async fn list_administrators(&self, chat_id: ChatId) -> Result<Vec<ChatAdmin>>;
}

/// Inbound side of the chat platform: a blocking stream of events.
///
/// Each call waits (up to the adapter's poll timeout) and returns the events
/// that arrived, in platform order. An empty batch is not an error.
#[async_trait]
pub trait UpdateSource: Send {
    async fn next_batch(&mut self) -> Result<Vec<ChatEvent>>;
}
