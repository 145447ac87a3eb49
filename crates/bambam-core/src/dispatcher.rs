//! Command classification and routing.
//!
//! Verbs are matched as case-insensitive substrings of the whole message in a
//! fixed priority order, first match wins. This means `/kick /admins` lists
//! admins and `/helpme` shows help; the behavior is kept as-is.

use crate::{
    messaging::types::TextMessage,
    moderation::{ban_or_kick, ModerationMode},
    replies,
    router::AppState,
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Admins,
    Ban,
    Kick,
    Rules,
    Help,
    Unknown,
}

const GROUP_COMMANDS: &[(&str, Command)] = &[
    ("/ADMINS", Command::Admins),
    ("/BAN", Command::Ban),
    ("/KICK", Command::Kick),
    ("/REGRAS", Command::Rules),
    ("/HELP", Command::Help),
];

const PRIVATE_COMMANDS: &[(&str, Command)] =
    &[("/HELP", Command::Help), ("/START", Command::Help)];

const TRIGGERS: &[(&str, &str)] = &[
    ("NÃO VAI DAR", replies::TRIGGER_NAO_VAI_DAR),
    ("KKKK", replies::TRIGGER_KKKK),
];

/// A message is a command iff it starts with `/`.
pub fn is_command(text: &str) -> bool {
    text.starts_with('/')
}

/// Pick the handler for a command message.
pub fn classify(text: &str, is_private: bool) -> Command {
    let table = if is_private {
        PRIVATE_COMMANDS
    } else {
        GROUP_COMMANDS
    };
    let upper = text.to_uppercase();

    table
        .iter()
        .find(|(token, _)| upper.contains(*token))
        .map(|(_, cmd)| *cmd)
        .unwrap_or(Command::Unknown)
}

/// Extract a username argument: drop the command prefix (ASCII
/// case-insensitive), trim, and remove mention `@`s.
pub fn strip_command_argument(text: &str, prefix: &str) -> String {
    let rest = match text.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &text[prefix.len()..],
        _ => text,
    };
    rest.trim().replace('@', "")
}

/// Canned reply for free text containing a trigger phrase.
pub fn trigger_reply(text: &str) -> Option<&'static str> {
    let upper = text.to_uppercase();
    TRIGGERS
        .iter()
        .find(|(phrase, _)| upper.contains(*phrase))
        .map(|(_, reply)| *reply)
}

/// Run a command message and produce the reply to send back.
pub async fn dispatch_command(state: &AppState, msg: &TextMessage) -> Result<String> {
    let cmd = classify(&msg.body, msg.is_private);

    let reply = match cmd {
        Command::Admins => {
            let admins = state.messenger.list_administrators(msg.chat_id).await?;
            let names = admins
                .iter()
                .map(|a| a.display_name.as_str())
                .collect::<Vec<_>>();
            replies::admin_list(&names)
        }
        Command::Ban => moderate(state, msg, ModerationMode::Ban).await?,
        Command::Kick => moderate(state, msg, ModerationMode::Kick).await?,
        Command::Rules => state.texts.rules.clone(),
        Command::Help => state.texts.help.clone(),
        Command::Unknown => replies::UNKNOWN_COMMAND.to_string(),
    };

    Ok(reply)
}

async fn moderate(state: &AppState, msg: &TextMessage, mode: ModerationMode) -> Result<String> {
    let target = strip_command_argument(&msg.body, mode.command());
    let outcome = ban_or_kick(state, mode, msg.from_id, msg.chat_id, &target).await?;
    Ok(outcome.reply())
}
