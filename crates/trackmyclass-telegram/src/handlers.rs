//! Command handlers for the Telegram bot.

use std::sync::Arc;

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, User};
use teloxide::utils::command::BotCommands;
use teloxide::{ApiError, RequestError};
use tracing::{debug, info, warn};
use trackmyclass_core::{reconstruct, XrayReport, DEFAULT_XRAY_LIMIT};

use crate::render::{self, Card};
use crate::state::BotState;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Register yourself as a user")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Subscribe using a class number (private chat only): /subscribe <class_number>")]
    Subscribe(String),

    #[command(description = "Unsubscribe using a class number: /unsubscribe <class_number>")]
    Unsubscribe(String),

    #[command(description = "View your current class subscriptions")]
    Subscriptions,

    #[command(description = "Get availability insights for a class: /xray <class_number>")]
    Xray(String),

    #[command(description = "Get the last times a class was open/closed: /history <class_number>")]
    History(String),

    #[command(description = "Check if I can send you direct messages")]
    Testdm,
}

const DM_CHECK_TEXT: &str = "✅ I can DM you! You're all set.";
const DM_SENT_TEXT: &str =
    "📬 Sent you a DM! If you didn't get it, check your privacy settings.";
const DM_BLOCKED_TEXT: &str = "❌ I can't DM you. Please check your privacy settings:\n\
    - Open a private chat with TrackMyClass and press Start, or\n\
    - Unblock TrackMyClass if you blocked it.";

/// Send a card as an HTML message.
async fn send_card(bot: &Bot, chat_id: ChatId, card: Card) -> ResponseResult<()> {
    bot.send_message(chat_id, card.to_html())
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Backend user ID for a Telegram user.
fn backend_user_id(user: &User) -> String {
    user.id.0.to_string()
}

/// Trimmed class-number argument, or `None` when missing.
fn class_arg(arg: &str) -> Option<&str> {
    let trimmed = arg.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Handle the /start command.
pub async fn handle_start(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = backend_user_id(user);
    let username = user.username.clone().unwrap_or_else(|| user.full_name());

    let card = match state.backend.create_user(&user_id, &username).await {
        Ok(outcome) => {
            info!(user_id = %user_id, accepted = outcome.is_accepted(), "User registration");
            render::registration(&outcome)
        }
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Registration request failed");
            render::error("contact backend", &e)
        }
    };

    send_card(&bot, msg.chat.id, card).await
}

/// Handle the /help command.
pub async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Handle the /subscribe command.
pub async fn handle_subscribe(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
    arg: String,
) -> ResponseResult<()> {
    if !msg.chat.is_private() {
        debug!(chat_id = %msg.chat.id, "Rejected /subscribe outside private chat");
        return send_card(&bot, msg.chat.id, render::dm_only()).await;
    }
    let Some(class_number) = class_arg(&arg) else {
        return send_card(&bot, msg.chat.id, render::usage("subscribe")).await;
    };
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = backend_user_id(user);

    let card = match state.backend.lookup_section(class_number).await {
        Ok(None) => render::class_not_found(class_number),
        Ok(Some(section_id)) => match state.backend.subscribe(&user_id, &section_id).await {
            Ok(outcome) => {
                info!(
                    user_id = %user_id,
                    section_id = %section_id,
                    accepted = outcome.is_accepted(),
                    "Subscribe"
                );
                render::subscribed(class_number, &outcome)
            }
            Err(e) => render::error("subscribe", &e),
        },
        Err(e) => render::error("subscribe", &e),
    };

    send_card(&bot, msg.chat.id, card).await
}

/// Handle the /unsubscribe command.
pub async fn handle_unsubscribe(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
    arg: String,
) -> ResponseResult<()> {
    let Some(class_number) = class_arg(&arg) else {
        return send_card(&bot, msg.chat.id, render::usage("unsubscribe")).await;
    };
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = backend_user_id(user);

    let card = match state.backend.lookup_section(class_number).await {
        Ok(None) => render::class_not_found(class_number),
        Ok(Some(section_id)) => match state.backend.unsubscribe(&user_id, &section_id).await {
            Ok(outcome) => {
                info!(
                    user_id = %user_id,
                    section_id = %section_id,
                    accepted = outcome.is_accepted(),
                    "Unsubscribe"
                );
                render::unsubscribed(class_number, &outcome)
            }
            Err(e) => render::error("unsubscribe", &e),
        },
        Err(e) => render::error("unsubscribe", &e),
    };

    send_card(&bot, msg.chat.id, card).await
}

/// Handle the /subscriptions command.
pub async fn handle_subscriptions(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = backend_user_id(user);

    let card = match state.backend.subscriptions(&user_id).await {
        Ok(subs) => {
            debug!(user_id = %user_id, count = subs.len(), "Fetched subscriptions");
            render::subscriptions(&subs)
        }
        Err(e) => render::error("fetch subscriptions", &e),
    };

    send_card(&bot, msg.chat.id, card).await
}

/// Handle the /xray command.
pub async fn handle_xray(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
    arg: String,
) -> ResponseResult<()> {
    let Some(class_number) = class_arg(&arg) else {
        return send_card(&bot, msg.chat.id, render::usage("xray")).await;
    };

    let card = match state.backend.xray(class_number).await {
        Ok(None) => render::class_not_found(class_number),
        Ok(Some(data)) => match XrayReport::build(&data, DEFAULT_XRAY_LIMIT) {
            Ok(report) => render::xray(class_number, &report),
            Err(e) => render::error("fetch xray data", &e),
        },
        Err(e) => render::error("fetch xray data", &e),
    };

    send_card(&bot, msg.chat.id, card).await
}

/// Handle the /history command.
pub async fn handle_history(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
    arg: String,
) -> ResponseResult<()> {
    let Some(class_number) = class_arg(&arg) else {
        return send_card(&bot, msg.chat.id, render::usage("history")).await;
    };

    let card = match history_card(&state, class_number).await {
        Ok(card) => card,
        Err(e) => {
            warn!(class_number, error = %e, "History lookup failed");
            render::error("fetch history", &e)
        }
    };

    send_card(&bot, msg.chat.id, card).await
}

async fn history_card(
    state: &BotState,
    class_number: &str,
) -> trackmyclass_backend::Result<Card> {
    let Some(section_id) = state.backend.lookup_section(class_number).await? else {
        return Ok(render::class_not_found(class_number));
    };

    let records = state.backend.open_history(class_number).await?;
    let seats = state.backend.section_seats(&section_id).await?;

    let reconstruction = reconstruct(&records, seats, Utc::now(), state.history.limit);
    debug!(
        class_number,
        records = records.len(),
        intervals = reconstruction.intervals.len(),
        skipped = reconstruction.skipped_count(),
        "Reconstructed open history"
    );

    Ok(render::history(class_number, &reconstruction))
}

/// Handle the /testdm command.
pub async fn handle_testdm(bot: Bot, msg: Message) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let reply = match bot.send_message(ChatId::from(user.id), DM_CHECK_TEXT).await {
        Ok(_) => DM_SENT_TEXT,
        Err(e) if is_dm_refused(&e) => {
            info!(user_id = user.id.0, error = %e, "Cannot DM user");
            DM_BLOCKED_TEXT
        }
        Err(e) => return Err(e),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// True when Telegram refuses a DM because of the user's settings.
pub fn is_dm_refused(err: &RequestError) -> bool {
    matches!(
        err,
        RequestError::Api(
            ApiError::BotBlocked
                | ApiError::CantInitiateConversation
                | ApiError::UserDeactivated
                | ApiError::ChatNotFound
        )
    )
}

/// True for a slash command with no `@mention` or one naming `bot_username`.
pub fn is_addressed_command(text: &str, bot_username: &str) -> bool {
    let Some(token) = text.split_whitespace().next() else {
        return false;
    };
    if !token.starts_with('/') {
        return false;
    }
    match token.split_once('@') {
        Some((_, mention)) => mention.eq_ignore_ascii_case(bot_username),
        None => true,
    }
}

/// Reply to a slash command that did not parse.
pub fn unknown_command_text(text: &str) -> String {
    let cmd = text.split_whitespace().next().unwrap_or(text);
    format!("Unknown command: {}\n\nUse /help to see available commands.", cmd)
}

/// Dispatch a parsed command to its handler.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => handle_start(bot, msg, state).await,
        Command::Help => handle_help(bot, msg).await,
        Command::Subscribe(arg) => handle_subscribe(bot, msg, state, arg).await,
        Command::Unsubscribe(arg) => handle_unsubscribe(bot, msg, state, arg).await,
        Command::Subscriptions => handle_subscriptions(bot, msg, state).await,
        Command::Xray(arg) => handle_xray(bot, msg, state, arg).await,
        Command::History(arg) => handle_history(bot, msg, state, arg).await,
        Command::Testdm => handle_testdm(bot, msg).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "tmc_bot").unwrap(), Command::Start);
        assert_eq!(
            Command::parse("/subscribe 12345", "tmc_bot").unwrap(),
            Command::Subscribe("12345".to_string())
        );
        assert_eq!(
            Command::parse("/xray@tmc_bot 777", "tmc_bot").unwrap(),
            Command::Xray("777".to_string())
        );
        assert_eq!(Command::parse("/testdm", "tmc_bot").unwrap(), Command::Testdm);
        assert!(Command::parse("/connect x", "tmc_bot").is_err());
    }

    #[test]
    fn test_missing_argument_parses_empty() {
        assert_eq!(
            Command::parse("/history", "tmc_bot").unwrap(),
            Command::History(String::new())
        );
        assert_eq!(class_arg(""), None);
        assert_eq!(class_arg("   "), None);
        assert_eq!(class_arg(" 12345 "), Some("12345"));
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let help = Command::descriptions().to_string();
        for name in [
            "/start",
            "/help",
            "/subscribe",
            "/unsubscribe",
            "/subscriptions",
            "/xray",
            "/history",
            "/testdm",
        ] {
            assert!(help.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_dm_refused_classification() {
        assert!(is_dm_refused(&RequestError::Api(ApiError::BotBlocked)));
        assert!(is_dm_refused(&RequestError::Api(ApiError::CantInitiateConversation)));
        assert!(!is_dm_refused(&RequestError::Api(ApiError::Unknown(
            "Bad Request: message is too long".into()
        ))));
    }

    #[test]
    fn test_addressed_command() {
        assert!(is_addressed_command("/foo", "tmc_bot"));
        assert!(is_addressed_command("/foo@tmc_bot arg", "tmc_bot"));
        assert!(is_addressed_command("/foo@TMC_Bot", "tmc_bot"));
        assert!(!is_addressed_command("/start@otherbot", "tmc_bot"));
        assert!(!is_addressed_command("hello /foo", "tmc_bot"));
        assert!(!is_addressed_command("   ", "tmc_bot"));
    }

    #[test]
    fn test_unknown_command_text() {
        assert_eq!(
            unknown_command_text("/foo bar baz"),
            "Unknown command: /foo\n\nUse /help to see available commands."
        );
    }
}
