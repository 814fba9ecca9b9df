//! Main Telegram bot implementation.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::Me;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};
use trackmyclass_core::BotConfig;
use trackmyclass_notify::{dm_channel, serve, NotifyConfig, NotifyState};

use crate::dm_worker::run_dm_worker;
use crate::error::{BotError, Result};
use crate::handlers::{handle_command, is_addressed_command, unknown_command_text, Command};
use crate::state::BotState;

/// The Telegram bot for TrackMyClass.
pub struct TrackMyClassBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared state across handlers.
    state: Arc<BotState>,
    config: BotConfig,
    /// Whether to run the inbound notify listener.
    notify: bool,
}

impl TrackMyClassBot {
    /// Create a bot from loaded configuration.
    pub fn new(config: BotConfig) -> Result<Self> {
        let state = BotState::from_config(&config)?;
        Ok(Self {
            bot: Bot::new(config.bot_token.clone()),
            state: Arc::new(state),
            config,
            notify: true,
        })
    }

    /// Skip the notify listener and DM worker.
    pub fn without_notify(mut self) -> Self {
        self.notify = false;
        self
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| BotError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Start the notify listener, then poll for updates until Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        if self.notify {
            self.spawn_notify();
        }

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "Could not register command list");
        }

        let state = Arc::clone(&self.state);

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let state = Arc::clone(&state);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message, me: Me| {
                        msg.text()
                            .map(|t| is_addressed_command(t, me.username()))
                            .unwrap_or(false)
                    })
                    .endpoint(|bot: Bot, msg: Message| async move {
                        if let Some(text) = msg.text() {
                            info!(cmd = %text, "Unrecognized command");
                            bot.send_message(msg.chat.id, unknown_command_text(text))
                                .await?;
                        }
                        Ok::<(), teloxide::RequestError>(())
                    }),
            );

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|_upd| async move {})
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }

    /// Spawn the DM worker and the notify HTTP server.
    fn spawn_notify(&self) {
        let notify_config = NotifyConfig::new(self.config.notify_host.clone(), self.config.notify_port);
        let (dispatcher, outbound) =
            dm_channel(self.config.dm_queue_capacity, notify_config.reply_timeout);

        tokio::spawn(run_dm_worker(self.bot.clone(), outbound));

        let notify_state = NotifyState::new(notify_config, dispatcher);
        tokio::spawn(async move {
            if let Err(e) = serve(notify_state).await {
                error!(error = %e, "Notify server stopped");
            }
        });
    }
}
