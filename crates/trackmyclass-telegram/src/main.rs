//! TrackMyClass Telegram bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx cargo run -p trackmyclass-telegram
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trackmyclass_core::{config, BotConfig};
use trackmyclass_telegram::TrackMyClassBot;

/// TrackMyClass Telegram bot - class seat alerts and history
#[derive(Parser, Debug)]
#[command(name = "trackmyclass-telegram")]
#[command(about = "Telegram bot for TrackMyClass seat tracking")]
struct Args {
    /// Notify listener port (overrides TRACKMYCLASS_NOTIFY_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Backend base URL (overrides TRACKMYCLASS_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Do not start the notify listener
    #[arg(long)]
    no_notify: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    config::load_env_files();

    let filter = match args.verbose {
        0 => "trackmyclass_telegram=info,trackmyclass_notify=info,teloxide=warn",
        1 => "trackmyclass_telegram=debug,trackmyclass_notify=debug,trackmyclass_core=debug,teloxide=info",
        2 => "trackmyclass_telegram=trace,trackmyclass_notify=trace,trackmyclass_core=trace,trackmyclass_backend=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut bot_config = BotConfig::from_env()?;
    if let Some(url) = args.api_url.as_deref() {
        bot_config = bot_config.with_api_url(url)?;
    }
    if let Some(port) = args.port {
        bot_config.notify_port = port;
    }
    tracing::debug!(config = ?bot_config, "Loaded configuration");

    let notify_address = bot_config.notify_bind_address();
    let api_url = bot_config.api_url.to_string();

    let mut bot = TrackMyClassBot::new(bot_config)?;
    if args.no_notify {
        bot = bot.without_notify();
    }

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[robot] TrackMyClass Telegram Bot");
            println!("   Bot: @{}", username);
            println!("   Backend: {}", api_url);
            if args.no_notify {
                println!("   Notify: disabled");
            } else {
                println!("   Notify: http://{}/notify", notify_address);
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\n[phone] Open Telegram and send /start to begin");
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}
