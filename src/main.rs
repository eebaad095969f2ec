use anyhow::Result;
use bot_gallery::chat::ChatScreen;
use bot_gallery::config::{get_http_timeout_secs, Settings};
use bot_gallery::gallery;
use bot_gallery::pullstring::{Bot, ConversationApi, ConversationClient};
use colored::Colorize;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv().ok();

    init_logging();

    info!("Starting Bot Gallery...");

    let settings = init_settings();

    let api: Arc<dyn ConversationApi> = Arc::new(ConversationClient::new(Duration::from_secs(
        get_http_timeout_secs(),
    )));

    let mut bots = match gallery::fetch_bot_list(api, &settings).await {
        Ok(bots) => bots,
        Err(e) => {
            error!("Failed to fetch the bot list: {e}");
            std::process::exit(1);
        }
    };
    info!("ConfigBot listed {} bots.", bots.len());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    run_gallery(&mut bots, &settings, &mut lines).await
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn init_settings() -> Settings {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    }
}

fn print_menu(bots: &[Bot]) {
    println!();
    println!("{}", "Bot Gallery".bold());
    for (index, bot) in bots.iter().enumerate() {
        let marker = if bot.is_active() { " (active)" } else { "" };
        println!("  {}. {}{marker}", index + 1, bot.name.cyan());
    }
    println!("Pick a bot by number, or q to quit:");
}

/// Menu loop: render the gallery, chat with the selected bot, return to
/// the menu when the chat ends.
async fn run_gallery<R>(bots: &mut [Bot], settings: &Settings, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    if bots.is_empty() {
        println!("The ConfigBot listed no bots. Nothing to chat with.");
        return Ok(());
    }

    loop {
        print_menu(bots);

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        match choice.parse::<usize>() {
            Ok(number) if (1..=bots.len()).contains(&number) => {
                let bot = &mut bots[number - 1];
                println!();
                println!("Chatting with {}. /quit returns to the gallery.", bot.name.bold());
                ChatScreen::new(bot, settings).run(lines).await?;
            }
            _ => println!("No such bot."),
        }
    }
}
