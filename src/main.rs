use clap::Parser;
use pagewatch::run_with_env_path;

/// pagewatch - watches a web page and reports changes to a Telegram chat.
///
/// Settings are read from `.env` in the working directory (TELEGRAM_BOT_TOKEN,
/// TARGET_URL, POLL_INTERVAL_SECS, ...). TELEGRAM_CHAT_ID is filled in
/// automatically after the first message to the bot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {}

const ENV_FILE: &str = ".env";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Only --help/--version; everything else comes from the env file
    let _args = Args::parse();

    run_with_env_path(ENV_FILE).await
}
