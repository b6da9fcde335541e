use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use homework_bot::config::{dotenv_warning, Config, Settings};
use homework_bot::poller::Poller;
use homework_bot::practicum::PracticumClient;
use homework_bot::prelude::{eprintln, *};
use homework_bot::telegram::{Notifier, TelegramBot};

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Polls the Practicum homework API and relays review status changes \
                  to a Telegram chat"
)]
pub struct App {
    #[clap(flatten)]
    settings: Settings,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Run a single poll iteration and exit
    #[clap(long)]
    once: bool,

    /// Append log records to this file instead of stderr
    #[clap(long, env = "HOMEWORK_BOT_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "HOMEWORK_BOT_VERBOSE", default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before parsing so clap's `env` fallbacks see the file.
    let dotenv = dotenvy::dotenv();
    color_eyre::install()?;

    let app = App::parse();
    init_logger(app.global.verbose, app.global.log_file.as_deref())?;

    if let Some(warning) = dotenv_warning(&dotenv) {
        log::warn!("{warning}");
    }

    log::info!("Bot started");

    let config = match Config::from_settings(app.settings) {
        Ok(config) => config,
        Err(err) => {
            log::error!("CRITICAL: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    log::info!("Credentials found, starting to poll");

    let source = PracticumClient::new(&config)?;
    let bot = TelegramBot::new(
        &config.telegram_api,
        &config.credentials.telegram_token,
        config.request_timeout,
    )?;
    let notifier = Notifier::new(bot, config.credentials.telegram_chat_id.clone());

    let cursor = config
        .from_date
        .unwrap_or_else(|| chrono::Utc::now().timestamp());
    log::debug!("Polling {} from {}", source.endpoint(), cursor);

    let mut poller = Poller::new(source, notifier, cursor);

    if app.global.once {
        let outcome = poller.tick().await;
        log::info!("Single iteration finished: {outcome:?}");
        return Ok(());
    }

    poller.run(config.retry_period).await;

    Ok(())
}

fn init_logger(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_filter = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| f!("Failed to open log file {}", path.display()))?;

        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{}, {}, {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                    record.level(),
                    record.args()
                )
            });
    }

    builder.init();
    Ok(())
}
