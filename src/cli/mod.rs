use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod init;
pub mod notify;
pub mod preview;
pub mod resolve;
pub mod serve;

use crate::core::AppConfig;
use crate::router::{History, HistoryMode};
use crate::worker::PushMessage;

#[derive(Subcommand)]
enum Command {
    /// Initialize the subscription db
    Init {},
    /// Run the API server and host the app
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,

        /// Override the history mode from WEBNOTIFY_HISTORY
        #[arg(long, value_enum)]
        history: Option<HistoryMode>,
    },
    /// Resolve a browser location against the route table
    Resolve {
        location: String,
        #[arg(long, value_enum)]
        history: Option<HistoryMode>,
        #[arg(long)]
        base: Option<String>,
    },
    /// Print the location of a named route
    Href {
        name: String,
        /// Route params as key=value
        #[arg(value_parser = resolve::parse_param)]
        params: Vec<(String, String)>,
        #[arg(long, value_enum)]
        history: Option<HistoryMode>,
        #[arg(long)]
        base: Option<String>,
    },
    /// Show what the service worker does with a push payload
    Preview {
        /// Raw push data, omit for a push without data
        #[arg(long)]
        data: Option<String>,
        /// Also click the resulting notification
        #[arg(long, default_value = "false")]
        click: bool,
        /// Fail on malformed JSON instead of using defaults
        #[arg(long, default_value = "false")]
        strict: bool,
        /// URLs to fetch through the worker once activated
        #[arg(long)]
        fetch: Vec<String>,
    },
    /// Send a push notification to every subscription
    Notify {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn history(config: &AppConfig, mode: Option<HistoryMode>, base: Option<String>) -> History {
    History::new(
        mode.unwrap_or(config.history_mode),
        base.as_deref().unwrap_or(&config.base_url),
    )
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let mut config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&config.db_path).await?;
        }
        Some(Command::Serve {
            host,
            port,
            history,
        }) => {
            if let Some(mode) = history {
                config.history_mode = mode;
            }
            serve::run(host, port, config).await?;
        }
        Some(Command::Resolve {
            location,
            history: mode,
            base,
        }) => {
            resolve::run(&location, history(&config, mode, base))?;
        }
        Some(Command::Href {
            name,
            params,
            history: mode,
            base,
        }) => {
            resolve::href(&name, params, history(&config, mode, base))?;
        }
        Some(Command::Preview {
            data,
            click,
            strict,
            fetch,
        }) => {
            preview::run(&config, data, click, strict, fetch).await?;
        }
        Some(Command::Notify { title, body, url }) => {
            notify::run(&config, PushMessage { title, body, url }).await?;
        }
        None => {}
    }

    Ok(())
}
