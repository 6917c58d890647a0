//! CLI entry and dispatch.

use std::io::{IsTerminal, Read, stdin};

use anyhow::{Context, Result};
use clap::Parser;
use dia_core::api::{ApiClient, resolve_base_url};
use dia_core::config::{Config, ProviderKind};
use dia_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "dia")]
#[command(version)]
#[command(about = "Terminal client for the Domain Intelligence Analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides DIA_BASE_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Send one chat message and print the reply
    Ask {
        /// The message; read from stdin when omitted
        message: Option<String>,

        /// Session id to chat in (most recent session if omitted)
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// Crawl and summarize a domain
    Analyze {
        /// Domain to analyze, e.g. example.com
        domain: String,

        /// Session id to record the analysis in
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// Fetch and analyze specific URLs
    Urls {
        /// URLs to fetch
        #[arg(required = true)]
        urls: Vec<String>,

        /// Session id to record the analysis in
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// Upload documents into a session's index
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,

        /// Session id to index into
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// Manage analysis sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Print the backend status report
    Status,

    /// Ask the backend to load its model
    LoadModel,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// List sessions in backend order
    List,
    /// Create a session
    New {
        /// Display name for the session
        #[arg(long)]
        name: Option<String>,

        /// LLM provider for the session (groq or local)
        #[arg(long, value_name = "PROVIDER")]
        provider: Option<String>,
    },
    /// Delete a session
    Delete {
        #[arg(value_name = "SESSION_ID")]
        id: String,
    },
    /// Rename a session
    Rename {
        #[arg(value_name = "SESSION_ID")]
        id: String,
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("load config")?;

    // The guard must outlive the runtime so late log lines still flush.
    let _log_guard = logging::init(&config).context("init logging")?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli, config).await })
}

async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let base_url = resolve_base_url(cli.base_url.as_deref(), &config.base_url)?;

    let Some(command) = cli.command else {
        // Piped input short-circuits into a one-shot ask; otherwise the
        // interactive TUI is the default mode.
        if !stdin().is_terminal() {
            let mut message = String::new();
            stdin()
                .read_to_string(&mut message)
                .context("read message from stdin")?;
            let client = ApiClient::new(base_url);
            return commands::ask::run(&client, &config, message.trim(), None).await;
        }
        return crate::modes::run_tui(&config, base_url).await;
    };

    let client = ApiClient::new(base_url);
    match command {
        Commands::Ask { message, session } => {
            let message = match message {
                Some(message) => message,
                None => {
                    let mut buffer = String::new();
                    stdin()
                        .read_to_string(&mut buffer)
                        .context("read message from stdin")?;
                    buffer.trim().to_string()
                }
            };
            commands::ask::run(&client, &config, &message, session.as_deref()).await
        }
        Commands::Analyze { domain, session } => {
            commands::analyze::domain(&client, &config, &domain, session.as_deref()).await
        }
        Commands::Urls { urls, session } => {
            commands::analyze::urls(&client, &config, &urls, session.as_deref()).await
        }
        Commands::Upload { files, session } => {
            commands::upload::run(&client, &config, &files, session.as_deref()).await
        }

        Commands::Sessions { command } => match command {
            SessionCommands::List => commands::sessions::list(&client).await,
            SessionCommands::New { name, provider } => {
                let provider = match provider.as_deref() {
                    Some(id) => ProviderKind::from_id(id)
                        .with_context(|| format!("unknown provider '{id}' (groq or local)"))?,
                    None => config.provider,
                };
                let name = name.unwrap_or_else(|| config.session_name.clone());
                commands::sessions::new(&client, &name, provider).await
            }
            SessionCommands::Delete { id } => commands::sessions::delete(&client, &id).await,
            SessionCommands::Rename { id, name } => {
                commands::sessions::rename(&client, &id, &name).await
            }
        },

        Commands::Status => commands::status::run(&client).await,
        Commands::LoadModel => commands::load_model::run(&client).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
