use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    api::{HttpAuthClient, HttpModerationClient},
    app::{get_config_dir, load_config, load_config_file, Config},
    cli::{handle_command, Cli, Commands},
    constants::LOG_FILE,
    session::SessionStore,
    tui::{run_ui, App},
    utils::{init_file_logger, init_logger},
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
    session: SessionStore,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let interactive = matches!(cli.command, None | Some(Commands::Chat));
        Self::init_logging(interactive, cli.verbose);

        // Load configuration
        let config = if let Some(config_path) = &cli.config {
            load_config_file(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config: {:#}. Using defaults.", e);
                    Config::default()
                }
            }
        };

        // Load session state
        let session = SessionStore::open(SessionStore::default_path()?);

        Ok(Self {
            cli,
            config,
            session,
        })
    }

    /// The TUI owns the terminal, so its logs go to a file
    fn init_logging(interactive: bool, verbose: bool) {
        if !interactive {
            init_logger(verbose);
            return;
        }

        let log_path = match get_config_dir() {
            Ok(dir) => dir.join(LOG_FILE),
            Err(_) => return,
        };
        if let Err(e) = init_file_logger(&log_path, verbose) {
            eprintln!("Could not open log file {}: {}", log_path.display(), e);
        }
    }

    /// Run the orchestrator
    pub async fn run(mut self) -> Result<()> {
        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config, &mut self.session).await? {
                return Ok(()); // Command handled, exit
            }
            // Continue to the TUI for Commands::Chat
        }

        let auth_api = HttpAuthClient::new(&self.config.api).context("Failed to build HTTP client")?;
        let moderation_api =
            HttpModerationClient::new(&self.config.api).context("Failed to build HTTP client")?;

        match self.session.user() {
            Some(user) => info!(user_id = user.id, "resuming session for {}", user.email),
            None => info!("no stored session, showing sign in"),
        }

        let app = App::new(
            self.config,
            self.session,
            Arc::new(auth_api),
            Arc::new(moderation_api),
        );

        // The session is saved by the UI whenever it changes
        run_ui(app).await
    }
}
