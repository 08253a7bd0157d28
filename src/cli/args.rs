use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::{ModerationAction, UserId};

#[derive(Parser, Debug)]
#[command(name = "messenger")]
#[command(version = "0.1.0")]
#[command(about = "Terminal messenger with swipe navigation, a shop and a moderation panel", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Open the messenger (default)
    Chat,
    /// Show version information
    Version,
    /// Show configuration, session and endpoint settings
    Status,
    /// Sign in and remember the session
    Login {
        /// Email or login name
        email: String,
        /// Password, or set MESSENGER_PASSWORD
        #[arg(long, env = "MESSENGER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        email: String,
        full_name: String,
        #[arg(long, env = "MESSENGER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List chats with unread counts
    Chats,
    /// List shop products
    Products {
        /// Only show one category (subscriptions, stickers, themes)
        #[arg(long)]
        category: Option<String>,
    },
    /// List users (administrators only)
    Users,
    /// Apply a moderation action to a user (administrators only)
    Moderate {
        user_id: UserId,
        #[arg(value_enum)]
        action: ModerateKind,
        /// Mute duration; the server defaults to 24 hours
        #[arg(long)]
        hours: Option<u32>,
        /// Confirm destructive actions without asking
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModerateKind {
    Block,
    Unblock,
    Mute,
    Unmute,
    Delete,
}

impl ModerateKind {
    /// Build the wire action, carrying the mute duration when given
    pub fn into_action(self, hours: Option<u32>) -> ModerationAction {
        match self {
            ModerateKind::Block => ModerationAction::Block,
            ModerateKind::Unblock => ModerationAction::Unblock,
            ModerateKind::Mute => ModerationAction::Mute {
                duration_hours: hours,
            },
            ModerateKind::Unmute => ModerationAction::Unmute,
            ModerateKind::Delete => ModerationAction::Delete,
        }
    }
}
