use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::{
    admin::AdminPanel,
    api::{
        format_timestamp, HttpAuthClient, HttpModerationClient, ModeratedUser, ModerationAction,
        UserId, UserRecord,
    },
    app::{get_config_dir, init_config, Config},
    auth::{AuthForm, AuthMode},
    chat::{sample_chats, sample_thread, ChatNavigator},
    constants::{CONFIG_FILE, LOCAL_CONFIG_PATH},
    gesture::NoHaptics,
    session::SessionStore,
    shop::{products_in, Category},
    utils::{log_error, log_info, log_warn, MessengerError},
};

use super::Commands;

/// Handle CLI subcommands. Returns `false` when the TUI should start.
pub async fn handle_command(
    command: &Commands,
    config: &Config,
    session: &mut SessionStore,
) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing messenger configuration...");
            let path = init_config()?;
            println!("Configuration written to {}", path.display().to_string().green());
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Status => {
            show_status(config, session);
            Ok(true)
        }
        Commands::Login { email, password } => {
            authenticate(config, session, AuthMode::Login, email, "", password).await?;
            Ok(true)
        }
        Commands::Register {
            email,
            full_name,
            password,
        } => {
            authenticate(config, session, AuthMode::Register, email, full_name, password).await?;
            Ok(true)
        }
        Commands::Logout => {
            session.sign_out()?;
            println!("Signed out");
            Ok(true)
        }
        Commands::Whoami => {
            whoami(session);
            Ok(true)
        }
        Commands::Chats => {
            list_chats(config);
            Ok(true)
        }
        Commands::Products { category } => {
            list_products(category.as_deref())?;
            Ok(true)
        }
        Commands::Users => {
            list_users(config, session).await?;
            Ok(true)
        }
        Commands::Moderate {
            user_id,
            action,
            hours,
            yes,
        } => {
            let action = action.into_action(*hours);
            if action.is_destructive() && !yes {
                bail!("`{}` cannot be undone; pass --yes to confirm", action);
            }
            moderate(config, session, *user_id, action).await?;
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to the TUI
    }
}

/// Show version information
pub fn show_version() {
    println!("messenger v{}", env!("CARGO_PKG_VERSION"));
    println!("   Chats, a shop and a moderation panel in your terminal");
}

fn show_status(config: &Config, session: &SessionStore) {
    println!("messenger status:");
    println!();

    match get_config_dir() {
        Ok(dir) => {
            let path = dir.join(CONFIG_FILE);
            if path.exists() {
                println!("  [OK] Configuration: {}", path.display());
            } else {
                println!("  [WARNING] Configuration: Not found (using defaults)");
            }
        }
        Err(e) => println!("  [ERROR] Configuration directory: {}", e),
    }
    if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
        println!("  [OK] Local overrides: {}", LOCAL_CONFIG_PATH);
    }

    match session.user() {
        Some(user) => println!(
            "  [OK] Session: {} ({})",
            user.email,
            session.path().display()
        ),
        None => println!("  [WARNING] Session: Signed out"),
    }

    println!("\n  Endpoints:");
    println!("    • auth:       {}", config.api.auth_url);
    println!("    • moderation: {}", config.api.moderation_url);
    println!(
        "\n  Swipe threshold {} · damping {} · haptics {}",
        config.gesture.threshold,
        config.gesture.damping,
        if config.ui.haptics { "on" } else { "off" }
    );
    println!();
}

async fn authenticate(
    config: &Config,
    session: &mut SessionStore,
    mode: AuthMode,
    email: &str,
    full_name: &str,
    password: &str,
) -> Result<()> {
    let api = HttpAuthClient::new(&config.api).context("Failed to build HTTP client")?;
    let mut form = AuthForm {
        mode,
        email: email.to_string(),
        full_name: full_name.to_string(),
        password: password.to_string(),
        ..AuthForm::new()
    };

    match form.submit(&api, session).await {
        Some(user) => {
            println!("Signed in as {}", user.full_name.green());
            if user.can_moderate() {
                println!("   {}", "Administrator".yellow());
            }
            Ok(())
        }
        None => {
            let message = form.error.unwrap_or_default();
            log_error("auth", &message);
            bail!(message)
        }
    }
}

fn whoami(session: &SessionStore) {
    match session.user() {
        Some(user) => {
            println!("{} <{}>", user.full_name.bold(), user.email);
            println!("   id {} · {:?}", user.id, user.role);
        }
        None => println!("Not signed in. Run `messenger login <email>`."),
    }
}

fn list_chats(config: &Config) {
    let navigator = ChatNavigator::new(
        sample_chats(),
        sample_thread(),
        &config.gesture,
        Box::new(NoHaptics),
    );
    println!("Chats ({} unread):", navigator.total_unread());
    for chat in navigator.chats() {
        let unread = if chat.unread > 0 {
            format!(" ({})", chat.unread).cyan().to_string()
        } else {
            String::new()
        };
        let presence = if chat.online { "●".green() } else { " ".normal() };
        println!(
            "  {} {:<18}{} {}  {}",
            presence,
            chat.name,
            unread,
            chat.time.dimmed(),
            chat.last_message
        );
    }
}

fn list_products(category: Option<&str>) -> Result<()> {
    let category = match category {
        Some(name) => Some(
            Category::parse(name)
                .with_context(|| format!("Unknown category '{}'", name))?,
        ),
        None => None,
    };

    for product in products_in(category) {
        let badge = product
            .badge
            .as_deref()
            .map(|b| format!(" [{}]", b).red().to_string())
            .unwrap_or_default();
        println!(
            "  {} {:<22} {}{}",
            product.emoji,
            product.name,
            product.price_label().green(),
            badge
        );
        println!("      {} · {}", product.description.dimmed(), product.category);
    }
    Ok(())
}

/// Admin panel for the signed-in user, or a permission error
fn admin_panel(session: &SessionStore) -> Result<AdminPanel> {
    let user: &UserRecord = session.user().ok_or(MessengerError::NotSignedIn)?;
    Ok(AdminPanel::for_user(user)?)
}

async fn list_users(config: &Config, session: &SessionStore) -> Result<()> {
    let mut panel = admin_panel(session)?;
    let api = HttpModerationClient::new(&config.api).context("Failed to build HTTP client")?;

    if !panel.refresh(&api).await {
        bail!(
            "Could not load users: {}",
            panel.last_error().unwrap_or("unknown error")
        );
    }

    println!("Users ({}):", panel.users().len());
    for user in panel.users() {
        print_user(user);
    }
    Ok(())
}

fn print_user(user: &ModeratedUser) {
    let mut flags = String::new();
    if user.is_blocked {
        flags.push_str(&" BLOCKED".red().to_string());
    }
    if user.is_muted {
        flags.push_str(
            &format!(" MUTED until {}", format_timestamp(user.muted_until.as_ref()))
                .yellow()
                .to_string(),
        );
    }
    println!(
        "  {:>4}  {:<20} {}{}",
        user.id,
        user.full_name,
        user.email.dimmed(),
        flags
    );
    println!(
        "        created {} · last seen {}",
        format_timestamp(user.created_at.as_ref()),
        format_timestamp(user.last_seen.as_ref())
    );
}

async fn moderate(
    config: &Config,
    session: &SessionStore,
    user_id: UserId,
    action: ModerationAction,
) -> Result<()> {
    let mut panel = admin_panel(session)?;
    let api = HttpModerationClient::new(&config.api).context("Failed to build HTTP client")?;

    if panel.apply(&api, user_id, action).await {
        let message = panel
            .last_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} applied", action));
        log_info("moderation", &message);
        println!("{}", message.green());
        Ok(())
    } else {
        let reason = panel.last_error().unwrap_or("unknown error").to_string();
        log_warn("moderation", format!("{} on user {} failed", action, user_id));
        bail!("Could not {}: {}", action, reason)
    }
}
