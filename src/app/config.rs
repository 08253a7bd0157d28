use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, CONFIG_FILE, DEFAULT_AUTH_URL, DEFAULT_MODERATION_URL, ENV_PREFIX,
    GESTURE_UNITS_PER_CELL, HTTP_REQUEST_TIMEOUT_SECS, LOCAL_CONFIG_PATH, SWIPE_DAMPING,
    SWIPE_MAX_VISUAL_OFFSET, SWIPE_THRESHOLD,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoint configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Swipe gesture tuning
    #[serde(default)]
    pub gesture: GestureConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Remote endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Authentication endpoint (login / register)
    pub auth_url: String,
    /// User moderation endpoint (admin only)
    pub moderation_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            moderation_url: DEFAULT_MODERATION_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Swipe gesture tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Minimum drag distance that counts as a swipe (strictly exceeded)
    pub threshold: f64,
    /// Factor applied to the raw drag for the visual offset
    pub damping: f64,
    /// Clamp for the visual offset, in both directions
    pub max_visual_offset: f64,
    /// Gesture units per terminal column
    pub units_per_cell: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: SWIPE_THRESHOLD,
            damping: SWIPE_DAMPING,
            max_visual_offset: SWIPE_MAX_VISUAL_OFFSET,
            units_per_cell: GESTURE_UNITS_PER_CELL,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIConfig {
    /// Ring the terminal bell as tactile feedback on navigation
    pub haptics: bool,
    /// Show the unread-messages notification on start
    pub show_notifications: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            haptics: true,
            show_notifications: true,
        }
    }
}

impl GestureConfig {
    /// Reject values that would break the swipe math
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            anyhow::bail!("gesture.threshold must be a non-negative number");
        }
        if !(self.damping.is_finite() && self.damping > 0.0) {
            anyhow::bail!("gesture.damping must be greater than zero");
        }
        if !(self.units_per_cell.is_finite() && self.units_per_cell > 0.0) {
            anyhow::bail!("gesture.units_per_cell must be greater than zero");
        }
        if !self.max_visual_offset.is_finite() {
            anyhow::bail!("gesture.max_visual_offset must be a finite number");
        }
        Ok(())
    }
}

/// Layer defaults, global file, local file and environment
fn figment_for(global_config: &Path, local_config: &Path) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(local_config));
    }

    // MESSENGER_GESTURE__THRESHOLD=60 -> gesture.threshold
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join(CONFIG_FILE);
    let local_config = PathBuf::from(LOCAL_CONFIG_PATH);

    let config: Config = figment_for(&global_config, &local_config)
        .extract()
        .context("Failed to load configuration")?;
    config.gesture.validate()?;
    Ok(config)
}

/// Load configuration from a single explicit file (plus defaults)
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file {} does not exist", path.display());
    }
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    config
        .gesture
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join(APP_NAME);
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join(CONFIG_FILE)
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join(CONFIG_FILE);

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
    }

    Ok(config_file)
}
