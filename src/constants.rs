/// Constants module to avoid magic numbers in the codebase

// Remote endpoints
pub const DEFAULT_AUTH_URL: &str =
    "https://functions.poehali.dev/cef7edd8-4f9d-4be4-8ddf-7585834aa62e";
pub const DEFAULT_MODERATION_URL: &str =
    "https://functions.poehali.dev/dc6bfdf3-8f1b-49f7-938b-825548e3c8cb";
pub const ADMIN_ID_HEADER: &str = "X-Admin-Id";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 15;

// Gesture handling
pub const SWIPE_THRESHOLD: f64 = 50.0;
pub const SWIPE_DAMPING: f64 = 0.5;
pub const SWIPE_MAX_VISUAL_OFFSET: f64 = 100.0;
pub const GESTURE_UNITS_PER_CELL: f64 = 8.0;

// Haptic pulse lengths
pub const HAPTIC_LIGHT_MS: u64 = 10;
pub const HAPTIC_MEDIUM_MS: u64 = 20;

// Auth
pub const MIN_PASSWORD_LEN: usize = 6;
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

// Moderation
pub const MUTE_SHORT_HOURS: u32 = 1;
pub const MUTE_LONG_HOURS: u32 = 24;

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_CHAT_LIST_WIDTH: u16 = 34;
pub const UI_SIDEBAR_WIDTH: u16 = 16;

// Files
pub const APP_NAME: &str = "messenger";
pub const CONFIG_FILE: &str = "config.toml";
pub const SESSION_FILE: &str = "session.toml";
pub const LOG_FILE: &str = "messenger.log";
pub const LOCAL_CONFIG_PATH: &str = ".messenger/config.toml";
pub const ENV_PREFIX: &str = "MESSENGER_";
