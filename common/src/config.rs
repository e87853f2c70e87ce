use std::path::PathBuf;
use std::time::Duration;

use crate::targets::DEFAULT_TARGETS_FILE;

pub const DEFAULT_STATE_DIR: &str = "subs";
pub const DEFAULT_TARGET_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_RUNTIME: Duration = Duration::from_secs(3_000);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(20);

pub const CRTSH_BASE_URL: &str = "https://crt.sh";
pub const CHAOS_BASE_URL: &str = "https://dns.projectdiscovery.io";
pub const TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub targets_path: PathBuf,
    /// Directory holding one `<domain>.txt` artifact per domain.
    pub state_dir: PathBuf,
    /// Pause after each processed domain.
    pub target_delay: Duration,
    /// Ceiling on the wall-clock time of one batch.
    ///
    /// Only checked between domains, so a single slow domain may overrun it.
    pub max_runtime: Duration,
    pub fetch_timeout: Duration,
    pub notify_timeout: Duration,
    pub chaos_key: Option<String>,
    pub telegram: Option<TelegramCredentials>,
    /// Still send the "nothing new" notice when the runtime ceiling cut the batch short.
    pub notify_after_abort: bool,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    /// Both values are required; a missing one disables notifications.
    pub fn from_parts(token: Option<String>, chat_id: Option<String>) -> Option<Self> {
        let token = token.filter(|t| !t.trim().is_empty())?;
        let chat_id = chat_id.filter(|c| !c.trim().is_empty())?;
        Some(Self { token, chat_id })
    }
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub crtsh: String,
    pub chaos: String,
    pub telegram: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            crtsh: CRTSH_BASE_URL.to_string(),
            chaos: CHAOS_BASE_URL.to_string(),
            telegram: TELEGRAM_BASE_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets_path: PathBuf::from(DEFAULT_TARGETS_FILE),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            target_delay: DEFAULT_TARGET_DELAY,
            max_runtime: DEFAULT_MAX_RUNTIME,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            chaos_key: None,
            telegram: None,
            notify_after_abort: false,
            endpoints: Endpoints::default(),
        }
    }
}
