pub mod run;
pub mod show;
pub mod targets;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use subwatch_common::config::{self, Config, Endpoints, TelegramCredentials};
use subwatch_common::domain::Domain;
use subwatch_common::targets::DEFAULT_TARGETS_FILE;

#[derive(Parser)]
#[command(name = "subwatch", version)]
#[command(about = "Watches certificate-transparency and passive-DNS sources for new subdomains.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub options: Options,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan every target once (the default when no command is given)
    #[command(alias = "r")]
    Run,
    /// Print the subdomains recorded for a domain
    #[command(alias = "s")]
    Show { domain: Domain },
    /// Validate and print the target list
    #[command(alias = "t")]
    Targets,
}

#[derive(Args)]
pub struct Options {
    /// File listing one domain per line
    #[arg(long, global = true, env = "SUBWATCH_TARGETS", default_value = DEFAULT_TARGETS_FILE)]
    pub targets: PathBuf,

    /// Directory holding the per-domain state
    #[arg(long, global = true, env = "SUBWATCH_STATE_DIR", default_value = config::DEFAULT_STATE_DIR)]
    pub state_dir: PathBuf,

    /// Seconds to wait after each domain
    #[arg(long, value_name = "SECS", env = "TARGET_DELAY", default_value_t = config::DEFAULT_TARGET_DELAY.as_secs())]
    pub delay: u64,

    /// Stop starting new domains once the batch has run this many seconds
    #[arg(long, value_name = "SECS", env = "MAX_RUNTIME_SECONDS", default_value_t = config::DEFAULT_MAX_RUNTIME.as_secs())]
    pub max_runtime: u64,

    /// Per-request timeout for source queries
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout: u64,

    /// Per-request timeout for notifications
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_NOTIFY_TIMEOUT.as_secs())]
    pub notify_timeout: u64,

    /// Chaos API key
    #[arg(long, env = "CHAOS_KEY", hide_env_values = true)]
    pub chaos_key: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "TG_TOKEN", hide_env_values = true)]
    pub tg_token: Option<String>,

    /// Telegram chat receiving the alerts
    #[arg(long, env = "TG_CHAT")]
    pub tg_chat: Option<String>,

    /// Send the "nothing new" notice even when the runtime ceiling cut the batch short
    #[arg(long, env = "SUBWATCH_NOTIFY_AFTER_ABORT")]
    pub notify_after_abort: bool,

    #[arg(long, hide = true, default_value = config::CRTSH_BASE_URL)]
    pub crtsh_url: String,

    #[arg(long, hide = true, default_value = config::CHAOS_BASE_URL)]
    pub chaos_url: String,

    #[arg(long, hide = true, default_value = config::TELEGRAM_BASE_URL)]
    pub telegram_url: String,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Options {
    pub fn to_config(&self) -> Config {
        Config {
            targets_path: self.targets.clone(),
            state_dir: self.state_dir.clone(),
            target_delay: Duration::from_secs(self.delay),
            max_runtime: Duration::from_secs(self.max_runtime),
            fetch_timeout: Duration::from_secs(self.fetch_timeout),
            notify_timeout: Duration::from_secs(self.notify_timeout),
            chaos_key: self.chaos_key.clone().filter(|k| !k.trim().is_empty()),
            telegram: TelegramCredentials::from_parts(self.tg_token.clone(), self.tg_chat.clone()),
            notify_after_abort: self.notify_after_abort,
            endpoints: Endpoints {
                crtsh: self.crtsh_url.clone(),
                chaos: self.chaos_url.clone(),
                telegram: self.telegram_url.clone(),
            },
        }
    }
}
