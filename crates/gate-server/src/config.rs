//! Server configuration from command line and environment
//!
//! Every flag falls back to an environment variable. The session key is
//! mandatory: the server refuses to start without one. Switch variables
//! (`DEV`, `GATE_LOG_JSON`, `GATE_REGENERATE_ON_FORMAT_ERROR`) are on for
//! any value except an empty string, `0`, `false`, `no`, `off`, `n` or `f`.

use clap::builder::FalseyValueParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use gate_flow::{FlowConfig, IDLE_TIMEOUT_SECONDS, WAIT_SECONDS};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Listen address when neither `--bind` nor `GATE_BIND` is given
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Shortest accepted session key, in bytes
pub const MIN_SECRET_LEN: usize = 16;

/// Start-up configuration failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No `--session-key` and no `SESSION_KEY`
    #[error("SESSION_KEY environment variable not set")]
    MissingSecret,

    /// Key too short to sign cookies with
    #[error("session key must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    WeakSecret(usize),
}

/// Everything the binary needs to start
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Cookie signing secret
    pub session_key: String,
    /// File-backed sessions when set, in-memory otherwise
    pub session_dir: Option<PathBuf>,
    /// Mark the session cookie `Secure`; off under `--dev`
    pub secure_cookies: bool,
    /// JSON log lines instead of the human format
    pub log_json: bool,
    /// Fixed RNG seed; for demos and tests only
    pub seed: Option<u64>,
    /// Pause between idle-session sweeps
    pub purge_interval: Duration,
    /// Controller settings
    pub flow: FlowConfig,
}

/// CLI definition for the `lettergate` binary
pub fn command() -> Command {
    Command::new("lettergate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Queue, letter-grid captcha and assignment gate")
        .arg(
            Arg::new("bind")
                .long("bind")
                .env("GATE_BIND")
                .default_value(DEFAULT_BIND)
                .value_parser(value_parser!(SocketAddr))
                .help("Address to listen on"),
        )
        .arg(
            Arg::new("session-key")
                .long("session-key")
                .env("SESSION_KEY")
                .hide_env_values(true)
                .help("Secret used to sign session cookies (required)"),
        )
        .arg(
            Arg::new("session-dir")
                .long("session-dir")
                .env("GATE_SESSION_DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Store sessions as files in this directory"),
        )
        .arg(
            Arg::new("dev")
                .long("dev")
                .env("DEV")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new())
                .help("Local development: drop the Secure cookie flag"),
        )
        .arg(
            Arg::new("wait-seconds")
                .long("wait-seconds")
                .env("GATE_WAIT_SECONDS")
                .default_value("20")
                .value_parser(value_parser!(i64).range(0..))
                .help("Seconds a visitor waits in the queue"),
        )
        .arg(
            Arg::new("idle-timeout")
                .long("idle-timeout")
                .env("GATE_IDLE_TIMEOUT")
                .default_value("300")
                .value_parser(value_parser!(i64).range(1..))
                .help("Seconds of inactivity before a session restarts"),
        )
        .arg(
            Arg::new("regenerate-on-format-error")
                .long("regenerate-on-format-error")
                .env("GATE_REGENERATE_ON_FORMAT_ERROR")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new())
                .help("Replace the puzzle on malformed answers too"),
        )
        .arg(
            Arg::new("purge-interval")
                .long("purge-interval")
                .env("GATE_PURGE_INTERVAL")
                .default_value("60")
                .value_parser(value_parser!(u64).range(1..))
                .help("Seconds between idle-session sweeps"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Random seed for reproducible puzzles"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .env("GATE_LOG_JSON")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new())
                .help("Emit logs as JSON"),
        )
}

/// Check the signing secret is present and long enough
pub fn require_secret(secret: Option<&str>) -> Result<String, ConfigError> {
    match secret {
        None | Some("") => Err(ConfigError::MissingSecret),
        Some(s) if s.len() < MIN_SECRET_LEN => Err(ConfigError::WeakSecret(s.len())),
        Some(s) => Ok(s.to_string()),
    }
}

impl ServerConfig {
    /// Build the config from parsed arguments
    ///
    /// # Errors
    /// [`ConfigError`] when the session key is missing or too short
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let session_key =
            require_secret(matches.get_one::<String>("session-key").map(String::as_str))?;

        let flow = FlowConfig::new()
            .with_wait_seconds(*matches.get_one::<i64>("wait-seconds").unwrap_or(&WAIT_SECONDS))
            .with_idle_timeout(
                *matches
                    .get_one::<i64>("idle-timeout")
                    .unwrap_or(&IDLE_TIMEOUT_SECONDS),
            )
            .with_regenerate_on_format_error(matches.get_flag("regenerate-on-format-error"));

        let bind = match matches.get_one::<SocketAddr>("bind") {
            Some(addr) => *addr,
            None => SocketAddr::from(([127, 0, 0, 1], 8080)),
        };

        Ok(Self {
            bind,
            session_key,
            session_dir: matches.get_one::<PathBuf>("session-dir").cloned(),
            secure_cookies: !matches.get_flag("dev"),
            log_json: matches.get_flag("log-json"),
            seed: matches.get_one::<u64>("seed").copied(),
            purge_interval: Duration::from_secs(
                matches.get_one::<u64>("purge-interval").copied().unwrap_or(60),
            ),
            flow,
        })
    }
}
