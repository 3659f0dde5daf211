use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use services::{ConfigError, QuizConfig};
use storage::DEFAULT_REQUEST_TIMEOUT;

pub const QUESTIONS_DIR_ENV: &str = "QUIZ_QUESTIONS_DIR";
pub const BASE_URL_ENV: &str = "QUIZ_BASE_URL";
pub const HTTP_TIMEOUT_ENV: &str = "QUIZ_HTTP_TIMEOUT_MS";
const DEFAULT_QUESTIONS_DIR: &str = "questions";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    ConflictingSources,
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::ConflictingSources => write!(f, "--questions and --url are mutually exclusive"),
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Where question pools come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolSource {
    Dir(PathBuf),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub source: PoolSource,
    pub config: QuizConfig,
    /// Per-request limit for `PoolSource::Url`.
    pub http_timeout: Duration,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--questions <dir> | --url <base_url>] [--rounds <n>] [--delay-ms <ms>] [--seed <n>]");
    eprintln!("       [--timeout-ms <ms>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions {DEFAULT_QUESTIONS_DIR}");
    eprintln!("  --rounds 10");
    eprintln!("  --delay-ms 650");
    eprintln!("  --timeout-ms {}", DEFAULT_REQUEST_TIMEOUT.as_millis());
    eprintln!();
    eprintln!("Stage files: questions.json, questions-round-2.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {QUESTIONS_DIR_ENV}, {BASE_URL_ENV}, QUIZ_TARGET_ROUNDS, QUIZ_ADVANCE_DELAY_MS, QUIZ_SHUFFLE_SEED, {HTTP_TIMEOUT_ENV}");
    eprintln!("  RUST_LOG (log filter, default: warn)");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(flag: &'static str, raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn parse_timeout(flag: &'static str, raw: String) -> Result<Duration, ArgsError> {
    match parse_number(flag, raw.clone())? {
        0 => Err(ArgsError::InvalidNumber { flag, raw }),
        ms => Ok(Duration::from_millis(ms)),
    }
}

impl Args {
    /// Parse flags on top of environment defaults. Flags win.
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn parse(
        mut args: impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut config = QuizConfig::from_lookup(&env)?;
        let mut dir = env(QUESTIONS_DIR_ENV).map(PathBuf::from);
        let mut url = env(BASE_URL_ENV);
        let mut http_timeout = match env(HTTP_TIMEOUT_ENV) {
            Some(raw) => parse_timeout(HTTP_TIMEOUT_ENV, raw)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };
        let mut dir_flag = false;
        let mut url_flag = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    dir = Some(PathBuf::from(require_value(&mut args, "--questions")?));
                    dir_flag = true;
                }
                "--url" => {
                    url = Some(require_value(&mut args, "--url")?);
                    url_flag = true;
                }
                "--rounds" => {
                    let raw = require_value(&mut args, "--rounds")?;
                    let rounds = usize::try_from(parse_number("--rounds", raw.clone())?)
                        .ok()
                        .filter(|rounds| *rounds > 0)
                        .ok_or(ArgsError::InvalidNumber { flag: "--rounds", raw })?;
                    config = config.with_target_rounds(rounds);
                }
                "--delay-ms" => {
                    let raw = require_value(&mut args, "--delay-ms")?;
                    config = config
                        .with_advance_delay(Duration::from_millis(parse_number("--delay-ms", raw)?));
                }
                "--seed" => {
                    let raw = require_value(&mut args, "--seed")?;
                    config = config.with_shuffle_seed(parse_number("--seed", raw)?);
                }
                "--timeout-ms" => {
                    let raw = require_value(&mut args, "--timeout-ms")?;
                    http_timeout = parse_timeout("--timeout-ms", raw)?;
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let source = match (dir, url) {
            (Some(_), Some(_)) if dir_flag && url_flag => return Err(ArgsError::ConflictingSources),
            // A flag overrides the other source coming from the environment.
            (Some(dir), Some(_)) if dir_flag => PoolSource::Dir(dir),
            (_, Some(url)) => PoolSource::Url(url),
            (Some(dir), None) => PoolSource::Dir(dir),
            (None, None) => PoolSource::Dir(PathBuf::from(DEFAULT_QUESTIONS_DIR)),
        };

        Ok(Some(Self {
            source,
            config,
            http_timeout,
        }))
    }
}
