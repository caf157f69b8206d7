//! Server configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use questline_openai::AzureOpenAiConfig;
use questline_session::application::services::EngineConfig;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Generator connection settings.
    pub openai: AzureOpenAiConfig,
    /// Session engine tunables.
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or any
    /// variable cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or any
    /// variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
        };

        let mut openai = AzureOpenAiConfig::new(
            required("AZURE_OPENAI_ENDPOINT")?,
            required("AZURE_OPENAI_API_KEY")?,
            required("AZURE_OPENAI_DEPLOYMENT_NAME")?,
        );
        openai.api_version = lookup("AZURE_OPENAI_API_VERSION").filter(|v| !v.trim().is_empty());
        openai.use_continuation = parse_or(&lookup, "QUESTLINE_CONTINUATION", true)?;

        let mut engine = EngineConfig::default();
        engine.window.turn_budget =
            parse_or(&lookup, "QUESTLINE_TURN_BUDGET", engine.window.turn_budget)?;
        if engine.window.turn_budget == 0 {
            return Err(AppError::Config(
                "QUESTLINE_TURN_BUDGET must be greater than zero".into(),
            ));
        }
        if let Some(hours) = parse_opt::<u64>(&lookup, "QUESTLINE_SESSION_TTL_HOURS")? {
            engine.session_ttl = Duration::from_secs(hours.saturating_mul(60 * 60));
        }
        if let Some(secs) = parse_opt::<u64>(&lookup, "QUESTLINE_SWEEP_INTERVAL_SECS")? {
            engine.sweep_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = parse_opt::<u64>(&lookup, "QUESTLINE_GENERATION_TIMEOUT_SECS")? {
            engine.generation_timeout = Duration::from_secs(secs.max(1));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            openai,
            engine,
        })
    }
}

/// Loads a `.env` file from the working directory or one of its parents
/// into the process environment. Variables that are already set are kept.
///
/// Returns the path of the loaded file, or `None` when there is no file.
///
/// # Errors
///
/// Returns `AppError::Config` if the file exists but cannot be read or
/// parsed.
pub fn load_dotenv() -> Result<Option<PathBuf>, AppError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(AppError::Config(format!("failed to load .env file: {err}"))),
    }
}

fn parse_opt<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{key} is invalid: {e}")))
        })
        .transpose()
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}
