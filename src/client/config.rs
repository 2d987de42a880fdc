use std::env;

use crate::cli::error::CliError;

pub const DEFAULT_SERVER: &str = "https://api.clawtan.com";
pub const USER_AGENT: &str = "clawtan-cli/0.1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server: String,
}

impl ClientConfig {
    /// `--server`/`CLAWTAN_SERVER` first, then the older `CLAWTAN_SERVER_URL`.
    pub fn resolve(flag: Option<&str>) -> Self {
        let legacy = env::var("CLAWTAN_SERVER_URL").ok();
        let server = [flag, legacy.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        Self { server }
    }
}

/// Credentials for one seat, collected from flags or `CLAWTAN_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub game_id: String,
    pub token: Option<String>,
    pub color: Option<String>,
}

impl Session {
    pub fn new(game_id: &str, token: Option<&str>, color: Option<&str>) -> Self {
        Self {
            game_id: game_id.to_string(),
            token: token.map(str::to_string),
            color: color.map(str::to_string),
        }
    }

    pub fn token(&self) -> Result<&str, CliError> {
        self.token
            .as_deref()
            .ok_or_else(|| CliError::MissingSetting("TOKEN".to_string()))
    }

    pub fn color(&self) -> Result<&str, CliError> {
        self.color
            .as_deref()
            .ok_or_else(|| CliError::MissingSetting("COLOR".to_string()))
    }
}

/// Treats empty strings like unset values, the same as an unset variable.
pub fn require(name: &str, value: Option<String>) -> Result<String, CliError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CliError::MissingSetting(name.to_string()))
}
