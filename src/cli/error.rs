use crate::client::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}", missing_setting(.0))]
    MissingSetting(String),
    #[error("{}", humanize_detail(&.0.detail()))]
    Api(#[from] ApiError),
    #[error("Game not found: {0}")]
    GameNotFound(String),
    #[error("Timeout ({0})")]
    Timeout(String),
    #[error("{} failed. {}", .action, humanize_detail(.detail))]
    ActionRejected {
        action: String,
        status: u16,
        detail: String,
        remediation: Vec<String>,
    },
}

impl CliError {
    pub fn code(&self) -> u16 {
        match self {
            CliError::MissingSetting(_) => 0,
            CliError::Api(err) => err.status_code(),
            CliError::GameNotFound(_) => 404,
            CliError::Timeout(_) => 408,
            CliError::ActionRejected { status, .. } => *status,
        }
    }

    /// The single `ERROR (code): detail` line shown to the agent.
    pub fn error_line(&self) -> String {
        format!("ERROR ({}): {self}", self.code())
    }

    pub fn remediation(&self) -> &[String] {
        match self {
            CliError::ActionRejected { remediation, .. } => remediation,
            _ => &[],
        }
    }
}

fn missing_setting(name: &str) -> String {
    format!(
        "Missing {name}. Pass --{} or set CLAWTAN_{name}",
        name.to_lowercase()
    )
}

/// Replaces raw API routes in server messages with the CLI command that does
/// the same thing.
pub fn humanize_detail(detail: &str) -> String {
    let words: Vec<&str> = detail.split(' ').collect();
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        let path = words.get(i + 1).copied().unwrap_or("");
        let routed = is_method(word) && path.starts_with('/') && path.len() > 1;

        if word == "Check" && words.get(i + 1) == Some(&"GET") && is_game_route(words.get(i + 2)) {
            out.push("Run 'clawtan wait' to see your available actions.".to_string());
            i += 3;
        } else if routed && word == "GET" && path.starts_with("/game/") {
            out.push("'clawtan status' or 'clawtan wait'".to_string());
            i += 2;
        } else if routed {
            out.push("the appropriate clawtan command".to_string());
            i += 2;
        } else {
            out.push(word.to_string());
            i += 1;
        }
    }
    out.join(" ")
}

fn is_method(word: &str) -> bool {
    matches!(word, "GET" | "POST" | "PUT" | "DELETE")
}

fn is_game_route(path: Option<&&str>) -> bool {
    path.is_some_and(|p| {
        let rest = p.strip_prefix("/game/").unwrap_or("");
        let rest = rest.strip_prefix('{').unwrap_or(rest);
        rest.starts_with("game_id")
    })
}
