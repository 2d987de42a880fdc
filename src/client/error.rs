use serde_json::Value;

/// Error code some servers attach to rejected actions.
pub const INVALID_ACTION_CODE: &str = "INVALID_ACTION";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {detail}")]
    Http {
        status: u16,
        detail: String,
        code: Option<String>,
    },
    #[error("Cannot connect to {url}: {reason}")]
    Connect { url: String, reason: String },
    #[error("Unreadable response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl ApiError {
    /// HTTP status, or 0 when the request never got an answer.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Http { status, .. } => *status,
            ApiError::Connect { .. } | ApiError::Decode { .. } => 0,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Http { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }

    /// Prefers the structured code; older servers only say so in prose.
    pub fn is_invalid_action(&self) -> bool {
        match self {
            ApiError::Http {
                code: Some(code), ..
            } => code.eq_ignore_ascii_case(INVALID_ACTION_CODE),
            ApiError::Http { detail, .. } => {
                detail.to_lowercase().contains("not a valid action")
            }
            _ => false,
        }
    }

    /// Builds an `Http` error from a non-success response body.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let detail = parsed
            .as_ref()
            .and_then(|json| json.get("detail"))
            .map(|detail| match detail {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| fallback.to_string());
        let code = parsed
            .as_ref()
            .and_then(|json| json.get("code"))
            .and_then(Value::as_str)
            .map(str::to_string);
        ApiError::Http {
            status,
            detail,
            code,
        }
    }
}
