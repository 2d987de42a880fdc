pub mod config;
pub mod error;

use log::debug;
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::game::action::ActionSubmission;
use crate::game::snapshot::{
    ActionResponse, ChatDocument, CreatedGame, GameStateSnapshot, JoinedGame, StatusDocument,
};

pub use config::{ClientConfig, Session};
pub use error::ApiError;

/// Everything the client needs from the game server.
pub trait GameApi {
    fn status(&self, game_id: &str, token: Option<&str>) -> Result<StatusDocument, ApiError>;
    fn state(&self, game_id: &str) -> Result<GameStateSnapshot, ApiError>;
    fn chat(&self, game_id: &str, since: u64) -> Result<ChatDocument, ApiError>;
    fn send_chat(&self, game_id: &str, token: &str, message: &str) -> Result<(), ApiError>;
    fn submit_action(
        &self,
        game_id: &str,
        token: &str,
        submission: &ActionSubmission,
    ) -> Result<ActionResponse, ApiError>;
    fn create_game(&self, num_players: u8, seed: Option<u64>) -> Result<CreatedGame, ApiError>;
    fn join_game(&self, game_id: &str, name: Option<&str>) -> Result<JoinedGame, ApiError>;
    fn quick_join(&self, name: Option<&str>) -> Result<JoinedGame, ApiError>;
}

/// Turns a failed secondary fetch into `None` so it can't abort the main flow.
pub fn best_effort<T>(what: &str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("{what} unavailable: {err}");
            None
        }
    }
}

pub struct HttpClient {
    config: ClientConfig,
    http: Client,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(config::USER_AGENT)
            .build()
            .map_err(|err| ApiError::Connect {
                url: config.server.clone(),
                reason: err.to_string(),
            })?;
        Ok(Self { config, http })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T, ApiError> {
        self.send(Method::GET, path, None, token)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let body = serde_json::to_string(body).map_err(|err| ApiError::Decode {
            url,
            reason: err.to_string(),
        })?;
        self.send(Method::POST, path, Some(body), token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.server, path)
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("{method} {url}");

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }
        if let Some(body) = body {
            debug!("Body: {body}");
            request = request.body(body);
        }

        let response = request.send().map_err(|err| ApiError::Connect {
            url: url.clone(),
            reason: connect_reason(&err),
        })?;
        let status = response.status();
        let text = response.text().map_err(|err| ApiError::Decode {
            url: url.clone(),
            reason: err.to_string(),
        })?;

        if !status.is_success() {
            debug!(
                "HTTP {}: {}",
                status.as_u16(),
                text.chars().take(500).collect::<String>()
            );
            let fallback = status.canonical_reason().unwrap_or("request failed");
            return Err(ApiError::from_response(status.as_u16(), &text, fallback));
        }

        debug!("{} ({} bytes)", status.as_u16(), text.len());
        serde_json::from_str(&text).map_err(|err| ApiError::Decode {
            url,
            reason: err.to_string(),
        })
    }
}

fn connect_reason(err: &reqwest::Error) -> String {
    let reason = err.to_string();
    if reason.to_lowercase().contains("certificate") {
        format!("{reason} (TLS certificate problem; check the system root certificates)")
    } else {
        reason
    }
}

impl GameApi for HttpClient {
    fn status(&self, game_id: &str, token: Option<&str>) -> Result<StatusDocument, ApiError> {
        self.get(&format!("/game/{game_id}/status"), token)
    }

    fn state(&self, game_id: &str) -> Result<GameStateSnapshot, ApiError> {
        self.get(&format!("/game/{game_id}"), None)
    }

    fn chat(&self, game_id: &str, since: u64) -> Result<ChatDocument, ApiError> {
        self.get(&format!("/game/{game_id}/chat?since={since}"), None)
    }

    fn send_chat(&self, game_id: &str, token: &str, message: &str) -> Result<(), ApiError> {
        let _: Value = self.post(
            &format!("/game/{game_id}/chat"),
            &json!({ "message": message }),
            Some(token),
        )?;
        Ok(())
    }

    fn submit_action(
        &self,
        game_id: &str,
        token: &str,
        submission: &ActionSubmission,
    ) -> Result<ActionResponse, ApiError> {
        self.post(&format!("/action/{game_id}"), submission, Some(token))
    }

    fn create_game(&self, num_players: u8, seed: Option<u64>) -> Result<CreatedGame, ApiError> {
        let mut body = json!({ "num_players": num_players });
        if let Some(seed) = seed {
            body["seed"] = json!(seed);
        }
        self.post("/create", &body, None)
    }

    fn join_game(&self, game_id: &str, name: Option<&str>) -> Result<JoinedGame, ApiError> {
        self.post(&format!("/join/{game_id}"), &join_body(name), None)
    }

    fn quick_join(&self, name: Option<&str>) -> Result<JoinedGame, ApiError> {
        self.post("/quickjoin", &join_body(name), None)
    }
}

fn join_body(name: Option<&str>) -> Value {
    match name {
        Some(name) => json!({ "name": name }),
        None => json!({}),
    }
}
