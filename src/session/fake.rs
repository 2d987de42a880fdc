//! Scripted in-memory server for exercising the wait and act flows.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use serde_json::Value;

use crate::client::{ApiError, GameApi};
use crate::game::action::ActionSubmission;
use crate::game::snapshot::{
    ActionResponse, ChatDocument, ChatMessage, CreatedGame, GameStateSnapshot, JoinedGame,
    StatusDocument,
};

#[derive(Default)]
pub struct FakeServer {
    statuses: RefCell<VecDeque<Result<StatusDocument, ApiError>>>,
    states: RefCell<VecDeque<Result<GameStateSnapshot, ApiError>>>,
    chat: RefCell<Vec<ChatMessage>>,
    chat_failures: Cell<usize>,
    submit_result: RefCell<Option<Result<ActionResponse, ApiError>>>,
    pub submitted: RefCell<Vec<ActionSubmission>>,
    pub sent_chat: RefCell<Vec<String>>,
    status_calls: Cell<usize>,
}

fn unscripted(what: &str) -> ApiError {
    ApiError::Connect {
        url: "fake://server".to_string(),
        reason: format!("no {what} scripted"),
    }
}

impl FakeServer {
    pub fn push_status_ok(&self, raw: Value) {
        let status = serde_json::from_value(raw).expect("status fixture");
        self.statuses.borrow_mut().push_back(Ok(status));
    }

    pub fn push_status_error(&self, err: ApiError) {
        self.statuses.borrow_mut().push_back(Err(err));
    }

    pub fn push_state(&self, raw: Value) {
        let state = serde_json::from_value(raw).expect("state fixture");
        self.states.borrow_mut().push_back(Ok(state));
    }

    pub fn push_state_error(&self, err: ApiError) {
        self.states.borrow_mut().push_back(Err(err));
    }

    pub fn set_chat(&self, raw: Value) {
        *self.chat.borrow_mut() = serde_json::from_value(raw).expect("chat fixture");
    }

    pub fn fail_chat(&self) {
        self.chat_failures.set(usize::MAX);
    }

    pub fn fail_next_chat(&self) {
        self.chat_failures.set(1);
    }

    pub fn answer_submit(&self, result: Result<ActionResponse, ApiError>) {
        *self.submit_result.borrow_mut() = Some(result);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.get()
    }
}

impl GameApi for FakeServer {
    fn status(&self, _game_id: &str, _token: Option<&str>) -> Result<StatusDocument, ApiError> {
        self.status_calls.set(self.status_calls.get() + 1);
        self.statuses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("status")))
    }

    fn state(&self, _game_id: &str) -> Result<GameStateSnapshot, ApiError> {
        self.states
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("state")))
    }

    fn chat(&self, _game_id: &str, since: u64) -> Result<ChatDocument, ApiError> {
        let failures = self.chat_failures.get();
        if failures > 0 {
            self.chat_failures.set(failures - 1);
            return Err(unscripted("chat"));
        }
        let messages = self
            .chat
            .borrow()
            .iter()
            .filter(|m| m.index.unwrap_or(0) >= since)
            .cloned()
            .collect();
        Ok(ChatDocument { messages })
    }

    fn send_chat(&self, _game_id: &str, _token: &str, message: &str) -> Result<(), ApiError> {
        self.sent_chat.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn submit_action(
        &self,
        _game_id: &str,
        _token: &str,
        submission: &ActionSubmission,
    ) -> Result<ActionResponse, ApiError> {
        self.submitted.borrow_mut().push(submission.clone());
        self.submit_result
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Ok(ActionResponse::default()))
    }

    fn create_game(&self, num_players: u8, _seed: Option<u64>) -> Result<CreatedGame, ApiError> {
        Ok(CreatedGame {
            game_id: "fake-game".to_string(),
            num_players: u32::from(num_players),
        })
    }

    fn join_game(&self, game_id: &str, name: Option<&str>) -> Result<JoinedGame, ApiError> {
        Ok(JoinedGame {
            game_id: game_id.to_string(),
            player_color: name.map_or("RED", |_| "BLUE").to_string(),
            seat_index: 0,
            players_joined: 1,
            token: "fake-token".to_string(),
            game_started: false,
        })
    }

    fn quick_join(&self, name: Option<&str>) -> Result<JoinedGame, ApiError> {
        self.join_game("fake-game", name)
    }
}
