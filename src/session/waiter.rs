//! Blocks until it is our turn (or the game ends) by polling the status
//! endpoint, then builds the turn briefing.
//!
//! The state machine itself ([`WaitState`]) does no I/O and takes the clock as
//! an argument; [`wait_for_turn`] drives it against a [`GameApi`].

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::cli::compressed_actions::render_actions;
use crate::cli::delta::render_history;
use crate::cli::error::CliError;
use crate::cli::format::{Report, header, render_chat, render_my_status, render_opponents, section};
use crate::client::{ApiError, GameApi, Session, best_effort};
use crate::game::action::compact_json;
use crate::game::snapshot::{StatusDocument, or_unknown};
use crate::game::view::{my_status, opponents};

/// Coarse classification used to print each progress notice once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lobby,
    WaitingTurn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Lobby { players: String },
    Turn { current: String },
}

impl Notice {
    pub fn phase(&self) -> Phase {
        match self {
            Notice::Lobby { .. } => Phase::Lobby,
            Notice::Turn { .. } => Phase::WaitingTurn,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Lobby { players } => write!(f, "Waiting for players ({players})..."),
            Notice::Turn { current } => write!(f, "Waiting for your turn (current: {current})..."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    MyTurn,
    GameOver { winner: String },
    Timeout { reason: String },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep polling; print the notice if there is one.
    Continue(Option<Notice>),
    Done(Outcome),
}

/// Lives for exactly one wait. `history_len` and `chat_since` are the
/// baselines the briefing diffs against; `None` means the baseline could not
/// be fetched and that delta is left out.
#[derive(Debug, Clone)]
pub struct WaitState {
    pub history_len: Option<usize>,
    pub chat_since: Option<u64>,
    last_phase: Option<Phase>,
    /// `None` when the timeout is too large to represent; the wait never expires.
    deadline: Option<Instant>,
}

impl WaitState {
    pub fn new(timeout: Duration, now: Instant) -> Self {
        Self {
            history_len: None,
            chat_since: None,
            last_phase: None,
            deadline: now.checked_add(timeout),
        }
    }

    pub fn with_baseline(mut self, history_len: Option<usize>, chat_since: Option<u64>) -> Self {
        self.history_len = history_len;
        self.chat_since = chat_since;
        self
    }

    fn expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.last_phase
    }

    pub fn observe(&mut self, status: &StatusDocument, now: Instant) -> Step {
        if let Some(winner) = status.winner() {
            return Step::Done(Outcome::GameOver {
                winner: winner.to_string(),
            });
        }

        let notice = if !status.started {
            self.enter(Notice::Lobby {
                players: status.lobby_count(),
            })
        } else if !status.your_turn {
            self.enter(Notice::Turn {
                current: or_unknown(status.current_color.as_deref()),
            })
        } else {
            return Step::Done(Outcome::MyTurn);
        };

        if self.expired(now) {
            return Step::Done(Outcome::Timeout {
                reason: "waiting for turn".to_string(),
            });
        }
        Step::Continue(notice)
    }

    /// Only a missing game is fatal; anything else is retried until the deadline.
    pub fn observe_error(&mut self, err: &ApiError, now: Instant) -> Step {
        if err.is_not_found() {
            return Step::Done(Outcome::NotFound);
        }
        if self.expired(now) {
            return Step::Done(Outcome::Timeout {
                reason: err.detail(),
            });
        }
        Step::Continue(None)
    }

    fn enter(&mut self, notice: Notice) -> Option<Notice> {
        let phase = notice.phase();
        if self.last_phase == Some(phase) {
            return None;
        }
        self.last_phase = Some(phase);
        Some(notice)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll: Duration,
}

impl WaitOptions {
    /// Reads the command-line seconds. Negative and NaN become zero; values
    /// too large for a `Duration` saturate instead of failing.
    pub fn from_secs(timeout: f64, poll: f64) -> Self {
        Self {
            timeout: saturating_secs(timeout),
            poll: saturating_secs(poll),
        }
    }
}

fn saturating_secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or(Duration::MAX)
}

pub fn wait_for_turn<A: GameApi + ?Sized>(
    api: &A,
    session: &Session,
    options: &WaitOptions,
) -> Result<Report, CliError> {
    let token = session.token()?;
    let color = session.color()?;
    let game_id = session.game_id.as_str();

    // A lobby-time baseline is zero: every record made once the game starts is new.
    let history_len = best_effort("history baseline", api.state(game_id)).map(|state| {
        if state.started {
            state.action_records.len()
        } else {
            0
        }
    });
    let chat_since = best_effort("chat baseline", api.chat(game_id, 0))
        .map(|chat| chat.messages.len() as u64);
    let mut wait =
        WaitState::new(options.timeout, Instant::now()).with_baseline(history_len, chat_since);
    debug!("waiting on {game_id}: history={history_len:?} chat={chat_since:?}");

    let outcome = loop {
        let step = match api.status(game_id, Some(token)) {
            Ok(status) => wait.observe(&status, Instant::now()),
            Err(err) => {
                debug!("status poll failed: {err}");
                wait.observe_error(&err, Instant::now())
            }
        };
        match step {
            Step::Done(outcome) => break outcome,
            Step::Continue(notice) => {
                if let Some(notice) = notice {
                    eprintln!("{notice}");
                }
                thread::sleep(options.poll);
            }
        }
    };
    info!("wait on {game_id} finished: {outcome:?}");

    match outcome {
        Outcome::MyTurn => briefing(api, game_id, color, &wait),
        Outcome::GameOver { winner } => Ok(game_over(api, game_id, &winner)),
        Outcome::Timeout { reason } => Err(CliError::Timeout(reason)),
        Outcome::NotFound => Err(CliError::GameNotFound(game_id.to_string())),
    }
}

fn briefing<A: GameApi + ?Sized>(
    api: &A,
    game_id: &str,
    color: &str,
    wait: &WaitState,
) -> Result<Report, CliError> {
    let state = api.state(game_id)?;
    let mut out = Report::new();

    header(&mut out, "YOUR TURN");
    out.push(format!("  Game: {game_id}"));
    out.push(format!(
        "  Turn: {} | Prompt: {}",
        or_unknown(state.num_turns),
        state.prompt()
    ));

    if let Some(status) = my_status(&state, color) {
        render_my_status(&mut out, &status);
    }

    let others = opponents(&state, color);
    if !others.is_empty() {
        render_opponents(&mut out, &others);
    }

    if let Some(seen) = wait.history_len {
        render_history(&mut out, &state.action_records, seen);
    }

    let new_chat = wait
        .chat_since
        .and_then(|since| best_effort("new chat", api.chat(game_id, since)));
    if let Some(chat) = new_chat {
        render_chat(&mut out, &chat.messages, "New Chat");
    }

    if !state.current_playable_actions.is_empty() {
        render_actions(&mut out, &state.current_playable_actions, color);
    }

    if let Some(robber) = &state.robber_coordinate {
        out.push(String::new());
        out.push(format!("  Robber: {}", compact_json(robber)));
    }
    Ok(out)
}

fn game_over<A: GameApi + ?Sized>(api: &A, game_id: &str, winner: &str) -> Report {
    let mut out = Report::new();
    header(&mut out, "GAME OVER");
    out.push(format!("  Winner: {winner}"));

    if let Some(state) = best_effort("final scores", api.state(game_id)) {
        section(&mut out, "Final Scores");
        for player in &state.players {
            let marker = if player.color == winner { " <-- WINNER" } else { "" };
            out.push(format!("  {}: {} VP{marker}", player.color, player.victory_points));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::game::snapshot::fixtures::two_player_state;
    use crate::session::fake::FakeServer;

    fn status(raw: serde_json::Value) -> StatusDocument {
        serde_json::from_value(raw).unwrap()
    }

    fn quick() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_secs(30),
            poll: Duration::ZERO,
        }
    }

    fn session() -> Session {
        Session::new("g1", Some("tok"), Some("RED"))
    }

    #[test]
    fn lobby_notice_prints_once_per_entry() {
        let now = Instant::now();
        let mut wait = WaitState::new(Duration::from_secs(60), now);
        let lobby = status(json!({"started": false, "players_joined": 1, "num_players": 4}));

        let first = wait.observe(&lobby, now);
        assert_eq!(
            first,
            Step::Continue(Some(Notice::Lobby {
                players: "1/4".into()
            }))
        );
        assert_eq!(first_notice_text(&first), "Waiting for players (1/4)...");

        let more = status(json!({"started": false, "players_joined": 3, "num_players": 4}));
        assert_eq!(wait.observe(&more, now), Step::Continue(None));
        assert_eq!(wait.phase(), Some(Phase::Lobby));
    }

    #[test]
    fn current_color_change_does_not_repeat_the_turn_notice() {
        let now = Instant::now();
        let mut wait = WaitState::new(Duration::from_secs(60), now);
        let blue = status(json!({"started": true, "current_color": "BLUE"}));
        let white = status(json!({"started": true, "current_color": "WHITE"}));

        assert!(matches!(wait.observe(&blue, now), Step::Continue(Some(Notice::Turn { .. }))));
        assert_eq!(wait.observe(&white, now), Step::Continue(None));
    }

    #[test]
    fn phase_change_re_arms_the_notice() {
        let now = Instant::now();
        let mut wait = WaitState::new(Duration::from_secs(60), now);
        let lobby = status(json!({"started": false}));
        let turn = status(json!({"started": true, "current_color": "BLUE"}));

        let notices: Vec<Option<Notice>> = [&lobby, &turn, &turn, &lobby, &lobby]
            .into_iter()
            .map(|s| match wait.observe(s, now) {
                Step::Continue(notice) => notice,
                Step::Done(outcome) => panic!("unexpected {outcome:?}"),
            })
            .collect();
        let printed: Vec<Phase> = notices.iter().flatten().map(Notice::phase).collect();
        assert_eq!(printed, vec![Phase::Lobby, Phase::WaitingTurn, Phase::Lobby]);
    }

    #[test]
    fn winner_ends_the_wait_whatever_else_is_set() {
        let now = Instant::now();
        let mut wait = WaitState::new(Duration::ZERO, now);
        let over = status(json!({"started": false, "your_turn": true, "winning_color": "BLUE"}));
        assert_eq!(
            wait.observe(&over, now + Duration::from_secs(5)),
            Step::Done(Outcome::GameOver {
                winner: "BLUE".into()
            })
        );
    }

    #[test]
    fn our_turn_is_terminal_without_a_notice() {
        let now = Instant::now();
        let mut wait = WaitState::new(Duration::from_secs(60), now);
        let mine = status(json!({"started": true, "your_turn": true, "current_color": "RED"}));
        assert_eq!(wait.observe(&mine, now), Step::Done(Outcome::MyTurn));
        assert_eq!(wait.phase(), None);
    }

    #[test]
    fn transient_errors_retry_until_the_deadline() {
        let now = Instant::now();
        let mut wait = WaitState::new(Duration::from_secs(10), now);
        let offline = ApiError::Connect {
            url: "http://localhost".into(),
            reason: "refused".into(),
        };
        assert_eq!(wait.observe_error(&offline, now), Step::Continue(None));
        assert!(matches!(
            wait.observe_error(&offline, now + Duration::from_secs(10)),
            Step::Done(Outcome::Timeout { .. })
        ));

        let missing = ApiError::from_response(404, r#"{"detail": "Game not found"}"#, "Not Found");
        assert_eq!(wait.observe_error(&missing, now), Step::Done(Outcome::NotFound));
    }

    #[test]
    fn not_found_exits_after_a_single_poll() {
        let server = FakeServer::default();
        server.push_status_error(ApiError::from_response(404, "{}", "Not Found"));
        server.push_status_ok(json!({"started": true}));

        let err = wait_for_turn(&server, &session(), &quick()).unwrap_err();
        assert!(matches!(err, CliError::GameNotFound(ref id) if id == "g1"));
        assert_eq!(server.status_calls(), 1);
    }

    #[test]
    fn briefing_shows_only_what_happened_since_the_wait_began() {
        let server = FakeServer::default();
        let mut before = two_player_state();
        before["action_records"]
            .as_array_mut()
            .unwrap()
            .truncate(2);
        server.push_state(before);
        server.push_state(two_player_state());
        server.set_chat(json!([
            {"index": 0, "name": "Bot", "message": "hello"},
            {"index": 1, "color": "BLUE", "message": "your move"}
        ]));
        server.push_status_error(ApiError::Connect {
            url: "http://localhost".into(),
            reason: "blip".into(),
        });
        server.push_status_ok(json!({"started": true, "current_color": "BLUE"}));
        server.push_status_ok(json!({"started": true, "your_turn": true, "current_color": "RED"}));

        let report = wait_for_turn(&server, &session(), &quick()).unwrap();
        assert_eq!(server.status_calls(), 3);
        assert!(report.contains(&"=== YOUR TURN ===".to_string()));
        assert!(report.contains(&"  Turn: 12 | Prompt: PLAY_TIDE".to_string()));
        assert!(report.contains(&"--- Recent Actions (2 moves) ---".to_string()));
        assert!(report.contains(&"  RED: ROLL_THE_SHELLS [3,4]".to_string()));
        assert!(!report.iter().any(|line| line.contains("[2,5]")));
        assert!(report.contains(&"  BUILD_TIDE_POOL: 12 | 40".to_string()));
        assert_eq!(report.last().unwrap(), "  Robber: [0,1,-1]");
    }

    #[test]
    fn failed_side_fetches_do_not_abort_the_briefing() {
        let server = FakeServer::default();
        server.push_state_error(ApiError::Connect {
            url: "http://localhost".into(),
            reason: "down".into(),
        });
        server.push_state(two_player_state());
        server.fail_chat();
        server.push_status_ok(json!({"started": true, "your_turn": true}));

        let report = wait_for_turn(&server, &session(), &quick()).unwrap();
        assert!(report.contains(&"=== YOUR TURN ===".to_string()));
        assert!(!report.iter().any(|line| line.contains("Recent Actions")));
        assert!(!report.iter().any(|line| line.contains("New Chat")));
        assert!(report.contains(&"  BUILD_TIDE_POOL: 12 | 40".to_string()));
    }

    #[test]
    fn lobby_baseline_shows_the_whole_log() {
        let server = FakeServer::default();
        server.push_state(json!({"started": false, "colors": ["RED"]}));
        server.push_state(two_player_state());
        server.push_status_ok(json!({"started": true, "your_turn": true}));

        let report = wait_for_turn(&server, &session(), &quick()).unwrap();
        assert!(report.contains(&"--- Recent Actions (4 moves) ---".to_string()));
    }

    #[test]
    fn chat_baseline_failure_skips_new_chat_only() {
        let server = FakeServer::default();
        server.push_state(two_player_state());
        server.push_state(two_player_state());
        server.set_chat(json!([{"index": 0, "name": "Bot", "message": "hello"}]));
        server.fail_next_chat();
        server.push_status_ok(json!({"started": true, "your_turn": true}));

        let report = wait_for_turn(&server, &session(), &quick()).unwrap();
        assert!(!report.iter().any(|line| line.contains("Recent Actions")));
        assert!(!report.iter().any(|line| line.contains("New Chat")));
        assert_eq!(report.last().unwrap(), "  Robber: [0,1,-1]");
    }

    #[test]
    fn unrepresentable_timeout_never_expires() {
        let now = Instant::now();
        let mut wait = WaitState::new(Duration::MAX, now);
        let lobby = status(json!({"started": false}));
        assert!(matches!(wait.observe(&lobby, now), Step::Continue(_)));

        let server = FakeServer::default();
        server.push_status_ok(json!({"started": false}));
        server.push_status_ok(json!({"started": true, "winning_color": "RED"}));
        let options = WaitOptions {
            timeout: Duration::from_secs_f64(1e19),
            poll: Duration::ZERO,
        };
        let report = wait_for_turn(&server, &session(), &options).unwrap();
        assert!(report.contains(&"  Winner: RED".to_string()));
        assert_eq!(server.status_calls(), 2);
    }

    #[test]
    fn option_seconds_clamp_instead_of_failing() {
        let options = WaitOptions::from_secs(600.0, 0.5);
        assert_eq!(options.timeout, Duration::from_secs(600));
        assert_eq!(options.poll, Duration::from_millis(500));

        assert_eq!(WaitOptions::from_secs(-3.0, f64::NAN).timeout, Duration::ZERO);
        assert_eq!(WaitOptions::from_secs(f64::NAN, 0.0).timeout, Duration::ZERO);
        assert_eq!(WaitOptions::from_secs(1e30, 0.0).timeout, Duration::MAX);
        assert_eq!(WaitOptions::from_secs(f64::INFINITY, 0.0).timeout, Duration::MAX);
    }

    #[test]
    fn game_over_marks_the_winner_and_survives_a_missing_state() {
        let server = FakeServer::default();
        server.push_state(two_player_state());
        server.push_state(two_player_state());
        server.push_status_ok(json!({"started": true, "winning_color": "BLUE"}));
        let report = wait_for_turn(&server, &session(), &quick()).unwrap();
        assert!(report.contains(&"  Winner: BLUE".to_string()));
        assert!(report.contains(&"  BLUE: 6 VP <-- WINNER".to_string()));
        assert!(report.contains(&"  RED: 4 VP".to_string()));

        let server = FakeServer::default();
        server.push_status_ok(json!({"started": true, "winning_color": "BLUE"}));
        let report = wait_for_turn(&server, &session(), &quick()).unwrap();
        assert!(report.contains(&"  Winner: BLUE".to_string()));
        assert!(!report.iter().any(|line| line.contains("Final Scores")));
    }

    #[test]
    fn deadline_turns_into_a_timeout_error() {
        let server = FakeServer::default();
        server.push_status_ok(json!({"started": false}));
        let options = WaitOptions {
            timeout: Duration::ZERO,
            poll: Duration::ZERO,
        };
        let err = wait_for_turn(&server, &session(), &options).unwrap_err();
        assert_eq!(err.error_line(), "ERROR (408): Timeout (waiting for turn)");
    }

    fn first_notice_text(step: &Step) -> String {
        match step {
            Step::Continue(Some(notice)) => notice.to_string(),
            other => panic!("no notice in {other:?}"),
        }
    }
}
