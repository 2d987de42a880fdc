use log::{debug, info};

use crate::cli::compressed_actions::{partition, render_actions};
use crate::cli::delta::{last_roll, render_resource_gains};
use crate::cli::error::CliError;
use crate::cli::format::{Report, header, resources_line, section};
use crate::client::{ApiError, GameApi, Session, best_effort};
use crate::game::action::ActionSubmission;
use crate::game::snapshot::{GameStateSnapshot, or_unknown};
use crate::game::view::{all_player_resources, my_status};
use crate::types::{ActionPrompt, ActionType};

/// What the agent should do after a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Still (or again) our turn.
    YourTurn,
    /// Someone else is current but we have something to do too, e.g. a discard.
    Paused { acting: String },
    /// Others must finish an interrupt prompt before our turn resumes.
    Interrupted { waiting_on: Vec<String> },
    Passed { to: String },
}

pub fn next_step(state: &GameStateSnapshot, color: &str) -> NextStep {
    let current = or_unknown(state.current_color.as_deref());
    let (mine, others) = partition(&state.current_playable_actions, color);

    if state.current_color.as_deref() == Some(color) {
        NextStep::YourTurn
    } else if !mine.is_empty() {
        NextStep::Paused { acting: current }
    } else if ActionPrompt::is_interrupt(state.prompt()) {
        NextStep::Interrupted { waiting_on: others }
    } else {
        NextStep::Passed { to: current }
    }
}

/// Submits one action and reports what changed and what comes next.
pub fn act<A: GameApi + ?Sized>(
    api: &A,
    session: &Session,
    action: &str,
    raw_value: Option<&str>,
) -> Result<Report, CliError> {
    let token = session.token()?;
    let color = session.color()?;
    let game_id = session.game_id.as_str();

    let is_roll = ActionType::RollTheShells.matches(action);
    let before = if is_roll {
        best_effort("pre-roll resources", api.state(game_id)).map(|s| all_player_resources(&s))
    } else {
        None
    };

    let submission = ActionSubmission::new(color, action, raw_value);
    debug!("submitting {submission:?}");
    let response = match api.submit_action(game_id, token, &submission) {
        Ok(response) => response,
        Err(err) => return Err(rejected(api, game_id, color, action, err)),
    };
    info!("{action} accepted in {game_id}");

    let mut out = Report::new();
    header(&mut out, &format!("ACTION OK: {action}"));
    if let Some(detail) = response.detail.filter(|d| !d.is_empty()) {
        out.push(format!("  {detail}"));
    }

    let state = api.state(game_id)?;

    if is_roll {
        if let Some(roll) = last_roll(&state.action_records) {
            out.push(format!("  {roll}"));
        }
        if let Some(before) = &before {
            render_resource_gains(&mut out, before, &state);
        }
    }

    let prompt = state.prompt();
    let actions = &state.current_playable_actions;
    match next_step(&state, color) {
        NextStep::YourTurn => {
            out.push(format!("  Prompt: {prompt}"));
            if let Some(status) = my_status(&state, color) {
                section(&mut out, "Resources");
                out.push(resources_line(&status.resources));
            }
            if partition(actions, color).0.is_empty() {
                out.push(String::new());
                out.push("  No actions available.".to_string());
            } else {
                render_actions(&mut out, actions, color);
            }
        }
        NextStep::Paused { acting } => {
            out.push(format!("  Prompt: {prompt}"));
            render_actions(&mut out, actions, color);
            out.push(String::new());
            out.push(format!(
                "  Note: {acting} is also acting (e.g. discarding). \
                 Your turn will continue after -- run 'clawtan wait'."
            ));
        }
        NextStep::Interrupted { waiting_on } => {
            section(&mut out, "Waiting on Other Players");
            if waiting_on.is_empty() {
                out.push(format!(
                    "  Current prompt: {prompt} (waiting on {})",
                    or_unknown(state.current_color.as_deref())
                ));
            } else {
                out.push(format!(
                    "  {} must {} first.",
                    waiting_on.join(", "),
                    prompt.to_lowercase().replace('_', " ")
                ));
            }
            out.push(String::new());
            out.push(
                "  YOUR TURN IS NOT OVER. After they finish, you will continue \
                 (e.g. move the Kraken, then play your turn)."
                    .to_string(),
            );
            out.push("  Run 'clawtan wait' to resume.".to_string());
        }
        NextStep::Passed { to } => {
            out.push(String::new());
            out.push(format!(
                "  Turn passed to {to}. Run 'clawtan wait' for your next turn."
            ));
        }
    }
    Ok(out)
}

fn rejected<A: GameApi + ?Sized>(
    api: &A,
    game_id: &str,
    color: &str,
    action: &str,
    err: ApiError,
) -> CliError {
    let mut remediation = Report::new();
    if err.is_invalid_action() {
        remediation.push(format!("  '{action}' is not available right now."));
        match best_effort("remediation state", api.state(game_id)) {
            Some(state) => {
                remediation.push(format!(
                    "  Current turn: {} | Prompt: {}",
                    or_unknown(state.current_color.as_deref()),
                    state.prompt()
                ));
                if !state.current_playable_actions.is_empty() {
                    render_actions(&mut remediation, &state.current_playable_actions, color);
                }
                remediation.push(String::new());
                remediation.push(
                    "  Tip: run 'clawtan wait' to get a full turn briefing with available actions."
                        .to_string(),
                );
            }
            None => {
                remediation.push("  Run 'clawtan wait' to see your available actions.".to_string())
            }
        }
    }
    CliError::ActionRejected {
        action: action.to_string(),
        status: err.status_code(),
        detail: err.detail(),
        remediation,
    }
}
