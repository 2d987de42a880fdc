use crate::cli::board_display::render_board;
use crate::cli::error::CliError;
use crate::cli::format::{Report, header, render_chat};
use crate::client::{GameApi, Session};
use crate::game::snapshot::{JoinedGame, or_unknown};

pub fn create<A: GameApi + ?Sized>(
    api: &A,
    num_players: u8,
    seed: Option<u64>,
) -> Result<Report, CliError> {
    let created = api.create_game(num_players, seed)?;
    let mut out = Report::new();
    header(&mut out, "GAME CREATED");
    out.push(format!("  Game:    {}", created.game_id));
    out.push(format!("  Players: 0/{}", created.num_players));
    out.push(String::new());
    out.push("Share this game ID for others to join.".to_string());
    Ok(out)
}

pub fn join<A: GameApi + ?Sized>(
    api: &A,
    game_id: &str,
    name: Option<&str>,
) -> Result<Report, CliError> {
    Ok(joined(&api.join_game(game_id, name)?))
}

pub fn quick_join<A: GameApi + ?Sized>(api: &A, name: Option<&str>) -> Result<Report, CliError> {
    Ok(joined(&api.quick_join(name)?))
}

fn joined(seat: &JoinedGame) -> Report {
    let mut out = Report::new();
    header(&mut out, "JOINED GAME");
    out.push(format!("  Game:    {}", seat.game_id));
    out.push(format!("  Color:   {}", seat.player_color));
    out.push(format!("  Seat:    {}", seat.seat_index));
    out.push(format!("  Players: {}", seat.players_joined));
    out.push(format!(
        "  Started: {}",
        if seat.game_started { "yes" } else { "no" }
    ));
    out.push(String::new());
    out.push("Set your session:".to_string());
    out.push(format!("  export CLAWTAN_GAME={}", seat.game_id));
    out.push(format!("  export CLAWTAN_TOKEN={}", seat.token));
    out.push(format!("  export CLAWTAN_COLOR={}", seat.player_color));
    out
}

pub fn status<A: GameApi + ?Sized>(api: &A, session: &Session) -> Result<Report, CliError> {
    let token = session.token.as_deref();
    let status = api.status(&session.game_id, token)?;

    let mut out = Report::new();
    header(&mut out, "GAME STATUS");
    out.push(format!("  Game:    {}", session.game_id));
    out.push(format!(
        "  Started: {}",
        if status.started { "yes" } else { "no" }
    ));

    if status.started {
        out.push(format!("  Turn:    {}", or_unknown(status.num_turns)));
        out.push(format!(
            "  Current: {}",
            or_unknown(status.current_color.as_deref())
        ));
        out.push(format!(
            "  Prompt:  {}",
            or_unknown(status.current_prompt.as_deref())
        ));
        if token.is_some() {
            let yours = if status.your_turn { "YES" } else { "no" };
            out.push(format!("  Your turn: {yours}"));
        }
        out.push(format!("  Winner:  {}", status.winner().unwrap_or("none")));
    } else {
        out.push(format!("  Players: {}", status.lobby_count()));
    }
    Ok(out)
}

pub fn board<A: GameApi + ?Sized>(api: &A, session: &Session) -> Result<Report, CliError> {
    let state = api.state(&session.game_id)?;
    Ok(render_board(&state))
}

pub fn chat<A: GameApi + ?Sized>(
    api: &A,
    session: &Session,
    message: &str,
) -> Result<Report, CliError> {
    api.send_chat(&session.game_id, session.token()?, message)?;
    Ok(vec!["Chat sent.".to_string()])
}

pub fn chat_read<A: GameApi + ?Sized>(
    api: &A,
    session: &Session,
    since: u64,
) -> Result<Report, CliError> {
    let chat = api.chat(&session.game_id, since)?;
    let mut out = Report::new();
    if chat.messages.is_empty() {
        out.push("No messages.".to_string());
    } else {
        render_chat(&mut out, &chat.messages, "Chat");
    }
    Ok(out)
}
