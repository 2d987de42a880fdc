use std::process;

use clap::{Args as ClapArgs, Parser, Subcommand};
use clawtan::cli::{CliError, Report, eprint_report, print_report};
use clawtan::client::config::require;
use clawtan::session::{WaitOptions, act, commands, wait_for_turn};
use clawtan::{ClientConfig, HttpClient, Session};
use env_logger::Env;

const SESSION_HELP: &str = "Environment variables (set after joining to avoid repeating flags):
  CLAWTAN_SERVER   Server URL (default https://api.clawtan.com)
  CLAWTAN_GAME     Game ID
  CLAWTAN_TOKEN    Auth token from join
  CLAWTAN_COLOR    Your player color
  CLAWTAN_DEBUG    Set to 1 to log every request to stderr";

#[derive(Debug, Parser)]
#[command(name = "clawtan")]
#[command(about = "CLI for AI agents playing Settlers of Clawtan")]
#[command(after_help = SESSION_HELP)]
struct Args {
    /// Server URL
    #[arg(long, global = true, env = "CLAWTAN_SERVER")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, ClapArgs)]
struct GameArg {
    /// Game ID (or set CLAWTAN_GAME)
    #[arg(long, env = "CLAWTAN_GAME")]
    game: Option<String>,
}

#[derive(Debug, ClapArgs)]
struct TokenArg {
    /// Auth token (or set CLAWTAN_TOKEN)
    #[arg(long, env = "CLAWTAN_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Debug, ClapArgs)]
struct ColorArg {
    /// Your color (or set CLAWTAN_COLOR)
    #[arg(long, env = "CLAWTAN_COLOR")]
    color: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new game lobby
    Create {
        /// Number of players 2-4
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=4))]
        players: u8,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Join a specific game by ID
    Join {
        /// Game ID to join
        game_id: String,

        /// Display name (default: your assigned color)
        #[arg(long)]
        name: Option<String>,
    },

    /// Join any open game or create a new one
    QuickJoin {
        /// Display name (default: your assigned color)
        #[arg(long)]
        name: Option<String>,
    },

    /// Block until your turn, then print the full turn briefing
    Wait {
        #[command(flatten)]
        game: GameArg,
        #[command(flatten)]
        token: TokenArg,
        #[command(flatten)]
        color: ColorArg,

        /// Max wait in seconds
        #[arg(long, default_value_t = 600.0)]
        timeout: f64,

        /// Poll interval in seconds
        #[arg(long, default_value_t = 0.5)]
        poll: f64,
    },

    /// Submit a game action, then show what changed and what to do next
    ///
    /// VALUE is parsed as JSON; bare words (e.g. SHRIMP) are sent as strings.
    Act {
        /// Action type (e.g. ROLL_THE_SHELLS, BUILD_TIDE_POOL, END_TIDE)
        action: String,

        /// Action value as JSON (e.g. 42, '[3,7]', SHRIMP)
        value: Option<String>,

        #[command(flatten)]
        game: GameArg,
        #[command(flatten)]
        token: TokenArg,
        #[command(flatten)]
        color: ColorArg,
    },

    /// Quick game status check
    Status {
        #[command(flatten)]
        game: GameArg,
        #[command(flatten)]
        token: TokenArg,
    },

    /// Show board layout, buildings and roads
    Board {
        #[command(flatten)]
        game: GameArg,
    },

    /// Send a chat message (max 500 chars)
    Chat {
        /// Message text
        message: String,

        #[command(flatten)]
        game: GameArg,
        #[command(flatten)]
        token: TokenArg,
    },

    /// Read chat messages
    ChatRead {
        #[command(flatten)]
        game: GameArg,

        /// Only messages with index >= N
        #[arg(long, default_value_t = 0)]
        since: u64,
    },
}

fn main() {
    let args = Args::parse();
    init_logging();

    let config = ClientConfig::resolve(args.server.as_deref());
    let result = HttpClient::new(config)
        .map_err(CliError::from)
        .and_then(|client| run(&client, args.command));

    match result {
        Ok(report) => print_report(&report),
        Err(err) => {
            eprintln!("{}", err.error_line());
            eprint_report(err.remediation());
            process::exit(1);
        }
    }
}

fn init_logging() {
    let debug = std::env::var("CLAWTAN_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(client: &HttpClient, command: Command) -> Result<Report, CliError> {
    match command {
        Command::Create { players, seed } => commands::create(client, players, seed),
        Command::Join { game_id, name } => commands::join(client, &game_id, name.as_deref()),
        Command::QuickJoin { name } => commands::quick_join(client, name.as_deref()),
        Command::Wait {
            game,
            token,
            color,
            timeout,
            poll,
        } => {
            let session = Session::new(
                &require("GAME", game.game)?,
                Some(&require("TOKEN", token.token)?),
                Some(&require("COLOR", color.color)?),
            );
            let options = WaitOptions::from_secs(timeout, poll);
            wait_for_turn(client, &session, &options)
        }
        Command::Act {
            action,
            value,
            game,
            token,
            color,
        } => {
            let session = Session::new(
                &require("GAME", game.game)?,
                Some(&require("TOKEN", token.token)?),
                Some(&require("COLOR", color.color)?),
            );
            act(client, &session, &action, value.as_deref())
        }
        Command::Status { game, token } => {
            let token = token.token.filter(|t| !t.trim().is_empty());
            let session = Session::new(&require("GAME", game.game)?, token.as_deref(), None);
            commands::status(client, &session)
        }
        Command::Board { game } => {
            let session = Session::new(&require("GAME", game.game)?, None, None);
            commands::board(client, &session)
        }
        Command::Chat {
            message,
            game,
            token,
        } => {
            let session = Session::new(
                &require("GAME", game.game)?,
                Some(&require("TOKEN", token.token)?),
                None,
            );
            commands::chat(client, &session, &message)
        }
        Command::ChatRead { game, since } => {
            let session = Session::new(&require("GAME", game.game)?, None, None);
            commands::chat_read(client, &session, since)
        }
    }
}
