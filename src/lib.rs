#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod cli;
pub mod client;
pub mod game;
pub mod session;
pub mod types;

pub use cli::CliError;
pub use client::{ApiError, ClientConfig, GameApi, HttpClient, Session};
pub use game::{GameStateSnapshot, StatusDocument};
pub use types::{ActionType, Resource};
