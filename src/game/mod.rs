pub mod action;
pub mod resources;
pub mod snapshot;
pub mod view;

pub use action::{ActionDescriptor, ActionSubmission, compact_json, parse_action_value};
pub use resources::ResourceBundle;
pub use snapshot::{
    ActionResponse, Board, ChatDocument, ChatMessage, CreatedGame, GameStateSnapshot, JoinedGame,
    PlayerRecord, StatusDocument,
};
pub use view::{OpponentSummary, PlayerStatus, all_player_resources, my_status, opponents};
