use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::action::ActionDescriptor;
use crate::game::resources::ResourceBundle;
use crate::types::{BuildingKind, DevelopmentCard, Resource};

/// One fetched copy of `GET /game/{id}`. The server's flat `P{i}_FIELD`
/// table is projected into `players` once, at decode time, so index and
/// color can never drift apart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawGameState")]
pub struct GameStateSnapshot {
    pub colors: Vec<String>,
    pub players: Vec<PlayerRecord>,
    pub action_records: Vec<ActionDescriptor>,
    pub current_playable_actions: Vec<ActionDescriptor>,
    pub current_prompt: Option<String>,
    pub current_color: Option<String>,
    pub robber_coordinate: Option<Value>,
    pub started: bool,
    pub num_turns: Option<u32>,
    pub num_players: Option<u32>,
    pub board: Board,
}

impl GameStateSnapshot {
    pub fn player(&self, color: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|player| player.color == color)
    }

    pub fn prompt(&self) -> &str {
        self.current_prompt.as_deref().unwrap_or("?")
    }

    pub fn has_board(&self) -> bool {
        self.started && !self.board.tiles.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawGameState {
    #[serde(default)]
    colors: Vec<String>,
    #[serde(default)]
    player_state: HashMap<String, Value>,
    #[serde(default)]
    action_records: Vec<ActionDescriptor>,
    #[serde(default)]
    current_playable_actions: Vec<ActionDescriptor>,
    #[serde(default)]
    current_prompt: Option<String>,
    #[serde(default)]
    current_color: Option<String>,
    #[serde(default)]
    robber_coordinate: Option<Value>,
    #[serde(default)]
    started: bool,
    #[serde(default)]
    num_turns: Option<u32>,
    #[serde(default)]
    num_players: Option<u32>,
    #[serde(flatten)]
    board: Board,
}

impl From<RawGameState> for GameStateSnapshot {
    fn from(raw: RawGameState) -> Self {
        let players = raw
            .colors
            .iter()
            .enumerate()
            .map(|(index, color)| PlayerRecord::project(&raw.player_state, index, color))
            .collect();
        Self {
            colors: raw.colors,
            players,
            action_records: raw.action_records,
            current_playable_actions: raw.current_playable_actions,
            current_prompt: raw.current_prompt,
            current_color: raw.current_color,
            robber_coordinate: raw.robber_coordinate.filter(is_present),
            started: raw.started,
            num_turns: raw.num_turns,
            num_players: raw.num_players,
            board: raw.board,
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

/// Structured per-seat view of the flat player table. Missing keys mean zero
/// or false; the server never writes explicit zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub color: String,
    pub victory_points: u32,
    pub resources: ResourceBundle,
    pub dev_cards: Vec<(DevelopmentCard, u32)>,
    pub buildings: Vec<(BuildingKind, u32)>,
    pub has_longest_road: bool,
    pub has_largest_army: bool,
    pub longest_road_length: u32,
    pub knights_played: u32,
    pub has_rolled: bool,
    pub has_played_dev_card: bool,
}

impl PlayerRecord {
    pub fn project(table: &HashMap<String, Value>, index: usize, color: &str) -> Self {
        let keys = SeatKeys { table, index };

        let mut resources = ResourceBundle::zero();
        for resource in Resource::ALL {
            resources.set(resource, keys.count(&format!("{resource}_IN_HAND")));
        }

        let dev_cards = DevelopmentCard::ALL
            .into_iter()
            .map(|card| (card, keys.count(&format!("{card}_IN_HAND"))))
            .collect();

        let buildings = BuildingKind::ALL
            .into_iter()
            .map(|kind| (kind, keys.count(&format!("{kind}_AVAILABLE"))))
            .collect();

        Self {
            color: color.to_string(),
            victory_points: keys.count("TREASURE_CHESTS"),
            resources,
            dev_cards,
            buildings,
            has_longest_road: keys.flag("HAS_ROAD"),
            has_largest_army: keys.flag("HAS_ARMY"),
            longest_road_length: keys.count("LONGEST_ROAD_LENGTH"),
            knights_played: keys.count("PLAYED_LOBSTER_GUARD"),
            has_rolled: keys.flag("HAS_ROLLED"),
            has_played_dev_card: keys.flag("HAS_PLAYED_DEVELOPMENT_CARD_IN_TURN"),
        }
    }

    pub fn dev_card_total(&self) -> u32 {
        self.dev_cards.iter().map(|(_, count)| count).sum()
    }
}

struct SeatKeys<'a> {
    table: &'a HashMap<String, Value>,
    index: usize,
}

impl SeatKeys<'_> {
    fn get(&self, field: &str) -> Option<&Value> {
        self.table.get(&format!("P{}_{}", self.index, field))
    }

    fn count(&self, field: &str) -> u32 {
        match self.get(field) {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
                .map_or(0, |v| v.min(u32::MAX as u64) as u32),
            Some(Value::Bool(flag)) => u32::from(*flag),
            _ => 0,
        }
    }

    fn flag(&self, field: &str) -> bool {
        match self.get(field) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub tiles: Vec<TileEntry>,
    #[serde(default)]
    pub port_nodes: HashMap<String, Vec<Value>>,
    #[serde(default)]
    pub adjacent_tiles: HashMap<String, Vec<AdjacentTile>>,
    #[serde(default)]
    pub nodes: HashMap<String, NodeInfo>,
    #[serde(default)]
    pub edges: Vec<EdgeInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TileEntry {
    #[serde(default)]
    pub coordinate: Value,
    #[serde(default)]
    pub tile: TileInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TileInfo {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdjacentTile {
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeInfo {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub color: Option<String>,
}

/// `GET /game/{id}/status`. `your_turn` only means something when the
/// request carried a token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusDocument {
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub players_joined: Option<u32>,
    #[serde(default)]
    pub num_players: Option<u32>,
    #[serde(default)]
    pub current_color: Option<String>,
    #[serde(default)]
    pub current_prompt: Option<String>,
    #[serde(default)]
    pub your_turn: bool,
    #[serde(default)]
    pub winning_color: Option<String>,
    #[serde(default)]
    pub num_turns: Option<u32>,
}

impl StatusDocument {
    pub fn winner(&self) -> Option<&str> {
        self.winning_color.as_deref().filter(|c| !c.is_empty())
    }

    pub fn lobby_count(&self) -> String {
        format!("{}/{}", or_unknown(self.players_joined), or_unknown(self.num_players))
    }
}

pub(crate) fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatDocument {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub index: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ChatMessage {
    pub fn author(&self) -> &str {
        self.name
            .as_deref()
            .or(self.color.as_deref())
            .unwrap_or("?")
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index.map(|i| i.to_string()).unwrap_or_default();
        write!(f, "[{index}] {}: {}", self.author(), self.message)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedGame {
    pub game_id: String,
    pub num_players: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinedGame {
    pub game_id: String,
    pub player_color: String,
    pub seat_index: u32,
    pub players_joined: u32,
    pub token: String,
    #[serde(default)]
    pub game_started: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub detail: Option<String>,
}
