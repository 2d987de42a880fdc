//! Player-centric projections of a [`GameStateSnapshot`]. Everything here is
//! recomputed from the snapshot on each call and never cached across polls.

use std::collections::HashMap;

use serde::Serialize;

use crate::game::resources::ResourceBundle;
use crate::game::snapshot::GameStateSnapshot;
use crate::types::{BuildingKind, DevelopmentCard};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatus {
    pub color: String,
    pub victory_points: u32,
    pub resources: ResourceBundle,
    pub total_resources: u32,
    /// Only kinds the player actually holds.
    pub dev_cards: Vec<(DevelopmentCard, u32)>,
    pub buildings: Vec<(BuildingKind, u32)>,
    pub longest_road: bool,
    pub largest_army: bool,
    pub road_length: u32,
    pub knights: u32,
    pub has_rolled: bool,
    pub played_dev: bool,
}

impl PlayerStatus {
    pub fn tags(&self) -> Vec<&'static str> {
        award_tags(self.longest_road, self.largest_army)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentSummary {
    pub color: String,
    pub victory_points: u32,
    pub cards: u32,
    pub dev_cards: u32,
    pub knights: u32,
    pub road_length: u32,
    pub tags: Vec<&'static str>,
}

/// Status for `color`, or `None` when that color is not seated in this game.
pub fn my_status(state: &GameStateSnapshot, color: &str) -> Option<PlayerStatus> {
    let player = state.player(color)?;
    Some(PlayerStatus {
        color: player.color.clone(),
        victory_points: player.victory_points,
        resources: player.resources,
        total_resources: player.resources.total(),
        dev_cards: player
            .dev_cards
            .iter()
            .copied()
            .filter(|(_, count)| *count > 0)
            .collect(),
        buildings: player.buildings.clone(),
        longest_road: player.has_longest_road,
        largest_army: player.has_largest_army,
        road_length: player.longest_road_length,
        knights: player.knights_played,
        has_rolled: player.has_rolled,
        played_dev: player.has_played_dev_card,
    })
}

/// Every seat except `color`, in board order.
pub fn opponents(state: &GameStateSnapshot, color: &str) -> Vec<OpponentSummary> {
    state
        .players
        .iter()
        .filter(|player| player.color != color)
        .map(|player| OpponentSummary {
            color: player.color.clone(),
            victory_points: player.victory_points,
            cards: player.resources.total(),
            dev_cards: player.dev_card_total(),
            knights: player.knights_played,
            road_length: player.longest_road_length,
            tags: award_tags(player.has_longest_road, player.has_largest_army),
        })
        .collect()
}

/// Hand contents for every seat; only used to diff across an action.
pub fn all_player_resources(state: &GameStateSnapshot) -> HashMap<String, ResourceBundle> {
    state
        .players
        .iter()
        .map(|player| (player.color.clone(), player.resources))
        .collect()
}

fn award_tags(longest_road: bool, largest_army: bool) -> Vec<&'static str> {
    let mut tags = Vec::new();
    if longest_road {
        tags.push("longest_road");
    }
    if largest_army {
        tags.push("largest_army");
    }
    tags
}
