use std::collections::HashMap;

use itertools::Itertools;
use serde_json::Value;

use crate::cli::format::{Report, header, section};
use crate::game::action::compact_json;
use crate::game::snapshot::{AdjacentTile, Board, GameStateSnapshot, or_unknown};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpan {
    pub id: String,
    pub labels: Vec<String>,
    pub building: Option<String>,
    pub color: Option<String>,
    pub port: Option<String>,
}

impl NodeSpan {
    fn line(&self) -> String {
        let mut line = format!("  Node {}: {}", self.id, self.labels.join(", "));
        let mut tags = Vec::new();
        if let Some(building) = &self.building {
            tags.push(format!(
                "{} {building}",
                self.color.as_deref().unwrap_or("?")
            ));
        }
        if let Some(port) = &self.port {
            tags.push(format!("port {port}"));
        }
        if !tags.is_empty() {
            line.push_str(&format!("  [{}]", tags.join(" | ")));
        }
        line
    }
}

pub fn render_board(state: &GameStateSnapshot) -> Report {
    let mut out = Report::new();
    header(&mut out, "BOARD");

    if !state.has_board() {
        out.push("  The board is not available yet -- the game has not started.".to_string());
        out.push(format!(
            "  Players joined: {}/{}",
            state.colors.len(),
            or_unknown(state.num_players)
        ));
        out.push(String::new());
        out.push(
            "  Use 'clawtan wait' to block until the game starts and it's your turn.".to_string(),
        );
        return out;
    }

    let board = &state.board;
    let (ports, tiles): (Vec<_>, Vec<_>) = board
        .tiles
        .iter()
        .filter(|entry| matches!(entry.tile.kind.as_str(), "PORT" | "RESOURCE_TILE" | "DESERT"))
        .partition(|entry| entry.tile.kind == "PORT");

    section(&mut out, "Tiles");
    for entry in &tiles {
        let resource = entry.tile.resource.as_deref().unwrap_or("DESERT");
        let number = entry
            .tile
            .number
            .filter(|n| *n > 0)
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        out.push(format!(
            "  {}  {resource}  #{number}",
            compact_json(&entry.coordinate)
        ));
    }

    if !ports.is_empty() {
        section(&mut out, "Ports");
        for entry in &ports {
            out.push(format!(
                "  {}  {}  {}",
                compact_json(&entry.coordinate),
                port_label(entry.tile.resource.as_deref()),
                entry.tile.direction.as_deref().unwrap_or("-")
            ));
        }
    }

    let (occupied, open): (Vec<NodeSpan>, Vec<NodeSpan>) =
        node_spans(board).into_iter().partition(|n| n.building.is_some());

    if !occupied.is_empty() {
        section(&mut out, "Settlements & Cities");
        out.extend(occupied.iter().map(NodeSpan::line));
    }
    if !open.is_empty() {
        section(&mut out, "Open Nodes");
        out.extend(open.iter().map(NodeSpan::line));
    }

    let roads: Vec<String> = board
        .edges
        .iter()
        .filter_map(|edge| {
            let color = edge.color.as_deref()?;
            Some(format!("  Edge {}: {color}", compact_json(&edge.id)))
        })
        .collect();
    if !roads.is_empty() {
        section(&mut out, "Roads");
        out.extend(roads);
    }

    if let Some(robber) = &state.robber_coordinate {
        out.push(String::new());
        out.push(format!("  Robber: {}", compact_json(robber)));
    }
    out
}

/// Nodes touching at least one resource tile, ordered by numeric id.
pub fn node_spans(board: &Board) -> Vec<NodeSpan> {
    let ports = port_lookup(&board.port_nodes);
    board
        .adjacent_tiles
        .iter()
        .sorted_by_key(|(id, _)| (id.parse::<u64>().unwrap_or(u64::MAX), id.to_string()))
        .filter_map(|(id, adjacent)| {
            let labels: Vec<String> = adjacent.iter().filter_map(tile_label).collect();
            if labels.is_empty() {
                return None;
            }
            let node = board.nodes.get(id);
            Some(NodeSpan {
                id: id.clone(),
                labels,
                building: node.and_then(|n| n.building.clone()),
                color: node.and_then(|n| n.color.clone()),
                port: ports.get(id).cloned(),
            })
        })
        .collect()
}

fn port_label(resource: Option<&str>) -> String {
    match resource {
        Some(resource) if resource != "ANY" => format!("2:1 {resource}"),
        _ => "3:1".to_string(),
    }
}

fn port_lookup(port_nodes: &HashMap<String, Vec<Value>>) -> HashMap<String, String> {
    port_nodes
        .iter()
        .flat_map(|(resource, ids)| {
            let label = port_label(Some(resource));
            ids.iter().map(move |id| (node_key(id), label.clone()))
        })
        .collect()
}

fn node_key(id: &Value) -> String {
    match id {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn tile_label(tile: &AdjacentTile) -> Option<String> {
    let resource = tile.resource.as_deref()?;
    Some(match tile.number.filter(|n| *n > 0) {
        Some(number) => format!("{resource}({number})"),
        None => resource.to_string(),
    })
}
