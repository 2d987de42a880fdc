use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::cli::format::{Report, section};
use crate::game::action::{ActionDescriptor, compact_json};
use crate::types::ActionType;

/// Widest single-line rendering of a group, type name included.
pub const INLINE_WIDTH: usize = 120;

static USAGE_HINTS: Lazy<HashMap<ActionType, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            ActionType::ReleaseCatch,
            "Discard cards. Run with no value to discard randomly:\n    \
             CLI: clawtan act RELEASE_CATCH\n    \
             Or pick specific cards (freqdeck=[DRIFTWOOD,CORAL,SHRIMP,KELP,PEARL]):\n    \
             CLI: clawtan act RELEASE_CATCH '[1,0,0,1,0]'",
        ),
        (
            ActionType::MoveTheKraken,
            "Move robber: value = [coordinate, victim_color_or_null, null].\n    \
             CLI: clawtan act MOVE_THE_KRAKEN '[[0,1,-1],\"BLUE\",null]'",
        ),
        (
            ActionType::OceanTrade,
            "Maritime trade: give 4 (or 3/2 with port) of one resource, receive 1.\n    \
             Value = list of resources: first N are given, last 1 is received.\n    \
             CLI: clawtan act OCEAN_TRADE '[\"KELP\",\"KELP\",\"KELP\",\"KELP\",\"SHRIMP\"]'",
        ),
        (
            ActionType::PlayBountifulHarvest,
            "Year of Plenty: pick 2 free resources.\n    \
             CLI: clawtan act PLAY_BOUNTIFUL_HARVEST '[\"DRIFTWOOD\",\"CORAL\"]'",
        ),
    ])
});

pub fn usage_hint(action_type: &str) -> Option<&'static str> {
    let parsed = action_type.parse::<ActionType>().ok()?;
    USAGE_HINTS.get(&parsed).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionGroup {
    pub action_type: String,
    pub values: Vec<Option<Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionSummary {
    /// Nothing for us; these colors have to move first.
    WaitingOn(Vec<String>),
    Available {
        groups: Vec<ActionGroup>,
        others: Vec<String>,
    },
}

/// Splits the legal-action list into our own actions and the sorted set of
/// other colors that still have something to do.
pub fn partition<'a>(
    actions: &'a [ActionDescriptor],
    me: &str,
) -> (Vec<&'a ActionDescriptor>, Vec<String>) {
    let mut mine = Vec::new();
    let mut others = BTreeSet::new();
    for action in actions {
        match &action.color {
            Some(color) if action.belongs_to_other(me) => {
                others.insert(color.clone());
            }
            _ => mine.push(action),
        }
    }
    (mine, others.into_iter().collect())
}

/// Buckets actions by type, keeping the order in which each type first shows up.
pub fn group_actions<'a>(actions: impl IntoIterator<Item = &'a ActionDescriptor>) -> Vec<ActionGroup> {
    let mut groups: Vec<ActionGroup> = Vec::new();
    for action in actions {
        match groups
            .iter_mut()
            .find(|group| group.action_type == action.action_type)
        {
            Some(group) => group.values.push(action.value.clone()),
            None => groups.push(ActionGroup {
                action_type: action.action_type.clone(),
                values: vec![action.value.clone()],
            }),
        }
    }
    groups
}

pub fn summarize(actions: &[ActionDescriptor], me: &str) -> ActionSummary {
    let (mine, others) = partition(actions, me);
    if mine.is_empty() && !others.is_empty() {
        return ActionSummary::WaitingOn(others);
    }
    ActionSummary::Available {
        groups: group_actions(mine),
        others,
    }
}

pub fn render_actions(out: &mut Report, actions: &[ActionDescriptor], me: &str) {
    section(out, "Available Actions");

    let (groups, others) = match summarize(actions, me) {
        ActionSummary::WaitingOn(others) => {
            out.push(format!(
                "  (no actions for you; waiting on: {})",
                others.join(", ")
            ));
            return;
        }
        ActionSummary::Available { groups, others } => (groups, others),
    };

    for group in &groups {
        render_group(out, group);
    }

    if !others.is_empty() {
        out.push(String::new());
        out.push(format!(
            "  (other players still need to act: {})",
            others.join(", ")
        ));
    }
}

fn render_group(out: &mut Report, group: &ActionGroup) {
    let atype = &group.action_type;
    let hint = usage_hint(atype);

    if group.values.iter().all(Option::is_none) {
        out.push(format!("  {atype}"));
        if let Some(hint) = hint {
            out.push(format!("    ({hint})"));
        }
        return;
    }

    let formatted: Vec<String> = group
        .values
        .iter()
        .map(|value| value.as_ref().map_or_else(|| "null".to_string(), compact_json))
        .collect();

    if hint.is_none() {
        let joined = formatted.join(" | ");
        if joined.chars().count() + atype.chars().count() + 4 <= INLINE_WIDTH {
            out.push(format!("  {atype}: {joined}"));
            return;
        }
    }

    out.push(format!("  {atype} ({} options):", formatted.len()));
    if let Some(hint) = hint {
        out.push(format!("    ({hint})"));
    }
    out.extend(formatted.iter().map(|f| format!("    {f}")));
}
