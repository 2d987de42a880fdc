use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::cli::format::{Report, section};
use crate::game::action::{ActionDescriptor, compact_json};
use crate::game::resources::ResourceBundle;
use crate::game::snapshot::GameStateSnapshot;
use crate::game::view::all_player_resources;
use crate::types::{ActionType, Resource};

/// Records appended after the first `seen` entries.
pub fn history_since(records: &[ActionDescriptor], seen: usize) -> &[ActionDescriptor] {
    records.get(seen..).unwrap_or(&[])
}

pub fn render_history(out: &mut Report, records: &[ActionDescriptor], seen: usize) {
    let recent = history_since(records, seen);
    if recent.is_empty() {
        return;
    }
    section(out, &format!("Recent Actions ({} moves)", recent.len()));
    out.extend(recent.iter().map(|record| format!("  {record}")));
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerGain {
    pub color: String,
    pub changes: Vec<(Resource, i64)>,
}

impl fmt::Display for PlayerGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .changes
            .iter()
            .map(|(resource, delta)| format!("{delta:+} {resource}"))
            .collect();
        write!(f, "{}: {}", self.color, parts.join(", "))
    }
}

/// Per-seat change in hand contents between `before` and `after`, for seats
/// whose hand actually changed. Seats missing from `before` count as empty.
pub fn resource_gains(
    before: &HashMap<String, ResourceBundle>,
    after: &GameStateSnapshot,
) -> Vec<PlayerGain> {
    let post = all_player_resources(after);
    after
        .colors
        .iter()
        .filter_map(|color| {
            let pre = before.get(color).copied().unwrap_or_default();
            let now = post.get(color).copied().unwrap_or_default();
            let changes = now.diff(&pre);
            (!changes.is_empty()).then(|| PlayerGain {
                color: color.clone(),
                changes,
            })
        })
        .collect()
}

pub fn render_resource_gains(
    out: &mut Report,
    before: &HashMap<String, ResourceBundle>,
    after: &GameStateSnapshot,
) {
    section(out, "Resources Distributed");
    let gains = resource_gains(before, after);
    if gains.is_empty() {
        out.push("  No resources produced.".to_string());
        return;
    }
    out.extend(gains.iter().map(|gain| format!("  {gain}")));
}

#[derive(Debug, Clone, PartialEq)]
pub enum RollValue {
    Dice(i64, i64),
    Raw(Value),
}

impl fmt::Display for RollValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollValue::Dice(a, b) => write!(f, "Rolled: {a} + {b} = {}", a + b),
            RollValue::Raw(value) => write!(f, "Rolled: {}", compact_json(value)),
        }
    }
}

/// Most recent dice roll in the log. A roll record without a value yields
/// nothing rather than a made-up result.
pub fn last_roll(records: &[ActionDescriptor]) -> Option<RollValue> {
    let record = records
        .iter()
        .rev()
        .find(|record| ActionType::RollTheShells.matches(&record.action_type))?;
    let value = record.value.as_ref()?;
    let dice = value.as_array().and_then(|dice| match dice.as_slice() {
        [a, b] => Some(RollValue::Dice(a.as_i64()?, b.as_i64()?)),
        _ => None,
    });
    Some(dice.unwrap_or_else(|| RollValue::Raw(value.clone())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::game::snapshot::fixtures::{snapshot, two_player_state};

    fn records(raw: Value) -> Vec<ActionDescriptor> {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn history_is_a_pure_suffix() {
        let log = records(json!([
            ["RED", "ROLL_THE_SHELLS", [1, 2]],
            ["RED", "END_TIDE", null],
            ["BLUE", "ROLL_THE_SHELLS", [6, 6]]
        ]));
        for seen in 0..=log.len() {
            assert_eq!(history_since(&log, seen), &log[seen..]);
        }
        assert!(history_since(&log, 10).is_empty());

        let mut out = Report::new();
        render_history(&mut out, &log, log.len());
        assert!(out.is_empty());
    }

    #[test]
    fn history_lines_show_value_only_when_present() {
        let log = records(json!([
            ["RED", "END_TIDE", null],
            ["BLUE", "BUILD_CURRENT", [3, 7]]
        ]));
        let mut out = Report::new();
        render_history(&mut out, &log, 0);
        assert_eq!(
            out,
            vec![
                "",
                "--- Recent Actions (2 moves) ---",
                "  RED: END_TIDE",
                "  BLUE: BUILD_CURRENT [3,7]"
            ]
        );
    }

    #[test]
    fn roll_of_two_dice_is_summed() {
        let log = records(json!([
            ["RED", "ROLL_THE_SHELLS", [6, 1]],
            ["RED", "END_TIDE", null],
            ["BLUE", "ROLL_THE_SHELLS", [3, 4]],
            ["BLUE", "BUILD_CURRENT", [3, 7]]
        ]));
        let roll = last_roll(&log).unwrap();
        assert_eq!(roll, RollValue::Dice(3, 4));
        assert_eq!(roll.to_string(), "Rolled: 3 + 4 = 7");
    }

    #[test]
    fn odd_roll_values_are_shown_raw() {
        let log = records(json!([["RED", "ROLL_THE_SHELLS", 8]]));
        assert_eq!(last_roll(&log).unwrap().to_string(), "Rolled: 8");
    }

    #[test]
    fn no_roll_means_no_roll_line() {
        assert_eq!(last_roll(&records(json!([["RED", "END_TIDE", null]]))), None);
        assert_eq!(last_roll(&records(json!([["RED", "ROLL_THE_SHELLS"]]))), None);
        assert_eq!(last_roll(&[]), None);
    }

    #[test]
    fn gains_sum_to_the_change_in_hand_size() {
        let after = snapshot(two_player_state());
        let mut before = HashMap::new();
        before.insert("RED".to_string(), ResourceBundle::from_counts([1, 0, 1, 2, 3]));
        before.insert("BLUE".to_string(), ResourceBundle::from_counts([0, 1, 0, 5, 0]));

        let gains = resource_gains(&before, &after);
        assert_eq!(gains.len(), 1);
        assert_eq!(gains[0].color, "RED");
        assert_eq!(gains[0].to_string(), "RED: +1 DRIFTWOOD, -2 KELP");

        let post = all_player_resources(&after);
        for gain in &gains {
            let reported: i64 = gain.changes.iter().map(|(_, d)| d).sum();
            let actual = post[&gain.color].total() as i64 - before[&gain.color].total() as i64;
            assert_eq!(reported, actual);
        }
    }

    #[test]
    fn unchanged_hands_report_no_production() {
        let after = snapshot(two_player_state());
        let before = all_player_resources(&after);
        let mut out = Report::new();
        render_resource_gains(&mut out, &before, &after);
        assert_eq!(out.last().unwrap(), "  No resources produced.");
    }
}
