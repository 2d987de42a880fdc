use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `[color, action_type, value?]` triple, used both for the legal-action
/// list and for the action log. The value is kept verbatim so it can be
/// re-submitted unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct ActionDescriptor {
    pub color: Option<String>,
    pub action_type: String,
    pub value: Option<Value>,
}

impl ActionDescriptor {
    pub fn new(color: Option<&str>, action_type: &str) -> Self {
        Self {
            color: color.map(str::to_string),
            action_type: action_type.to_string(),
            value: None,
        }
    }

    /// True when the first slot names a color other than `me`. A null color
    /// means the action is open to whoever is acting.
    pub fn belongs_to_other(&self, me: &str) -> bool {
        self.color.as_deref().is_some_and(|color| color != me)
    }
}

impl From<Value> for ActionDescriptor {
    fn from(raw: Value) -> Self {
        match raw {
            Value::Array(mut slots) if slots.len() > 1 => {
                let value = if slots.len() > 2 {
                    Some(slots.swap_remove(2)).filter(|v| !v.is_null())
                } else {
                    None
                };
                let action_type = tag_text(slots.swap_remove(1));
                let color = slots.swap_remove(0).as_str().map(str::to_string);
                Self {
                    color,
                    action_type,
                    value,
                }
            }
            other => Self {
                color: None,
                action_type: tag_text(other),
                value: None,
            },
        }
    }
}

impl From<ActionDescriptor> for Value {
    fn from(action: ActionDescriptor) -> Self {
        Value::Array(vec![
            action.color.map(Value::String).unwrap_or(Value::Null),
            Value::String(action.action_type),
            action.value.unwrap_or(Value::Null),
        ])
    }
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.color.as_deref().unwrap_or("?");
        match &self.value {
            Some(value) => write!(f, "{color}: {} {}", self.action_type, compact_json(value)),
            None => write!(f, "{color}: {}", self.action_type),
        }
    }
}

/// Body of `POST /action/{game_id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSubmission {
    pub player_color: String,
    pub action_type: String,
    pub value: Option<Value>,
}

impl ActionSubmission {
    pub fn new(player_color: &str, action_type: &str, raw_value: Option<&str>) -> Self {
        Self {
            player_color: player_color.to_string(),
            action_type: action_type.to_string(),
            value: raw_value.map(parse_action_value),
        }
    }
}

/// Reads a free-form CLI argument as JSON, falling back to a bare string so
/// `SHRIMP` works as well as `"SHRIMP"`.
pub fn parse_action_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Single-line JSON with no padding after separators.
pub fn compact_json(value: &Value) -> String {
    value.to_string()
}

fn tag_text(raw: Value) -> String {
    match raw {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
