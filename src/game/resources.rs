use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Resource;

/// Per-kind resource counts for one player, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceBundle {
    counts: [u32; Resource::ALL.len()],
}

impl ResourceBundle {
    pub const fn from_counts(counts: [u32; 5]) -> Self {
        Self { counts }
    }

    pub const fn zero() -> Self {
        Self {
            counts: [0; Resource::ALL.len()],
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn set(&mut self, resource: Resource, amount: u32) {
        self.counts[resource_index(resource)] = amount;
    }

    pub fn get(&self, resource: Resource) -> u32 {
        self.counts[resource_index(resource)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL.into_iter().zip(self.counts.iter().copied())
    }

    /// Signed `self - earlier` for every kind, skipping kinds that did not change.
    pub fn diff(&self, earlier: &ResourceBundle) -> Vec<(Resource, i64)> {
        self.iter()
            .zip(earlier.counts.iter())
            .map(|((resource, now), &before)| (resource, now as i64 - before as i64))
            .filter(|(_, delta)| *delta != 0)
            .collect()
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(resource, amount)| format!("{resource}:{amount}"))
            .collect();
        write!(f, "{} (total:{})", parts.join(" "), self.total())
    }
}

const fn resource_index(resource: Resource) -> usize {
    match resource {
        Resource::Driftwood => 0,
        Resource::Coral => 1,
        Resource::Shrimp => 2,
        Resource::Kelp => 3,
        Resource::Pearl => 4,
    }
}
