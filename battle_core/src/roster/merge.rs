//! Merge resolution
//!
//! Runs to a fixed point: every pass finds the group of identical units
//! (same name and star) that owns the lowest reserve index and has at least
//! `threshold` members, removes its first `threshold` members and appends
//! one upgraded copy of the first removed unit. A freshly upgraded unit can
//! merge again on a later pass.

use crate::config::MergeConstants;
use serde::{Deserialize, Serialize};
use unit_core::Unit;

/// One merge performed on a reserve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    pub name: String,
    /// Star level of the consumed units
    pub from_star: u32,
    /// Reserve indices consumed, as they were before removal
    pub consumed: Vec<usize>,
}

impl MergeEvent {
    pub fn to_star(&self) -> u32 {
        self.from_star + 1
    }
}

/// Merge identical units until no group reaches the threshold
pub fn resolve_merges(reserve: &mut Vec<Unit>, constants: &MergeConstants) -> Vec<MergeEvent> {
    let threshold = constants.threshold.max(2);
    let mut merges = Vec::new();

    while let Some(indices) = find_mergeable(reserve, threshold) {
        let first = reserve[indices[0]].clone();
        for &i in indices.iter().rev() {
            reserve.remove(i);
        }

        let upgraded = first.upgraded_with(constants.hp_growth, constants.attack_growth);
        tracing::debug!(
            unit = %first.name,
            star = upgraded.star,
            max_hp = upgraded.max_hp,
            attack = upgraded.base_attack,
            "merged units"
        );

        merges.push(MergeEvent {
            name: first.name,
            from_star: first.star,
            consumed: indices,
        });
        reserve.push(upgraded);
    }

    merges
}

/// Lowest indices of the first group with at least `threshold` members
fn find_mergeable(reserve: &[Unit], threshold: usize) -> Option<Vec<usize>> {
    for (i, unit) in reserve.iter().enumerate() {
        let key = unit.key();
        let indices: Vec<usize> = reserve
            .iter()
            .enumerate()
            .skip(i)
            .filter(|(_, other)| other.key() == key)
            .map(|(j, _)| j)
            .take(threshold)
            .collect();

        if indices.len() == threshold {
            return Some(indices);
        }
    }
    None
}
