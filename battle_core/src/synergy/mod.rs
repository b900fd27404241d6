//! School synergy
//!
//! A school is active when at least `threshold` of its members are in the
//! lineup. Every member of an active school gets `attack_bonus` added on top
//! of its base attack. Applying synergy always recomputes from base attack.

use crate::config::SynergyConstants;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use unit_core::{School, Unit};

/// An active school bonus in a lineup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSynergy {
    pub school: School,
    pub members: usize,
    pub attack_bonus: u32,
}

impl fmt::Display for ActiveSynergy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} synergy(+{} ATK)", self.school, self.attack_bonus)
    }
}

/// Count lineup members per school, ordered by school name
pub fn school_counts(lineup: &[Unit]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for unit in lineup {
        *counts.entry(unit.school.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Active synergies of a lineup without modifying it
pub fn active_synergies(lineup: &[Unit], constants: &SynergyConstants) -> Vec<ActiveSynergy> {
    school_counts(lineup)
        .into_iter()
        .filter(|(_, count)| *count >= constants.threshold)
        .map(|(school, members)| ActiveSynergy {
            school: school.to_string(),
            members,
            attack_bonus: constants.attack_bonus,
        })
        .collect()
}

/// Set every unit's synergy bonus from the lineup's composition
pub fn apply_synergy(lineup: &mut [Unit], constants: &SynergyConstants) -> Vec<ActiveSynergy> {
    let active = active_synergies(lineup, constants);

    for unit in lineup.iter_mut() {
        let bonus = if active.iter().any(|s| s.school == unit.school) {
            constants.attack_bonus
        } else {
            0
        };
        unit.set_attack_bonus(bonus);
    }

    for synergy in &active {
        tracing::debug!(school = %synergy.school, members = synergy.members, "synergy active");
    }
    active
}
