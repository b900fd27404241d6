//! Damage calculation - turning an attacker, a defender and a skill into HP changes

use super::element::{ElementChart, Effectiveness};
use unit_core::Unit;

/// Damage of one attacker against one defender before any skill split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// `floor(effective_attack * multiplier)`
    pub raw: u32,
    pub multiplier: f64,
    pub effectiveness: Effectiveness,
}

impl Hit {
    /// Damage dealt to each target when the hit is spread `ways` ways
    pub fn split(&self, ways: u32) -> u32 {
        split_damage(self.raw, ways)
    }
}

/// Calculate the elemental hit of `attacker` on `defender`
pub fn calculate_hit(attacker: &Unit, defender: &Unit, chart: &ElementChart) -> Hit {
    let multiplier = chart.multiplier(attacker.element, defender.element);
    Hit {
        raw: raw_damage(attacker.effective_attack(), multiplier),
        multiplier,
        effectiveness: Effectiveness::from_multiplier(multiplier),
    }
}

/// Floor of attack times multiplier, never negative
pub fn raw_damage(effective_attack: u32, multiplier: f64) -> u32 {
    let scaled = (effective_attack as f64 * multiplier).floor();
    if scaled <= 0.0 {
        0
    } else {
        scaled as u32
    }
}

/// Integer division of damage across `ways` targets
pub fn split_damage(raw: u32, ways: u32) -> u32 {
    raw / ways.max(1)
}

/// HP restored by shield and heal skills
pub fn support_amount(effective_attack: u32) -> u32 {
    effective_attack / 2
}
