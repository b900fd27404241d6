//! Elemental matchups
//!
//! Red beats Yellow, Yellow beats Blue, Blue beats Red. Attacking into the
//! same element counts as its own relation so it can be tuned separately.

use crate::config::ElementConstants;
use serde::{Deserialize, Serialize};
use unit_core::Element;

/// Relation between an attacker's and a defender's element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matchup {
    Advantage,
    Disadvantage,
    Same,
}

impl Matchup {
    pub fn between(attacker: Element, defender: Element) -> Matchup {
        if attacker == defender {
            Matchup::Same
        } else if attacker.beats() == defender {
            Matchup::Advantage
        } else {
            Matchup::Disadvantage
        }
    }
}

/// How a hit's multiplier reads to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    Effective,
    Normal,
    Resisted,
}

impl Effectiveness {
    pub fn from_multiplier(multiplier: f64) -> Effectiveness {
        if multiplier > 1.0 {
            Effectiveness::Effective
        } else if multiplier < 1.0 {
            Effectiveness::Resisted
        } else {
            Effectiveness::Normal
        }
    }
}

/// Precomputed attacker x defender multiplier table
#[derive(Debug, Clone, PartialEq)]
pub struct ElementChart {
    table: [[f64; 3]; 3],
}

impl ElementChart {
    pub fn new(constants: &ElementConstants) -> Self {
        let mut table = [[1.0; 3]; 3];
        for &attacker in Element::all() {
            for &defender in Element::all() {
                table[attacker.index()][defender.index()] =
                    match Matchup::between(attacker, defender) {
                        Matchup::Advantage => constants.advantage,
                        Matchup::Disadvantage => constants.disadvantage,
                        Matchup::Same => constants.same_element,
                    };
            }
        }
        ElementChart { table }
    }

    pub fn multiplier(&self, attacker: Element, defender: Element) -> f64 {
        self.table[attacker.index()][defender.index()]
    }
}

impl Default for ElementChart {
    fn default() -> Self {
        ElementChart::new(&ElementConstants::default())
    }
}
