//! Structured battle log entries

use crate::damage::Effectiveness;
use crate::synergy::ActiveSynergy;
use serde::{Deserialize, Serialize};
use std::fmt;
use unit_core::SkillKind;

/// One of the two lineups in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Side::Team1 => 0,
            Side::Team2 => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Team1 => write!(f, "Team 1"),
            Side::Team2 => write!(f, "Team 2"),
        }
    }
}

/// Position of a unit in a battle: its side and lineup slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitRef {
    pub side: Side,
    pub slot: usize,
}

impl UnitRef {
    pub fn new(side: Side, slot: usize) -> Self {
        UnitRef { side, slot }
    }
}

/// State of the battle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleState {
    Ongoing,
    Team1Wins,
    Team2Wins,
    Draw,
}

impl BattleState {
    pub fn is_finished(&self) -> bool {
        !matches!(self, BattleState::Ongoing)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            BattleState::Team1Wins => Some(Side::Team1),
            BattleState::Team2Wins => Some(Side::Team2),
            BattleState::Ongoing | BattleState::Draw => None,
        }
    }
}

/// Events generated during combat, in the order they happened.
///
/// Together with the starting lineups they describe the whole battle, so a
/// front-end can replay it without re-simulating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    SynergyApplied {
        side: Side,
        synergies: Vec<ActiveSynergy>,
    },
    RoundStart {
        round: u32,
    },
    /// A unit used a non-basic skill
    SkillCast {
        actor: UnitRef,
        skill: SkillKind,
        targets: Vec<UnitRef>,
    },
    Damage {
        actor: UnitRef,
        target: UnitRef,
        damage: u32,
        effectiveness: Effectiveness,
        remaining_hp: u32,
    },
    /// HP restored by a shield or heal
    Restore {
        actor: UnitRef,
        target: UnitRef,
        amount: u32,
        hp: u32,
    },
    Defeated {
        unit: UnitRef,
    },
    RoundCapReached {
        round: u32,
    },
    BattleEnd {
        state: BattleState,
        rounds: u32,
    },
}
