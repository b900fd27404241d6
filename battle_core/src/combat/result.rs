use super::event::{BattleEvent, BattleState, Side, UnitRef};
use serde::{Deserialize, Serialize};
use unit_core::Unit;

/// Final state of a resolved battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub outcome: BattleState,
    /// Number of rounds fought
    pub rounds: u32,
    /// Team 1 lineup after the battle, in lineup order
    pub team1: Vec<Unit>,
    /// Team 2 lineup after the battle, in lineup order
    pub team2: Vec<Unit>,
    pub events: Vec<BattleEvent>,
}

impl BattleReport {
    pub fn winner(&self) -> Option<Side> {
        self.outcome.winner()
    }

    pub fn lineup(&self, side: Side) -> &[Unit] {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    /// Look up the unit an event refers to
    pub fn unit(&self, unit: UnitRef) -> Option<&Unit> {
        self.lineup(unit.side).get(unit.slot)
    }

    pub fn survivors(&self, side: Side) -> usize {
        self.lineup(side).iter().filter(|u| u.is_alive()).count()
    }

    pub fn events(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    /// Events grouped per round, each group starting with its `RoundStart`.
    ///
    /// Events logged before the first round (synergy announcements) are not
    /// part of any group; the closing `BattleEnd` belongs to the last one.
    pub fn rounds(&self) -> RoundIter<'_> {
        let first = self
            .events
            .iter()
            .position(|e| matches!(e, BattleEvent::RoundStart { .. }))
            .unwrap_or(self.events.len());
        RoundIter {
            rest: &self.events[first..],
        }
    }
}

/// Iterator over the per-round slices of a battle log
#[derive(Debug, Clone)]
pub struct RoundIter<'a> {
    rest: &'a [BattleEvent],
}

impl<'a> Iterator for RoundIter<'a> {
    type Item = &'a [BattleEvent];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self.rest[1..]
            .iter()
            .position(|e| matches!(e, BattleEvent::RoundStart { .. }))
            .map(|i| i + 1)
            .unwrap_or(self.rest.len());
        let (round, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(round)
    }
}
