//! Player roster - gold, owned units and the deployed lineup

mod merge;

pub use merge::{resolve_merges, MergeEvent};

use crate::config::{EconomyConstants, MergeConstants};
use crate::{PurchaseError, RosterError};
use serde::{Deserialize, Serialize};
use shop_core::ShopOffer;
use unit_core::{Unit, UnitTemplate};

/// Breakdown of one shop phase's income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub base: u32,
    pub interest: u32,
    pub streak_bonus: u32,
}

impl Income {
    pub fn total(&self) -> u32 {
        self.base + self.interest + self.streak_bonus
    }
}

/// A successful purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub unit: String,
    pub cost: u32,
    pub gold_after: u32,
    /// Merges triggered by this purchase, in the order they happened
    pub merges: Vec<MergeEvent>,
}

/// One player's state for a match.
///
/// The reserve is ordered by the player and its front determines who gets
/// deployed. The deployed lineup is rebuilt from the reserve before every
/// battle and afterwards holds the battle's final state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    name: String,
    gold: u32,
    reserve: Vec<Unit>,
    deployed: Vec<Unit>,
    loss_streak: u32,
}

impl Roster {
    pub fn new(name: impl Into<String>, starting_gold: u32) -> Self {
        Roster {
            name: name.into(),
            gold: starting_gold,
            reserve: Vec::new(),
            deployed: Vec::new(),
            loss_streak: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn reserve(&self) -> &[Unit] {
        &self.reserve
    }

    pub fn deployed(&self) -> &[Unit] {
        &self.deployed
    }

    pub fn loss_streak(&self) -> u32 {
        self.loss_streak
    }

    /// Add base income, interest and the loss-streak bonus to gold
    pub fn collect_income(&mut self, constants: &EconomyConstants) -> Income {
        let income = Income {
            base: constants.base_income,
            interest: self.gold / constants.interest_divisor.max(1),
            streak_bonus: self.loss_streak,
        };
        self.gold += income.total();

        tracing::debug!(
            player = %self.name,
            base = income.base,
            interest = income.interest,
            streak = income.streak_bonus,
            gold = self.gold,
            "collected income"
        );
        income
    }

    /// Buy a fresh copy of `template` and resolve any merges it enables
    pub fn buy(
        &mut self,
        template: &UnitTemplate,
        constants: &MergeConstants,
    ) -> Result<Purchase, PurchaseError> {
        if self.gold < template.cost {
            return Err(PurchaseError::InsufficientGold {
                unit: template.name.clone(),
                cost: template.cost,
                gold: self.gold,
            });
        }

        self.gold -= template.cost;
        self.reserve.push(Unit::from_template(template));
        tracing::debug!(player = %self.name, unit = %template.name, gold = self.gold, "bought unit");

        let merges = self.resolve_merges(constants);
        Ok(Purchase {
            unit: template.name.clone(),
            cost: template.cost,
            gold_after: self.gold,
            merges,
        })
    }

    /// Buy each referenced offer slot in order, reporting every entry
    pub fn buy_from_offer(
        &mut self,
        offer: &ShopOffer,
        indices: &[usize],
        constants: &MergeConstants,
    ) -> Vec<Result<Purchase, PurchaseError>> {
        indices
            .iter()
            .map(|&index| {
                let template = offer.get(index).ok_or(PurchaseError::IndexOutOfRange {
                    index,
                    len: offer.len(),
                })?;
                self.buy(template, constants)
            })
            .collect()
    }

    /// Merge identical reserve units until none qualify
    pub fn resolve_merges(&mut self, constants: &MergeConstants) -> Vec<MergeEvent> {
        resolve_merges(&mut self.reserve, constants)
    }

    /// Copy the first `field_limit` reserve units into the lineup at full HP
    pub fn deploy(&mut self, field_limit: usize) -> &[Unit] {
        self.deployed = self
            .reserve
            .iter()
            .take(field_limit)
            .cloned()
            .map(|mut unit| {
                unit.restore_hp();
                unit
            })
            .collect();
        &self.deployed
    }

    /// Replace the lineup with its post-battle state
    pub fn record_battle(&mut self, lineup: Vec<Unit>) {
        self.deployed = lineup;
    }

    pub fn record_win(&mut self) {
        self.loss_streak = 0;
    }

    pub fn record_loss(&mut self) {
        self.loss_streak += 1;
    }

    /// Swap two reserve slots
    pub fn swap_reserve(&mut self, a: usize, b: usize) -> Result<(), RosterError> {
        let len = self.reserve.len();
        for index in [a, b] {
            if index >= len {
                return Err(RosterError::IndexOutOfRange { index, len });
            }
        }
        self.reserve.swap(a, b);
        Ok(())
    }

    /// Move a reserve unit to the front, shifting the others back
    pub fn move_to_front(&mut self, index: usize) -> Result<(), RosterError> {
        let len = self.reserve.len();
        if index >= len {
            return Err(RosterError::IndexOutOfRange { index, len });
        }
        let unit = self.reserve.remove(index);
        self.reserve.insert(0, unit);
        Ok(())
    }
}
