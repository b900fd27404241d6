//! Purchase decisions for the shop phase

use crate::combat::Side;
use crate::config::MergeConstants;
use crate::roster::Roster;
use shop_core::ShopOffer;
use std::collections::VecDeque;

/// Reserve size the greedy shopper stops buying at
pub const GREEDY_RESERVE_CAP: usize = 20;

/// Decides what a player buys from an offer.
///
/// Implementations return indices into `offer`; the match controller
/// feeds them to [`Roster::buy_from_offer`], so bad indices and
/// unaffordable picks are reported rather than trusted.
pub trait ShopChoiceProvider {
    fn choose(&mut self, side: Side, roster: &Roster, offer: &ShopOffer) -> Vec<usize>;

    /// Reorder the reserve after purchases. Default keeps purchase order.
    fn arrange(&mut self, _side: Side, _roster: &mut Roster) {}
}

/// Buys every offered unit it can afford, in offer order, while the
/// reserve holds fewer than `reserve_cap` units.
///
/// Picks are replayed on a copy of the roster so merges triggered by an
/// earlier pick free up room for later ones.
#[derive(Debug, Clone)]
pub struct GreedyBuyer {
    pub reserve_cap: usize,
    pub merge: MergeConstants,
}

impl GreedyBuyer {
    pub fn new(merge: MergeConstants) -> Self {
        GreedyBuyer {
            reserve_cap: GREEDY_RESERVE_CAP,
            merge,
        }
    }
}

impl Default for GreedyBuyer {
    fn default() -> Self {
        Self::new(MergeConstants::default())
    }
}

impl ShopChoiceProvider for GreedyBuyer {
    fn choose(&mut self, _side: Side, roster: &Roster, offer: &ShopOffer) -> Vec<usize> {
        let mut planned = roster.clone();
        let mut picks = Vec::new();

        for (index, template) in offer.choices().iter().enumerate() {
            if planned.reserve().len() >= self.reserve_cap {
                continue;
            }
            if planned.buy(template, &self.merge).is_ok() {
                picks.push(index);
            }
        }
        picks
    }
}

/// Replays a fixed queue of purchase lists, one per shop phase.
///
/// Once the queue is empty it buys nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedPurchases {
    queue: VecDeque<Vec<usize>>,
}

impl ScriptedPurchases {
    pub fn new(phases: impl IntoIterator<Item = Vec<usize>>) -> Self {
        ScriptedPurchases {
            queue: phases.into_iter().collect(),
        }
    }

    pub fn push(&mut self, picks: Vec<usize>) {
        self.queue.push_back(picks);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ShopChoiceProvider for ScriptedPurchases {
    fn choose(&mut self, _side: Side, _roster: &Roster, _offer: &ShopOffer) -> Vec<usize> {
        self.queue.pop_front().unwrap_or_default()
    }
}

/// Never buys anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPurchases;

impl ShopChoiceProvider for NoPurchases {
    fn choose(&mut self, _side: Side, _roster: &Roster, _offer: &ShopOffer) -> Vec<usize> {
        Vec::new()
    }
}
