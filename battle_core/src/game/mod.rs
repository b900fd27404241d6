//! Match controller
//!
//! A match alternates a shop phase for both players with a battle between
//! their deployed lineups. Player 1 fights as [`Side::Team1`].

mod provider;

pub use provider::{
    GreedyBuyer, NoPurchases, ScriptedPurchases, ShopChoiceProvider, GREEDY_RESERVE_CAP,
};

use crate::combat::{resolve_battle, BattleReport, BattleState, Side};
use crate::config::GameConstants;
use crate::roster::{Income, Purchase, Roster};
use crate::PurchaseError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use shop_core::{Shop, ShopOffer};

/// Deterministic RNG for a whole match
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// What happened in one player's shop phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopPhase {
    pub income: Income,
    pub offer: ShopOffer,
    pub purchases: Vec<Result<Purchase, PurchaseError>>,
}

impl ShopPhase {
    pub fn bought(&self) -> impl Iterator<Item = &Purchase> {
        self.purchases.iter().filter_map(|p| p.as_ref().ok())
    }
}

/// One full round of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRound {
    pub round: u32,
    pub shop: [ShopPhase; 2],
    pub battle: BattleReport,
}

/// Final standings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Battles won by player 1 and player 2
    pub wins: [u32; 2],
    pub draws: u32,
    pub rounds_played: u32,
    /// `None` when both players won equally often
    pub winner: Option<Side>,
}

impl MatchResult {
    pub fn wins_for(&self, side: Side) -> u32 {
        self.wins[side.index()]
    }
}

/// Two players, a shared shop and the running score
#[derive(Debug, Clone)]
pub struct Match {
    constants: GameConstants,
    shop: Shop,
    players: [Roster; 2],
    round: u32,
    wins: [u32; 2],
    draws: u32,
}

impl Match {
    pub fn new(shop: Shop, constants: GameConstants) -> Self {
        Self::with_names(shop, constants, "Player 1", "Player 2")
    }

    pub fn with_names(
        shop: Shop,
        constants: GameConstants,
        player1: impl Into<String>,
        player2: impl Into<String>,
    ) -> Self {
        let gold = constants.economy.starting_gold;
        Match {
            players: [Roster::new(player1, gold), Roster::new(player2, gold)],
            constants,
            shop,
            round: 0,
            wins: [0; 2],
            draws: 0,
        }
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn roster(&self, side: Side) -> &Roster {
        &self.players[side.index()]
    }

    pub fn roster_mut(&mut self, side: Side) -> &mut Roster {
        &mut self.players[side.index()]
    }

    /// Rounds completed so far
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whether the round limit or the win threshold has been reached
    pub fn is_over(&self) -> bool {
        let rules = &self.constants.match_rules;
        if self.round >= rules.rounds {
            return true;
        }
        match rules.win_threshold {
            Some(threshold) => self.wins.iter().any(|&w| w >= threshold),
            None => false,
        }
    }

    /// Income, offer and purchases for one player
    pub fn shop_phase<R: Rng + ?Sized>(
        &mut self,
        side: Side,
        provider: &mut dyn ShopChoiceProvider,
        rng: &mut R,
    ) -> ShopPhase {
        let roster = &mut self.players[side.index()];
        let income = roster.collect_income(&self.constants.economy);
        let offer = self.shop.offer_choices(self.constants.shop.offer_size, rng);

        let picks = provider.choose(side, roster, &offer);
        let purchases = roster.buy_from_offer(&offer, &picks, &self.constants.merge);
        for rejected in purchases.iter().filter_map(|p| p.as_ref().err()) {
            tracing::debug!(player = %roster.name(), error = %rejected, "purchase rejected");
        }
        provider.arrange(side, roster);

        ShopPhase {
            income,
            offer,
            purchases,
        }
    }

    /// Deploy both lineups, fight, and update streaks and score
    pub fn battle_phase<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BattleReport {
        let field_limit = self.constants.battle.field_limit;
        let team1 = self.players[0].deploy(field_limit).to_vec();
        let team2 = self.players[1].deploy(field_limit).to_vec();

        let report = resolve_battle(team1, team2, &self.constants, rng);
        self.players[0].record_battle(report.team1.clone());
        self.players[1].record_battle(report.team2.clone());

        self.record_outcome(report.outcome);
        report
    }

    /// Update score and streaks for a finished battle.
    ///
    /// An `Ongoing` state records nothing; `resolve_battle` never returns
    /// one, and a battle stepped by hand only counts once it has finished.
    pub fn record_outcome(&mut self, outcome: BattleState) {
        match outcome {
            BattleState::Team1Wins => self.record_winner(Side::Team1),
            BattleState::Team2Wins => self.record_winner(Side::Team2),
            BattleState::Draw => self.draws += 1,
            BattleState::Ongoing => {}
        }
    }

    fn record_winner(&mut self, winner: Side) {
        self.wins[winner.index()] += 1;
        self.players[winner.index()].record_win();
        self.players[winner.opponent().index()].record_loss();
    }

    /// Play one round: both shop phases, then the battle
    pub fn play_round<R: Rng + ?Sized>(
        &mut self,
        player1: &mut dyn ShopChoiceProvider,
        player2: &mut dyn ShopChoiceProvider,
        rng: &mut R,
    ) -> MatchRound {
        self.round += 1;
        tracing::debug!(round = self.round, "round start");

        let shop = [
            self.shop_phase(Side::Team1, player1, rng),
            self.shop_phase(Side::Team2, player2, rng),
        ];
        let battle = self.battle_phase(rng);

        MatchRound {
            round: self.round,
            shop,
            battle,
        }
    }

    /// Play rounds until the match is over
    pub fn play<R: Rng + ?Sized>(
        &mut self,
        player1: &mut dyn ShopChoiceProvider,
        player2: &mut dyn ShopChoiceProvider,
        rng: &mut R,
    ) -> (Vec<MatchRound>, MatchResult) {
        let mut rounds = Vec::new();
        while !self.is_over() {
            rounds.push(self.play_round(player1, player2, rng));
        }

        let result = self.result();
        tracing::info!(
            wins = ?result.wins,
            draws = result.draws,
            rounds = result.rounds_played,
            winner = ?result.winner,
            "match finished"
        );
        (rounds, result)
    }

    /// Standings so far
    pub fn result(&self) -> MatchResult {
        let winner = match self.wins[0].cmp(&self.wins[1]) {
            std::cmp::Ordering::Greater => Some(Side::Team1),
            std::cmp::Ordering::Less => Some(Side::Team2),
            std::cmp::Ordering::Equal => None,
        };
        MatchResult {
            wins: self.wins,
            draws: self.draws,
            rounds_played: self.round,
            winner,
        }
    }
}
