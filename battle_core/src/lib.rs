//! battle_core - Match rules for the auto-battler engine
//!
//! This library provides:
//! - Roster: gold, income, purchases and star merges
//! - Synergy: school bonuses on a deployed lineup
//! - ElementChart: elemental damage multipliers
//! - Battle: the round-based combat state machine and its event log
//! - Match: shop and battle phases over several rounds
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use battle_core::prelude::*;
//! use shop_core::{Shop, UnitCatalog};
//!
//! let shop = Shop::new(UnitCatalog::builtin()?);
//! let mut game = Match::new(shop, GameConstants::default());
//! let (rounds, result) = game.play(
//!     &mut GreedyBuyer::default(),
//!     &mut GreedyBuyer::default(),
//!     &mut seeded_rng(42),
//! );
//! println!("{:?} after {} rounds", result.winner, result.rounds_played);
//! ```

pub mod combat;
pub mod config;
pub mod damage;
pub mod game;
pub mod prelude;
pub mod roster;
pub mod synergy;

// Core API
pub use combat::{resolve_battle, Battle, BattleEvent, BattleReport, BattleState, Side, UnitRef};
pub use game::{seeded_rng, Match, MatchResult, MatchRound, ShopChoiceProvider};
pub use roster::{Purchase, Roster};

// Configuration
pub use config::{ConfigError, GameConstants};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A purchase that was refused. The roster is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PurchaseError {
    #[error("cannot afford {unit}: costs {cost} gold, have {gold}")]
    InsufficientGold { unit: String, cost: u32, gold: u32 },
    #[error("offer slot {index} out of range (offer has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Invalid reserve rearrangement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("reserve slot {index} out of range (reserve has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
