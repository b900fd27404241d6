//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Match flow
pub use crate::game::{
    seeded_rng, GreedyBuyer, Match, MatchResult, MatchRound, NoPurchases, ScriptedPurchases,
    ShopChoiceProvider, ShopPhase,
};
pub use crate::roster::{Income, MergeEvent, Purchase, Roster};
pub use crate::{PurchaseError, RosterError};

// Combat
pub use crate::combat::{resolve_battle, Battle, BattleEvent, BattleReport, BattleState, Side, UnitRef};
pub use crate::damage::{Effectiveness, ElementChart};
pub use crate::synergy::ActiveSynergy;

// Config
pub use crate::config::{GameConstants, Initiative};

// Re-exports from unit_core
pub use unit_core::{Element, SkillKind, Unit, UnitTemplate};
