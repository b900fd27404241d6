//! Battle resolution
//!
//! A battle is a state machine over two deployed lineups. It advances one
//! round at a time and records every action as a [`BattleEvent`].

mod engine;
mod event;
mod result;

pub use engine::{resolve_battle, Battle};
pub use event::{BattleEvent, BattleState, Side, UnitRef};
pub use result::{BattleReport, RoundIter};
