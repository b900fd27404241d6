//! Damage system - elemental multipliers and rounding rules

mod calculation;
mod element;

pub use calculation::{calculate_hit, raw_damage, split_damage, support_amount, Hit};
pub use element::{Effectiveness, ElementChart, Matchup};
