//! unit_core - Unit data model for the auto-battler engine
//!
//! This library provides:
//! - Element: the three-way elemental cycle
//! - SkillKind: the closed set of unit abilities
//! - UnitTemplate: immutable catalog entries
//! - Unit: an owned combatant with clamped HP and star upgrades

pub mod config;
pub mod types;
pub mod unit;

pub use config::{parse_units, UnitConfig, UnitFileConfig};
pub use types::{Element, School, SkillKind, SkillParseError};
pub use unit::{Unit, UnitTemplate, ATTACK_GROWTH, HP_GROWTH};

use thiserror::Error;

/// Error reading unit definitions
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid unit '{unit}': {message}")]
    Validation { unit: String, message: String },
}
