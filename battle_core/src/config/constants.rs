//! Game rule constants

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;

/// Identical units (same name and star) consumed by one merge
pub const MERGE_THRESHOLD: usize = 3;

/// Maximum number of units deployed from the front of the reserve
pub const FIELD_LIMIT: usize = 10;

/// Rounds after which a battle is forced to a draw
pub const MAX_BATTLE_ROUNDS: u32 = 100;

/// Tunable game rules.
///
/// Every section and field has a default, so a TOML file only needs the
/// values it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub economy: EconomyConstants,
    #[serde(default)]
    pub merge: MergeConstants,
    #[serde(default)]
    pub synergy: SynergyConstants,
    #[serde(default)]
    pub elements: ElementConstants,
    #[serde(default)]
    pub battle: BattleConstants,
    #[serde(default)]
    pub shop: ShopConstants,
    #[serde(default, rename = "match")]
    pub match_rules: MatchConstants,
}

impl GameConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let constants: GameConstants = super::load_toml(path)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Parse constants from a TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let constants: GameConstants = super::parse_toml(toml)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Reject values the rules cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

        if self.economy.interest_divisor == 0 {
            return fail("economy.interest_divisor must be positive");
        }
        if self.merge.threshold < 2 {
            return fail("merge.threshold must be at least 2");
        }
        if self.merge.hp_growth < 1.0 || self.merge.attack_growth < 1.0 {
            return fail("merge growth multipliers must be at least 1.0");
        }
        if self.synergy.threshold == 0 {
            return fail("synergy.threshold must be positive");
        }
        for value in [
            self.elements.advantage,
            self.elements.disadvantage,
            self.elements.same_element,
        ] {
            if !value.is_finite() || value < 0.0 {
                return fail("element multipliers must be finite and non-negative");
            }
        }
        if self.battle.field_limit == 0 {
            return fail("battle.field_limit must be positive");
        }
        if self.battle.max_rounds == 0 {
            return fail("battle.max_rounds must be positive");
        }
        if self.shop.offer_size == 0 {
            return fail("shop.offer_size must be positive");
        }
        if self.match_rules.rounds == 0 {
            return fail("match.rounds must be positive");
        }
        if self.match_rules.win_threshold == Some(0) {
            return fail("match.win_threshold must be positive when set");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConstants {
    /// Gold each player starts the match with
    #[serde(default = "default_starting_gold")]
    pub starting_gold: u32,
    /// Flat income every shop phase
    #[serde(default = "default_base_income")]
    pub base_income: u32,
    /// One gold of interest per this much banked gold
    #[serde(default = "default_interest_divisor")]
    pub interest_divisor: u32,
}

impl Default for EconomyConstants {
    fn default() -> Self {
        EconomyConstants {
            starting_gold: 5,
            base_income: 5,
            interest_divisor: 10,
        }
    }
}

fn default_starting_gold() -> u32 {
    5
}
fn default_base_income() -> u32 {
    5
}
fn default_interest_divisor() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConstants {
    /// Copies of the same unit and star consumed by a merge
    #[serde(default = "default_merge_threshold")]
    pub threshold: usize,
    #[serde(default = "default_hp_growth")]
    pub hp_growth: f64,
    #[serde(default = "default_attack_growth")]
    pub attack_growth: f64,
}

impl Default for MergeConstants {
    fn default() -> Self {
        MergeConstants {
            threshold: MERGE_THRESHOLD,
            hp_growth: unit_core::HP_GROWTH,
            attack_growth: unit_core::ATTACK_GROWTH,
        }
    }
}

fn default_merge_threshold() -> usize {
    MERGE_THRESHOLD
}
fn default_hp_growth() -> f64 {
    unit_core::HP_GROWTH
}
fn default_attack_growth() -> f64 {
    unit_core::ATTACK_GROWTH
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyConstants {
    /// Members of one school needed on the field to activate its synergy
    #[serde(default = "default_synergy_threshold")]
    pub threshold: usize,
    /// Attack added to every member of an active school
    #[serde(default = "default_synergy_bonus")]
    pub attack_bonus: u32,
}

impl Default for SynergyConstants {
    fn default() -> Self {
        SynergyConstants {
            threshold: 2,
            attack_bonus: 1,
        }
    }
}

fn default_synergy_threshold() -> usize {
    2
}
fn default_synergy_bonus() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementConstants {
    /// Attacker's element beats the defender's
    #[serde(default = "default_advantage")]
    pub advantage: f64,
    /// Defender's element beats the attacker's
    #[serde(default = "default_disadvantage")]
    pub disadvantage: f64,
    /// Attacker and defender share an element
    #[serde(default = "default_same_element")]
    pub same_element: f64,
}

impl Default for ElementConstants {
    fn default() -> Self {
        ElementConstants {
            advantage: 2.0,
            disadvantage: 0.5,
            same_element: 2.0,
        }
    }
}

fn default_advantage() -> f64 {
    2.0
}
fn default_disadvantage() -> f64 {
    0.5
}
fn default_same_element() -> f64 {
    2.0
}

/// Which side acts first in a battle round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initiative {
    /// Team 1 always acts first
    #[default]
    Fixed,
    /// Team 1 acts first on odd rounds, team 2 on even rounds
    Alternating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConstants {
    #[serde(default = "default_field_limit")]
    pub field_limit: usize,
    /// Round cap after which the battle ends in a draw
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default)]
    pub initiative: Initiative,
}

impl Default for BattleConstants {
    fn default() -> Self {
        BattleConstants {
            field_limit: FIELD_LIMIT,
            max_rounds: MAX_BATTLE_ROUNDS,
            initiative: Initiative::Fixed,
        }
    }
}

fn default_field_limit() -> usize {
    FIELD_LIMIT
}
fn default_max_rounds() -> u32 {
    MAX_BATTLE_ROUNDS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConstants {
    #[serde(default = "default_offer_size")]
    pub offer_size: usize,
}

impl Default for ShopConstants {
    fn default() -> Self {
        ShopConstants {
            offer_size: shop_core::DEFAULT_OFFER_SIZE,
        }
    }
}

fn default_offer_size() -> usize {
    shop_core::DEFAULT_OFFER_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConstants {
    /// Shop + battle rounds in a match
    #[serde(default = "default_match_rounds")]
    pub rounds: u32,
    /// End the match early once a player has this many wins
    #[serde(default)]
    pub win_threshold: Option<u32>,
}

impl Default for MatchConstants {
    fn default() -> Self {
        MatchConstants {
            rounds: 5,
            win_threshold: None,
        }
    }
}

fn default_match_rounds() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert_eq!(constants.economy.base_income, 5);
        assert_eq!(constants.merge.threshold, 3);
        assert!((constants.merge.hp_growth - 1.8).abs() < f64::EPSILON);
        assert!((constants.elements.same_element - 2.0).abs() < f64::EPSILON);
        assert_eq!(constants.battle.field_limit, 10);
        assert_eq!(constants.shop.offer_size, 5);
        assert!(constants.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[merge]
threshold = 2

[elements]
same_element = 1.0

[battle]
initiative = "alternating"

[match]
rounds = 7
win_threshold = 4
"#;

        let constants = GameConstants::from_toml_str(toml).unwrap();
        assert_eq!(constants.merge.threshold, 2);
        assert!((constants.merge.attack_growth - 1.5).abs() < f64::EPSILON);
        assert!((constants.elements.same_element - 1.0).abs() < f64::EPSILON);
        assert!((constants.elements.advantage - 2.0).abs() < f64::EPSILON);
        assert_eq!(constants.battle.initiative, Initiative::Alternating);
        assert_eq!(constants.battle.max_rounds, MAX_BATTLE_ROUNDS);
        assert_eq!(constants.match_rules.rounds, 7);
        assert_eq!(constants.match_rules.win_threshold, Some(4));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let result = GameConstants::from_toml_str("[merge]\nthreshold = 1\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = GameConstants::from_toml_str("[elements]\nadvantage = -1.0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = GameConstants::from_toml_str("[battle]\nfield_limit = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[economy]\nstarting_gold = 10\n").unwrap();

        let constants = GameConstants::load_from_path(file.path()).unwrap();
        assert_eq!(constants.economy.starting_gold, 10);
        assert_eq!(constants.economy.base_income, 5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GameConstants::load_from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
