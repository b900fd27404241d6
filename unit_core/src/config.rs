use crate::types::{Element, SkillKind};
use crate::unit::UnitTemplate;
use crate::ConfigError;
use serde::Deserialize;

/// TOML configuration for a file of unit definitions
#[derive(Debug, Deserialize)]
pub struct UnitFileConfig {
    #[serde(default)]
    pub units: Vec<UnitConfig>,
}

/// Configuration for a single unit template
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    pub name: String,
    pub cost: u32,
    pub hp: u32,
    #[serde(alias = "attack")]
    pub atk: u32,
    #[serde(default)]
    pub skill: SkillKind,
    pub school: String,
    pub element: Element,
}

impl UnitConfig {
    /// Validate and convert into a template
    pub fn into_template(self) -> Result<UnitTemplate, ConfigError> {
        let invalid = |message: &str| ConfigError::Validation {
            unit: self.name.clone(),
            message: message.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.cost == 0 {
            return Err(invalid("cost must be positive"));
        }
        if self.hp == 0 {
            return Err(invalid("hp must be positive"));
        }
        if self.atk == 0 {
            return Err(invalid("atk must be positive"));
        }
        if self.school.trim().is_empty() {
            return Err(invalid("school must not be empty"));
        }

        Ok(UnitTemplate {
            name: self.name,
            cost: self.cost,
            max_hp: self.hp,
            attack: self.atk,
            skill: self.skill,
            school: self.school,
            element: self.element,
        })
    }
}

/// Parse unit templates from a TOML string
pub fn parse_units(toml: &str) -> Result<Vec<UnitTemplate>, ConfigError> {
    let config: UnitFileConfig = toml::from_str(toml)?;
    config
        .units
        .into_iter()
        .map(UnitConfig::into_template)
        .collect()
}
