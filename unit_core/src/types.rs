use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Elemental affinity of a unit.
///
/// The three elements form a cycle: Red beats Yellow, Yellow beats Blue,
/// Blue beats Red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    #[serde(alias = "🔴")]
    Red,
    #[serde(alias = "🟡")]
    Yellow,
    #[serde(alias = "🔵")]
    Blue,
}

impl Element {
    /// Get all element variants
    pub fn all() -> &'static [Element] {
        &[Element::Red, Element::Yellow, Element::Blue]
    }

    /// The element this one has the advantage over
    pub fn beats(&self) -> Element {
        match self {
            Element::Red => Element::Yellow,
            Element::Yellow => Element::Blue,
            Element::Blue => Element::Red,
        }
    }

    /// The element that has the advantage over this one
    pub fn beaten_by(&self) -> Element {
        match self {
            Element::Red => Element::Blue,
            Element::Yellow => Element::Red,
            Element::Blue => Element::Yellow,
        }
    }

    /// Position in [`Element::all`], used for table lookups
    pub fn index(&self) -> usize {
        match self {
            Element::Red => 0,
            Element::Yellow => 1,
            Element::Blue => 2,
        }
    }

    /// Emoji symbol used by text front-ends
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Red => "🔴",
            Element::Yellow => "🟡",
            Element::Blue => "🔵",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Red => write!(f, "Red"),
            Element::Yellow => write!(f, "Yellow"),
            Element::Blue => write!(f, "Blue"),
        }
    }
}

/// Error parsing a skill name from unit data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillParseError {
    #[error("Unknown skill: '{0}'")]
    Unknown(String),
    #[error("AOE target count must be at least 1 in '{0}'")]
    ZeroTargets(String),
}

/// The ability a unit uses every time it acts.
///
/// Serialized with the short names used in unit data files:
/// `"/"`, `"single"`, `"AOE-all"`, `"AOE-<k>"`, `"shield"`, `"heal"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SkillKind {
    /// Basic single-target attack only
    #[default]
    None,
    /// Explicit single-target attack, same behavior as `None`
    SingleTarget,
    /// Hits every living enemy for half damage
    AoeAll,
    /// Hits up to `k` distinct random enemies, damage divided by `k`
    AoeRandom(u32),
    /// Restores own HP, then attacks
    Shield,
    /// Restores HP of every living ally, then attacks
    Heal,
}

impl SkillKind {
    /// Whether this skill replaces the basic single-target attack
    pub fn replaces_basic_attack(&self) -> bool {
        matches!(self, SkillKind::AoeAll | SkillKind::AoeRandom(_))
    }

    /// Whether this skill restores HP before attacking
    pub fn is_support(&self) -> bool {
        matches!(self, SkillKind::Shield | SkillKind::Heal)
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillKind::None => write!(f, "/"),
            SkillKind::SingleTarget => write!(f, "single"),
            SkillKind::AoeAll => write!(f, "AOE-all"),
            SkillKind::AoeRandom(k) => write!(f, "AOE-{}", k),
            SkillKind::Shield => write!(f, "shield"),
            SkillKind::Heal => write!(f, "heal"),
        }
    }
}

impl FromStr for SkillKind {
    type Err = SkillParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "/" | "" | "none" => return Ok(SkillKind::None),
            "single" | "single-target" => return Ok(SkillKind::SingleTarget),
            "aoe" | "aoe-all" => return Ok(SkillKind::AoeAll),
            "shield" => return Ok(SkillKind::Shield),
            "heal" => return Ok(SkillKind::Heal),
            _ => {}
        }

        let count = trimmed
            .get(..4)
            .filter(|prefix| prefix.eq_ignore_ascii_case("aoe-"))
            .and_then(|_| trimmed[4..].parse::<u32>().ok())
            .ok_or_else(|| SkillParseError::Unknown(s.to_string()))?;

        if count == 0 {
            return Err(SkillParseError::ZeroTargets(s.to_string()));
        }
        Ok(SkillKind::AoeRandom(count))
    }
}

impl TryFrom<String> for SkillKind {
    type Error = SkillParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SkillKind> for String {
    fn from(skill: SkillKind) -> Self {
        skill.to_string()
    }
}

/// School (faction) tag used for synergy grouping
pub type School = String;
