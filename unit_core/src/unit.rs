use crate::types::{Element, School, SkillKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Max HP multiplier applied per star level
pub const HP_GROWTH: f64 = 1.8;

/// Base attack multiplier applied per star level
pub const ATTACK_GROWTH: f64 = 1.5;

/// Immutable catalog entry a unit is bought from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub name: String,
    pub cost: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub skill: SkillKind,
    pub school: School,
    pub element: Element,
}

/// A single owned combatant.
///
/// `current_hp` stays within `0..=max_hp` through every mutation, and the
/// effective attack is always `base_attack` plus whatever synergy bonus was
/// last assigned. The bonus is overwritten, never accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub school: School,
    pub element: Element,
    pub cost: u32,
    pub skill: SkillKind,
    /// Upgrade tier, starting at 1
    pub star: u32,
    pub max_hp: u32,
    pub base_attack: u32,
    current_hp: u32,
    attack_bonus: u32,
}

impl Unit {
    /// Create a fresh one-star unit from a catalog template
    pub fn from_template(template: &UnitTemplate) -> Self {
        Unit {
            name: template.name.clone(),
            school: template.school.clone(),
            element: template.element,
            cost: template.cost,
            skill: template.skill,
            star: 1,
            max_hp: template.max_hp,
            base_attack: template.attack,
            current_hp: template.max_hp,
            attack_bonus: 0,
        }
    }

    /// Merge identity: units merge only with the same name and star level
    pub fn key(&self) -> (&str, u32) {
        (&self.name, self.star)
    }

    /// Short label such as `Momoi★2`
    pub fn label(&self) -> String {
        format!("{}★{}", self.name, self.star)
    }

    pub fn hp(&self) -> u32 {
        self.current_hp
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Attack used in combat: base attack plus the current synergy bonus
    pub fn effective_attack(&self) -> u32 {
        self.base_attack.saturating_add(self.attack_bonus)
    }

    pub fn attack_bonus(&self) -> u32 {
        self.attack_bonus
    }

    /// Replace the synergy bonus
    pub fn set_attack_bonus(&mut self, bonus: u32) {
        self.attack_bonus = bonus;
    }

    /// Set current HP, clamped to `max_hp`
    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
    }

    /// Restore HP to max (used when a unit is deployed)
    pub fn restore_hp(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Subtract damage, saturating at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Add HP, capped at `max_hp`. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.current_hp));
        self.current_hp += restored;
        restored
    }

    /// Next star level using the default growth multipliers
    pub fn upgraded(&self) -> Unit {
        self.upgraded_with(HP_GROWTH, ATTACK_GROWTH)
    }

    /// Next star level with explicit growth multipliers.
    ///
    /// Stats are truncated toward zero, HP is refilled and the synergy bonus
    /// is cleared.
    pub fn upgraded_with(&self, hp_growth: f64, attack_growth: f64) -> Unit {
        let max_hp = scale(self.max_hp, hp_growth);
        Unit {
            star: self.star + 1,
            max_hp,
            base_attack: scale(self.base_attack, attack_growth),
            current_hp: max_hp,
            attack_bonus: 0,
            ..self.clone()
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} HP {}/{} ATK {} [{}] {}",
            self.element.symbol(),
            self.label(),
            self.current_hp,
            self.max_hp,
            self.effective_attack(),
            self.skill,
            self.school
        )
    }
}

fn scale(value: u32, mult: f64) -> u32 {
    (value as f64 * mult).trunc() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn momoi() -> UnitTemplate {
        UnitTemplate {
            name: "Momoi".to_string(),
            cost: 4,
            max_hp: 6,
            attack: 6,
            skill: SkillKind::AoeRandom(2),
            school: "Millennium".to_string(),
            element: Element::Yellow,
        }
    }

    #[test]
    fn test_from_template_is_fresh() {
        let unit = Unit::from_template(&momoi());
        assert_eq!(unit.star, 1);
        assert_eq!(unit.hp(), 6);
        assert_eq!(unit.effective_attack(), 6);
        assert_eq!(unit.key(), ("Momoi", 1));
    }

    #[test]
    fn test_upgrade_truncates_stats() {
        let unit = Unit::from_template(&momoi()).upgraded();
        assert_eq!(unit.star, 2);
        assert_eq!(unit.max_hp, 10); // 6 * 1.8 = 10.8
        assert_eq!(unit.base_attack, 9); // 6 * 1.5 = 9.0
        assert_eq!(unit.hp(), 10);

        let unit = unit.upgraded();
        assert_eq!(unit.star, 3);
        assert_eq!(unit.max_hp, 18);
        assert_eq!(unit.base_attack, 13); // 9 * 1.5 = 13.5
    }

    #[test]
    fn test_upgrade_clears_bonus_and_refills() {
        let mut unit = Unit::from_template(&momoi());
        unit.set_attack_bonus(1);
        unit.take_damage(4);
        let upgraded = unit.upgraded();
        assert_eq!(upgraded.attack_bonus(), 0);
        assert_eq!(upgraded.hp(), upgraded.max_hp);
    }

    #[test]
    fn test_damage_and_heal_are_clamped() {
        let mut unit = Unit::from_template(&momoi());
        assert_eq!(unit.take_damage(4), 4);
        assert_eq!(unit.hp(), 2);
        assert_eq!(unit.take_damage(100), 2);
        assert_eq!(unit.hp(), 0);
        assert!(!unit.is_alive());

        assert_eq!(unit.heal(3), 3);
        assert_eq!(unit.heal(100), 3);
        assert_eq!(unit.hp(), unit.max_hp);
    }

    #[test]
    fn test_set_hp_clamps() {
        let mut unit = Unit::from_template(&momoi());
        unit.set_hp(1000);
        assert_eq!(unit.hp(), 6);
    }

    #[test]
    fn test_bonus_is_replaced_not_added() {
        let mut unit = Unit::from_template(&momoi());
        unit.set_attack_bonus(1);
        unit.set_attack_bonus(1);
        assert_eq!(unit.effective_attack(), 7);
        unit.set_attack_bonus(0);
        assert_eq!(unit.effective_attack(), 6);
    }

    #[test]
    fn test_display() {
        let unit = Unit::from_template(&momoi());
        assert_eq!(unit.to_string(), "🟡Momoi★1 HP 6/6 ATK 6 [AOE-2] Millennium");
    }
}
