//! Turn resolution
//!
//! Each round every living unit of the first side acts in lineup order, then
//! every living unit of the other side. Liveness is checked when a unit's
//! turn comes up, so a unit killed earlier in the round does not act. The
//! round ends with a terminal check: a wiped side loses, two wiped sides
//! draw.

use super::event::{BattleEvent, BattleState, Side, UnitRef};
use super::result::BattleReport;
use crate::config::{BattleConstants, GameConstants, Initiative, SynergyConstants};
use crate::damage::{calculate_hit, support_amount, ElementChart};
use crate::synergy::apply_synergy;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use unit_core::{SkillKind, Unit};

/// A battle between two deployed lineups
#[derive(Debug, Clone)]
pub struct Battle {
    teams: [Vec<Unit>; 2],
    chart: ElementChart,
    rules: BattleConstants,
    round: u32,
    state: BattleState,
    events: Vec<BattleEvent>,
}

impl Battle {
    /// Set up a battle, applying synergy to both lineups.
    ///
    /// Units fight with the HP they arrive with; `Roster::deploy` is what
    /// refills them. A side that starts without living units loses
    /// immediately.
    pub fn new(team1: Vec<Unit>, team2: Vec<Unit>, constants: &GameConstants) -> Self {
        Self::with_rules(
            team1,
            team2,
            ElementChart::new(&constants.elements),
            &constants.synergy,
            constants.battle.clone(),
        )
    }

    pub fn with_rules(
        mut team1: Vec<Unit>,
        mut team2: Vec<Unit>,
        chart: ElementChart,
        synergy: &SynergyConstants,
        rules: BattleConstants,
    ) -> Self {
        let synergies1 = apply_synergy(&mut team1, synergy);
        let synergies2 = apply_synergy(&mut team2, synergy);

        let mut battle = Battle {
            teams: [team1, team2],
            chart,
            rules,
            round: 0,
            state: BattleState::Ongoing,
            events: vec![
                BattleEvent::SynergyApplied {
                    side: Side::Team1,
                    synergies: synergies1,
                },
                BattleEvent::SynergyApplied {
                    side: Side::Team2,
                    synergies: synergies2,
                },
            ],
        };

        let initial = battle.evaluate();
        if initial.is_finished() {
            battle.finish(initial);
        }
        battle
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Rounds fought so far
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn team(&self, side: Side) -> &[Unit] {
        &self.teams[side.index()]
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Resolve one round. Does nothing once the battle is over.
    pub fn step_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BattleState {
        if self.state.is_finished() {
            return self.state;
        }

        self.round += 1;
        self.events.push(BattleEvent::RoundStart { round: self.round });

        for side in self.turn_order() {
            for slot in 0..self.teams[side.index()].len() {
                self.act(UnitRef::new(side, slot), rng);
            }
        }

        let outcome = self.evaluate();
        if outcome.is_finished() {
            self.finish(outcome);
        } else if self.round >= self.rules.max_rounds {
            tracing::warn!(rounds = self.round, "battle hit the round cap, forcing a draw");
            self.events.push(BattleEvent::RoundCapReached { round: self.round });
            self.finish(BattleState::Draw);
        }
        self.state
    }

    /// Resolve rounds until the battle ends
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> BattleReport {
        while !self.state.is_finished() {
            self.step_round(rng);
        }
        self.into_report()
    }

    pub fn into_report(self) -> BattleReport {
        let [team1, team2] = self.teams;
        BattleReport {
            outcome: self.state,
            rounds: self.round,
            team1,
            team2,
            events: self.events,
        }
    }

    fn turn_order(&self) -> [Side; 2] {
        match self.rules.initiative {
            Initiative::Alternating if self.round % 2 == 0 => [Side::Team2, Side::Team1],
            Initiative::Fixed | Initiative::Alternating => [Side::Team1, Side::Team2],
        }
    }

    fn evaluate(&self) -> BattleState {
        match (self.has_living(Side::Team1), self.has_living(Side::Team2)) {
            (true, true) => BattleState::Ongoing,
            (true, false) => BattleState::Team1Wins,
            (false, true) => BattleState::Team2Wins,
            (false, false) => BattleState::Draw,
        }
    }

    fn finish(&mut self, state: BattleState) {
        self.state = state;
        self.events.push(BattleEvent::BattleEnd {
            state,
            rounds: self.round,
        });
        tracing::info!(outcome = ?state, rounds = self.round, "battle finished");
    }

    fn has_living(&self, side: Side) -> bool {
        self.teams[side.index()].iter().any(|u| u.is_alive())
    }

    fn living(&self, side: Side) -> Vec<UnitRef> {
        self.teams[side.index()]
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_alive())
            .map(|(slot, _)| UnitRef::new(side, slot))
            .collect()
    }

    fn unit(&self, unit: UnitRef) -> &Unit {
        &self.teams[unit.side.index()][unit.slot]
    }

    fn unit_mut(&mut self, unit: UnitRef) -> &mut Unit {
        &mut self.teams[unit.side.index()][unit.slot]
    }

    fn act<R: Rng + ?Sized>(&mut self, actor: UnitRef, rng: &mut R) {
        if !self.unit(actor).is_alive() {
            return;
        }
        let enemies = self.living(actor.side.opponent());
        if enemies.is_empty() {
            return;
        }

        let attacker = self.unit(actor).clone();
        if attacker.skill.is_support() {
            self.support(actor, &attacker);
        }
        if attacker.skill.replaces_basic_attack() {
            self.area_attack(actor, &attacker, enemies, rng);
        } else {
            self.basic_attack(actor, &attacker, &enemies, rng);
        }
    }

    /// Shield restores the caster, heal every living ally
    fn support(&mut self, actor: UnitRef, attacker: &Unit) {
        let targets = match attacker.skill {
            SkillKind::Shield => vec![actor],
            SkillKind::Heal => self.living(actor.side),
            _ => return,
        };
        self.cast(actor, attacker.skill, targets.clone());
        let amount = support_amount(attacker.effective_attack());
        for target in targets {
            self.restore(actor, target, amount);
        }
    }

    /// AOE-all splits two ways over every enemy; AOE-k picks up to k
    /// distinct enemies and always splits k ways
    fn area_attack<R: Rng + ?Sized>(
        &mut self,
        actor: UnitRef,
        attacker: &Unit,
        enemies: Vec<UnitRef>,
        rng: &mut R,
    ) {
        let (targets, ways) = match attacker.skill {
            SkillKind::AoeAll => (enemies, 2),
            SkillKind::AoeRandom(k) => {
                let k = k.max(1);
                let amount = (k as usize).min(enemies.len());
                let mut picked: Vec<usize> = index::sample(rng, enemies.len(), amount).into_vec();
                picked.sort_unstable();
                (picked.into_iter().map(|i| enemies[i]).collect(), k)
            }
            _ => return,
        };

        self.cast(actor, attacker.skill, targets.clone());
        for target in targets {
            self.strike(actor, attacker, target, ways);
        }
    }

    fn cast(&mut self, actor: UnitRef, skill: SkillKind, targets: Vec<UnitRef>) {
        self.events.push(BattleEvent::SkillCast {
            actor,
            skill,
            targets,
        });
    }

    fn basic_attack<R: Rng + ?Sized>(
        &mut self,
        actor: UnitRef,
        attacker: &Unit,
        enemies: &[UnitRef],
        rng: &mut R,
    ) {
        if let Some(&target) = enemies.choose(rng) {
            self.strike(actor, attacker, target, 1);
        }
    }

    /// Deal the attacker's elemental hit to `target`, divided `ways` ways
    fn strike(&mut self, actor: UnitRef, attacker: &Unit, target: UnitRef, ways: u32) {
        let hit = calculate_hit(attacker, self.unit(target), &self.chart);
        let damage = hit.split(ways);

        let defender = self.unit_mut(target);
        defender.take_damage(damage);
        let remaining_hp = defender.hp();

        tracing::trace!(?actor, ?target, damage, remaining_hp, "hit");
        self.events.push(BattleEvent::Damage {
            actor,
            target,
            damage,
            effectiveness: hit.effectiveness,
            remaining_hp,
        });
        if remaining_hp == 0 {
            self.events.push(BattleEvent::Defeated { unit: target });
        }
    }

    fn restore(&mut self, actor: UnitRef, target: UnitRef, amount: u32) {
        let unit = self.unit_mut(target);
        let restored = unit.heal(amount);
        let hp = unit.hp();
        self.events.push(BattleEvent::Restore {
            actor,
            target,
            amount: restored,
            hp,
        });
    }
}

/// Resolve a full battle between two lineups
pub fn resolve_battle<R: Rng + ?Sized>(
    team1: Vec<Unit>,
    team2: Vec<Unit>,
    constants: &GameConstants,
    rng: &mut R,
) -> BattleReport {
    Battle::new(team1, team2, constants).run(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ElementConstants;
    use crate::damage::Effectiveness;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shop_core::UnitCatalog;
    use unit_core::{Element, UnitTemplate};

    fn unit(name: &str, element: Element, hp: u32, attack: u32, skill: SkillKind) -> Unit {
        Unit::from_template(&UnitTemplate {
            name: name.to_string(),
            cost: 3,
            max_hp: hp,
            attack,
            skill,
            school: name.to_string(),
            element,
        })
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(2024)
    }

    fn damage_events(events: &[BattleEvent]) -> Vec<(UnitRef, UnitRef, u32)> {
        events
            .iter()
            .filter_map(|e| match e {
                BattleEvent::Damage {
                    actor,
                    target,
                    damage,
                    ..
                } => Some((*actor, *target, *damage)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_one_hit_kill_wins_in_one_round() {
        let team1 = vec![unit("Hina", Element::Red, 5, 6, SkillKind::None)];
        let team2 = vec![unit("Iori", Element::Yellow, 3, 1, SkillKind::None)];

        let report = resolve_battle(team1, team2, &GameConstants::default(), &mut rng());
        assert_eq!(report.outcome, BattleState::Team1Wins);
        assert_eq!(report.rounds, 1);
        assert_eq!(report.team1[0].hp(), 5);
        assert!(!report.team2[0].is_alive());
        assert!(report
            .events()
            .any(|e| *e == BattleEvent::Defeated { unit: UnitRef::new(Side::Team2, 0) }));
    }

    #[test]
    fn test_dead_units_do_not_act() {
        let team1 = vec![unit("Hina", Element::Red, 5, 6, SkillKind::None)];
        let team2 = vec![
            unit("Iori", Element::Yellow, 3, 1, SkillKind::None),
            unit("Mika", Element::Yellow, 30, 1, SkillKind::None),
        ];
        let mut battle = Battle::new(team1, team2, &GameConstants::default());
        let mut rng = rng();
        battle.step_round(&mut rng);

        // Whichever Team 2 unit was hit, the living one must retaliate alone
        let hits = damage_events(battle.events());
        let team2_hits: Vec<_> = hits.iter().filter(|(a, _, _)| a.side == Side::Team2).collect();
        let living_team2 = battle.team(Side::Team2).iter().filter(|u| u.is_alive()).count();
        assert_eq!(team2_hits.len(), living_team2);
        for (actor, _, _) in team2_hits {
            assert!(battle.team(Side::Team2)[actor.slot].is_alive());
        }
    }

    #[test]
    fn test_no_action_without_living_enemies() {
        let team1 = vec![
            unit("Hina", Element::Red, 5, 6, SkillKind::None),
            unit("Mika", Element::Red, 5, 6, SkillKind::Heal),
        ];
        let team2 = vec![unit("Iori", Element::Yellow, 3, 1, SkillKind::None)];

        let report = resolve_battle(team1, team2, &GameConstants::default(), &mut rng());
        assert_eq!(report.outcome, BattleState::Team1Wins);
        assert_eq!(damage_events(&report.events).len(), 1);
        assert!(!report
            .events()
            .any(|e| matches!(e, BattleEvent::SkillCast { .. })));
    }

    #[test]
    fn test_aoe_all_halves_damage_on_every_enemy() {
        let mut constants = GameConstants::default();
        constants.elements = ElementConstants {
            advantage: 1.0,
            ..ElementConstants::default()
        };
        let team1 = vec![unit("Hanako", Element::Red, 50, 6, SkillKind::AoeAll)];
        let team2 = vec![
            unit("Iori", Element::Yellow, 10, 1, SkillKind::None),
            unit("Mika", Element::Yellow, 10, 1, SkillKind::None),
        ];

        let mut battle = Battle::new(team1, team2, &constants);
        battle.step_round(&mut rng());

        let hits: Vec<_> = damage_events(battle.events())
            .into_iter()
            .filter(|(a, _, _)| a.side == Side::Team1)
            .collect();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|(_, _, d)| *d == 3));
        assert!(battle.team(Side::Team2).iter().all(|u| u.hp() == 7));
    }

    #[test]
    fn test_aoe_random_hits_distinct_targets() {
        let team1 = vec![unit("Momoi", Element::Yellow, 50, 6, SkillKind::AoeRandom(2))];
        let team2 = vec![
            unit("A", Element::Blue, 40, 1, SkillKind::None),
            unit("B", Element::Blue, 40, 1, SkillKind::None),
            unit("C", Element::Blue, 40, 1, SkillKind::None),
        ];

        let mut battle = Battle::new(team1, team2, &GameConstants::default());
        let mut rng = rng();
        for _ in 0..5 {
            let start = battle.events().len();
            battle.step_round(&mut rng);
            let hits: Vec<_> = damage_events(&battle.events()[start..])
                .into_iter()
                .filter(|(a, _, _)| a.side == Side::Team1)
                .collect();
            assert_eq!(hits.len(), 2);
            assert_ne!(hits[0].1, hits[1].1);
            // Yellow beats Blue: floor(6 * 2.0) / 2
            assert!(hits.iter().all(|(_, _, d)| *d == 6));
        }
    }

    #[test]
    fn test_aoe_random_divides_by_k_not_by_targets() {
        let team1 = vec![unit("Alice", Element::Blue, 50, 6, SkillKind::AoeRandom(3))];
        let team2 = vec![unit("Hina", Element::Red, 40, 1, SkillKind::None)];

        let mut battle = Battle::new(team1, team2, &GameConstants::default());
        battle.step_round(&mut rng());

        let hits = damage_events(battle.events());
        // Blue beats Red: floor(6 * 2.0) / 3 = 4
        assert_eq!(hits[0], (UnitRef::new(Side::Team1, 0), UnitRef::new(Side::Team2, 0), 4));
    }

    #[test]
    fn test_shield_restores_then_attacks() {
        let mut yuuka = unit("Yuuka", Element::Red, 15, 3, SkillKind::Shield);
        yuuka.set_hp(5);
        let team2 = vec![unit("Shiroko", Element::Red, 40, 1, SkillKind::None)];

        let mut battle = Battle::new(vec![yuuka], team2, &GameConstants::default());
        battle.step_round(&mut rng());

        let actor = UnitRef::new(Side::Team1, 0);
        let own: Vec<&BattleEvent> = battle
            .events()
            .iter()
            .filter(|e| match e {
                BattleEvent::SkillCast { actor: a, .. }
                | BattleEvent::Restore { actor: a, .. }
                | BattleEvent::Damage { actor: a, .. } => *a == actor,
                _ => false,
            })
            .collect();

        assert_eq!(own.len(), 3);
        assert!(matches!(own[0], BattleEvent::SkillCast { skill: SkillKind::Shield, .. }));
        assert_eq!(
            *own[1],
            BattleEvent::Restore {
                actor,
                target: actor,
                amount: 1,
                hp: 6
            }
        );
        // Same element: floor(3 * 2.0)
        assert!(matches!(
            own[2],
            BattleEvent::Damage { damage: 6, effectiveness: Effectiveness::Effective, .. }
        ));
    }

    #[test]
    fn test_heal_skips_dead_allies() {
        let koharu = unit("Koharu", Element::Red, 6, 4, SkillKind::Heal);
        let mut hurt = unit("Mika", Element::Yellow, 10, 1, SkillKind::None);
        hurt.set_hp(4);
        let mut fallen = unit("Hina", Element::Red, 8, 9, SkillKind::None);
        fallen.set_hp(0);
        let team2 = vec![unit("Natsu", Element::Blue, 60, 1, SkillKind::None)];

        let mut battle = Battle::new(vec![koharu, hurt, fallen], team2, &GameConstants::default());
        battle.step_round(&mut rng());

        let healed: Vec<(usize, u32)> = battle
            .events()
            .iter()
            .filter_map(|e| match e {
                BattleEvent::Restore { target, amount, .. } => Some((target.slot, *amount)),
                _ => None,
            })
            .collect();
        // The healer starts at full HP so gains nothing
        assert_eq!(healed, vec![(0, 0), (1, 2)]);
        assert_eq!(battle.team(Side::Team1)[2].hp(), 0);
    }

    #[test]
    fn test_construction_keeps_given_hp() {
        let mut yuuka = unit("Yuuka", Element::Red, 15, 3, SkillKind::Shield);
        yuuka.set_hp(5);
        let team2 = vec![unit("Shiroko", Element::Red, 40, 1, SkillKind::None)];

        let battle = Battle::new(vec![yuuka], team2, &GameConstants::default());
        assert_eq!(battle.team(Side::Team1)[0].hp(), 5);
        assert_eq!(battle.team(Side::Team2)[0].hp(), 40);
        assert_eq!(battle.state(), BattleState::Ongoing);
    }

    #[test]
    fn test_empty_lineups() {
        let constants = GameConstants::default();
        let one = vec![unit("Hina", Element::Red, 8, 9, SkillKind::None)];

        let report = resolve_battle(Vec::new(), one.clone(), &constants, &mut rng());
        assert_eq!(report.outcome, BattleState::Team2Wins);
        assert_eq!(report.rounds, 0);

        let report = resolve_battle(one, Vec::new(), &constants, &mut rng());
        assert_eq!(report.outcome, BattleState::Team1Wins);

        let report = resolve_battle(Vec::new(), Vec::new(), &constants, &mut rng());
        assert_eq!(report.outcome, BattleState::Draw);
        assert_eq!(report.rounds().count(), 0);
    }

    #[test]
    fn test_round_cap_forces_draw() {
        let mut constants = GameConstants::default();
        constants.elements = ElementConstants {
            advantage: 0.0,
            disadvantage: 0.0,
            same_element: 0.0,
        };
        constants.battle.max_rounds = 10;

        let team1 = vec![unit("Yuuka", Element::Red, 15, 3, SkillKind::Shield)];
        let team2 = vec![unit("Hoshino", Element::Yellow, 14, 4, SkillKind::Shield)];

        let report = resolve_battle(team1, team2, &constants, &mut rng());
        assert_eq!(report.outcome, BattleState::Draw);
        assert_eq!(report.rounds, 10);
        assert!(report
            .events()
            .any(|e| *e == BattleEvent::RoundCapReached { round: 10 }));
    }

    #[test]
    fn test_alternating_initiative() {
        let mut constants = GameConstants::default();
        constants.battle.initiative = Initiative::Alternating;
        let team1 = vec![unit("Yuuka", Element::Red, 100, 1, SkillKind::None)];
        let team2 = vec![unit("Natsu", Element::Blue, 100, 1, SkillKind::None)];

        let mut battle = Battle::new(team1, team2, &constants);
        let mut rng = rng();
        battle.step_round(&mut rng);
        battle.step_round(&mut rng);

        let report = battle.into_report();
        let first_actors: Vec<Side> = report
            .rounds()
            .map(|round| damage_events(round)[0].0.side)
            .collect();
        assert_eq!(first_actors, vec![Side::Team1, Side::Team2]);
    }

    #[test]
    fn test_synergy_applied_at_start() {
        let mut iori = unit("Iori", Element::Yellow, 60, 4, SkillKind::None);
        iori.school = "Gehenna".to_string();
        let mut hina = unit("Hina", Element::Red, 60, 9, SkillKind::None);
        hina.school = "Gehenna".to_string();
        let team2 = vec![unit("Mizu", Element::Yellow, 60, 5, SkillKind::None)];

        let battle = Battle::new(vec![iori, hina], team2, &GameConstants::default());
        assert_eq!(battle.team(Side::Team1)[0].effective_attack(), 5);
        assert_eq!(battle.team(Side::Team1)[1].effective_attack(), 10);
        assert_eq!(battle.team(Side::Team2)[0].effective_attack(), 5);
        assert!(matches!(
            &battle.events()[0],
            BattleEvent::SynergyApplied { side: Side::Team1, synergies } if synergies.len() == 1
        ));
    }

    #[test]
    fn test_seeded_battles_replay_identically() {
        let catalog = UnitCatalog::builtin().unwrap();
        let lineup = |names: &[&str]| -> Vec<Unit> {
            names
                .iter()
                .map(|n| Unit::from_template(catalog.get(n).unwrap()))
                .collect()
        };
        let team1 = lineup(&["Momoi", "Yuuka", "Alice", "Koharu", "Hanako"]);
        let team2 = lineup(&["Hina", "Mutsuki", "Iroha", "Hoshino", "Mizu"]);
        let constants = GameConstants::default();

        let a = resolve_battle(
            team1.clone(),
            team2.clone(),
            &constants,
            &mut ChaCha8Rng::seed_from_u64(99),
        );
        let b = resolve_battle(team1, team2, &constants, &mut ChaCha8Rng::seed_from_u64(99));

        assert_eq!(
            serde_json::to_string(&a.events).unwrap(),
            serde_json::to_string(&b.events).unwrap()
        );
        assert_eq!(a.outcome, b.outcome);
        assert!(a.outcome.is_finished());
        assert_eq!(a.rounds().count() as u32, a.rounds);
    }

    fn skill_from(index: u8) -> SkillKind {
        match index % 7 {
            0 => SkillKind::None,
            1 => SkillKind::SingleTarget,
            2 => SkillKind::AoeAll,
            3 => SkillKind::AoeRandom(2),
            4 => SkillKind::AoeRandom(3),
            5 => SkillKind::Shield,
            _ => SkillKind::Heal,
        }
    }

    fn arb_lineup() -> impl Strategy<Value = Vec<Unit>> {
        proptest::collection::vec((1u32..30, 1u32..12, 0u8..7, 0usize..3), 0..6).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (hp, attack, skill, element))| {
                        unit(
                            &format!("U{}", i % 3),
                            Element::all()[element],
                            hp,
                            attack,
                            skill_from(skill),
                        )
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_hp_stays_in_bounds(team1 in arb_lineup(), team2 in arb_lineup(), seed in any::<u64>()) {
            let report = resolve_battle(
                team1,
                team2,
                &GameConstants::default(),
                &mut ChaCha8Rng::seed_from_u64(seed),
            );

            prop_assert!(report.outcome.is_finished());
            for unit in report.team1.iter().chain(report.team2.iter()) {
                prop_assert!(unit.hp() <= unit.max_hp);
            }
            for event in report.events() {
                if let BattleEvent::Damage { target, remaining_hp, .. } = event {
                    let max_hp = report.unit(*target).map(|u| u.max_hp).unwrap_or(0);
                    prop_assert!(*remaining_hp <= max_hp);
                }
            }
        }
    }
}
