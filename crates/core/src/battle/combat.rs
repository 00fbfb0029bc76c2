//! Adjacent-target selection and damage application.
//! This module resolves one attack; it does not decide whether a unit moves first.

use super::*;

/// Adjacent enemy with the fewest hit points, ties broken by reading order of its cell.
pub fn select_target(state: &BattleState, attacker: UnitId) -> Option<UnitId> {
    let attacker = &state.units[attacker];
    state
        .grid
        .neighbors(attacker.pos)
        .filter_map(|pos| state.grid.occupant(pos))
        .map(|id| &state.units[id])
        .filter(|candidate| candidate.faction != attacker.faction)
        .min_by_key(|candidate| (candidate.hp, candidate.pos))
        .map(|candidate| candidate.id)
}

impl Battle {
    /// Returns whether an attack happened.
    pub(super) fn attack_adjacent(&mut self, attacker: UnitId) -> bool {
        let Some(target) = select_target(&self.state, attacker) else {
            return false;
        };
        let damage = self.state.units[attacker].attack_power;

        let victim = self.state.units.get_mut(target).expect("selected target must be alive");
        victim.hp -= damage;
        let (remaining_hp, pos, faction) = (victim.hp, victim.pos, victim.faction);
        self.log.push(BattleEvent::Attacked { attacker, target, damage, remaining_hp });

        if remaining_hp <= 0 {
            let cleared = self.state.grid.remove(pos);
            assert_eq!(cleared, Some(target), "occupancy out of sync with dying unit");
            self.state.units.remove(target);
            self.log.push(BattleEvent::Died { unit: target, faction, pos });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::test_support::*;

    #[test]
    fn weakest_adjacent_enemy_is_hit_with_reading_order_tie_break() {
        // Elf at (2, 2) has goblins above (4 hp), right (2 hp), and below (2 hp).
        let mut scenario = scenario_from(&["G....", "..G..", "..EG.", "..G..", "...G."]);
        set_hp(&mut scenario, Pos::new(0, 0), 9);
        set_hp(&mut scenario, Pos::new(1, 2), 4);
        set_hp(&mut scenario, Pos::new(2, 3), 2);
        set_hp(&mut scenario, Pos::new(3, 2), 2);
        set_hp(&mut scenario, Pos::new(4, 3), 1);
        let battle = Battle::new(&scenario, &PowerOverrides::none()).unwrap();
        let elf = unit_at(&battle, Pos::new(2, 2));

        let target = select_target(battle.state(), elf).expect("elf has adjacent enemies");
        assert_eq!(battle.state().units[target].pos, Pos::new(2, 3));
    }

    #[test]
    fn lethal_hit_clears_occupancy_and_logs_death() {
        let mut scenario = scenario_from(&["#####", "#EG.#", "#####"]);
        set_hp(&mut scenario, Pos::new(1, 2), 3);
        let mut battle = Battle::new(&scenario, &PowerOverrides::none()).unwrap();
        let elf = unit_at(&battle, Pos::new(1, 1));
        let goblin = unit_at(&battle, Pos::new(1, 2));

        assert!(battle.attack_adjacent(elf));
        assert!(battle.state().grid.is_free(Pos::new(1, 2)));
        assert!(!battle.state().units.contains_key(goblin));
        assert!(battle.state().occupancy_is_consistent());
        assert_eq!(
            battle.log().last(),
            Some(&BattleEvent::Died { unit: goblin, faction: Faction::Goblin, pos: Pos::new(1, 2) })
        );
    }

    #[test]
    fn allies_are_never_targeted() {
        let scenario = scenario_from(&["#####", "#EE.#", "#####"]);
        let mut battle = Battle::new(&scenario, &PowerOverrides::none()).unwrap();
        let elf = unit_at(&battle, Pos::new(1, 1));

        assert_eq!(select_target(battle.state(), elf), None);
        assert!(!battle.attack_adjacent(elf));
    }
}
