//! Shared fixtures for the `battle` submodule test suites.
//! It does not own production battle logic.

use super::*;

pub(crate) fn scenario_from(rows: &[&str]) -> Scenario {
    rows.join("\n").parse().expect("fixture map should parse")
}

pub(crate) fn set_hp(scenario: &mut Scenario, pos: Pos, hp: i32) {
    scenario.unit_at_mut(pos).expect("fixture has a unit at pos").hit_points = hp;
}

pub(crate) fn unit_at(battle: &Battle, pos: Pos) -> UnitId {
    battle.state().grid.occupant(pos).expect("fixture has a unit at pos")
}

pub(crate) fn run_rounds(battle: &mut Battle, rounds: u32) {
    for _ in 0..rounds {
        battle.step_round();
    }
}
