//! Single-unit turn procedure: attack if adjacent, otherwise step and try again.

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TurnOutcome {
    /// No enemy is alive anywhere; the round stops here.
    NoEnemies,
    Attacked,
    Moved,
    MovedAndAttacked,
    Idle,
}

impl Battle {
    pub(super) fn take_turn(&mut self, id: UnitId) -> TurnOutcome {
        let unit = &self.state.units[id];
        let (origin, enemy) = (unit.pos, unit.faction.enemy());

        if !self.state.has_living(enemy) {
            return TurnOutcome::NoEnemies;
        }
        if self.attack_adjacent(id) {
            return TurnOutcome::Attacked;
        }

        let in_range = self.state.in_range_cells(enemy);
        if in_range.is_empty() {
            return TurnOutcome::Idle;
        }
        let Some(step) = pathfinding::choose_step(&self.state.grid, origin, &in_range) else {
            return TurnOutcome::Idle;
        };

        self.state
            .grid
            .move_unit(origin, step)
            .expect("pathfinder only proposes free cells next to the mover");
        self.state.units[id].pos = step;
        self.log.push(BattleEvent::Moved { unit: id, from: origin, to: step });

        if self.attack_adjacent(id) { TurnOutcome::MovedAndAttacked } else { TurnOutcome::Moved }
    }
}
