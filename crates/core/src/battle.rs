use std::collections::BTreeSet;

use crate::error::BattleError;
use crate::scenario::Scenario;
use crate::state::{BattleState, Unit};
use crate::types::*;

mod combat;
mod draw;
mod hash;
pub mod pathfinding;
mod turn;

#[cfg(test)]
mod test_support;

pub use combat::select_target;

/// One battle from the initial scenario to a finished (or stuck) state.
pub struct Battle {
    state: BattleState,
    rounds: u32,
    roster: Tally,
    status: BattleStatus,
    log: Vec<BattleEvent>,
    // Unit-state hashes seen at round boundaries since the last damage was dealt.
    quiet_states: BTreeSet<u64>,
}

impl Battle {
    pub fn new(scenario: &Scenario, overrides: &PowerOverrides) -> Result<Self, BattleError> {
        let state = scenario.instantiate(overrides)?;
        let mut roster = Tally::default();
        for unit in state.units.values() {
            roster.bump(unit.faction);
        }
        Ok(Self {
            state,
            rounds: 0,
            roster,
            status: BattleStatus::Running,
            log: Vec::new(),
            quiet_states: BTreeSet::new(),
        })
    }

    pub fn status(&self) -> &BattleStatus {
        &self.status
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds
    }

    pub fn log(&self) -> &[BattleEvent] {
        &self.log
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Living units in reading order.
    pub fn units(&self) -> Vec<&Unit> {
        self.state.reading_order().into_iter().map(|id| &self.state.units[id]).collect()
    }

    /// Plays one round. A round cut short by extinction is not counted.
    pub fn step_round(&mut self) -> &BattleStatus {
        if self.status != BattleStatus::Running {
            return &self.status;
        }
        if let Some(winner) = self.sole_faction() {
            self.finish(winner);
            return &self.status;
        }

        let order = self.state.reading_order();
        let hp_before = self.state.total_hit_points();
        for id in order {
            let Some(unit) = self.state.units.get(id) else {
                continue;
            };
            let faction = unit.faction;
            if self.take_turn(id) == turn::TurnOutcome::NoEnemies {
                self.finish(faction);
                return &self.status;
            }
        }
        let damage_dealt = self.state.total_hit_points() < hp_before;

        self.rounds += 1;
        self.log.push(BattleEvent::RoundCompleted { round: self.rounds });

        if let Some(winner) = self.sole_faction() {
            self.finish(winner);
        } else {
            self.watch_for_stalemate(damage_dealt);
        }
        &self.status
    }

    pub fn run_to_end(&mut self) -> Result<Outcome, BattleError> {
        loop {
            match self.step_round() {
                BattleStatus::Running => {}
                BattleStatus::Finished(outcome) => return Ok(*outcome),
                BattleStatus::Stalemated { rounds_completed } => {
                    return Err(BattleError::Stalemate { rounds: *rounds_completed });
                }
            }
        }
    }

    fn sole_faction(&self) -> Option<Faction> {
        let mut present =
            Faction::ALL.into_iter().filter(|faction| self.state.has_living(*faction));
        match (present.next(), present.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    fn finish(&mut self, winner: Faction) {
        let losses = Tally {
            elves: self.roster.elves - self.state.living(Faction::Elf),
            goblins: self.roster.goblins - self.state.living(Faction::Goblin),
        };
        let outcome = Outcome {
            rounds_completed: self.rounds,
            winner,
            remaining_hit_points: self.state.hit_points(winner),
            losses,
        };
        tracing::debug!(
            rounds = outcome.rounds_completed,
            %winner,
            remaining_hp = outcome.remaining_hit_points,
            "battle finished"
        );
        self.log.push(BattleEvent::Ended { rounds_completed: self.rounds, winner });
        self.status = BattleStatus::Finished(outcome);
    }

    // A round without damage cannot change hit points, so a repeated layout after
    // such rounds means the battle cycles forever.
    fn watch_for_stalemate(&mut self, damage_dealt: bool) {
        if damage_dealt {
            self.quiet_states.clear();
        }
        if !self.quiet_states.insert(self.units_hash()) {
            tracing::warn!(rounds = self.rounds, "battle state repeats without damage");
            self.log.push(BattleEvent::Stalemated { rounds_completed: self.rounds });
            self.status = BattleStatus::Stalemated { rounds_completed: self.rounds };
        }
    }
}

/// Plays a fresh copy of `scenario` to the end.
pub fn simulate(scenario: &Scenario, overrides: &PowerOverrides) -> Result<Outcome, BattleError> {
    Battle::new(scenario, overrides)?.run_to_end()
}
