//! Stable snapshot hashing for deterministic verification.
//! This module keeps hashing separate from the round loop that consumes it.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

impl Battle {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u32(self.rounds);
        hasher.write_u8(match self.status {
            BattleStatus::Running => 0,
            BattleStatus::Finished(_) => 1,
            BattleStatus::Stalemated { .. } => 2,
        });
        self.write_units(&mut hasher);
        hasher.finish()
    }

    pub(super) fn units_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        self.write_units(&mut hasher);
        hasher.finish()
    }

    fn write_units(&self, hasher: &mut Xxh3) {
        for id in self.state.reading_order() {
            let unit = &self.state.units[id];
            hasher.write_i32(unit.pos.y);
            hasher.write_i32(unit.pos.x);
            hasher.write_u8(match unit.faction {
                Faction::Elf => 0,
                Faction::Goblin => 1,
            });
            hasher.write_i32(unit.hp);
            hasher.write_i32(unit.attack_power);
        }
    }
}
