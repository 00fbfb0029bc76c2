use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::error::UnknownFaction;

new_key_type! {
    pub struct UnitId;
}

/// A grid coordinate.
///
/// Field order is load-bearing: the derived `Ord` compares `y` first, then `x`,
/// which is reading order (top-to-bottom, then left-to-right). Every tie-break in
/// the simulator goes through this ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    /// Orthogonal neighbours, already in reading order.
    pub fn neighbors(self) -> [Pos; 4] {
        [
            Pos { y: self.y - 1, x: self.x },
            Pos { y: self.y, x: self.x - 1 },
            Pos { y: self.y, x: self.x + 1 },
            Pos { y: self.y + 1, x: self.x },
        ]
    }

    pub fn is_adjacent(self, other: Pos) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.y, self.x)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cell {
    Wall,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Elf,
    Goblin,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Faction::Elf, Faction::Goblin];

    pub fn enemy(self) -> Faction {
        match self {
            Faction::Elf => Faction::Goblin,
            Faction::Goblin => Faction::Elf,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Faction::Elf => 'E',
            Faction::Goblin => 'G',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Faction> {
        match glyph {
            'E' => Some(Faction::Elf),
            'G' => Some(Faction::Goblin),
            _ => None,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Faction::Elf => "Elves",
            Faction::Goblin => "Goblins",
        })
    }
}

impl FromStr for Faction {
    type Err = UnknownFaction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "e" | "elf" | "elves" => Ok(Faction::Elf),
            "g" | "goblin" | "goblins" => Ok(Faction::Goblin),
            _ => Err(UnknownFaction(s.to_string())),
        }
    }
}

/// Per-faction counter, used for rosters and casualties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    pub elves: u32,
    pub goblins: u32,
}

impl Tally {
    pub fn of(&self, faction: Faction) -> u32 {
        match faction {
            Faction::Elf => self.elves,
            Faction::Goblin => self.goblins,
        }
    }

    pub fn bump(&mut self, faction: Faction) {
        match faction {
            Faction::Elf => self.elves += 1,
            Faction::Goblin => self.goblins += 1,
        }
    }
}

/// Baseline stats handed to every unit read from a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub hit_points: i32,
    pub attack_power: i32,
}

impl Default for Rules {
    fn default() -> Self {
        Self { hit_points: 200, attack_power: 3 }
    }
}

/// Attack power replacements applied to a whole faction for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerOverrides {
    pub elf: Option<i32>,
    pub goblin: Option<i32>,
}

impl PowerOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, faction: Faction, power: i32) -> Self {
        match faction {
            Faction::Elf => self.elf = Some(power),
            Faction::Goblin => self.goblin = Some(power),
        }
        self
    }

    pub fn get(&self, faction: Faction) -> Option<i32> {
        match faction {
            Faction::Elf => self.elf,
            Faction::Goblin => self.goblin,
        }
    }
}

/// Terminal result of one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Full rounds only; the round in which the last enemy fell is not counted
    /// unless every unit in it got its turn.
    pub rounds_completed: u32,
    pub winner: Faction,
    pub remaining_hit_points: i32,
    pub losses: Tally,
}

impl Outcome {
    pub fn score(&self) -> i64 {
        i64::from(self.rounds_completed) * i64::from(self.remaining_hit_points)
    }

    pub fn flawless_for(&self, faction: Faction) -> bool {
        self.winner == faction && self.losses.of(faction) == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleStatus {
    Running,
    Finished(Outcome),
    Stalemated { rounds_completed: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleEvent {
    Moved { unit: UnitId, from: Pos, to: Pos },
    Attacked { attacker: UnitId, target: UnitId, damage: i32, remaining_hp: i32 },
    Died { unit: UnitId, faction: Faction, pos: Pos },
    RoundCompleted { round: u32 },
    Ended { rounds_completed: u32, winner: Faction },
    Stalemated { rounds_completed: u32 },
}
