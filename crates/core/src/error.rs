//! Error taxonomy for map construction, battle setup, and the power search.
//! Invariant breaches inside a running battle are not represented here; they panic.

use thiserror::Error;

use crate::types::{Faction, Pos, UnitId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("map is empty")]
    Empty,
    #[error("unknown map character {glyph:?} at row {row}, column {column}")]
    UnknownCharacter { row: usize, column: usize, glyph: char },
    #[error("row {row} has width {found}, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("map contains no units")]
    NoUnits,
    #[error("starting hit points must be at least 1, got {0}")]
    HitPoints(i32),
    #[error("attack power must be at least 1, got {0}")]
    AttackPower(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {pos} is a wall")]
    Wall { pos: Pos },
    #[error("cell {pos} is already occupied")]
    Occupied { pos: Pos, by: UnitId },
    #[error("no unit stands on {pos}")]
    Vacant { pos: Pos },
    #[error("cell {pos} is outside the grid")]
    OutOfBounds { pos: Pos },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("invalid unit placement: {0}")]
    Placement(#[from] GridError),
    #[error("unit at {pos} starts with {hit_points} hit points")]
    HitPoints { pos: Pos, hit_points: i32 },
    #[error("{faction} attack power must be at least 1, got {power}")]
    AttackPower { faction: Faction, power: i32 },
    #[error("battle cannot finish; state repeats after {rounds} rounds")]
    Stalemate { rounds: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("{0} are not present on the map")]
    FactionAbsent(Faction),
    #[error("no attack power up to {max_power} wins without losses")]
    Exhausted { max_power: i32 },
    #[error(transparent)]
    Battle(#[from] BattleError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown faction {0:?}; expected elf or goblin")]
pub struct UnknownFaction(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy {0:?}; expected linear, bracketed or parallel")]
pub struct UnknownStrategy(pub String);
