//! Map text to initial battle configuration.
//! This module exists so every run can start from the same immutable description.
//! It does not own any battle progression; `instantiate` hands out fresh copies.

use std::str::FromStr;

use slotmap::SlotMap;

use crate::error::{BattleError, ParseError};
use crate::state::{BattleState, Grid, Unit};
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSpec {
    pub pos: Pos,
    pub faction: Faction,
    pub hit_points: i32,
    pub attack_power: i32,
}

/// Initial cave layout and combatants, before any round has been played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    pub grid: Grid,
    pub units: Vec<UnitSpec>,
}

impl Scenario {
    pub fn parse(text: &str, rules: &Rules) -> Result<Self, ParseError> {
        if rules.hit_points < 1 {
            return Err(ParseError::HitPoints(rules.hit_points));
        }
        if rules.attack_power < 1 {
            return Err(ParseError::AttackPower(rules.attack_power));
        }
        let mut rows: Vec<&str> = text.lines().map(str::trim_end).collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        let Some(width) = rows.first().map(|row| row.chars().count()) else {
            return Err(ParseError::Empty);
        };
        if width == 0 {
            return Err(ParseError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut units = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::Ragged { row, expected: width, found });
            }
            for (column, glyph) in line.chars().enumerate() {
                let cell = match glyph {
                    '#' => Cell::Wall,
                    '.' => Cell::Open,
                    _ => {
                        let Some(faction) = Faction::from_glyph(glyph) else {
                            return Err(ParseError::UnknownCharacter { row, column, glyph });
                        };
                        units.push(UnitSpec {
                            pos: Pos { y: row as i32, x: column as i32 },
                            faction,
                            hit_points: rules.hit_points,
                            attack_power: rules.attack_power,
                        });
                        Cell::Open
                    }
                };
                cells.push(cell);
            }
        }
        if units.is_empty() {
            return Err(ParseError::NoUnits);
        }

        Ok(Self { grid: Grid::new(width, rows.len(), cells), units })
    }

    pub fn count(&self, faction: Faction) -> usize {
        self.units.iter().filter(|unit| unit.faction == faction).count()
    }

    /// Strongest attack power among `faction`'s units, if it fields any.
    pub fn baseline_power(&self, faction: Faction) -> Option<i32> {
        self.units.iter().filter(|unit| unit.faction == faction).map(|unit| unit.attack_power).max()
    }

    pub fn unit_at_mut(&mut self, pos: Pos) -> Option<&mut UnitSpec> {
        self.units.iter_mut().find(|unit| unit.pos == pos)
    }

    /// Deep copy with overrides applied and occupancy filled in.
    ///
    /// Units must start alive and hit for at least one point.
    pub fn instantiate(&self, overrides: &PowerOverrides) -> Result<BattleState, BattleError> {
        let mut grid = self.grid.clone();
        let mut units = SlotMap::with_key();
        for spec in &self.units {
            if spec.hit_points < 1 {
                return Err(BattleError::HitPoints { pos: spec.pos, hit_points: spec.hit_points });
            }
            let attack_power = overrides.get(spec.faction).unwrap_or(spec.attack_power);
            if attack_power < 1 {
                return Err(BattleError::AttackPower { faction: spec.faction, power: attack_power });
            }
            let id = units.insert(Unit {
                id: UnitId::default(),
                faction: spec.faction,
                pos: spec.pos,
                hp: spec.hit_points,
                attack_power,
            });
            units[id].id = id;
            grid.place(id, spec.pos)?;
        }
        Ok(BattleState { grid, units })
    }
}

impl FromStr for Scenario {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &Rules::default())
    }
}
