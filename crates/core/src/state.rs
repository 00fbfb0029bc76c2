use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::error::GridError;
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub faction: Faction,
    pub pos: Pos,
    pub hp: i32,
    pub attack_power: i32,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Static cave layout plus the occupancy view of living units.
///
/// Bounds are fixed at construction; indexing outside them panics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    occupancy: Vec<Option<UnitId>>,
}

impl Grid {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), width * height, "cell buffer must match grid dimensions");
        Self { width, height, cells, occupancy: vec![None; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.cell(pos) == Cell::Open
    }

    /// Open and not standing room for anybody else.
    pub fn is_free(&self, pos: Pos) -> bool {
        self.is_open(pos) && self.occupant(pos).is_none()
    }

    pub fn occupant(&self, pos: Pos) -> Option<UnitId> {
        self.occupancy[self.index(pos)]
    }

    /// In-bounds orthogonal neighbours of `pos`, in reading order.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        pos.neighbors().into_iter().filter(|next| self.in_bounds(*next))
    }

    pub fn place(&mut self, id: UnitId, pos: Pos) -> Result<(), GridError> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds { pos });
        }
        if !self.is_open(pos) {
            return Err(GridError::Wall { pos });
        }
        if let Some(by) = self.occupant(pos) {
            return Err(GridError::Occupied { pos, by });
        }
        let idx = self.index(pos);
        self.occupancy[idx] = Some(id);
        Ok(())
    }

    pub fn move_unit(&mut self, from: Pos, to: Pos) -> Result<(), GridError> {
        let Some(id) = self.occupant(from) else {
            return Err(GridError::Vacant { pos: from });
        };
        self.place(id, to)?;
        let idx = self.index(from);
        self.occupancy[idx] = None;
        Ok(())
    }

    pub fn remove(&mut self, pos: Pos) -> Option<UnitId> {
        let idx = self.index(pos);
        self.occupancy[idx].take()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    pub(crate) fn index(&self, pos: Pos) -> usize {
        assert!(
            self.in_bounds(pos),
            "position {pos} is outside the {}x{} grid",
            self.width,
            self.height
        );
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[derive(Clone, Debug)]
pub struct BattleState {
    pub grid: Grid,
    pub units: SlotMap<UnitId, Unit>,
}

impl BattleState {
    pub fn living(&self, faction: Faction) -> u32 {
        self.units.values().filter(|unit| unit.faction == faction).count() as u32
    }

    pub fn has_living(&self, faction: Faction) -> bool {
        self.units.values().any(|unit| unit.faction == faction)
    }

    pub fn hit_points(&self, faction: Faction) -> i32 {
        self.units.values().filter(|unit| unit.faction == faction).map(|unit| unit.hp).sum()
    }

    pub fn total_hit_points(&self) -> i32 {
        self.units.values().map(|unit| unit.hp).sum()
    }

    /// Living units sorted by position; this is the turn order for a round.
    pub fn reading_order(&self) -> Vec<UnitId> {
        let mut order: Vec<(Pos, UnitId)> =
            self.units.values().map(|unit| (unit.pos, unit.id)).collect();
        order.sort();
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Free cells orthogonally adjacent to any living member of `faction`.
    pub fn in_range_cells(&self, faction: Faction) -> BTreeSet<Pos> {
        self.units
            .values()
            .filter(|unit| unit.faction == faction)
            .flat_map(|unit| self.grid.neighbors(unit.pos))
            .filter(|pos| self.grid.is_free(*pos))
            .collect()
    }

    /// Occupancy agrees with the unit table in both directions.
    pub fn occupancy_is_consistent(&self) -> bool {
        let units_match = self.units.iter().all(|(id, unit)| {
            unit.id == id
                && unit.is_alive()
                && self.grid.is_open(unit.pos)
                && self.grid.occupant(unit.pos) == Some(id)
        });
        let occupied =
            self.grid.positions().filter(|pos| self.grid.occupant(*pos).is_some()).count();
        units_match && occupied == self.units.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room(width: usize, height: usize) -> Grid {
        Grid::new(width, height, vec![Cell::Open; width * height])
    }

    #[test]
    fn move_rejects_walls_and_occupied_cells() {
        let mut cells = vec![Cell::Open; 9];
        cells[4] = Cell::Wall;
        let mut grid = Grid::new(3, 3, cells);
        let mut keys: SlotMap<UnitId, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());
        grid.place(a, Pos::new(0, 1)).unwrap();
        grid.place(b, Pos::new(0, 2)).unwrap();

        assert_eq!(
            grid.move_unit(Pos::new(0, 1), Pos::new(1, 1)),
            Err(GridError::Wall { pos: Pos::new(1, 1) })
        );
        assert_eq!(
            grid.move_unit(Pos::new(0, 1), Pos::new(0, 2)),
            Err(GridError::Occupied { pos: Pos::new(0, 2), by: b })
        );
        assert_eq!(
            grid.move_unit(Pos::new(2, 2), Pos::new(2, 1)),
            Err(GridError::Vacant { pos: Pos::new(2, 2) })
        );

        grid.move_unit(Pos::new(0, 1), Pos::new(0, 0)).unwrap();
        assert_eq!(grid.occupant(Pos::new(0, 0)), Some(a));
        assert!(grid.is_free(Pos::new(0, 1)));
    }

    #[test]
    fn corner_neighbors_skip_out_of_bounds_cells() {
        let grid = open_room(3, 2);
        let around: Vec<Pos> = grid.neighbors(Pos::new(0, 0)).collect();
        assert_eq!(around, vec![Pos::new(0, 1), Pos::new(1, 0)]);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_lookup_is_fatal() {
        let grid = open_room(2, 2);
        let _ = grid.is_open(Pos::new(5, 0));
    }
}
