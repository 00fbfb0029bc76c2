//! Seeded random arenas for fuzzing the battle loop.
//! Output is plain map text, so generated arenas go through the same parser as hand-written ones.

use std::iter;

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaSpec {
    /// Interior size, not counting the wall border.
    pub width: usize,
    pub height: usize,
    /// Chance out of 100 that an interior cell is a wall.
    pub wall_percent: u64,
    pub elves: usize,
    pub goblins: usize,
}

impl Default for ArenaSpec {
    fn default() -> Self {
        Self { width: 7, height: 5, wall_percent: 15, elves: 2, goblins: 3 }
    }
}

/// Bordered arena with at least one elf and one goblin whenever the interior has room.
pub fn generate_arena(seed: u64, spec: &ArenaSpec) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (width, height) = (spec.width + 2, spec.height + 2);
    let mut glyphs = vec![vec!['#'; width]; height];

    let mut interior = Vec::with_capacity(spec.width * spec.height);
    for y in 1..=spec.height {
        for x in 1..=spec.width {
            if rng.next_u64() % 100 >= spec.wall_percent {
                glyphs[y][x] = '.';
                interior.push((y, x));
            }
        }
    }

    let roster = iter::repeat_n('E', spec.elves.max(1))
        .chain(iter::repeat_n('G', spec.goblins.max(1)));
    for glyph in roster {
        if interior.is_empty() {
            break;
        }
        let pick = (rng.next_u64() % interior.len() as u64) as usize;
        let (y, x) = interior.swap_remove(pick);
        glyphs[y][x] = glyph;
    }

    glyphs.into_iter().map(|row| row.into_iter().collect::<String>()).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use crate::types::Faction;

    #[test]
    fn same_seed_produces_same_arena() {
        let spec = ArenaSpec::default();
        assert_eq!(generate_arena(7, &spec), generate_arena(7, &spec));
    }

    #[test]
    fn arenas_parse_with_the_requested_roster() {
        let spec = ArenaSpec { width: 9, height: 6, wall_percent: 10, elves: 3, goblins: 4 };
        for seed in 0..32 {
            let text = generate_arena(seed, &spec);
            let scenario: Scenario = text.parse().expect("generated arena should parse");
            assert_eq!(scenario.grid.width(), 11);
            assert_eq!(scenario.grid.height(), 8);
            assert!(scenario.count(Faction::Elf) <= 3);
            assert!(scenario.count(Faction::Goblin) <= 4);
        }
    }

    #[test]
    fn wall_free_arena_places_every_unit() {
        let spec = ArenaSpec { width: 5, height: 5, wall_percent: 0, elves: 2, goblins: 2 };
        let scenario: Scenario = generate_arena(99, &spec).parse().unwrap();
        assert_eq!(scenario.count(Faction::Elf), 2);
        assert_eq!(scenario.count(Faction::Goblin), 2);
    }
}
