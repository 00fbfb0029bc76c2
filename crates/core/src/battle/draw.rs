use super::*;

impl Battle {
    /// Map text with units in place, each row followed by its units' hit points.
    pub fn draw(&self) -> String {
        let grid = &self.state.grid;
        let mut text = String::new();
        for y in 0..grid.height() {
            let mut row_units = Vec::new();
            for x in 0..grid.width() {
                let pos = Pos { y: y as i32, x: x as i32 };
                let glyph = match grid.occupant(pos) {
                    Some(id) => {
                        let unit = &self.state.units[id];
                        row_units.push(format!("{}({})", unit.faction.glyph(), unit.hp));
                        unit.faction.glyph()
                    }
                    None if grid.is_open(pos) => '.',
                    None => '#',
                };
                text.push(glyph);
            }
            if !row_units.is_empty() {
                text.push_str("   ");
                text.push_str(&row_units.join(", "));
            }
            text.push('\n');
        }
        text
    }

    /// Bare map rows without hit point annotations.
    pub fn draw_map(&self) -> Vec<String> {
        self.draw()
            .lines()
            .map(|line| line.split_whitespace().next().unwrap_or_default().to_string())
            .collect()
    }
}
