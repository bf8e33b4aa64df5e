/// Cell states of the maze grid.
/// Properties are queried via methods so cell semantics stay in one place.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Path,
    Wall,
}

impl Cell {
    /// Can the navigator occupy this cell?
    pub fn is_path(self) -> bool {
        matches!(self, Cell::Path)
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Cell::Wall)
    }

    /// ASCII glyph used by `Grid`'s text form.
    pub fn glyph(self) -> char {
        match self {
            Cell::Path => ' ',
            Cell::Wall => '#',
        }
    }

    pub fn from_glyph(ch: char) -> Self {
        if ch == '#' { Cell::Wall } else { Cell::Path }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Wall
    }
}
