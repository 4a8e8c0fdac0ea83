/// Fine-grained units per grid cell are `1 << FINE_SHIFT`.
pub(crate) const FINE_SHIFT: i32 = 6;
pub(crate) const FINE_PER_CELL: i32 = 1 << FINE_SHIFT;

pub(crate) const DEFAULT_MAP_SIZE: usize = 20;
pub(crate) const MIN_MAP_SIZE: usize = 5;
pub(crate) const MAX_MAP_SIZE: usize = 64;

/// Code returned for any position outside the grid. It is `<= 0`, so movement
/// treats the outside of the maze as open floor.
pub(crate) const OUT_OF_BOUNDS: i8 = -1;

/// Final meaning of one maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Cell {
    Wall,
    /// Open cell that the carve passed through (or the root).
    #[default]
    Passage,
    /// Open leaf of the carve tree.
    DeadEnd,
}

impl Cell {
    /// Signed cell code: `1` wall, `0` passage, `-1` dead end.
    pub(crate) fn code(self) -> i8 {
        match self {
            Cell::Wall => 1,
            Cell::Passage => 0,
            Cell::DeadEnd => -1,
        }
    }

    pub(crate) fn is_open(self) -> bool {
        self != Cell::Wall
    }

    fn glyph(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Passage => '.',
            Cell::DeadEnd => ',',
        }
    }
}

/// Square, row-major maze grid. Never resized after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MapGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl MapGrid {
    /// A zero-filled grid: every cell reads as code `0`.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Passage; size * size],
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn idx(&self, cx: i32, cy: i32) -> Option<usize> {
        if cx < 0 || cy < 0 || cx as usize >= self.size || cy as usize >= self.size {
            return None;
        }
        Some(cy as usize * self.size + cx as usize)
    }

    pub(crate) fn cell(&self, cx: i32, cy: i32) -> Option<Cell> {
        self.idx(cx, cy).map(|i| self.cells[i])
    }

    /// Cell code at grid coordinates, `OUT_OF_BOUNDS` outside.
    pub(crate) fn get_cell(&self, cx: i32, cy: i32) -> i8 {
        self.cell(cx, cy).map_or(OUT_OF_BOUNDS, Cell::code)
    }

    /// Out-of-range writes are dropped.
    pub(crate) fn set_cell(&mut self, cx: i32, cy: i32, cell: Cell) {
        if let Some(i) = self.idx(cx, cy) {
            self.cells[i] = cell;
        }
    }

    /// Cell code at a fine-grained position.
    pub(crate) fn get(&self, x: i32, y: i32) -> i8 {
        self.get_cell(x >> FINE_SHIFT, y >> FINE_SHIFT)
    }

    pub(crate) fn set(&mut self, x: i32, y: i32, cell: Cell) {
        self.set_cell(x >> FINE_SHIFT, y >> FINE_SHIFT, cell);
    }

    pub(crate) fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_open()).count()
    }

    /// One line per row: `#` wall, `.` passage, `,` dead end.
    pub(crate) fn to_text(&self) -> String {
        let mut s = String::with_capacity(self.size * (self.size + 1));
        for row in self.cells.chunks(self.size) {
            s.extend(row.iter().map(|c| c.glyph()));
            s.push('\n');
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_grid_is_zero_filled() {
        let g = MapGrid::new(DEFAULT_MAP_SIZE);
        assert_eq!(g.cells().len(), 400);
        assert!(g.cells().iter().all(|c| c.code() == 0));
    }

    #[test]
    fn outside_reads_sentinel_and_writes_are_dropped() {
        let mut g = MapGrid::new(4);
        assert_eq!(g.get(-1, 0), OUT_OF_BOUNDS);
        assert_eq!(g.get(0, -128), OUT_OF_BOUNDS);
        assert_eq!(g.get(4 * FINE_PER_CELL, 0), OUT_OF_BOUNDS);

        let before = g.clone();
        g.set(-1, -1, Cell::Wall);
        g.set(4 * FINE_PER_CELL, 0, Cell::Wall);
        assert_eq!(g, before);
    }

    #[test]
    fn fine_positions_share_a_cell() {
        let mut g = MapGrid::new(4);
        g.set(64, 128, Cell::Wall);
        assert_eq!(g.get(64, 128), 1);
        assert_eq!(g.get(127, 191), 1);
        assert_eq!(g.get(128, 191), 0);
        assert_eq!(g.get_cell(1, 2), 1);
    }

    #[test]
    fn only_walls_have_positive_codes() {
        for c in [Cell::Wall, Cell::Passage, Cell::DeadEnd] {
            assert_eq!(c.code() > 0, !c.is_open());
        }
        assert!(OUT_OF_BOUNDS <= 0);
    }

    #[test]
    fn text_dump_marks_each_kind() {
        let mut g = MapGrid::new(3);
        g.fill(Cell::Wall);
        g.set_cell(1, 1, Cell::DeadEnd);
        g.set_cell(1, 0, Cell::Passage);
        assert_eq!(g.to_text(), "#.#\n#,#\n###\n");
    }

    proptest! {
        #[test]
        fn set_then_get_at_shifted_coordinates(x in 0i32..20 * 64, y in 0i32..20 * 64, wall in any::<bool>()) {
            let mut g = MapGrid::new(DEFAULT_MAP_SIZE);
            let cell = if wall { Cell::Wall } else { Cell::DeadEnd };
            g.set_cell(x >> FINE_SHIFT, y >> FINE_SHIFT, cell);
            prop_assert_eq!(g.get_cell(x >> 6, y >> 6), cell.code());
            prop_assert_eq!(g.get(x, y), cell.code());
        }
    }
}
