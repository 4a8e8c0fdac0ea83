//! Stack-free backtracking maze carver.
//!
//! The search keeps its own state in a scratch plane shaped like the grid: each
//! byte holds the directions already tried from that cell (low nibble) and the
//! direction leading back toward the root (bits 4-5). Backtracking follows that
//! back-link, so no path stack is kept anywhere. When the cursor exhausts the
//! root the plane is translated into final [`Cell`] values.

use crate::grid::{Cell, MapGrid};
use rand::Rng;

const TRIED_MASK: u8 = 0x0F;
const FROM_SHIFT: u8 = 4;
const FROM_MASK: u8 = 0x30;
// Set on entry so a cell whose back-link is East (0) and nothing tried yet
// still reads as visited.
const ENTERED: u8 = 0x40;

// Stamps written when a cell is left for good.
const RAW_PASSAGE: u8 = 1;
const RAW_DEAD_END: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    East,
    South,
    West,
    North,
}

impl Dir {
    pub(crate) fn all() -> [Dir; 4] {
        [Dir::East, Dir::South, Dir::West, Dir::North]
    }

    fn from_idx(i: u8) -> Dir {
        match i & 3 {
            0 => Dir::East,
            1 => Dir::South,
            2 => Dir::West,
            _ => Dir::North,
        }
    }

    fn idx(self) -> u8 {
        match self {
            Dir::East => 0,
            Dir::South => 1,
            Dir::West => 2,
            Dir::North => 3,
        }
    }

    fn bit(self) -> u8 {
        1 << self.idx()
    }

    pub(crate) fn opposite(self) -> Dir {
        Dir::from_idx(self.idx() + 2)
    }

    pub(crate) fn delta(self) -> (i32, i32) {
        match self {
            Dir::East => (1, 0),
            Dir::South => (0, 1),
            Dir::West => (-1, 0),
            Dir::North => (0, -1),
        }
    }
}

struct SearchPlane {
    size: i32,
    raw: Vec<u8>,
}

impl SearchPlane {
    fn new(size: usize) -> Self {
        Self {
            size: size as i32,
            raw: vec![0; size * size],
        }
    }

    fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    fn interior(&self, x: i32, y: i32) -> bool {
        x > 0 && y > 0 && x < self.size - 1 && y < self.size - 1
    }

    /// A cell may be carved only if it is an untouched interior cell whose
    /// other three neighbours are untouched too.
    fn can_enter(&self, x: i32, y: i32, heading: Dir) -> bool {
        if !self.interior(x, y) || self.raw[self.idx(x, y)] != 0 {
            return false;
        }
        let back = heading.opposite();
        Dir::all().into_iter().filter(|&d| d != back).all(|d| {
            let (dx, dy) = d.delta();
            self.raw[self.idx(x + dx, y + dy)] == 0
        })
    }
}

/// Overwrite `grid` with a perfect maze rooted at `start` (grid coordinates).
///
/// The root may sit on the border; every other border cell stays a wall. A
/// start outside the grid leaves the grid solid wall.
pub(crate) fn generate<R: Rng + ?Sized>(grid: &mut MapGrid, start: (i32, i32), rng: &mut R) {
    if grid.idx(start.0, start.1).is_none() {
        log::warn!("maze start {:?} outside {}x{} grid", start, grid.size(), grid.size());
        grid.fill(Cell::Wall);
        return;
    }

    let mut plane = SearchPlane::new(grid.size());
    let (mut cx, mut cy) = start;
    let root = plane.idx(cx, cy);
    plane.raw[root] = ENTERED;

    // True while the cursor has not backtracked since its last forward move.
    let mut leaf = false;
    let mut steps: u64 = 0;

    loop {
        steps += 1;
        let here = plane.idx(cx, cy);
        let state = plane.raw[here];

        if state & TRIED_MASK == TRIED_MASK {
            if (cx, cy) == start {
                plane.raw[here] = RAW_PASSAGE;
                break;
            }
            let (dx, dy) = Dir::from_idx((state & FROM_MASK) >> FROM_SHIFT).delta();
            cx += dx;
            cy += dy;
            plane.raw[here] = if leaf { RAW_DEAD_END } else { RAW_PASSAGE };
            leaf = false;
            continue;
        }

        let heading = loop {
            let d = Dir::from_idx(rng.gen_range(0..4u8));
            if state & d.bit() == 0 {
                break d;
            }
        };
        plane.raw[here] |= heading.bit();

        let (dx, dy) = heading.delta();
        let (nx, ny) = (cx + dx, cy + dy);
        if plane.can_enter(nx, ny, heading) {
            cx = nx;
            cy = ny;
            let next = plane.idx(cx, cy);
            plane.raw[next] = ENTERED | (heading.opposite().idx() << FROM_SHIFT);
            leaf = true;
        }
    }

    for (cell, &raw) in grid.cells_mut().iter_mut().zip(&plane.raw) {
        *cell = match raw {
            0 => Cell::Wall,
            RAW_DEAD_END => Cell::DeadEnd,
            _ => Cell::Passage,
        };
    }

    log::debug!(
        "carved {} open cells from {:?} in {} steps",
        grid.open_count(),
        start,
        steps
    );
}
