use crate::grid::{MapGrid, FINE_PER_CELL};
use crate::maze;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One full turn in facing units.
pub(crate) const TRIG_MAX_ANGLE: i32 = 0x10000;
pub(crate) const DEFAULT_FACING: i32 = 10000;

pub(crate) const ZOOM_MIN: i32 = 1;
pub(crate) const ZOOM_MAX: i32 = 20;
pub(crate) const DEFAULT_ZOOM: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Player {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) facing: i32,
}

impl Player {
    /// Two cells above the entrance, horizontally centred on the grid.
    pub(crate) fn spawn(map_size: usize) -> Self {
        Self {
            x: FINE_PER_CELL * (map_size as i32 / 2),
            y: -2 * FINE_PER_CELL,
            facing: DEFAULT_FACING,
        }
    }
}

/// Destination pixels per grid cell, always inside `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub(crate) struct Zoom(i32);

impl Zoom {
    pub(crate) fn new(v: i32) -> Self {
        Self(v.clamp(ZOOM_MIN, ZOOM_MAX))
    }

    pub(crate) fn get(self) -> i32 {
        self.0
    }

    pub(crate) fn zoom_in(self) -> Self {
        Self::new(self.0 + 1)
    }

    pub(crate) fn zoom_out(self) -> Self {
        Self::new(self.0 - 1)
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(DEFAULT_ZOOM)
    }
}

impl From<i32> for Zoom {
    fn from(v: i32) -> Self {
        Self::new(v)
    }
}

impl From<Zoom> for i32 {
    fn from(z: Zoom) -> Self {
        z.0
    }
}

/// One accelerometer reading in milli-g.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct AccelSample {
    pub(crate) x: i16,
    pub(crate) y: i16,
    pub(crate) z: i16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Steering {
    /// Tilt slides the player directly along x and y.
    #[default]
    Tilt,
    /// Forward tilt walks along the facing, sideways tilt turns.
    Tank,
}

/// Everything a tick or a frame reads: the maze, the player and view state.
pub(crate) struct World {
    pub(crate) grid: MapGrid,
    pub(crate) player: Player,
    pub(crate) zoom: Zoom,
    pub(crate) noclip: bool,
    pub(crate) steering: Steering,
    pub(crate) ticks: u64,
    pub(crate) mazes_built: u32,
    rng: StdRng,
}

impl World {
    pub(crate) fn new(map_size: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut world = Self {
            grid: MapGrid::new(map_size),
            player: Player::spawn(map_size),
            zoom: Zoom::default(),
            noclip: false,
            steering: Steering::default(),
            ticks: 0,
            mazes_built: 0,
            rng,
        };
        world.reset();
        world
    }

    /// Root of every maze: middle of the top row.
    pub(crate) fn start_cell(&self) -> (i32, i32) {
        (self.grid.size() as i32 / 2, 0)
    }

    /// Carve a fresh maze and put the player back at the spawn point.
    pub(crate) fn reset(&mut self) {
        let start = self.start_cell();
        maze::generate(&mut self.grid, start, &mut self.rng);
        self.player = Player::spawn(self.grid.size());
        self.mazes_built += 1;
        log::info!(
            "maze #{} ready: {}x{}, {} open cells",
            self.mazes_built,
            self.grid.size(),
            self.grid.size(),
            self.grid.open_count()
        );
    }
}
