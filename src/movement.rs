use crate::grid::MapGrid;
use crate::model::{Player, TRIG_MAX_ANGLE};
use std::f64::consts::TAU;

/// Move by `(dx, dy)` fine units, resolving X first, then Y from the new X.
///
/// An axis step is kept only if it lands on a cell with code `<= 0`, so a
/// diagonal push into a wall slides along it.
pub(crate) fn apply_delta(
    player: Player,
    grid: &MapGrid,
    dx: i32,
    dy: i32,
    allow_passthrough: bool,
) -> Player {
    let mut p = player;
    let nx = p.x.saturating_add(dx);
    if allow_passthrough || grid.get(nx, p.y) <= 0 {
        p.x = nx;
    }
    let ny = p.y.saturating_add(dy);
    if allow_passthrough || grid.get(p.x, ny) <= 0 {
        p.y = ny;
    }
    p
}

/// Step `distance` fine units along the player's facing.
pub(crate) fn walk(player: Player, grid: &MapGrid, distance: i32, allow_passthrough: bool) -> Player {
    let (dx, dy) = heading_delta(player.facing, distance);
    apply_delta(player, grid, dx, dy, allow_passthrough)
}

/// Components of a `distance`-long step at `facing`, truncated toward zero.
pub(crate) fn heading_delta(facing: i32, distance: i32) -> (i32, i32) {
    let a = facing.rem_euclid(TRIG_MAX_ANGLE) as f64 / TRIG_MAX_ANGLE as f64 * TAU;
    let d = distance as f64;
    ((a.cos() * d) as i32, (a.sin() * d) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    // 4x4 open grid with walls where asked, player in the middle of cell (1,1).
    fn setup(walls: &[(i32, i32)]) -> (MapGrid, Player) {
        let mut g = MapGrid::new(4);
        for &(x, y) in walls {
            g.set_cell(x, y, Cell::Wall);
        }
        let p = Player {
            x: 96,
            y: 96,
            facing: 0,
        };
        (g, p)
    }

    #[test]
    fn blocked_axis_slides_on_the_other() {
        let (g, p) = setup(&[(2, 1)]);
        let moved = apply_delta(p, &g, 40, 40, false);
        assert_eq!((moved.x, moved.y), (96, 136));
    }

    #[test]
    fn stops_short_inside_the_same_cell() {
        let (g, p) = setup(&[(2, 1)]);
        let moved = apply_delta(p, &g, 20, 0, false);
        assert_eq!(moved.x, 116);
        let stuck = apply_delta(moved, &g, 20, 0, false);
        assert_eq!(stuck.x, 116);
    }

    #[test]
    fn y_is_checked_against_the_updated_x() {
        let (g, p) = setup(&[(2, 2)]);
        let moved = apply_delta(p, &g, 40, 40, false);
        assert_eq!((moved.x, moved.y), (136, 96));
    }

    #[test]
    fn passthrough_ignores_walls() {
        let (g, p) = setup(&[(2, 1), (1, 2)]);
        let moved = apply_delta(p, &g, 40, 40, true);
        assert_eq!((moved.x, moved.y), (136, 136));
    }

    #[test]
    fn outside_the_grid_is_open() {
        let (g, _) = setup(&[]);
        let p = Player {
            x: 96,
            y: -128,
            facing: 0,
        };
        let moved = apply_delta(p, &g, -300, 10, false);
        assert_eq!((moved.x, moved.y), (-204, -118));
    }

    #[test]
    fn dead_end_cells_are_walkable() {
        let (mut g, p) = setup(&[]);
        g.set_cell(2, 1, Cell::DeadEnd);
        assert_eq!(apply_delta(p, &g, 64, 0, false).x, 160);
    }

    #[test]
    fn walk_follows_facing() {
        let (g, mut p) = setup(&[]);
        p.facing = 0;
        assert_eq!(walk(p, &g, 30, false).x, 126);

        p.facing = TRIG_MAX_ANGLE / 4;
        let south = walk(p, &g, 30, false);
        assert_eq!((south.x, south.y), (96, 126));

        p.facing = TRIG_MAX_ANGLE / 2;
        let west = walk(p, &g, 30, false);
        assert_eq!((west.x, west.y), (66, 96));
    }

    #[test]
    fn heading_wraps_negative_angles() {
        assert_eq!(heading_delta(-TRIG_MAX_ANGLE, 50), heading_delta(0, 50));
        assert_eq!(heading_delta(TRIG_MAX_ANGLE * 3 / 4, 50), (0, -50));
    }
}
