use crate::framebuffer::Framebuffer;
use crate::grid::{MapGrid, FINE_SHIFT};
use crate::model::{Player, World, Zoom};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Rect {
    pub(crate) const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The rect grown by one pixel on every side.
    pub(crate) fn outset(self) -> Rect {
        Rect::new(self.x - 1, self.y - 1, self.w + 2, self.h + 2)
    }

    pub(crate) fn intersects(self, o: Rect) -> bool {
        self.x < o.x + o.w && o.x < self.x + self.w && self.y < o.y + o.h && o.y < self.y + self.h
    }
}

pub(crate) const MAIN_VIEW: Rect = Rect::new(4, 4, 100, 100);
pub(crate) const MINIMAP_VIEW: Rect = Rect::new(4, 110, 40, 40);
pub(crate) const MINIMAP_ZOOM: i32 = 4;
pub(crate) const HUD_BOX: Rect = Rect::new(24, 0, 100, 20);

pub(crate) const BACKDROP_SOLID: [u8; 8] = [0; 8];
pub(crate) const BACKDROP_DOTS: [u8; 8] = [0x11, 0, 0, 0, 0x44, 0, 0, 0];

const FLASH_PERIOD_MS: i64 = 250;
const FLASH_LIT_AFTER_MS: i64 = 125;
const CURSOR_SIDE: i32 = 3;

/// One rectangle of the screen showing the maze at a zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) rect: Rect,
    pub(crate) zoom: Zoom,
}

pub(crate) fn cursor_lit(now_ms: i64) -> bool {
    now_ms.rem_euclid(FLASH_PERIOD_MS) > FLASH_LIT_AFTER_MS
}

/// Draw the maze around `player` into `dest`, scrolled so the player sits at
/// the centre, then the flashing cursor and a white frame just outside `dest`.
///
/// `dest` and its frame must lie on the bitmap.
pub(crate) fn render_viewport(
    fb: &mut Framebuffer,
    dest: Rect,
    player: &Player,
    grid: &MapGrid,
    zoom: Zoom,
    now_ms: i64,
) {
    let zoom = zoom.get();
    let span = grid.size() as i32 * zoom;
    let origin_x = scroll_origin(player.x, zoom) - dest.w / 2;
    let origin_y = scroll_origin(player.y, zoom) - dest.h / 2;

    for col in 0..dest.w {
        let px = dest.x + col;
        let on_map_x = origin_x + col;
        if !(0..span).contains(&on_map_x) {
            // Off the side of the maze.
            for row in 0..dest.h {
                fb.set_pixel(px, dest.y + row, false);
            }
            continue;
        }
        let cell_x = on_map_x / zoom;
        for row in 0..dest.h {
            let on_map_y = origin_y + row;
            let wall = (0..span).contains(&on_map_y) && grid.get_cell(cell_x, on_map_y / zoom) > 0;
            fb.set_pixel(px, dest.y + row, wall);
        }
    }

    fb.fill_rect(
        dest.x + dest.w / 2 - 1,
        dest.y + dest.h / 2 - 1,
        CURSOR_SIDE,
        CURSOR_SIDE,
        cursor_lit(now_ms),
    );

    let frame = dest.outset();
    fb.draw_rect(frame.x, frame.y, frame.w, frame.h, true);
}

/// Player position in destination pixels of a maze drawn at `zoom`.
fn scroll_origin(fine: i32, zoom: i32) -> i32 {
    ((i64::from(fine) * i64::from(zoom)) >> FINE_SHIFT) as i32
}

pub(crate) fn views(world: &World, minimap_zoom: Zoom) -> [Viewport; 2] {
    [
        Viewport {
            rect: MAIN_VIEW,
            zoom: world.zoom,
        },
        Viewport {
            rect: MINIMAP_VIEW,
            zoom: minimap_zoom,
        },
    ]
}

/// Clear the screen to `backdrop`, draw every viewport, then the HUD box.
pub(crate) fn compose_frame(
    fb: &mut Framebuffer,
    world: &World,
    minimap_zoom: Zoom,
    backdrop: &[u8; 8],
    now_ms: i64,
) {
    fb.fill_pattern(backdrop);

    let views = views(world, minimap_zoom);
    debug_assert!(
        !views[0].rect.outset().intersects(views[1].rect.outset()),
        "viewports overlap"
    );
    for v in &views {
        render_viewport(fb, v.rect, &world.player, &world.grid, v.zoom, now_ms);
    }

    fb.fill_rect(HUD_BOX.x, HUD_BOX.y, HUD_BOX.w, HUD_BOX.h, false);
    fb.draw_rect(HUD_BOX.x, HUD_BOX.y, HUD_BOX.w, HUD_BOX.h, true);
}

/// Text the host prints inside `HUD_BOX`.
pub(crate) fn hud_text(world: &World) -> String {
    format!(
        "x:{} y:{} z:{}",
        world.player.x,
        world.player.y,
        world.zoom.get()
    )
}
