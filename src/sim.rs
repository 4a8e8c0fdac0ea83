use crate::model::{AccelSample, Steering, World, TRIG_MAX_ANGLE};
use crate::movement::{apply_delta, walk};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerAction {
    /// Lean the emulated device; y is positive away from the viewer.
    Tilt(i32, i32),
    Level,
    ZoomIn,
    ZoomOut,
    Reset,
    ToggleNoclip,
    ToggleSteering,
    Quit,
}

impl World {
    pub(crate) fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::ZoomIn => {
                self.zoom = self.zoom.zoom_in();
                log::info!("zoom {}", self.zoom.get());
            }
            PlayerAction::ZoomOut => {
                self.zoom = self.zoom.zoom_out();
                log::info!("zoom {}", self.zoom.get());
            }
            PlayerAction::Reset => self.reset(),
            PlayerAction::ToggleNoclip => {
                self.noclip = !self.noclip;
                log::info!("noclip {}", if self.noclip { "on" } else { "off" });
            }
            PlayerAction::ToggleSteering => {
                self.steering = match self.steering {
                    Steering::Tilt => Steering::Tank,
                    Steering::Tank => Steering::Tilt,
                };
                log::info!("steering {:?}", self.steering);
            }
            // Handled by the host.
            PlayerAction::Tilt(..) | PlayerAction::Level | PlayerAction::Quit => {}
        }
    }

    /// Advance one timer tick from the latest accelerometer reading.
    pub(crate) fn tick_fixed_step(&mut self, accel: AccelSample) {
        self.ticks += 1;
        let ax = i32::from(accel.x);
        let ay = i32::from(accel.y);

        match self.steering {
            Steering::Tilt => {
                // Device y points up the screen.
                self.player = apply_delta(self.player, &self.grid, ax >> 4, -(ay >> 4), self.noclip);
            }
            Steering::Tank => {
                self.player = walk(self.player, &self.grid, ay >> 4, self.noclip);
                self.player.facing = (self.player.facing + (ax << 4)).rem_euclid(TRIG_MAX_ANGLE);
            }
        }

        log::trace!(
            "[tick {}] accel=({}, {}) player=({}, {}) facing={}",
            self.ticks,
            accel.x,
            accel.y,
            self.player.x,
            self.player.y,
            self.player.facing
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DEFAULT_MAP_SIZE;
    use crate::model::{Player, ZOOM_MAX, ZOOM_MIN};
    use proptest::prelude::*;

    fn accel(x: i16, y: i16) -> AccelSample {
        AccelSample { x, y, z: -1000 }
    }

    #[test]
    fn zoom_actions_clamp() {
        let mut w = World::new(DEFAULT_MAP_SIZE, Some(1));
        for _ in 0..40 {
            w.apply(PlayerAction::ZoomIn);
        }
        assert_eq!(w.zoom.get(), ZOOM_MAX);
        for _ in 0..40 {
            w.apply(PlayerAction::ZoomOut);
        }
        assert_eq!(w.zoom.get(), ZOOM_MIN);
    }

    #[test]
    fn toggles_flip_state() {
        let mut w = World::new(DEFAULT_MAP_SIZE, Some(1));
        w.apply(PlayerAction::ToggleNoclip);
        w.apply(PlayerAction::ToggleSteering);
        assert!(w.noclip);
        assert_eq!(w.steering, Steering::Tank);
        w.apply(PlayerAction::ToggleSteering);
        assert_eq!(w.steering, Steering::Tilt);
    }

    #[test]
    fn reset_respawns_the_player() {
        let mut w = World::new(DEFAULT_MAP_SIZE, Some(2));
        w.tick_fixed_step(accel(0, -1000));
        assert_ne!(w.player, Player::spawn(DEFAULT_MAP_SIZE));
        w.apply(PlayerAction::Reset);
        assert_eq!(w.player, Player::spawn(DEFAULT_MAP_SIZE));
    }

    #[test]
    fn tilting_toward_the_viewer_walks_into_the_entrance() {
        let mut w = World::new(DEFAULT_MAP_SIZE, Some(4));
        w.tick_fixed_step(accel(0, -1000));
        // -1000 >> 4 == -63, negated for screen space.
        assert_eq!(w.player.y, -128 + 63);
        for _ in 0..3 {
            w.tick_fixed_step(accel(0, -1000));
        }
        assert!(w.player.y >= 64, "walked through the root into row 1");
        assert_eq!(w.player.x, 640);
    }

    #[test]
    fn tank_mode_turns_and_walks() {
        let mut w = World::new(DEFAULT_MAP_SIZE, Some(4));
        w.steering = Steering::Tank;
        w.player.facing = 0;
        w.tick_fixed_step(accel(1024, 0));
        assert_eq!(w.player.facing, 1024 << 4);
        assert_eq!((w.player.x, w.player.y), (640, -128));

        w.player.facing = 0;
        w.tick_fixed_step(accel(0, 320));
        assert_eq!((w.player.x, w.player.y), (660, -128));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn player_never_stands_in_a_wall(
            seed in any::<u64>(),
            tilts in proptest::collection::vec((-1000i16..=1000, -1000i16..=1000), 1..200),
        ) {
            let mut w = World::new(DEFAULT_MAP_SIZE, Some(seed));
            for (x, y) in tilts {
                w.tick_fixed_step(accel(x, y));
                prop_assert!(w.grid.get(w.player.x, w.player.y) <= 0);
            }
        }
    }
}
