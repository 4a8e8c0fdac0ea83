use crate::config::{load_settings, project_paths, save_settings_atomic, Args, Paths, Settings};
use crate::framebuffer::{screen_words, Framebuffer};
use crate::input::{collect_input_nonblocking, map_event_to_action, TiltEmulator};
use crate::logging;
use crate::model::{Steering, World};
use crate::render::{compose_frame, hud_text, BACKDROP_DOTS, BACKDROP_SOLID, HUD_BOX};
use crate::sim::PlayerAction;
use crate::term::{bitmap_to_cells, cells_for, draw_text, Terminal};
use crossterm::style::Color;
use std::time::{Duration, Instant};

const HELP: &str = "arrows/wasd tilt | 0 level | +/- zoom | enter new maze | n noclip | t steering | q quit";

pub(crate) struct App {
    session: Settings,
    stored: Settings,
    paths: Paths,
    world: World,
    tilt: TiltEmulator,
    term: Terminal,
    screen: Vec<u32>,
    should_quit: bool,
}

impl App {
    fn init(session: Settings, stored: Settings, paths: Paths) -> anyhow::Result<Self> {
        let mut world = World::new(session.map_size, session.seed);
        world.zoom = session.zoom;
        world.noclip = session.noclip;
        world.steering = session.steering;

        let tilt = TiltEmulator::new(session.tilt_step, session.tilt_decay);
        let term = Terminal::begin()?;

        Ok(Self {
            session,
            stored,
            paths,
            world,
            tilt,
            term,
            screen: screen_words(),
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let tick = Duration::from_millis(self.session.update_ms);
        let mut next_tick = Instant::now();

        while !self.should_quit {
            self.term.resize_if_needed()?;

            let wait = next_tick.saturating_duration_since(Instant::now());
            for ev in collect_input_nonblocking(wait)? {
                let Some(action) = map_event_to_action(ev) else {
                    continue;
                };
                match action {
                    PlayerAction::Quit => {
                        self.should_quit = true;
                        break;
                    }
                    PlayerAction::Tilt(dx, dy) => self.tilt.nudge(dx, dy),
                    PlayerAction::Level => self.tilt.level(),
                    _ => self.world.apply(action),
                }
            }
            if self.should_quit {
                break;
            }

            let now = Instant::now();
            if now < next_tick {
                continue;
            }
            next_tick += tick;
            if next_tick < now {
                // Fell behind; don't replay missed ticks.
                next_tick = now + tick;
            }

            let accel = self.tilt.sample();
            self.world.tick_fixed_step(accel);
            self.render_frame()?;
        }

        self.term.end()?;
        self.persist();
        log::info!("tiltmaze exiting after {} ticks", self.world.ticks);
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let backdrop = if self.session.dotted_backdrop {
            &BACKDROP_DOTS
        } else {
            &BACKDROP_SOLID
        };

        let bg = Color::Black;
        let fg = Color::White;
        self.term.cur.clear(bg);

        let mut fb = Framebuffer::screen(&mut self.screen);
        compose_frame(&mut fb, &self.world, self.session.minimap_zoom, backdrop, now_ms);
        bitmap_to_cells(&fb, &mut self.term.cur, fg, bg);

        // HUD text centred on the box's middle cell row.
        let text = hud_text(&self.world);
        let box_x = (HUD_BOX.x / 2) as u16;
        let box_w = (HUD_BOX.w / 2) as u16;
        let text_x = box_x + box_w.saturating_sub(text.chars().count() as u16) / 2;
        let text_y = ((HUD_BOX.y + HUD_BOX.h / 2) / 4) as u16;
        draw_text(&mut self.term.cur, text_x, text_y, &text, fg, bg);

        let (_, screen_rows) = cells_for(fb.width(), fb.height());
        let mode = format!(
            "{} steering | noclip {} | maze #{}",
            match self.world.steering {
                Steering::Tilt => "tilt",
                Steering::Tank => "tank",
            },
            if self.world.noclip { "on" } else { "off" },
            self.world.mazes_built
        );
        draw_text(&mut self.term.cur, 0, screen_rows, &mode, fg, bg);
        draw_text(&mut self.term.cur, 0, screen_rows + 1, HELP, Color::DarkGrey, bg);

        self.term.present(true)?;
        Ok(())
    }

    /// Write back what the player changed at runtime; CLI overrides stay out.
    fn persist(&mut self) {
        if self.world.zoom != self.session.zoom {
            self.stored.zoom = self.world.zoom;
        }
        if self.world.noclip != self.session.noclip {
            self.stored.noclip = self.world.noclip;
        }
        if self.world.steering != self.session.steering {
            self.stored.steering = self.world.steering;
        }
        if let Err(e) = save_settings_atomic(&self.paths.settings_path, &self.stored) {
            log::error!("saving settings failed: {e:#}");
        }
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let paths = project_paths()?;
    logging::init(&paths.log_path, args.log_level.into())?;

    let stored = load_settings(&paths.settings_path);
    let session = stored.with_args(&args);
    log::info!(
        "tiltmaze starting: {}x{} maze, zoom {}, tick {} ms, seed {:?}",
        session.map_size,
        session.map_size,
        session.zoom.get(),
        session.update_ms,
        session.seed
    );

    if args.dump {
        let world = World::new(session.map_size, session.seed);
        print!("{}", world.grid.to_text());
        return Ok(());
    }

    let mut app = App::init(session, stored, paths)?;
    app.run()
}
