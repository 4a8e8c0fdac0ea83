use crate::model::AccelSample;
use crate::sim::PlayerAction;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Full-scale tilt in milli-g.
const ACCEL_LIMIT: f32 = 1000.0;
const RESTING_Z: i16 = -1000;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

pub(crate) fn collect_input_nonblocking(max_wait: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so the tick stays on time
    let timeout = std::cmp::min(Duration::from_millis(1), max_wait);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(ev: InputEvent) -> Option<PlayerAction> {
    if matches!(ev.key, KeyCode::Char('c') | KeyCode::Char('C'))
        && ev.mods.contains(KeyModifiers::CONTROL)
    {
        return Some(PlayerAction::Quit);
    }
    match ev.key {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(PlayerAction::Tilt(0, 1)),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(PlayerAction::Tilt(0, -1)),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(PlayerAction::Tilt(-1, 0)),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(PlayerAction::Tilt(1, 0)),
        KeyCode::Char('0') => Some(PlayerAction::Level),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::PageDown => Some(PlayerAction::ZoomIn),
        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::PageUp => Some(PlayerAction::ZoomOut),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => {
            Some(PlayerAction::Reset)
        }
        KeyCode::Char('n') | KeyCode::Char('N') => Some(PlayerAction::ToggleNoclip),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(PlayerAction::ToggleSteering),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(PlayerAction::Quit),
        _ => None,
    }
}

/// Stands in for an accelerometer: key presses lean the device, and the lean
/// relaxes back toward level a little every sample.
#[derive(Clone, Debug)]
pub(crate) struct TiltEmulator {
    x: f32,
    y: f32,
    step: f32,
    decay: f32,
}

impl TiltEmulator {
    pub(crate) fn new(step: f32, decay: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            step,
            decay: decay.clamp(0.0, 1.0),
        }
    }

    pub(crate) fn nudge(&mut self, dx: i32, dy: i32) {
        self.x = (self.x + dx as f32 * self.step).clamp(-ACCEL_LIMIT, ACCEL_LIMIT);
        self.y = (self.y + dy as f32 * self.step).clamp(-ACCEL_LIMIT, ACCEL_LIMIT);
    }

    pub(crate) fn level(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
    }

    /// Current reading; decays the lean afterwards.
    pub(crate) fn sample(&mut self) -> AccelSample {
        let s = AccelSample {
            x: self.x.round() as i16,
            y: self.y.round() as i16,
            z: RESTING_Z,
        };
        self.x *= self.decay;
        self.y *= self.decay;
        if self.x.abs() < 1.0 {
            self.x = 0.0;
        }
        if self.y.abs() < 1.0 {
            self.y = 0.0;
        }
        s
    }
}
