use crate::sim::Adjust;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Adjust(Adjust),
    TogglePause,
    Reset,
    Quit,
}

pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    let adjust = match key.code {
        KeyCode::Char(' ') => return Some(Action::TogglePause),
        KeyCode::Esc => return Some(Action::Reset),
        KeyCode::Up => Adjust::SpeedUp,
        KeyCode::Down => Adjust::SpeedDown,
        KeyCode::PageUp => Adjust::CountUp,
        KeyCode::PageDown => Adjust::CountDown,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'x' => return Some(Action::Quit),
            'g' => Adjust::GravityUp,
            'b' => Adjust::GravityDown,
            'q' => Adjust::SpawnRateUp,
            'e' => Adjust::SpawnRateDown,
            'r' => Adjust::SpreadUp,
            'f' => Adjust::SpreadDown,
            _ => return None,
        },
        _ => return None,
    };
    Some(Action::Adjust(adjust))
}

/// Tracks which adjustment keys are currently down.
///
/// Terminals that report key releases give true held-key behaviour. On the
/// rest, every press or auto-repeat event counts as one held frame, so the
/// OS key repeat drives the edit rate instead.
pub struct HeldKeys {
    reports_release: bool,
    held: Vec<Adjust>,
    pulsed: Vec<Adjust>,
}

impl HeldKeys {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            held: Vec::new(),
            pulsed: Vec::new(),
        }
    }

    /// Records the key and returns any one-shot action it triggers.
    pub fn handle(&mut self, key: &KeyEvent) -> Option<Action> {
        let action = action_for(key)?;
        match (action, key.kind) {
            (Action::Adjust(adjust), KeyEventKind::Release) => {
                self.held.retain(|a| *a != adjust);
                None
            }
            (Action::Adjust(adjust), _) => {
                let set = if self.reports_release { &mut self.held } else { &mut self.pulsed };
                if !set.contains(&adjust) {
                    set.push(adjust);
                }
                None
            }
            (_, KeyEventKind::Press) => Some(action),
            _ => None,
        }
    }

    /// Adjustments to apply this frame. Consumes pulses.
    pub fn take_active(&mut self) -> Vec<Adjust> {
        let mut active = self.held.clone();
        for adjust in self.pulsed.drain(..) {
            if !active.contains(&adjust) {
                active.push(adjust);
            }
        }
        active
    }

    pub fn release_all(&mut self) {
        self.held.clear();
        self.pulsed.clear();
    }
}
