use super::{KnobFrame, KnobSource};
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::collections::HashMap;

/// 10-bit range, same as an MCP3008 channel.
const FULL_SCALE: u16 = 1023;
/// Counts moved per poll while a key is held.
const STEP: u16 = 8;

#[derive(Clone, Copy, Debug)]
enum Nudge {
    Up(usize),
    Down(usize),
}

/// Emulates four knobs with the computer keyboard.
///
/// Q/A, W/S, E/D and R/F raise and lower knobs 0 to 3 while held.
/// Escape asks the control loop to quit.
pub struct KeyboardKnobs {
    device_state: DeviceState,
    key_to_nudge: HashMap<Keycode, Nudge>,
    values: KnobFrame,
    quit: bool,
}

impl KeyboardKnobs {
    pub fn new(initial: KnobFrame) -> Self {
        let key_to_nudge: HashMap<Keycode, Nudge> = [
            (Keycode::Q, Nudge::Up(0)),
            (Keycode::A, Nudge::Down(0)),
            (Keycode::W, Nudge::Up(1)),
            (Keycode::S, Nudge::Down(1)),
            (Keycode::E, Nudge::Up(2)),
            (Keycode::D, Nudge::Down(2)),
            (Keycode::R, Nudge::Up(3)),
            (Keycode::F, Nudge::Down(3)),
        ]
        .iter()
        .cloned()
        .collect();

        let mut values = initial;
        for v in values.iter_mut() {
            *v = (*v).min(FULL_SCALE);
        }

        Self {
            device_state: DeviceState::new(),
            key_to_nudge,
            values,
            quit: false,
        }
    }

    pub fn print_help() {
        log::info!("Keyboard knobs: Q/A ambient volume, W/S chord group, E/D chord in group, R/F sine volume");
        log::info!("Press Escape to exit");
    }
}

impl KnobSource for KeyboardKnobs {
    fn read(&mut self) -> KnobFrame {
        let keys: Vec<Keycode> = self.device_state.get_keys();

        for key in &keys {
            match self.key_to_nudge.get(key) {
                Some(Nudge::Up(knob)) => {
                    let value = &mut self.values[*knob];
                    *value = value.saturating_add(STEP).min(FULL_SCALE);
                }
                Some(Nudge::Down(knob)) => {
                    let value = &mut self.values[*knob];
                    *value = value.saturating_sub(STEP);
                }
                None => {}
            }
        }
        if keys.contains(&Keycode::Escape) {
            self.quit = true;
        }

        self.values
    }

    fn full_scale(&self) -> u16 {
        FULL_SCALE
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}
