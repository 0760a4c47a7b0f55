use super::{KnobFrame, KnobSource, KNOB_COUNT};
use crate::error::{HemiError, Result};
use midir::{MidiInput, MidiInputConnection, MidiInputPort};
use std::sync::mpsc::{self, Receiver};

const FULL_SCALE: u16 = 127;

/// Four MIDI continuous controllers acting as knobs.
pub struct MidiKnobs {
    /// Holds the connection to keep it alive
    #[allow(dead_code)]
    connection: MidiInputConnection<()>,
    receiver: Receiver<(u8, u8, u8)>, // (status, data1, data2)
    controllers: [u8; KNOB_COUNT],
    values: KnobFrame,
}

impl MidiKnobs {
    pub fn new(port_index: Option<usize>, controllers: [u8; KNOB_COUNT]) -> Result<Self> {
        let midi_in =
            MidiInput::new("hemisync knobs").map_err(|e| HemiError::Knobs(e.to_string()))?;
        let port = Self::select_input_port(&midi_in, port_index.unwrap_or(0))?;
        let port_name = midi_in
            .port_name(&port)
            .map_err(|e| HemiError::Knobs(e.to_string()))?;

        let (sender, receiver) = mpsc::channel();

        let connection = midi_in
            .connect(
                &port,
                "hemisync-knobs",
                move |_, message, _| {
                    if message.len() >= 3 {
                        let _ = sender.send((message[0], message[1], message[2]));
                    }
                },
                (),
            )
            .map_err(|e| HemiError::Knobs(e.to_string()))?;

        log::info!("Opened MIDI port: {} (controllers {:?})", port_name, controllers);

        Ok(Self {
            connection,
            receiver,
            controllers,
            values: [0; KNOB_COUNT],
        })
    }

    fn select_input_port(midi_in: &MidiInput, index: usize) -> Result<MidiInputPort> {
        let in_ports = midi_in.ports();
        if in_ports.is_empty() {
            return Err(HemiError::Knobs("No MIDI input ports found".into()));
        }

        for (i, port) in in_ports.iter().enumerate() {
            if let Ok(name) = midi_in.port_name(port) {
                log::info!("MIDI input {}: {}", i, name);
            }
        }

        in_ports
            .get(index)
            .cloned()
            .ok_or_else(|| HemiError::Knobs(format!("Invalid MIDI port selection {}", index)))
    }

    /// Applies one raw message; returns true if it moved a knob.
    pub fn apply_message(
        controllers: &[u8; KNOB_COUNT],
        values: &mut KnobFrame,
        status: u8,
        data1: u8,
        data2: u8,
    ) -> bool {
        if status & 0xF0 != 0xB0 {
            return false;
        }
        match controllers.iter().position(|cc| *cc == data1) {
            Some(knob) => {
                values[knob] = u16::from(data2).min(FULL_SCALE);
                true
            }
            None => false,
        }
    }
}

impl KnobSource for MidiKnobs {
    fn read(&mut self) -> KnobFrame {
        while let Ok((status, data1, data2)) = self.receiver.try_recv() {
            Self::apply_message(&self.controllers, &mut self.values, status, data1, data2);
        }
        self.values
    }

    fn full_scale(&self) -> u16 {
        FULL_SCALE
    }
}
