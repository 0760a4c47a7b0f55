use super::{KnobFrame, KnobSource, KNOB_COUNT};
use crate::error::{HemiError, Result};
use std::path::Path;

const FULL_SCALE: u16 = 1023;
const CHANNELS: u8 = 8;

/// SPI bus settings for the ADC.
#[derive(Debug, Clone, Copy)]
pub struct SpiSettings {
    pub speed_hz: u32,
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self { speed_hz: 1_000_000 }
    }
}

/// Four knobs wired to channels 0-3 of an MCP3008 10-bit ADC over spidev.
pub struct Mcp3008 {
    #[cfg(target_os = "linux")]
    spi: spidev::Spidev,
    /// Only the first failed transfer is logged.
    transfer_failed: bool,
}

impl Mcp3008 {
    /// Single-ended read request: start bit, then `1 ccc` in the high nibble.
    pub fn request_frame(channel: u8) -> Option<[u8; 3]> {
        if channel >= CHANNELS {
            return None;
        }
        Some([0x01, (8 + channel) << 4, 0x00])
    }

    /// The 10-bit result sits in the low two bits of byte 1 and all of byte 2.
    pub fn decode_reply(rx: &[u8; 3]) -> u16 {
        (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2])
    }

    #[cfg(target_os = "linux")]
    pub fn open(device: &Path, settings: SpiSettings) -> Result<Self> {
        use spidev::{SpiModeFlags, Spidev, SpidevOptions};

        let open_err = |e: std::io::Error| HemiError::Knobs(format!("{}: {}", device.display(), e));
        let mut spi = Spidev::open(device).map_err(open_err)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(settings.speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).map_err(open_err)?;

        log::info!("Opened MCP3008 on {} at {} Hz", device.display(), settings.speed_hz);
        Ok(Self {
            spi,
            transfer_failed: false,
        })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn open(device: &Path, _settings: SpiSettings) -> Result<Self> {
        Err(HemiError::Knobs(format!(
            "{}: spidev is only available on Linux",
            device.display()
        )))
    }

    #[cfg(target_os = "linux")]
    fn read_channel(&mut self, channel: u8) -> u16 {
        use spidev::SpidevTransfer;

        let Some(tx) = Self::request_frame(channel) else {
            return 0;
        };
        let mut rx = [0u8; 3];
        let result = {
            let mut transfer = SpidevTransfer::read_write(&tx, &mut rx);
            self.spi.transfer(&mut transfer)
        };
        match result {
            Ok(()) => Self::decode_reply(&rx),
            Err(e) => {
                if !self.transfer_failed {
                    log::error!("Error reading SPI data: {}", e);
                    self.transfer_failed = true;
                }
                0
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn read_channel(&mut self, _channel: u8) -> u16 {
        0
    }
}

impl KnobSource for Mcp3008 {
    fn read(&mut self) -> KnobFrame {
        let mut values = [0; KNOB_COUNT];
        for (channel, value) in values.iter_mut().enumerate() {
            *value = self.read_channel(channel as u8);
        }
        values
    }

    fn full_scale(&self) -> u16 {
        FULL_SCALE
    }
}
