use super::render::StreamRenderer;
use crate::audio::{AudioBackend, StreamSettings};
use crate::error::{HemiError, Result};
use crate::synth::{ControlParams, Mixer};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, Stream};
use std::sync::Arc;

pub struct CpalBackend {
    stream: Option<Stream>,
    mixer: Option<Mixer>,
    params: Arc<ControlParams>,
    settings: StreamSettings,
}

impl CpalBackend {
    pub fn new(mixer: Mixer, settings: StreamSettings) -> Self {
        Self {
            stream: None,
            params: mixer.params().clone(),
            mixer: Some(mixer),
            settings,
        }
    }

    fn select_output_device(&self, host: &cpal::Host) -> Result<cpal::Device> {
        let Some(wanted) = &self.settings.device_name else {
            return host.default_output_device().ok_or(HemiError::NoOutputDevice);
        };

        let wanted = wanted.to_lowercase();
        for device in host.output_devices()? {
            let name = device.name().unwrap_or_default();
            if name.to_lowercase().contains(&wanted) {
                return Ok(device);
            }
        }

        log::warn!("No output device matching '{}', using default", wanted);
        host.default_output_device().ok_or(HemiError::NoOutputDevice)
    }

    /// Prefers a stereo F32/I16 config at the requested rate, else the device default.
    fn select_config(&self, device: &cpal::Device) -> Result<(cpal::StreamConfig, SampleFormat)> {
        let wanted = SampleRate(self.settings.sample_rate);
        let supported = device
            .supported_output_configs()?
            .filter(|range| range.channels() >= 2)
            .filter(|range| matches!(range.sample_format(), SampleFormat::F32 | SampleFormat::I16))
            .filter(|range| range.min_sample_rate() <= wanted && wanted <= range.max_sample_rate())
            .min_by_key(|range| (range.channels(), range.sample_format() != SampleFormat::F32))
            .map(|range| range.with_sample_rate(wanted));

        let supported = match supported {
            Some(config) => config,
            None => {
                let fallback = device.default_output_config()?;
                log::warn!(
                    "No stereo config at {} Hz, falling back to {} Hz / {} channels",
                    wanted.0,
                    fallback.sample_rate().0,
                    fallback.channels()
                );
                fallback
            }
        };

        let sample_format = supported.sample_format();
        let mut config: cpal::StreamConfig = supported.into();
        config.buffer_size = cpal::BufferSize::Fixed(self.settings.buffer_frames);
        Ok((config, sample_format))
    }

    fn build_stream(&mut self) -> Result<Stream> {
        let host = cpal::default_host();
        let device = self.select_output_device(&host)?;
        log::info!("Selected device: {}", device.name().unwrap_or_default());

        let (config, sample_format) = self.select_config(&device)?;
        if !matches!(sample_format, SampleFormat::F32 | SampleFormat::I16) {
            return Err(HemiError::UnsupportedSampleFormat(sample_format));
        }
        log::info!(
            "Stream config: {} Hz, {} channels, {:?}, {} frames",
            config.sample_rate.0,
            config.channels,
            sample_format,
            self.settings.buffer_frames
        );

        // The oscillators must see the rate the device actually runs at.
        self.params.set_sample_rate(config.sample_rate.0 as f32);

        let mixer = self.mixer.take().ok_or(HemiError::AlreadyStarted)?;
        let mut renderer = StreamRenderer::new(
            mixer,
            self.settings.buffer_frames as usize,
            config.channels as usize,
        );

        let stream = match sample_format {
            SampleFormat::F32 => device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| renderer.render(data),
                |err| log::error!("Stream error: {}", err),
                None,
            )?,
            SampleFormat::I16 => device.build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| renderer.render(data),
                |err| log::error!("Stream error: {}", err),
                None,
            )?,
            other => return Err(HemiError::UnsupportedSampleFormat(other)),
        };

        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Err(HemiError::AlreadyStarted);
        }
        let stream = self.build_stream()?;
        stream.play()?;
        self.stream = Some(stream);
        log::info!("Audio stream started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::warn!("Failed to pause stream during shutdown: {}", e);
            }
            drop(stream);
            log::info!("Audio stream closed");
        }
    }
}

impl Drop for CpalBackend {
    fn drop(&mut self) {
        self.stop();
    }
}
