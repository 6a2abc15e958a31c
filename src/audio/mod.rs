use anyhow::{Context, Result, bail};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use tracing::debug;

use crate::models::Track;

/// Synchronous playback surface the session drives. One track is loaded
/// at a time; `load` replaces whatever is currently queued.
pub trait AudioOutput {
    fn load(&mut self, track: &Track) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn set_volume(&mut self, volume: u8) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

struct Device {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Sink,
}

pub struct RodioOutput {
    device: Option<Device>,
    volume: u8,
}

impl RodioOutput {
    pub fn new(volume: u8) -> Self {
        Self {
            device: None,
            volume: volume.min(100),
        }
    }

    // The output device is opened on the first load, not at startup, so
    // the prompt still works on machines without a usable audio device.
    fn device(&mut self) -> Result<&Device> {
        let device = match self.device.take() {
            Some(device) => device,
            None => {
                let (stream, stream_handle) = OutputStream::try_default()
                    .with_context(|| "Failed to open audio output device")?;
                let sink = Sink::try_new(&stream_handle)
                    .with_context(|| "Failed to create audio sink")?;
                sink.set_volume(f32::from(self.volume) / 100.0);
                debug!("opened default audio output device");
                Device {
                    _stream: stream,
                    _stream_handle: stream_handle,
                    sink,
                }
            }
        };
        Ok(self.device.insert(device))
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, track: &Track) -> Result<()> {
        let path = &track.file_path;
        if !path.exists() {
            bail!("Audio file not found: {}", path.display());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let source = Decoder::new(reader)
            .with_context(|| format!("Failed to decode audio file: {}", path.display()))?;

        let device = self.device()?;
        device.sink.clear();
        device.sink.append(source);
        device.sink.play();

        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let device = self.device()?;
        device.sink.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(device) = &self.device {
            device.sink.pause();
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.volume = volume.min(100);
        if let Some(device) = &self.device {
            device.sink.set_volume(f32::from(self.volume) / 100.0);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(device) = &self.device {
            device.sink.stop();
        }
        Ok(())
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        if let Some(device) = &self.device {
            device.sink.stop();
        }
    }
}
