use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use stft_model::SampleSource;

/// Fully decoded audio, one vector per channel.
pub struct AudioData {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }

    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}

impl SampleSource for AudioData {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn len(&self) -> u64 {
        self.frames() as u64
    }

    fn read(&self, channel: usize, start: u64, count: usize) -> Vec<f32> {
        let Some(data) = self.channels.get(channel) else {
            return Vec::new();
        };
        let start = (start as usize).min(data.len());
        let end = start.saturating_add(count).min(data.len());
        data[start..end].to_vec()
    }
}

pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let declared_channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut channels: Vec<Vec<f32>> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let packet_channels = spec.channels.count();
        if packet_channels == 0 {
            log::warn!("Skipping packet with no channels");
            continue;
        }

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        deinterleave(sample_buf.samples(), packet_channels, &mut channels);
    }

    if channels.is_empty() {
        channels = vec![Vec::new(); declared_channels.max(1)];
    }

    let audio = AudioData::from_channels(channels, sample_rate);

    log::info!(
        "Decoded audio: {} frames x {} channels, {}Hz, {:.1}s",
        audio.frames(),
        audio.channel_count(),
        sample_rate,
        audio.duration()
    );

    Ok(audio)
}

/// Append interleaved `samples` of `packet_channels` channels to
/// `channels`. The first packet fixes the channel count; later packets with
/// fewer channels are padded with silence, extra channels are dropped.
fn deinterleave(samples: &[f32], packet_channels: usize, channels: &mut Vec<Vec<f32>>) {
    if packet_channels == 0 {
        return;
    }
    if channels.is_empty() {
        channels.resize(packet_channels, Vec::new());
    }
    for frame in samples.chunks(packet_channels) {
        for (i, channel) in channels.iter_mut().enumerate() {
            channel.push(frame.get(i).copied().unwrap_or(0.0));
        }
    }
}
