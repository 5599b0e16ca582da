//! Fragment decoding.

use std::fs::File;
use std::io::{Cursor, ErrorKind};

use storyvox_core::FragmentLocation;
use storyvox_error::{AssemblyError, AssemblyErrorKind};
use symphonia::core::audio::{AudioBufferRef, SampleBuffer};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::trace;

/// Sample rate and channel count of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{} Hz, {} ch", sample_rate, channels)]
pub struct StreamSpec {
    /// Frames per second
    pub sample_rate: u32,
    /// Interleaved channel count
    pub channels: u16,
}

/// Interleaved PCM samples.
///
/// Integer sources of 16 bits or fewer stay as `i16` so they can be written
/// back without conversion; everything else is carried as `f32`.
#[derive(Debug, Clone, PartialEq)]
pub enum Pcm {
    /// 16-bit integer samples
    Int16(Vec<i16>),
    /// 32-bit float samples
    Float(Vec<f32>),
}

impl Default for Pcm {
    fn default() -> Self {
        Self::Int16(Vec::new())
    }
}

impl Pcm {
    /// Number of interleaved samples.
    pub fn len(&self) -> usize {
        match self {
            Self::Int16(samples) => samples.len(),
            Self::Float(samples) => samples.len(),
        }
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `other`, widening to float if either side is float.
    pub fn append(&mut self, other: Pcm) {
        *self = match (std::mem::take(self), other) {
            (Self::Int16(mut acc), Self::Int16(more)) => {
                acc.extend(more);
                Self::Int16(acc)
            }
            (Self::Int16(acc), Self::Float(more)) => {
                Self::Float(acc.into_iter().map(to_float).chain(more).collect())
            }
            (Self::Float(mut acc), Self::Int16(more)) => {
                acc.extend(more.into_iter().map(to_float));
                Self::Float(acc)
            }
            (Self::Float(mut acc), Self::Float(more)) => {
                acc.extend(more);
                Self::Float(acc)
            }
        };
    }
}

fn to_float(sample: i16) -> f32 {
    f32::from(sample) / 32768.0
}

/// One fragment's decoded audio.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFragment {
    /// Stream layout
    pub spec: StreamSpec,
    /// Decoded samples
    pub pcm: Pcm,
}

/// Decode a whole fragment, consuming its location.
///
/// Any probe, codec or packet failure is reported as a decode failure of
/// fragment `sequence`.
pub fn decode_fragment(
    sequence: usize,
    location: FragmentLocation,
) -> Result<DecodedFragment, AssemblyError> {
    let fail = |reason: String| AssemblyError::new(AssemblyErrorKind::Decode { sequence, reason });

    let mut hint = Hint::new();
    let source: Box<dyn MediaSource> = match location {
        FragmentLocation::File(path) => {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                hint.with_extension(ext);
            }
            Box::new(File::open(&path).map_err(|e| fail(e.to_string()))?)
        }
        FragmentLocation::Memory(bytes) => Box::new(Cursor::new(bytes)),
    };

    let stream = MediaSourceStream::new(source, Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| fail(format!("unrecognized container: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| fail("no audio track".to_string()))?;
    let track_id = track.id;
    let mut spec = match (track.codec_params.sample_rate, track.codec_params.channels) {
        (Some(sample_rate), Some(channels)) => Some(StreamSpec {
            sample_rate,
            channels: channels.count() as u16,
        }),
        _ => None,
    };
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| fail(format!("unsupported codec: {}", e)))?;

    let mut pcm: Option<Pcm> = None;
    let mut packets = 0usize;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(fail(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| fail(e.to_string()))?;
        let signal = *decoded.spec();
        spec.get_or_insert(StreamSpec {
            sample_rate: signal.rate,
            channels: signal.channels.count() as u16,
        });

        let frames = decoded.capacity() as u64;
        let narrow = is_narrow_integer(&decoded);
        match pcm.get_or_insert_with(|| {
            if narrow {
                Pcm::Int16(Vec::new())
            } else {
                Pcm::Float(Vec::new())
            }
        }) {
            Pcm::Int16(samples) => {
                let mut buf = SampleBuffer::<i16>::new(frames, signal);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Pcm::Float(samples) => {
                let mut buf = SampleBuffer::<f32>::new(frames, signal);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
        }
        packets += 1;
    }

    let spec =
        spec.ok_or_else(|| fail("stream has no sample rate or channel layout".to_string()))?;
    let pcm = pcm.unwrap_or_default();
    trace!(sequence, packets, samples = pcm.len(), %spec, "Decoded fragment");
    Ok(DecodedFragment { spec, pcm })
}

fn is_narrow_integer(buffer: &AudioBufferRef<'_>) -> bool {
    matches!(
        buffer,
        AudioBufferRef::U8(_)
            | AudioBufferRef::U16(_)
            | AudioBufferRef::S8(_)
            | AudioBufferRef::S16(_)
    )
}
