//! Fragment validation, concatenation and atomic output.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind};
use std::path::Path;

use storyvox_core::{AudioArtifact, AudioFormat, AudioFragmentRef, FragmentLocation};
use storyvox_error::{
    AssemblyError, AssemblyErrorKind, StoryvoxResult, ValidationError, ValidationErrorKind,
};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::{Pcm, StreamSpec, Transcoder, decode_fragment};

const TEMP_PREFIX: &str = ".storyvox-";

/// Joins synthesized fragments into one narration file.
///
/// Every fragment is checked before any decoding starts, fragments are
/// decoded in the order given, and the output appears at its final path only
/// once it has been completely written.
#[derive(Debug, Clone, Default, derive_getters::Getters)]
pub struct AudioAssembler {
    /// Converter used for non-WAV containers
    transcoder: Transcoder,
}

impl AudioAssembler {
    /// Create an assembler that uses `transcoder` for non-WAV output.
    pub fn new(transcoder: Transcoder) -> Self {
        Self { transcoder }
    }

    /// Assemble with the output container given as a token such as `"mp3"`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unsupported token before any
    /// fragment is touched.
    pub fn assemble_as(
        &self,
        fragments: Vec<AudioFragmentRef>,
        format: &str,
        destination: &Path,
    ) -> StoryvoxResult<AudioArtifact> {
        let format: AudioFormat = format.parse()?;
        self.assemble(fragments, format, destination)
    }

    /// Concatenate `fragments` in order and write them to `destination`.
    ///
    /// The extension of `destination` is replaced with the container's.
    /// Fragment `sequence` numbers must equal their positions.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`] if the list is empty, out of order, or any
    ///   fragment is missing or unreadable
    /// - [`AssemblyError`] if any fragment fails to decode, the fragments
    ///   disagree on sample rate or channels, or the output cannot be written
    ///
    /// On error nothing is written at the destination.
    #[instrument(
        skip_all,
        fields(fragments = fragments.len(), %format, destination = %destination.display())
    )]
    pub fn assemble(
        &self,
        fragments: Vec<AudioFragmentRef>,
        format: AudioFormat,
        destination: &Path,
    ) -> StoryvoxResult<AudioArtifact> {
        validate(&fragments)?;

        let mut spec: Option<StreamSpec> = None;
        let mut pcm = Pcm::default();
        for fragment in fragments {
            let sequence = fragment.sequence;
            let decoded = decode_fragment(sequence, fragment.location)?;
            match spec {
                None => spec = Some(decoded.spec),
                Some(expected) if expected != decoded.spec => {
                    return Err(AssemblyError::new(AssemblyErrorKind::SpecMismatch {
                        sequence,
                        expected: expected.to_string(),
                        found: decoded.spec.to_string(),
                    })
                    .into());
                }
                Some(_) => {}
            }
            pcm.append(decoded.pcm);
        }
        // validate() guarantees at least one fragment
        let Some(spec) = spec else {
            return Err(ValidationError::new(ValidationErrorKind::NoFragments).into());
        };

        let path = destination.with_extension(format.extension());
        let directory = output_directory(&path);
        fs::create_dir_all(directory).map_err(write_error)?;

        let wav = temp_file(directory, AudioFormat::Wav)?;
        write_wav(wav.as_file(), spec, &pcm)?;

        let finished = match format {
            AudioFormat::Wav => wav,
            other => {
                let converted = temp_file(directory, other)?;
                self.transcoder.transcode(wav.path(), converted.path(), other)?;
                converted
            }
        };
        finished.persist(&path).map_err(|e| write_error(e.error))?;

        let frames = pcm.len() / usize::from(spec.channels.max(1));
        let duration_seconds = frames as f64 / f64::from(spec.sample_rate.max(1));
        info!(
            path = %path.display(),
            duration_seconds,
            %spec,
            "Assembled narration"
        );

        Ok(AudioArtifact {
            path,
            format,
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }
}

/// Check every fragment resolves before any decoding work begins.
fn validate(fragments: &[AudioFragmentRef]) -> Result<(), ValidationError> {
    if fragments.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::NoFragments));
    }

    for (position, fragment) in fragments.iter().enumerate() {
        let sequence = fragment.sequence;
        if sequence != position {
            return Err(ValidationError::new(
                ValidationErrorKind::SequenceMismatch { position, sequence },
            ));
        }

        let unreadable = |reason: String| {
            ValidationError::new(ValidationErrorKind::UnreadableFragment { sequence, reason })
        };

        match &fragment.location {
            FragmentLocation::File(path) => {
                let metadata = fs::metadata(path).map_err(|e| {
                    if e.kind() == ErrorKind::NotFound {
                        ValidationError::new(ValidationErrorKind::MissingFragment {
                            sequence,
                            location: path.display().to_string(),
                        })
                    } else {
                        unreadable(e.to_string())
                    }
                })?;
                if !metadata.is_file() {
                    return Err(unreadable("not a regular file".to_string()));
                }
                if metadata.len() == 0 {
                    return Err(unreadable("file is empty".to_string()));
                }
                File::open(path).map_err(|e| unreadable(e.to_string()))?;
            }
            FragmentLocation::Memory(bytes) if bytes.is_empty() => {
                return Err(unreadable("buffer is empty".to_string()));
            }
            FragmentLocation::Memory(_) => {}
        }
    }

    debug!(fragments = fragments.len(), "All fragments resolve");
    Ok(())
}

fn output_directory(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn temp_file(directory: &Path, format: AudioFormat) -> Result<NamedTempFile, AssemblyError> {
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(directory)
        .map_err(write_error)
}

fn write_wav(file: &File, spec: StreamSpec, pcm: &Pcm) -> Result<(), AssemblyError> {
    let (bits_per_sample, sample_format) = match pcm {
        Pcm::Int16(_) => (16, hound::SampleFormat::Int),
        Pcm::Float(_) => (32, hound::SampleFormat::Float),
    };
    let wav_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample,
        sample_format,
    };

    let mut writer =
        hound::WavWriter::new(BufWriter::new(file), wav_spec).map_err(write_error)?;
    match pcm {
        Pcm::Int16(samples) => {
            for &sample in samples {
                writer.write_sample(sample).map_err(write_error)?;
            }
        }
        Pcm::Float(samples) => {
            for &sample in samples {
                writer.write_sample(sample).map_err(write_error)?;
            }
        }
    }
    writer.finalize().map_err(write_error)
}

fn write_error(e: impl std::fmt::Display) -> AssemblyError {
    AssemblyError::new(AssemblyErrorKind::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn bare_file_names_write_to_current_directory() {
        assert_eq!(output_directory(Path::new("story.wav")), Path::new("."));
        assert_eq!(
            output_directory(&PathBuf::from("out/story.wav")),
            Path::new("out")
        );
    }
}
