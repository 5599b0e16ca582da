use std::io::Cursor;
use std::path::{Path, PathBuf};

use storyvox_audio::{AudioAssembler, Pcm, Transcoder, decode_fragment};
use storyvox_core::{AudioFormat, AudioFragmentRef, FragmentLocation};
use storyvox_error::{AssemblyErrorKind, StoryvoxErrorKind, ValidationErrorKind};
use tempfile::TempDir;

fn int_spec(sample_rate: u32, channels: u16) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn write_int_wav(path: &Path, spec: hound::WavSpec, samples: &[i16]) {
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &sample in samples {
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

fn write_float_wav(path: &Path, sample_rate: u32, samples: &[f32]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &sample in samples {
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

fn fragment(dir: &TempDir, sequence: usize, samples: &[i16]) -> AudioFragmentRef {
    let path = dir.path().join(format!("fragment_{}.wav", sequence));
    write_int_wav(&path, int_spec(16_000, 1), samples);
    AudioFragmentRef::new(sequence, path)
}

fn read_int_samples(path: &Path) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

fn leftover_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[test]
fn concatenates_in_caller_order() {
    let fragments_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let fragments = vec![
        fragment(&fragments_dir, 0, &[1, 2, 3]),
        fragment(&fragments_dir, 1, &[4, 5]),
        fragment(&fragments_dir, 2, &[6, -7, 8]),
    ];

    let artifact = AudioAssembler::default()
        .assemble(fragments, AudioFormat::Wav, &out_dir.path().join("story.wav"))
        .unwrap();

    let (spec, samples) = read_int_samples(&artifact.path);
    assert_eq!(samples, vec![1, 2, 3, 4, 5, 6, -7, 8]);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(artifact.sample_rate, 16_000);
    assert_eq!(artifact.channels, 1);
    assert!((artifact.duration_seconds - 8.0 / 16_000.0).abs() < 1e-9);
}

#[test]
fn keeps_stereo_interleaving() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.wav");
    let second = dir.path().join("b.wav");
    write_int_wav(&first, int_spec(8_000, 2), &[10, -10, 20, -20]);
    write_int_wav(&second, int_spec(8_000, 2), &[30, -30]);

    let artifact = AudioAssembler::default()
        .assemble(
            vec![
                AudioFragmentRef::new(0, first),
                AudioFragmentRef::new(1, second),
            ],
            AudioFormat::Wav,
            &dir.path().join("out.wav"),
        )
        .unwrap();

    let (spec, samples) = read_int_samples(&artifact.path);
    assert_eq!(spec.channels, 2);
    assert_eq!(samples, vec![10, -10, 20, -20, 30, -30]);
    assert!((artifact.duration_seconds - 3.0 / 8_000.0).abs() < 1e-9);
}

#[test]
fn missing_fragment_fails_before_any_output() {
    let fragments_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let fragments = vec![
        fragment(&fragments_dir, 0, &[1, 2, 3]),
        AudioFragmentRef::new(1, fragments_dir.path().join("never_synthesized.wav")),
        fragment(&fragments_dir, 2, &[4, 5, 6]),
    ];
    let destination = out_dir.path().join("story.wav");

    let err = AudioAssembler::default()
        .assemble(fragments, AudioFormat::Wav, &destination)
        .unwrap_err();

    match err.kind() {
        StoryvoxErrorKind::Validation(e) => {
            assert!(matches!(
                e.kind,
                ValidationErrorKind::MissingFragment { sequence: 1, .. }
            ));
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert!(!destination.exists());
    assert!(leftover_files(out_dir.path()).is_empty());
}

#[test]
fn empty_fragment_file_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.wav");
    std::fs::write(&empty, b"").unwrap();

    let err = AudioAssembler::default()
        .assemble(
            vec![AudioFragmentRef::new(0, empty)],
            AudioFormat::Wav,
            &dir.path().join("out.wav"),
        )
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        StoryvoxErrorKind::Validation(e)
            if matches!(e.kind, ValidationErrorKind::UnreadableFragment { sequence: 0, .. })
    ));
}

#[test]
fn out_of_order_fragments_are_rejected() {
    let dir = TempDir::new().unwrap();
    let fragments = vec![fragment(&dir, 1, &[1]), fragment(&dir, 0, &[2])];

    let err = AudioAssembler::default()
        .assemble(fragments, AudioFormat::Wav, &dir.path().join("out.wav"))
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        StoryvoxErrorKind::Validation(e)
            if e.kind == ValidationErrorKind::SequenceMismatch { position: 0, sequence: 1 }
    ));
}

#[test]
fn no_fragments_is_a_validation_error() {
    let dir = TempDir::new().unwrap();
    let err = AudioAssembler::default()
        .assemble(Vec::new(), AudioFormat::Wav, &dir.path().join("out.wav"))
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        StoryvoxErrorKind::Validation(e) if e.kind == ValidationErrorKind::NoFragments
    ));
}

#[test]
fn undecodable_fragment_aborts_assembly() {
    let fragments_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let garbage = fragments_dir.path().join("fragment_1.wav");
    std::fs::write(&garbage, b"this is not audio at all, just some text").unwrap();
    let fragments = vec![
        fragment(&fragments_dir, 0, &[1, 2, 3]),
        AudioFragmentRef::new(1, garbage),
        fragment(&fragments_dir, 2, &[4, 5, 6]),
    ];
    let destination = out_dir.path().join("story.wav");

    let err = AudioAssembler::default()
        .assemble(fragments, AudioFormat::Wav, &destination)
        .unwrap_err();

    match err.kind() {
        StoryvoxErrorKind::Assembly(e) => assert_eq!(e.kind.fragment(), Some(1)),
        other => panic!("expected assembly error, got {other}"),
    }
    assert!(!destination.exists());
    assert!(leftover_files(out_dir.path()).is_empty());
}

#[test]
fn mismatched_sample_rates_abort_assembly() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.wav");
    let second = dir.path().join("b.wav");
    write_int_wav(&first, int_spec(16_000, 1), &[1, 2]);
    write_int_wav(&second, int_spec(22_050, 1), &[3, 4]);

    let err = AudioAssembler::default()
        .assemble(
            vec![
                AudioFragmentRef::new(0, first),
                AudioFragmentRef::new(1, second),
            ],
            AudioFormat::Wav,
            &dir.path().join("out.wav"),
        )
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        StoryvoxErrorKind::Assembly(e)
            if matches!(e.kind, AssemblyErrorKind::SpecMismatch { sequence: 1, .. })
    ));
}

#[test]
fn float_fragments_produce_float_output() {
    let dir = TempDir::new().unwrap();
    let int_path = dir.path().join("a.wav");
    let float_path = dir.path().join("b.wav");
    write_int_wav(&int_path, int_spec(16_000, 1), &[16_384]);
    write_float_wav(&float_path, 16_000, &[0.25, -0.25]);

    let artifact = AudioAssembler::default()
        .assemble(
            vec![
                AudioFragmentRef::new(0, int_path),
                AudioFragmentRef::new(1, float_path),
            ],
            AudioFormat::Wav,
            &dir.path().join("out.wav"),
        )
        .unwrap();

    let mut reader = hound::WavReader::open(&artifact.path).unwrap();
    assert_eq!(reader.spec().sample_format, hound::SampleFormat::Float);
    let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 3);
    for (got, want) in samples.iter().zip([0.5f32, 0.25, -0.25]) {
        assert!((got - want).abs() < 1e-3, "{got} != {want}");
    }
}

#[test]
fn in_memory_fragments_are_decoded() {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, int_spec(16_000, 1)).unwrap();
        for sample in [7i16, 8, 9] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    let decoded = decode_fragment(0, FragmentLocation::Memory(cursor.into_inner())).unwrap();
    assert_eq!(decoded.spec.sample_rate, 16_000);
    assert_eq!(decoded.pcm, Pcm::Int16(vec![7, 8, 9]));
}

#[test]
fn destination_extension_follows_format() {
    let dir = TempDir::new().unwrap();
    let fragments = vec![fragment(&dir, 0, &[1, 2])];

    let artifact = AudioAssembler::default()
        .assemble(
            fragments,
            AudioFormat::Wav,
            &dir.path().join("nested/day/story.audio"),
        )
        .unwrap();

    assert_eq!(artifact.path, dir.path().join("nested/day/story.wav"));
    assert!(artifact.path.exists());
}

#[test]
fn unsupported_format_token_is_rejected() {
    let dir = TempDir::new().unwrap();
    let fragments = vec![fragment(&dir, 0, &[1, 2])];

    let err = AudioAssembler::default()
        .assemble_as(fragments, "aac", &dir.path().join("out"))
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        StoryvoxErrorKind::Validation(e)
            if e.kind == ValidationErrorKind::UnsupportedFormat("aac".to_string())
    ));
}

#[test]
fn failed_transcode_leaves_no_output() {
    let fragments_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let fragments = vec![fragment(&fragments_dir, 0, &[1, 2, 3])];
    let assembler = AudioAssembler::new(Transcoder::new("/nonexistent/bin/ffmpeg"));

    let err = assembler
        .assemble(fragments, AudioFormat::Mp3, &out_dir.path().join("story.mp3"))
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        StoryvoxErrorKind::Assembly(e) if matches!(e.kind, AssemblyErrorKind::Transcode(_))
    ));
    assert!(leftover_files(out_dir.path()).is_empty());
}
