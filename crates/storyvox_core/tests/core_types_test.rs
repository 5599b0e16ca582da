use std::path::{Path, PathBuf};
use std::str::FromStr;

use storyvox_core::{
    AudioArtifact, AudioFormat, AudioFragmentRef, Emotion, FragmentLocation, ImageArtifact,
    PipelineResult, ScenePlan, SentenceEmotion, StoryRequest,
};
use storyvox_error::{PipelineErrorKind, ValidationErrorKind};
use strum::IntoEnumIterator;

#[test]
fn emotion_set_is_closed() {
    let labels: Vec<String> = Emotion::iter().map(|e| e.to_string()).collect();
    assert_eq!(
        labels,
        vec!["angry", "calm", "disgust", "fear", "happy", "neutral", "sad", "surprise"]
    );
    for label in &labels {
        assert_eq!(Emotion::from_str(label).unwrap().label(), label);
    }
    assert!(Emotion::from_str("feat").is_err());
}

#[test]
fn audio_format_rejects_unknown_tokens() {
    for format in AudioFormat::iter() {
        assert_eq!(format.extension().parse::<AudioFormat>().unwrap(), format);
    }

    let err = "aac".parse::<AudioFormat>().unwrap_err();
    assert_eq!(
        err.kind,
        ValidationErrorKind::UnsupportedFormat("aac".to_string())
    );
}

#[test]
fn audio_format_from_path() {
    assert_eq!(
        AudioFormat::from_path(Path::new("story.Mp3")).unwrap(),
        AudioFormat::Mp3
    );
    assert!(AudioFormat::from_path(Path::new("story")).is_err());
}

#[test]
fn fragment_location_describes_itself() {
    let file = FragmentLocation::from(PathBuf::from("/tmp/frag.wav"));
    assert_eq!(file.describe(), "/tmp/frag.wav");
    assert_eq!(file.path(), Some(Path::new("/tmp/frag.wav")));

    let memory = AudioFragmentRef::new(3, vec![0u8; 16]);
    assert_eq!(memory.sequence, 3);
    assert_eq!(memory.location.describe(), "<16 bytes in memory>");
    assert!(memory.location.path().is_none());
}

#[test]
fn scene_plan_keeps_degenerate_ranges() {
    let scene = ScenePlan::new(2, 12.0, 8.0, "a storm");
    assert_eq!(scene.duration(), -4.0);
}

#[test]
fn pipeline_result_builder_defaults_images() {
    let result = PipelineResult::builder()
        .story("Once upon a time.")
        .sentences(vec![SentenceEmotion::new("Once upon a time.", Emotion::Calm)])
        .audio(AudioArtifact {
            path: PathBuf::from("out.wav"),
            format: AudioFormat::Wav,
            duration_seconds: 1.5,
            sample_rate: 16_000,
            channels: 1,
        })
        .build()
        .unwrap();

    assert!(!result.has_images());
    assert_eq!(result.sentences().len(), 1);
    assert_eq!(result.audio().sample_rate, 16_000);
}

#[test]
fn story_request_names_the_empty_field() {
    let err = StoryRequest::new("a fox crosses a frozen river", "")
        .validate()
        .unwrap_err();
    assert_eq!(err.kind, PipelineErrorKind::InvalidRequest("genre"));

    let err = StoryRequest::new("\n\t", "fable").validate().unwrap_err();
    assert_eq!(err.kind, PipelineErrorKind::InvalidRequest("storyline"));
}

#[test]
fn story_request_deserializes_from_json() {
    let request: StoryRequest =
        serde_json::from_str(r#"{"storyline": "a robot learns to paint", "genre": "sci-fi"}"#)
            .unwrap();
    assert_eq!(request, StoryRequest::new("a robot learns to paint", "sci-fi"));
}
