use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::Value;
use storyvox_core::{Emotion, FragmentLocation};
use storyvox_error::CollaboratorErrorKind;
use storyvox_interface::{SceneIllustrator, SpeechSynthesizer};
use storyvox_models::{HttpSceneIllustrator, HttpSpeechSynthesizer};
use tempfile::TempDir;

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn echo_audio(Json(body): Json<Value>) -> Vec<u8> {
    format!("{}|{}", body["emotion"].as_str().unwrap(), body["text"].as_str().unwrap())
        .into_bytes()
}

async fn unknown_voice(Json(body): Json<Value>) -> (StatusCode, String) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("no reference voice for emotion '{}'", body["emotion"].as_str().unwrap()),
    )
}

#[tokio::test]
async fn synthesizer_posts_label_and_stores_fragment() {
    let base = spawn(Router::new().route("/synthesize", post(echo_audio))).await;
    let dir = TempDir::new().unwrap();
    let synthesizer =
        HttpSpeechSynthesizer::new(format!("{}/synthesize", base), dir.path().join("fragments"));

    let location = synthesizer
        .synthesize(Emotion::Surprise, "Boo!")
        .await
        .unwrap();

    let FragmentLocation::File(path) = location else {
        panic!("expected a file fragment");
    };
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
    assert!(path.starts_with(dir.path().join("fragments")));
    assert_eq!(std::fs::read(&path).unwrap(), b"surprise|Boo!");
}

#[tokio::test]
async fn synthesizer_reports_unrecognized_emotion() {
    let base = spawn(Router::new().route("/synthesize", post(unknown_voice))).await;
    let dir = TempDir::new().unwrap();
    let synthesizer = HttpSpeechSynthesizer::new(format!("{}/synthesize", base), dir.path());

    let err = synthesizer
        .synthesize(Emotion::Disgust, "Ugh.")
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        CollaboratorErrorKind::UnrecognizedEmotion("disgust".to_string())
    );
}

#[tokio::test]
async fn synthesizer_reports_server_failures() {
    let base = spawn(Router::new().route(
        "/synthesize",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
    ))
    .await;
    let dir = TempDir::new().unwrap();
    let synthesizer = HttpSpeechSynthesizer::new(format!("{}/synthesize", base), dir.path());

    let err = synthesizer
        .synthesize(Emotion::Calm, "Hello.")
        .await
        .unwrap_err();

    assert!(matches!(err.kind, CollaboratorErrorKind::Rejected(ref m) if m.contains("model crashed")));
}

#[tokio::test]
async fn synthesizer_rejects_empty_audio() {
    let base = spawn(Router::new().route("/synthesize", post(|| async { Vec::<u8>::new() }))).await;
    let dir = TempDir::new().unwrap();
    let synthesizer = HttpSpeechSynthesizer::new(format!("{}/synthesize", base), dir.path());

    let err = synthesizer
        .synthesize(Emotion::Calm, "Hello.")
        .await
        .unwrap_err();

    assert_eq!(err.kind, CollaboratorErrorKind::EmptyOutput);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = TempDir::new().unwrap();
    let synthesizer = HttpSpeechSynthesizer::new(format!("http://{}/synthesize", addr), dir.path());

    let err = synthesizer
        .synthesize(Emotion::Calm, "Hello.")
        .await
        .unwrap_err();

    assert!(matches!(err.kind, CollaboratorErrorKind::Transport(_)));
}

#[tokio::test]
async fn illustrator_stores_png() {
    let base = spawn(Router::new().route(
        "/illustrate",
        post(|Json(body): Json<Value>| async move {
            body["prompt"].as_str().unwrap().as_bytes().to_vec()
        }),
    ))
    .await;
    let dir = TempDir::new().unwrap();
    let illustrator = HttpSceneIllustrator::new(format!("{}/illustrate", base), dir.path());

    let image = illustrator.illustrate("a quiet forest").await.unwrap();

    assert_eq!(image.path.extension().and_then(|e| e.to_str()), Some("png"));
    assert_eq!(std::fs::read(&image.path).unwrap(), b"a quiet forest");
}
