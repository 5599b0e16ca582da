//! The story-to-narration state machine.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use storyvox_audio::AudioAssembler;
use storyvox_core::{
    AudioArtifact, AudioFormat, AudioFragmentRef, FragmentLocation, ImageArtifact, PipelineResult,
    SentenceEmotion, StoryRequest,
};
use storyvox_error::{
    CollaboratorErrorKind, CollaboratorResult, PipelineError, PipelineErrorKind,
    SegmentationError, Stage, StoryvoxError, StoryvoxErrorKind, StoryvoxResult, UpstreamError,
    UpstreamErrorKind,
};
use storyvox_interface::{SceneIllustrator, SpeechSynthesizer, TextGenerator};
use storyvox_parsing::{EmotionParser, ScenePlanParser};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::{CallLimiter, OutputLayout, PipelineConfig, PipelineState, PromptTemplates, TimeoutSettings};

/// Runs storylines through story generation, segmentation, synthesis,
/// assembly and the optional illustration tail.
///
/// Collaborators are injected at construction. Runs share nothing but the
/// [`CallLimiter`], so one orchestrator behind an `Arc` can serve any number
/// of concurrent runs.
///
/// Mandatory stages (story, segmentation, synthesis, assembly) end the run on
/// the first failure. A failure while planning or illustrating scenes is
/// logged and the run completes without images.
pub struct PipelineOrchestrator {
    text: Arc<dyn TextGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    illustrator: Option<Arc<dyn SceneIllustrator>>,
    prompts: PromptTemplates,
    emotion_parser: EmotionParser,
    scene_parser: ScenePlanParser,
    assembler: AudioAssembler,
    limiter: CallLimiter,
    layout: OutputLayout,
    timeouts: TimeoutSettings,
    output_format: AudioFormat,
    enable_images: bool,
    max_in_flight: usize,
    cleanup_fragments: bool,
}

impl std::fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("text_model", &self.text.model_name())
            .field("images_enabled", &self.images_enabled())
            .field("output_format", &self.output_format)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl PipelineOrchestrator {
    /// Build an orchestrator over the given collaborators.
    ///
    /// Pass `None` for `illustrator` to run without the image tail
    /// regardless of configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem [`PipelineConfig::validate`] finds.
    pub fn new(
        text: Arc<dyn TextGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
        illustrator: Option<Arc<dyn SceneIllustrator>>,
        config: &PipelineConfig,
    ) -> StoryvoxResult<Self> {
        config.validate()?;

        if config.pipeline.enable_images && illustrator.is_none() {
            info!("Image generation enabled but no illustrator supplied; runs will skip images");
        }

        Ok(Self {
            text,
            speech,
            illustrator,
            prompts: PromptTemplates::from_settings(&config.prompts)?,
            emotion_parser: EmotionParser::new(config.pipeline.unknown_emotion),
            scene_parser: ScenePlanParser::new(),
            assembler: AudioAssembler::new(config.transcoder.clone()),
            limiter: CallLimiter::new(config.pipeline.max_concurrent_calls),
            layout: OutputLayout::from(&config.output),
            timeouts: config.timeouts.clone(),
            output_format: config.output_format()?,
            enable_images: config.pipeline.enable_images,
            max_in_flight: config.pipeline.max_in_flight_per_run,
            cleanup_fragments: config.pipeline.cleanup_fragments,
        })
    }

    /// Share a call limiter with other orchestrators.
    pub fn with_limiter(mut self, limiter: CallLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Whether runs enter the illustration tail.
    pub fn images_enabled(&self) -> bool {
        self.enable_images && self.illustrator.is_some()
    }

    /// The limiter bounding collaborator calls.
    pub fn limiter(&self) -> &CallLimiter {
        &self.limiter
    }

    /// Where narrations are written.
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Run one storyline to completion.
    ///
    /// # Errors
    ///
    /// See [`run_with_cancellation`](Self::run_with_cancellation).
    pub async fn run(&self, storyline: &str, genre: &str) -> StoryvoxResult<PipelineResult> {
        self.run_with_cancellation(&StoryRequest::new(storyline, genre), CancellationToken::new())
            .await
    }

    /// Run one request, stopping early if `cancel` fires.
    ///
    /// Cancellation stops further collaborator calls; results already in
    /// flight are discarded rather than assembled.
    ///
    /// # Errors
    ///
    /// - Pipeline error for an empty storyline or genre, or a cancelled run
    /// - Upstream error naming the stage for a failed or timed-out
    ///   story, segmentation or synthesis call
    /// - Segmentation error when segmentation yields no usable segments
    /// - Validation or assembly error when the fragments cannot be joined
    #[instrument(
        skip_all,
        fields(run_id = %uuid::Uuid::new_v4(), genre = %request.genre)
    )]
    pub async fn run_with_cancellation(
        &self,
        request: &StoryRequest,
        cancel: CancellationToken,
    ) -> StoryvoxResult<PipelineResult> {
        let started = Instant::now();
        let outcome = self.execute(request, &cancel).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(result) => info!(
                duration_ms,
                segments = result.sentences().len(),
                images = result.images().len(),
                audio = %result.audio().path.display(),
                "Pipeline run complete"
            ),
            Err(e) if is_cancellation(e) => warn!(duration_ms, "Pipeline run cancelled"),
            Err(e) => error!(duration_ms, stage = ?e.stage(), error = %e, "Pipeline run failed"),
        }
        outcome
    }

    async fn execute(
        &self,
        request: &StoryRequest,
        cancel: &CancellationToken,
    ) -> StoryvoxResult<PipelineResult> {
        request.validate()?;
        let mut state = PipelineState::Idle;

        let story_prompt = self.prompts.story(&request.storyline, &request.genre);
        let story = self.generate_text(Stage::Story, &story_prompt, cancel).await?;
        state.advance(PipelineState::StoryGenerated);

        let segmentation_prompt = self.prompts.segmentation(&story);
        let raw = self
            .generate_text(Stage::Segmentation, &segmentation_prompt, cancel)
            .await?;
        let sentences = self.emotion_parser.parse(&raw);
        if sentences.is_empty() {
            return Err(
                SegmentationError::new(raw.len(), EmotionParser::candidate_lines(&raw)).into(),
            );
        }
        state.advance(PipelineState::EmotionsSegmented);

        let fragments = self.synthesize(&sentences, cancel).await?;
        let audio = self.assemble(fragments, cancel).await?;
        state.advance(PipelineState::AudioSynthesized);

        let images = match (&self.illustrator, self.enable_images) {
            (Some(illustrator), true) => {
                match self
                    .illustrate(illustrator.as_ref(), &story, &audio, cancel, &mut state)
                    .await
                {
                    Ok(images) => images,
                    Err(_) if cancel.is_cancelled() => {
                        remove_files([audio.path.clone()]).await;
                        return Err(PipelineError::new(PipelineErrorKind::Cancelled).into());
                    }
                    Err(e) => {
                        warn!(
                            stage = ?e.stage(),
                            error = %e,
                            "Illustration tail failed; completing without images"
                        );
                        Vec::new()
                    }
                }
            }
            _ => {
                debug!("Illustration tail disabled");
                Vec::new()
            }
        };
        state.advance(PipelineState::Complete);

        PipelineResult::builder()
            .story(story)
            .sentences(sentences)
            .audio(audio)
            .images(images)
            .build()
            .map_err(|e| PipelineError::new(PipelineErrorKind::Task(e.to_string())).into())
    }

    async fn generate_text(
        &self,
        stage: Stage,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> StoryvoxResult<String> {
        let text = self
            .call(
                stage,
                self.timeouts.text_generation(),
                cancel,
                self.text.generate(instruction),
            )
            .await?;
        if text.trim().is_empty() {
            return Err(UpstreamError::new(
                stage,
                UpstreamErrorKind::Collaborator(CollaboratorErrorKind::EmptyOutput),
            )
            .into());
        }
        debug!(%stage, chars = text.len(), "Text generated");
        Ok(text)
    }

    /// Synthesize every segment, keeping up to `max_in_flight` calls open,
    /// and return the fragments re-slotted into narration order.
    #[instrument(skip_all, fields(segments = sentences.len()))]
    async fn synthesize(
        &self,
        sentences: &[SentenceEmotion],
        cancel: &CancellationToken,
    ) -> StoryvoxResult<Vec<AudioFragmentRef>> {
        let limit = self.timeouts.synthesis();
        let mut slots: Vec<Option<FragmentLocation>> = vec![None; sentences.len()];
        let mut failure = None;

        {
            let calls: Vec<BoxFuture<'_, (usize, StoryvoxResult<FragmentLocation>)>> = sentences
                .iter()
                .enumerate()
                .map(|(sequence, sentence)| {
                    let call = self.call(
                        Stage::Synthesis,
                        limit,
                        cancel,
                        self.speech.synthesize(sentence.emotion, &sentence.text),
                    );
                    async move { (sequence, call.await) }.boxed()
                })
                .collect();
            let mut calls = stream::iter(calls).buffer_unordered(self.max_in_flight);

            while let Some((sequence, outcome)) = calls.next().await {
                match outcome {
                    Ok(location) => {
                        debug!(sequence, fragment = %location.describe(), "Fragment synthesized");
                        slots[sequence] = Some(location);
                    }
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
        }

        if let Some(e) = failure {
            if self.cleanup_fragments {
                remove_files(file_paths(slots.iter().flatten())).await;
            }
            return Err(e);
        }

        let fragments: Option<Vec<AudioFragmentRef>> = slots
            .into_iter()
            .enumerate()
            .map(|(sequence, slot)| slot.map(|location| AudioFragmentRef::new(sequence, location)))
            .collect();
        fragments.ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::Task(
                "synthesis finished with unfilled fragment slots".to_string(),
            ))
            .into()
        })
    }

    /// Join fragments on the blocking pool. Fragment files are removed
    /// afterwards, whatever the outcome, when cleanup is enabled.
    async fn assemble(
        &self,
        fragments: Vec<AudioFragmentRef>,
        cancel: &CancellationToken,
    ) -> StoryvoxResult<AudioArtifact> {
        let fragment_files = file_paths(fragments.iter().map(|f| &f.location));

        if cancel.is_cancelled() {
            if self.cleanup_fragments {
                remove_files(fragment_files).await;
            }
            return Err(PipelineError::new(PipelineErrorKind::Cancelled).into());
        }

        let assembler = self.assembler.clone();
        let format = self.output_format;
        let destination = self.layout.audio_destination(Local::now(), format);
        let outcome = tokio::task::spawn_blocking(move || {
            assembler.assemble(fragments, format, &destination)
        })
        .await;

        if self.cleanup_fragments {
            remove_files(fragment_files).await;
        }

        outcome.map_err(|e| {
            StoryvoxError::from(PipelineError::new(PipelineErrorKind::Task(e.to_string())))
        })?
    }

    /// Plan scenes over the finished narration and illustrate each one.
    ///
    /// Any failure is returned so the caller can degrade; images written
    /// before the failure are removed.
    #[instrument(skip_all, fields(duration_seconds = audio.duration_seconds))]
    async fn illustrate(
        &self,
        illustrator: &dyn SceneIllustrator,
        story: &str,
        audio: &AudioArtifact,
        cancel: &CancellationToken,
        state: &mut PipelineState,
    ) -> StoryvoxResult<Vec<ImageArtifact>> {
        let planning_prompt = self.prompts.scene_planning(story, audio.duration_seconds);
        let raw = self
            .generate_text(Stage::ScenePlanning, &planning_prompt, cancel)
            .await?;
        let scenes = self.scene_parser.parse(&raw, audio.duration_seconds);
        state.advance(PipelineState::ScenesPlanned);

        if scenes.is_empty() {
            warn!(raw_len = raw.len(), "Scene plan held no usable scenes");
            return Ok(Vec::new());
        }
        info!(scenes = scenes.len(), "Illustrating scenes");

        let limit = self.timeouts.illustration();
        let calls: Vec<BoxFuture<'_, (u32, StoryvoxResult<ImageArtifact>)>> = scenes
            .iter()
            .map(|scene| {
                let call = self.call(
                    Stage::Illustration,
                    limit,
                    cancel,
                    illustrator.illustrate(&scene.prompt),
                );
                async move { (scene.index, call.await) }.boxed()
            })
            .collect();
        let mut calls = stream::iter(calls).buffered(self.max_in_flight);

        // Images are all or nothing, so the first failure ends the tail.
        let mut images = Vec::with_capacity(scenes.len());
        let mut failure = None;
        while let Some((scene, outcome)) = calls.next().await {
            match outcome {
                Ok(image) => {
                    debug!(scene, path = %image.path.display(), "Scene illustrated");
                    images.push(image);
                }
                Err(e) => {
                    warn!(scene, error = %e, "Scene illustration failed");
                    failure = Some(e);
                    break;
                }
            }
        }
        drop(calls);

        if let Some(e) = failure {
            remove_files(images.into_iter().map(|image| image.path)).await;
            return Err(e);
        }

        state.advance(PipelineState::ImagesIllustrated);
        Ok(images)
    }

    /// One collaborator call: wait for a slot, then race the call against
    /// its timeout and the cancellation token.
    async fn call<T>(
        &self,
        stage: Stage,
        limit: Duration,
        cancel: &CancellationToken,
        call: impl Future<Output = CollaboratorResult<T>>,
    ) -> StoryvoxResult<T> {
        if cancel.is_cancelled() {
            debug!(%stage, "Skipping call for cancelled run");
            return Err(PipelineError::new(PipelineErrorKind::Cancelled).into());
        }

        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(PipelineError::new(PipelineErrorKind::Cancelled).into());
            }
            guard = self.limiter.acquire() => guard?,
        };

        let started = Instant::now();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%stage, "Cancelled during call");
                Err(PipelineError::new(PipelineErrorKind::Cancelled).into())
            }
            outcome = tokio::time::timeout(limit, call) => match outcome {
                Ok(Ok(value)) => {
                    debug!(
                        %stage,
                        duration_ms = started.elapsed().as_millis() as u64,
                        "Collaborator call finished"
                    );
                    Ok(value)
                }
                Ok(Err(e)) => Err(UpstreamError::from_collaborator(stage, e).into()),
                Err(_) => Err(UpstreamError::new(
                    stage,
                    UpstreamErrorKind::Timeout(limit.as_millis() as u64),
                )
                .into()),
            },
        }
    }
}

fn is_cancellation(err: &StoryvoxError) -> bool {
    matches!(
        err.kind(),
        StoryvoxErrorKind::Pipeline(PipelineError {
            kind: PipelineErrorKind::Cancelled,
            ..
        })
    )
}

fn file_paths<'a>(locations: impl IntoIterator<Item = &'a FragmentLocation>) -> Vec<PathBuf> {
    locations
        .into_iter()
        .filter_map(|location| location.path().map(|path| path.to_path_buf()))
        .collect()
}

async fn remove_files(paths: impl IntoIterator<Item = PathBuf>) {
    for path in paths {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Removed file"),
            Err(e) => debug!(path = %path.display(), error = %e, "Could not remove file"),
        }
    }
}
