use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use kiosk_core::{
    build_cards, update, AppState, CardPlacer, DropReason, Effect, Msg, RandomPlacer,
    SceneUpdateEvent, SessionView,
};
use tokio::task::JoinHandle;

use crate::cache::ImageCache;
use crate::carousel::FrameCarousel;
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::sequencer::TransitionSequencer;
use crate::surface::{UiCommand, UiSink};
use crate::EngineConfig;

/// What happened to a submitted payload.
#[derive(Debug)]
pub enum Submission {
    /// Scene-change pipeline running in its own task.
    SceneStarted(JoinHandle<()>),
    /// Speech bubble updated; a frame crossfade was started and not awaited.
    SpeechApplied,
    Dropped(DropReason),
}

impl Submission {
    /// Waits for a started scene pipeline; returns immediately otherwise.
    pub async fn finished(self) {
        if let Submission::SceneStarted(handle) = self {
            if let Err(err) = handle.await {
                engine_error!("scene pipeline task failed: {}", err);
            }
        }
    }
}

/// Top-level scene update pipeline.
///
/// Accepts one scene change at a time; payloads arriving while one is in
/// progress are dropped. A scene change covers the screen while the images
/// prefetch, applies the new scene once both are done, then reveals it.
pub struct QueryOrchestrator {
    state: Mutex<AppState>,
    cache: ImageCache,
    sequencer: TransitionSequencer,
    carousel: Arc<FrameCarousel>,
    sink: Arc<dyn UiSink>,
    placer: Mutex<Box<dyn CardPlacer>>,
}

impl QueryOrchestrator {
    pub fn new(config: EngineConfig, sink: Arc<dyn UiSink>) -> Arc<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        let placer = Box::new(RandomPlacer::new(config.card_spread));
        Self::with_parts(config, fetcher, placer, sink)
    }

    pub fn with_parts(
        config: EngineConfig,
        fetcher: Arc<dyn Fetcher>,
        placer: Box<dyn CardPlacer>,
        sink: Arc<dyn UiSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(AppState::new()),
            cache: ImageCache::new(fetcher),
            sequencer: TransitionSequencer::new(config.transition, sink.clone()),
            carousel: Arc::new(FrameCarousel::new(config.carousel, sink.clone())),
            sink,
            placer: Mutex::new(placer),
        })
    }

    pub fn session(&self) -> SessionView {
        self.state().view()
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn carousel(&self) -> &FrameCarousel {
        &self.carousel
    }

    /// Hand a raw host payload to the pipeline. Must run inside a tokio runtime.
    pub fn submit(self: &Arc<Self>, raw: &str) -> Submission {
        engine_debug!("payload received ({} bytes)", raw.len());
        let mut submission = Submission::SpeechApplied;
        for effect in self.dispatch(Msg::PayloadReceived(raw.to_string())) {
            match effect {
                Effect::EventDropped { reason } => {
                    engine_warn!("dropping event: {}", reason);
                    submission = Submission::Dropped(reason);
                }
                Effect::ShowSpeech { text } => {
                    engine_info!("speech-only update");
                    self.show_speech(text);
                }
                Effect::AdvanceFrame => {
                    let carousel = self.carousel.clone();
                    tokio::spawn(async move {
                        let outcome = carousel.crossfade_to_next().await;
                        engine_debug!("speech crossfade ended: {:?}", outcome);
                    });
                }
                Effect::RunSceneChange(event) => {
                    let this = Arc::clone(self);
                    submission = Submission::SceneStarted(tokio::spawn(async move {
                        this.run_scene_change(event).await;
                    }));
                }
            }
        }
        submission
    }

    async fn run_scene_change(&self, event: SceneUpdateEvent) {
        let _finish = SceneGuard { orchestrator: self };
        let name = event.scene_name.clone().unwrap_or_default();
        engine_info!("scene change to {:?} started", name);
        self.carousel.stop();

        // Hard barrier: nothing is applied until both the cover and the prefetch are done.
        let ((), summary) = tokio::join!(
            self.sequencer.cover(),
            self.cache.prefetch_all(&event.image_links)
        );
        engine_debug!(
            "cover and prefetch done ({} ready, {} failed)",
            summary.ready,
            summary.failed
        );

        self.apply_scene(&name, event);
        self.sequencer.reveal().await;
        engine_info!("scene change to {:?} finished", name);
    }

    fn apply_scene(&self, name: &str, event: SceneUpdateEvent) {
        engine_info!("applying scene {:?}", name);
        self.sink.emit(UiCommand::SetTitle {
            text: name.to_string(),
        });
        self.carousel
            .load(self.cache.resolve_many(&event.image_links));
        self.show_speech(event.speech_text);

        let cards = {
            let mut placer = self.placer.lock().unwrap_or_else(PoisonError::into_inner);
            build_cards(&event.review_texts, &mut **placer)
        };
        engine_debug!("placing {} review cards", cards.len());
        self.sink.emit(UiCommand::ReplaceReviews { cards });
    }

    fn show_speech(&self, text: String) {
        let visible = !text.is_empty();
        self.sink.emit(UiCommand::SetSpeech { text, visible });
    }

    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self.state();
        let state = std::mem::take(&mut *guard);
        let (state, effects) = update(state, msg);
        *guard = state;
        effects
    }

    fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the session to idle when the scene pipeline ends, including by panic.
struct SceneGuard<'a> {
    orchestrator: &'a QueryOrchestrator,
}

impl Drop for SceneGuard<'_> {
    fn drop(&mut self) {
        self.orchestrator.dispatch(Msg::SceneFinished);
    }
}
