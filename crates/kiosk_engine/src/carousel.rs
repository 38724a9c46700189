use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use kiosk_core::{fade_alpha, CarouselState, SlotChange};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::surface::{UiCommand, UiSink};
use crate::ImageHandle;

#[derive(Debug, Clone)]
pub struct CarouselSettings {
    pub fade_duration: Duration,
    /// How often the fade ramp is sampled.
    pub tick_interval: Duration,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            fade_duration: Duration::from_secs(1),
            tick_interval: Duration::from_secs(1) / 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOutcome {
    Completed { index: usize },
    /// Fewer than two images are loaded.
    Skipped,
    /// Stopped, or a later `load` or crossfade took over.
    Cancelled,
}

/// Drives [`CarouselState`] in wall-clock time and forwards slot changes to the UI.
pub struct FrameCarousel {
    settings: CarouselSettings,
    state: Mutex<CarouselState<ImageHandle>>,
    cancel: Mutex<CancellationToken>,
    sink: Arc<dyn UiSink>,
}

impl FrameCarousel {
    pub fn new(settings: CarouselSettings, sink: Arc<dyn UiSink>) -> Self {
        Self {
            settings,
            state: Mutex::new(CarouselState::new()),
            cancel: Mutex::new(CancellationToken::new()),
            sink,
        }
    }

    pub fn snapshot(&self) -> CarouselState<ImageHandle> {
        self.state().clone()
    }

    /// Cancels any fade in flight, then shows `images[0]` (or the placeholder).
    pub fn load(&self, images: Vec<ImageHandle>) {
        let mut state = self.state();
        self.renew_token();
        if images.is_empty() {
            engine_info!("no images resolved; showing placeholder");
        }
        let changes = state.load(images, ImageHandle::placeholder());
        engine_debug!("frame loaded with {} images", state.len());
        self.forward(changes);
    }

    /// Stops a fade in flight where it is. The next `load` or crossfade resets the slots.
    pub fn stop(&self) {
        self.renew_token();
    }

    /// Crossfade to the next image over `fade_duration`.
    pub async fn crossfade_to_next(&self) -> FadeOutcome {
        let (ticket, token) = {
            let mut state = self.state();
            let Some(start) = state.begin_fade() else {
                engine_info!(
                    "frame has {} image(s); skipping crossfade",
                    state.len()
                );
                return FadeOutcome::Skipped;
            };
            let token = self.renew_token();
            self.forward(start.changes);
            (start.ticket, token)
        };

        let duration = self.settings.fade_duration;
        let started = Instant::now();
        let mut ticker = interval(self.settings.tick_interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            let elapsed = started.elapsed();
            if elapsed > duration {
                break;
            }
            {
                let mut state = self.state();
                let Some(changes) = state.sample_fade(ticket, fade_alpha(elapsed, duration)) else {
                    return FadeOutcome::Cancelled;
                };
                self.forward(changes);
            }
            tokio::select! {
                biased;
                _ = token.cancelled() => return FadeOutcome::Cancelled,
                _ = ticker.tick() => {}
            }
        }

        let mut state = self.state();
        match state.finish_fade(ticket) {
            Some(changes) => {
                self.forward(changes);
                FadeOutcome::Completed {
                    index: state.current_index(),
                }
            }
            None => FadeOutcome::Cancelled,
        }
    }

    fn renew_token(&self) -> CancellationToken {
        let mut current = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }

    fn forward(&self, changes: Vec<SlotChange<ImageHandle>>) {
        for change in changes {
            self.sink.emit(UiCommand::from(change));
        }
    }

    fn state(&self) -> MutexGuard<'_, CarouselState<ImageHandle>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
