//! Kiosk engine: image cache, transitions, frame carousel and the scene update pipeline.
mod cache;
mod carousel;
mod config;
mod decode;
mod fetch;
mod orchestrator;
mod sequencer;
mod surface;
mod types;

pub use cache::{CacheError, EntryState, ImageCache, PrefetchSummary};
pub use carousel::{CarouselSettings, FadeOutcome, FrameCarousel};
pub use config::EngineConfig;
pub use decode::{decode_image, DecodeError};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use orchestrator::{QueryOrchestrator, Submission};
pub use sequencer::{TransitionSequencer, TransitionSettings};
pub use surface::{RecordedCommand, ScreenModel, ScreenState, UiCommand, UiSink};
pub use types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, ImageData, ImageHandle,
    PLACEHOLDER_SOURCE,
};
