use kiosk_core::CardSpread;

use crate::carousel::CarouselSettings;
use crate::fetch::FetchSettings;
use crate::sequencer::TransitionSettings;

/// Everything the pipeline needs to be built.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub transition: TransitionSettings,
    pub carousel: CarouselSettings,
    pub card_spread: CardSpread,
}
