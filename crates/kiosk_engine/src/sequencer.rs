use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use engine_logging::engine_debug;
use tokio::time::sleep;

use crate::surface::{UiCommand, UiSink};

#[derive(Debug, Clone)]
pub struct TransitionSettings {
    pub panel_count: usize,
    pub step_delay: Duration,
    /// Pause after the last panel is shown before `cover` returns.
    pub hold_delay: Duration,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            panel_count: 10,
            step_delay: Duration::from_millis(200),
            hold_delay: Duration::from_millis(500),
        }
    }
}

/// Wipe transition over `panel_count` opaque panels.
///
/// `cover` shows panels 0..N in turn, `reveal` hides them in the same order.
/// Panels keep whatever visibility the last run left them in, so callers pair
/// every `cover` with a `reveal`. Runs are not cancellable.
pub struct TransitionSequencer {
    settings: TransitionSettings,
    panels: Mutex<Vec<bool>>,
    sink: Arc<dyn UiSink>,
}

impl TransitionSequencer {
    /// All panels start hidden.
    pub fn new(settings: TransitionSettings, sink: Arc<dyn UiSink>) -> Self {
        let sequencer = Self {
            panels: Mutex::new(vec![false; settings.panel_count]),
            settings,
            sink,
        };
        for index in 0..sequencer.settings.panel_count {
            sequencer.sink.emit(UiCommand::SetPanelVisible {
                index,
                visible: false,
            });
        }
        sequencer
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    pub fn visible_panels(&self) -> Vec<bool> {
        self.panels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Completes after `N * step_delay + hold_delay`.
    pub async fn cover(&self) {
        engine_debug!("wipe cover: {} panels", self.settings.panel_count);
        self.run(true).await;
        sleep(self.settings.hold_delay).await;
    }

    /// Completes after `N * step_delay`.
    pub async fn reveal(&self) {
        engine_debug!("wipe reveal: {} panels", self.settings.panel_count);
        self.run(false).await;
    }

    async fn run(&self, visible: bool) {
        for index in 0..self.settings.panel_count {
            self.set_panel(index, visible);
            sleep(self.settings.step_delay).await;
        }
    }

    fn set_panel(&self, index: usize, visible: bool) {
        let mut panels = self.panels.lock().unwrap_or_else(PoisonError::into_inner);
        panels[index] = visible;
        self.sink.emit(UiCommand::SetPanelVisible { index, visible });
    }
}
