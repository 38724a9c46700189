use engine_logging::{engine_debug, engine_info, engine_trace};
use kiosk_engine::{ScreenModel, ScreenState, UiCommand, UiSink};

/// Console stand-in for the display: keeps the screen model and logs every command.
#[derive(Default)]
pub struct ConsoleSink {
    screen: ScreenModel,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ScreenState {
        self.screen.snapshot()
    }

    /// Called once per frame; logs a summary only when something changed.
    pub fn present(&self, tick: u64) -> bool {
        if !self.screen.consume_dirty() {
            return false;
        }
        let state = self.screen.snapshot();
        engine_debug!("frame {}: {}", tick, summarize(&state));
        true
    }
}

impl UiSink for ConsoleSink {
    fn emit(&self, command: UiCommand) {
        match &command {
            UiCommand::SetTitle { text } => engine_info!("title: {:?}", text),
            UiCommand::SetSpeech { text, visible } => {
                if *visible {
                    engine_info!("speech: {:?}", text);
                } else {
                    engine_info!("speech hidden");
                }
            }
            UiCommand::ReplaceReviews { cards } => {
                engine_info!("reviews: {} card(s)", cards.len());
                for card in cards {
                    engine_debug!(
                        "{} at ({:.1}, {:.1}): {:?}",
                        card.name,
                        card.offset.x,
                        card.offset.y,
                        card.text
                    );
                }
            }
            UiCommand::SetPanelVisible { index, visible } => {
                engine_debug!("panel {} {}", index, if *visible { "shown" } else { "hidden" });
            }
            UiCommand::SetFrameImage { slot, image } => {
                let (width, height) = image.dimensions();
                engine_debug!(
                    "frame {:?} <- {} ({}x{}, {} bytes)",
                    slot,
                    image.source(),
                    width,
                    height,
                    image.data().rgba8.len()
                );
            }
            UiCommand::SetFrameAlpha { slot, alpha } => {
                engine_trace!("frame {:?} alpha {:.3}", slot, alpha);
            }
        }
        self.screen.emit(command);
    }
}

fn summarize(state: &ScreenState) -> String {
    let shown = state.panels.iter().filter(|visible| **visible).count();
    let frame = state
        .visible_frame()
        .map(|image| image.source().to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "title={:?} panels={}/{} frame={} reviews={} speech={}",
        state.title,
        shown,
        state.panels.len(),
        frame,
        state.reviews.len(),
        if state.speech_visible { "on" } else { "off" }
    )
}

#[cfg(test)]
mod tests {
    use kiosk_core::Slot;
    use kiosk_engine::{ImageHandle, UiCommand, UiSink};

    use super::ConsoleSink;

    #[test]
    fn present_reports_only_after_changes() {
        let sink = ConsoleSink::new();
        assert!(!sink.present(1));

        sink.emit(UiCommand::SetTitle {
            text: "Reading Room".to_string(),
        });
        sink.emit(UiCommand::SetSpeech {
            text: "Welcome".to_string(),
            visible: true,
        });
        sink.emit(UiCommand::SetFrameImage {
            slot: Slot::A,
            image: ImageHandle::placeholder(),
        });
        assert!(sink.present(2));
        assert!(!sink.present(3));

        let state = sink.snapshot();
        assert_eq!(state.title, "Reading Room");
        assert!(state.speech_visible);
        assert_eq!(state.visible_frame(), Some(&ImageHandle::placeholder()));
    }
}
