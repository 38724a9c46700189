//! Output boundary towards the rendering layer.
//!
//! The pipeline never draws anything itself. It emits [`UiCommand`]s into a
//! [`UiSink`]; the UI layer applies them. [`ScreenModel`] is a sink that folds
//! the commands into a [`ScreenState`] snapshot, optionally keeping a
//! timestamped log of every command.

use std::sync::{Mutex, MutexGuard, PoisonError};

use kiosk_core::{ReviewCard, Slot, SlotChange, SlotView};
use tokio::time::Instant;

use crate::ImageHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    SetTitle { text: String },
    SetSpeech { text: String, visible: bool },
    SetPanelVisible { index: usize, visible: bool },
    SetFrameImage { slot: Slot, image: ImageHandle },
    SetFrameAlpha { slot: Slot, alpha: f32 },
    ReplaceReviews { cards: Vec<ReviewCard> },
}

impl From<SlotChange<ImageHandle>> for UiCommand {
    fn from(change: SlotChange<ImageHandle>) -> Self {
        match change {
            SlotChange::Image { slot, image } => UiCommand::SetFrameImage { slot, image },
            SlotChange::Alpha { slot, alpha } => UiCommand::SetFrameAlpha { slot, alpha },
        }
    }
}

/// Receives UI commands. Implementations must not call back into the pipeline.
pub trait UiSink: Send + Sync {
    fn emit(&self, command: UiCommand);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    pub title: String,
    pub speech_text: String,
    pub speech_visible: bool,
    pub panels: Vec<bool>,
    pub frame_a: SlotView<ImageHandle>,
    pub frame_b: SlotView<ImageHandle>,
    pub reviews: Vec<ReviewCard>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            title: String::new(),
            speech_text: String::new(),
            speech_visible: false,
            panels: Vec::new(),
            frame_a: SlotView {
                image: None,
                alpha: 1.0,
            },
            frame_b: SlotView {
                image: None,
                alpha: 0.0,
            },
            reviews: Vec::new(),
        }
    }
}

impl ScreenState {
    pub fn frame(&self, slot: Slot) -> &SlotView<ImageHandle> {
        match slot {
            Slot::A => &self.frame_a,
            Slot::B => &self.frame_b,
        }
    }

    /// The fully opaque frame slot, if any.
    pub fn visible_frame(&self) -> Option<&ImageHandle> {
        [&self.frame_a, &self.frame_b]
            .into_iter()
            .find(|view| view.alpha >= 1.0)
            .and_then(|view| view.image.as_ref())
    }

    pub fn is_covered(&self) -> bool {
        !self.panels.is_empty() && self.panels.iter().all(|visible| *visible)
    }

    pub fn apply(&mut self, command: &UiCommand) {
        match command {
            UiCommand::SetTitle { text } => self.title = text.clone(),
            UiCommand::SetSpeech { text, visible } => {
                self.speech_text = text.clone();
                self.speech_visible = *visible;
            }
            UiCommand::SetPanelVisible { index, visible } => {
                if self.panels.len() <= *index {
                    self.panels.resize(index + 1, false);
                }
                self.panels[*index] = *visible;
            }
            UiCommand::SetFrameImage { slot, image } => {
                self.frame_mut(*slot).image = Some(image.clone());
            }
            UiCommand::SetFrameAlpha { slot, alpha } => self.frame_mut(*slot).alpha = *alpha,
            UiCommand::ReplaceReviews { cards } => self.reviews = cards.clone(),
        }
    }

    fn frame_mut(&mut self, slot: Slot) -> &mut SlotView<ImageHandle> {
        match slot {
            Slot::A => &mut self.frame_a,
            Slot::B => &mut self.frame_b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub at: Instant,
    pub command: UiCommand,
}

#[derive(Default)]
struct ScreenInner {
    state: ScreenState,
    log: Option<Vec<RecordedCommand>>,
    dirty: bool,
}

#[derive(Default)]
pub struct ScreenModel {
    inner: Mutex<ScreenInner>,
}

impl ScreenModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`ScreenModel::new`], but also keeps every command with the time it arrived.
    pub fn recording() -> Self {
        Self {
            inner: Mutex::new(ScreenInner {
                log: Some(Vec::new()),
                ..ScreenInner::default()
            }),
        }
    }

    pub fn snapshot(&self) -> ScreenState {
        self.lock().state.clone()
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.lock().log.clone().unwrap_or_default()
    }

    /// Returns whether any command arrived since the last call, then clears the flag.
    pub fn consume_dirty(&self) -> bool {
        std::mem::take(&mut self.lock().dirty)
    }

    fn lock(&self) -> MutexGuard<'_, ScreenInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UiSink for ScreenModel {
    fn emit(&self, command: UiCommand) {
        let mut inner = self.lock();
        inner.state.apply(&command);
        inner.dirty = true;
        if let Some(log) = inner.log.as_mut() {
            log.push(RecordedCommand {
                at: Instant::now(),
                command,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use kiosk_core::{CardOffset, ReviewCard, Slot};

    use super::{ScreenModel, UiCommand, UiSink};
    use crate::ImageHandle;

    #[test]
    fn commands_fold_into_screen_state() {
        let model = ScreenModel::recording();
        let image = ImageHandle::placeholder();
        model.emit(UiCommand::SetTitle {
            text: "Hall".to_string(),
        });
        model.emit(UiCommand::SetSpeech {
            text: String::new(),
            visible: false,
        });
        model.emit(UiCommand::SetPanelVisible {
            index: 2,
            visible: true,
        });
        model.emit(UiCommand::SetFrameImage {
            slot: Slot::A,
            image: image.clone(),
        });
        model.emit(UiCommand::ReplaceReviews {
            cards: vec![ReviewCard {
                name: "Review[0]".to_string(),
                text: "quiet".to_string(),
                offset: CardOffset::default(),
            }],
        });

        let screen = model.snapshot();
        assert_eq!(screen.title, "Hall");
        assert!(!screen.speech_visible);
        assert_eq!(screen.panels, vec![false, false, true]);
        assert!(!screen.is_covered());
        assert_eq!(screen.visible_frame(), Some(&image));
        assert_eq!(screen.reviews.len(), 1);
        assert_eq!(model.commands().len(), 5);
        assert!(model.consume_dirty());
        assert!(!model.consume_dirty());
    }

    #[test]
    fn plain_model_keeps_no_log() {
        let model = ScreenModel::new();
        model.emit(UiCommand::SetTitle {
            text: "Hall".to_string(),
        });
        assert!(model.commands().is_empty());
        assert_eq!(model.snapshot().title, "Hall");
    }
}
