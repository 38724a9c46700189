//! Kiosk core: pure state machines and view-model helpers.
mod carousel;
mod effect;
mod event;
mod msg;
mod review;
mod state;
mod update;
mod view_model;

pub use carousel::{fade_alpha, CarouselState, FadeStart, FadeTicket, Slot, SlotChange, SlotView};
pub use effect::{DropReason, Effect};
pub use event::{parse_event, EventError, SceneUpdateEvent};
pub use msg::Msg;
pub use review::{build_cards, CardOffset, CardPlacer, CardSpread, RandomPlacer, ReviewCard};
pub use state::{AppState, QuerySession, SessionState};
pub use update::update;
pub use view_model::SessionView;
