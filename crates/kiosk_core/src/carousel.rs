//! Two-slot crossfade state for the picture frame.
//!
//! The frame shows one image set. Two stacked slots alternate as the visible
//! one: a crossfade assigns the next image to the hidden slot and ramps both
//! alphas in opposite directions. Each mutation returns the [`SlotChange`]s
//! the renderer has to apply.
//!
//! Outside a fade the active slot shows `images[current_index]` at alpha 1 and
//! the other slot sits at alpha 0. Fades are identified by a [`FadeTicket`];
//! `load` and a newer fade invalidate older tickets so a stale fade can never
//! write into freshly loaded slots.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotView<H> {
    pub image: Option<H>,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotChange<H> {
    Image { slot: Slot, image: H },
    Alpha { slot: Slot, alpha: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FadeStart<H> {
    pub ticket: FadeTicket,
    pub next_index: usize,
    pub changes: Vec<SlotChange<H>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fade {
    generation: u64,
    next_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselState<H> {
    images: Vec<H>,
    current_index: usize,
    active_slot: Slot,
    slot_a: SlotView<H>,
    slot_b: SlotView<H>,
    fade: Option<Fade>,
    generation: u64,
}

impl<H> Default for CarouselState<H> {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            current_index: 0,
            active_slot: Slot::A,
            slot_a: SlotView {
                image: None,
                alpha: 1.0,
            },
            slot_b: SlotView {
                image: None,
                alpha: 0.0,
            },
            fade: None,
            generation: 0,
        }
    }
}

impl<H: Clone> CarouselState<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[H] {
        &self.images
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn active_slot(&self) -> Slot {
        self.active_slot
    }

    pub fn slot(&self, slot: Slot) -> &SlotView<H> {
        match slot {
            Slot::A => &self.slot_a,
            Slot::B => &self.slot_b,
        }
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Replace the image set. Any fade in flight is discarded and its ticket
    /// becomes stale. An empty set is replaced by `placeholder`.
    pub fn load(&mut self, images: Vec<H>, placeholder: H) -> Vec<SlotChange<H>> {
        self.fade = None;
        self.generation += 1;
        self.images = if images.is_empty() {
            vec![placeholder]
        } else {
            images
        };
        self.current_index = 0;
        self.active_slot = Slot::A;

        let first = self.images[0].clone();
        let mut changes = Vec::with_capacity(3);
        self.slot_a.image = Some(first.clone());
        changes.push(SlotChange::Image {
            slot: Slot::A,
            image: first,
        });
        self.set_alpha(Slot::A, 1.0, &mut changes);
        self.set_alpha(Slot::B, 0.0, &mut changes);
        changes
    }

    /// Start a fade to the next image. Returns `None` with fewer than two
    /// images. A fade already in flight is committed to its end state first.
    pub fn begin_fade(&mut self) -> Option<FadeStart<H>> {
        if self.images.len() < 2 {
            return None;
        }

        let mut changes = Vec::new();
        if let Some(previous) = self.fade.take() {
            self.commit(previous, &mut changes);
        }

        self.generation += 1;
        let next_index = (self.current_index + 1) % self.images.len();
        let incoming = self.active_slot.other();
        let image = self.images[next_index].clone();
        self.slot_mut(incoming).image = Some(image.clone());
        changes.push(SlotChange::Image {
            slot: incoming,
            image,
        });

        let fade = Fade {
            generation: self.generation,
            next_index,
        };
        self.fade = Some(fade);
        Some(FadeStart {
            ticket: FadeTicket {
                generation: fade.generation,
            },
            next_index,
            changes,
        })
    }

    /// Apply one sample of the ramp. `None` means the ticket is stale.
    pub fn sample_fade(&mut self, ticket: FadeTicket, alpha: f32) -> Option<Vec<SlotChange<H>>> {
        self.live_fade(ticket)?;
        let alpha = alpha.clamp(0.0, 1.0);
        let incoming = self.active_slot.other();
        let mut changes = Vec::with_capacity(2);
        self.set_alpha(incoming, alpha, &mut changes);
        self.set_alpha(self.active_slot, 1.0 - alpha, &mut changes);
        Some(changes)
    }

    /// Snap the fade to exactly 0/1, swap the active slot and advance the index.
    pub fn finish_fade(&mut self, ticket: FadeTicket) -> Option<Vec<SlotChange<H>>> {
        let fade = self.live_fade(ticket)?;
        self.fade = None;
        let mut changes = Vec::with_capacity(2);
        self.commit(fade, &mut changes);
        Some(changes)
    }

    fn live_fade(&self, ticket: FadeTicket) -> Option<Fade> {
        self.fade
            .filter(|fade| fade.generation == ticket.generation && ticket.generation == self.generation)
    }

    fn commit(&mut self, fade: Fade, changes: &mut Vec<SlotChange<H>>) {
        let incoming = self.active_slot.other();
        self.set_alpha(incoming, 1.0, changes);
        self.set_alpha(self.active_slot, 0.0, changes);
        self.active_slot = incoming;
        self.current_index = fade.next_index;
    }

    fn set_alpha(&mut self, slot: Slot, alpha: f32, changes: &mut Vec<SlotChange<H>>) {
        self.slot_mut(slot).alpha = alpha;
        changes.push(SlotChange::Alpha { slot, alpha });
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotView<H> {
        match slot {
            Slot::A => &mut self.slot_a,
            Slot::B => &mut self.slot_b,
        }
    }
}

/// Linear ramp position for `elapsed` into a fade of length `duration`.
pub fn fade_alpha(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}
