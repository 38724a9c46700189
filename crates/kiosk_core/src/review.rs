use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardOffset {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCard {
    pub name: String,
    pub text: String,
    pub offset: CardOffset,
}

/// Supplies the scatter offset of each card relative to its layout anchor.
pub trait CardPlacer: Send {
    fn place(&mut self, index: usize) -> CardOffset;
}

/// Offsets are `step * (U(-x_range, x_range), U(-y_range, y_range))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSpread {
    pub step: f32,
    pub x_range: f32,
    pub y_range: f32,
}

impl Default for CardSpread {
    fn default() -> Self {
        Self {
            step: 30.0,
            x_range: 15.0,
            y_range: 12.0,
        }
    }
}

pub struct RandomPlacer {
    spread: CardSpread,
    rng: StdRng,
}

impl RandomPlacer {
    pub fn new(spread: CardSpread) -> Self {
        Self {
            spread,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(spread: CardSpread, seed: u64) -> Self {
        Self {
            spread,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CardPlacer for RandomPlacer {
    fn place(&mut self, _index: usize) -> CardOffset {
        let step = finite_or_zero(self.spread.step);
        let x_range = sample_range(self.spread.x_range);
        let y_range = sample_range(self.spread.y_range);
        CardOffset {
            x: step * self.rng.random_range(-x_range..=x_range),
            y: step * self.rng.random_range(-y_range..=y_range),
        }
    }
}

// `random_range` panics when the span is not finite.
const MAX_RANGE: f32 = 1.0e6;

fn sample_range(value: f32) -> f32 {
    finite_or_zero(value).abs().min(MAX_RANGE)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// One card per review text, in input order.
pub fn build_cards(texts: &[String], placer: &mut dyn CardPlacer) -> Vec<ReviewCard> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| ReviewCard {
            name: format!("Review[{index}]"),
            text: text.clone(),
            offset: placer.place(index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{build_cards, CardOffset, CardPlacer, CardSpread, RandomPlacer};

    struct Diagonal;

    impl CardPlacer for Diagonal {
        fn place(&mut self, index: usize) -> CardOffset {
            CardOffset {
                x: index as f32,
                y: index as f32,
            }
        }
    }

    #[test]
    fn cards_follow_input_order() {
        let texts = vec!["nice".to_string(), "crowded".to_string()];
        let cards = build_cards(&texts, &mut Diagonal);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "Review[0]");
        assert_eq!(cards[0].text, "nice");
        assert_eq!(cards[1].name, "Review[1]");
        assert_eq!(cards[1].offset, CardOffset { x: 1.0, y: 1.0 });
    }

    #[test]
    fn no_texts_no_cards() {
        assert!(build_cards(&[], &mut Diagonal).is_empty());
    }

    #[test]
    fn random_offsets_stay_within_spread() {
        let spread = CardSpread::default();
        let mut placer = RandomPlacer::seeded(spread, 7);
        for index in 0..200 {
            let offset = placer.place(index);
            assert!(offset.x.abs() <= spread.step * spread.x_range);
            assert!(offset.y.abs() <= spread.step * spread.y_range);
        }
    }

    #[test]
    fn non_finite_spread_places_cards_at_anchor() {
        let spread = CardSpread {
            step: 30.0,
            x_range: f32::INFINITY,
            y_range: f32::NAN,
        };
        let mut placer = RandomPlacer::seeded(spread, 3);
        assert_eq!(placer.place(0), CardOffset { x: 0.0, y: 0.0 });

        let spread = CardSpread {
            step: f32::NAN,
            x_range: 15.0,
            y_range: 12.0,
        };
        let mut placer = RandomPlacer::seeded(spread, 3);
        assert_eq!(placer.place(0), CardOffset { x: 0.0, y: 0.0 });
    }

    #[test]
    fn huge_spread_is_capped() {
        let spread = CardSpread {
            step: 1.0,
            x_range: f32::MAX,
            y_range: -f32::MAX,
        };
        let mut placer = RandomPlacer::seeded(spread, 5);
        let offset = placer.place(0);
        assert!(offset.x.abs() <= 1.0e6);
        assert!(offset.y.abs() <= 1.0e6);
    }

    #[test]
    fn zero_spread_stacks_cards() {
        let spread = CardSpread {
            step: 30.0,
            x_range: 0.0,
            y_range: 0.0,
        };
        let mut placer = RandomPlacer::seeded(spread, 1);
        assert_eq!(placer.place(0), CardOffset { x: 0.0, y: 0.0 });
    }
}
