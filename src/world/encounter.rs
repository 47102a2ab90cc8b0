//! Random encounter countdown

use rand::Rng;

use crate::core::config::Span;

/// Steps left before the next random encounter
#[derive(Debug, Clone)]
pub struct EncounterCounter {
    remaining: u32,
    span: Span,
}

impl EncounterCounter {
    pub fn new<R: Rng + ?Sized>(span: Span, rng: &mut R) -> Self {
        let mut counter = Self { remaining: 0, span };
        counter.reseed(rng);
        counter
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Roll a fresh countdown inside the configured span
    pub fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let low = self.span[0].min(self.span[1]).max(1);
        let high = self.span[0].max(self.span[1]).max(low);
        self.remaining = rng.gen_range(low..=high);
    }

    /// Count one step; true when the encounter is due
    ///
    /// The caller reseeds once the encounter has been handled.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fixed_span_fires_on_exact_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut counter = EncounterCounter::new([3, 3], &mut rng);

        assert!(!counter.tick());
        assert!(!counter.tick());
        assert!(counter.tick());

        counter.reseed(&mut rng);
        assert_eq!(counter.remaining(), 3);
    }

    #[test]
    fn test_reseed_stays_in_span() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut counter = EncounterCounter::new([8, 20], &mut rng);
        for _ in 0..100 {
            counter.reseed(&mut rng);
            assert!((8..=20).contains(&counter.remaining()));
        }
    }
}
