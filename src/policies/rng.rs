use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Source of the single random draw consumed by each action choice.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
    /// Non-negative integer in `[0, i32::MAX)`.
    fn next_non_negative(&mut self) -> u32;
    fn seed(&self) -> Option<u64> {
        None
    }
}

#[derive(Clone, Debug)]
pub struct MaybeSeededRng {
    seed: Option<u64>,
    rng: SmallRng,
}

impl MaybeSeededRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = if let Some(seed) = seed {
            SmallRng::seed_from_u64(seed)
        } else {
            SmallRng::from_os_rng()
        };

        Self { seed, rng }
    }
}

impl RandomSource for MaybeSeededRng {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_non_negative(&mut self) -> u32 {
        self.rng.random_range(0..i32::MAX as u32)
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

// only the seed is kept, the generator restarts from it
impl Serialize for MaybeSeededRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MaybeSeededRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seed = Deserialize::deserialize(deserializer)?;
        Ok(Self::new(seed))
    }
}

/// Replays a fixed list of draws, cycling when exhausted. An empty list always draws 0.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FixedDraws {
    draws: Vec<f64>,
    position: usize,
}

impl FixedDraws {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, position: 0 }
    }

    fn next(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.position % self.draws.len()];
        self.position = (self.position + 1) % self.draws.len();
        draw
    }
}

impl RandomSource for FixedDraws {
    fn next_unit(&mut self) -> f64 {
        self.next()
    }

    fn next_non_negative(&mut self) -> u32 {
        self.next() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: u64 = 1234;

    #[test]
    fn seeded_sources_agree() {
        let mut a = MaybeSeededRng::new(Some(SEED));
        let mut b = MaybeSeededRng::new(Some(SEED));

        for _ in 0..10 {
            assert_eq!(a.next_unit(), b.next_unit());
            assert_eq!(a.next_non_negative(), b.next_non_negative());
        }
    }

    #[test]
    fn draw_ranges() {
        let mut rng = MaybeSeededRng::new(Some(SEED));

        for _ in 0..1000 {
            let unit = rng.next_unit();
            assert!((0.0..1.0).contains(&unit));
            assert!(rng.next_non_negative() < i32::MAX as u32);
        }
    }

    #[test]
    fn entropy_source_has_no_seed() {
        assert_eq!(MaybeSeededRng::new(None).seed(), None);
        assert_eq!(MaybeSeededRng::new(Some(SEED)).seed(), Some(SEED));
    }

    #[test]
    fn serde_keeps_seed() {
        let rng = MaybeSeededRng::new(Some(SEED));
        let json = serde_json::to_string(&rng).unwrap();
        assert_eq!(json, "1234");

        let mut restored: MaybeSeededRng = serde_json::from_str(&json).unwrap();
        let mut fresh = MaybeSeededRng::new(Some(SEED));
        assert_eq!(restored.seed(), Some(SEED));
        assert_eq!(restored.next_unit(), fresh.next_unit());
    }

    #[test]
    fn fixed_draws_cycle() {
        let mut draws = FixedDraws::new(vec![0.25, 0.75, 3.9]);

        assert_eq!(draws.next_unit(), 0.25);
        assert_eq!(draws.next_unit(), 0.75);
        assert_eq!(draws.next_non_negative(), 3);
        assert_eq!(draws.next_unit(), 0.25);
    }

    #[test]
    fn fixed_draws_empty() {
        let mut draws = FixedDraws::default();
        assert_eq!(draws.next_unit(), 0.0);
        assert_eq!(draws.next_non_negative(), 0);
    }
}
