use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{FieldSize, Point};

/// Seeded RNG owned by a single game. Keeping the seed around makes any run
/// reproducible from its startup log line.
pub struct GameRng {
    rng: StdRng,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distr::uniform::SampleUniform,
        R: rand::distr::uniform::SampleRange<T>,
    {
        self.rng.random_range(range)
    }

    pub fn random_point(&mut self, field_size: FieldSize) -> Point {
        let x = self.random_range(0..field_size.width);
        let y = self.random_range(0..field_size.height);
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let field = FieldSize { width: 20, height: 20 };
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.random_point(field), b.random_point(field));
        }
    }

    #[test]
    fn test_random_point_in_bounds() {
        let field = FieldSize { width: 13, height: 7 };
        let mut rng = GameRng::new(1);
        for _ in 0..1000 {
            let point = rng.random_point(field);
            assert!(point.x < field.width);
            assert!(point.y < field.height);
        }
    }
}
