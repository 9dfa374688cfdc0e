use nanorand::{Rng, WyRand};

pub struct Random {
    generator: WyRand,
}

impl Random {
    pub fn new() -> Self {
        Self {
            generator: WyRand::new(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            generator: WyRand::new_seed(seed),
        }
    }

    pub fn max(&mut self, max: f32) -> f32 {
        max * self.generator.generate::<f32>()
    }

    pub fn generate(&mut self) -> f32 {
        self.generator.generate()
    }

    /// Uniform value in [-spread, +spread].
    pub fn symmetric(&mut self, spread: f32) -> f32 {
        spread * (2.0 * self.generator.generate::<f32>() - 1.0)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives an independent random stream from the world seed and an entity
/// path such as `"plant:42"`. The same seed and path always produce the
/// same sequence, in any process and in any derivation order.
pub fn derive_stream(seed: &str, path: &str) -> Random {
    let mut hasher = blake3::Hasher::new();
    hasher.update(seed.as_bytes());
    hasher.update(b"/");
    hasher.update(path.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    Random::from_seed(u64::from_le_bytes(bytes))
}
