//! Mock random source producing deterministic bytes.

use crate::traits::RandomSource;

/// Fills buffers by cycling a fixed byte pattern.
#[derive(Debug, Clone)]
pub struct MockRandom {
    pattern: Vec<u8>,
}

impl MockRandom {
    /// Create a mock source repeating the given pattern.
    pub fn new(pattern: &[u8]) -> Self {
        assert!(!pattern.is_empty(), "pattern must not be empty");
        Self {
            pattern: pattern.to_vec(),
        }
    }
}

impl RandomSource for MockRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = self.pattern[i % self.pattern.len()];
        }
    }
}
