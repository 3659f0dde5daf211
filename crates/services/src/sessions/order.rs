use rand::Rng;
use rand::seq::SliceRandom;

/// Randomized, length-bounded sequence of pool indices, one per round.
///
/// Built once per session and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayOrder(Vec<usize>);

impl PlayOrder {
    /// Number of rounds in the session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pool index shown at `round`.
    #[must_use]
    pub fn get(&self, round: usize) -> Option<usize> {
        self.0.get(round).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Shuffle `[0, pool_len)` and keep the first `min(target_rounds, pool_len)`.
pub fn build_order<R: Rng + ?Sized>(pool_len: usize, target_rounds: usize, rng: &mut R) -> PlayOrder {
    let mut indices: Vec<usize> = (0..pool_len).collect();
    indices.shuffle(rng);
    indices.truncate(target_rounds.min(pool_len));
    PlayOrder(indices)
}
