//! Randomizer behind the draw pile and random ability picks.
use hmac::{Hmac, Mac};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Source of uniform random indices and permutations.
///
/// Everything random in the engine reduces to these two draws, so swapping
/// the implementation makes whole playthroughs reproducible.
pub trait Shuffler {
    /// Uniform index in `0..bound`. Callers never pass a zero bound.
    fn next_index(&mut self, bound: usize) -> usize;

    /// Reorder `order` in place into a uniform permutation.
    fn permute(&mut self, order: &mut [usize]);

    /// Number of raw draws consumed so far.
    fn draws(&self) -> u64 {
        0
    }
}

/// Return a uniformly shuffled copy of `items`; the input is left untouched.
pub fn shuffle<T: Clone, S: Shuffler + ?Sized>(shuffler: &mut S, items: &[T]) -> Vec<T> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    shuffler.permute(&mut order);
    order.into_iter().map(|index| items[index].clone()).collect()
}

/// Pick a uniform index into a collection of `len` items.
pub fn pick<S: Shuffler + ?Sized>(shuffler: &mut S, len: usize) -> Option<usize> {
    (len > 0).then(|| shuffler.next_index(len))
}

/// ChaCha-backed shuffler seeded for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededShuffler {
    rng: CountingRng<ChaCha20Rng>,
}

impl SeededShuffler {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: CountingRng::new(seed),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }

    fn permute(&mut self, order: &mut [usize]) {
        order.shuffle(&mut self.rng);
    }

    fn draws(&self) -> u64 {
        self.rng.draws()
    }
}

/// Shuffler that never reorders anything.
///
/// `shuffle` returns its input order and `pick` always chooses the last
/// element, which keeps hand-written test scenarios readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityShuffler;

impl Shuffler for IdentityShuffler {
    fn next_index(&mut self, bound: usize) -> usize {
        bound.saturating_sub(1)
    }

    fn permute(&mut self, _order: &mut [usize]) {}
}

/// Independent random streams derived from one user-visible seed.
#[derive(Debug, Clone)]
pub struct RngStreams {
    pub draw: SeededShuffler,
    pub ability: SeededShuffler,
}

impl RngStreams {
    /// Expand a user seed into the pile-shuffle and ability streams.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            draw: SeededShuffler::from_seed(derive_stream_seed(seed, b"draw")),
            ability: SeededShuffler::from_seed(derive_stream_seed(seed, b"ability")),
        }
    }
}

/// Counting wrapper that records how much entropy a stream consumed.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so this branch is unreachable in practice.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut shuffler = SeededShuffler::from_seed(7);
        let items: Vec<u32> = (0..20).collect();
        let mut shuffled = shuffle(&mut shuffler, &items);
        assert_eq!(items, (0..20).collect::<Vec<_>>());
        assert_ne!(shuffled, items);
        shuffled.sort_unstable();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn tiny_inputs_are_unchanged_and_consume_nothing() {
        let mut shuffler = SeededShuffler::from_seed(1);
        assert!(shuffle::<u8, _>(&mut shuffler, &[]).is_empty());
        assert_eq!(shuffle(&mut shuffler, &[42]), vec![42]);
        assert_eq!(shuffler.draws(), 0);
        assert_eq!(pick(&mut shuffler, 0), None);
    }

    #[test]
    fn seeded_shuffle_matches_slice_shuffle() {
        let items: Vec<u32> = (0..12).collect();
        let mut shuffler = SeededShuffler::from_seed(31);
        let shuffled = shuffle(&mut shuffler, &items);

        let mut expected = items.clone();
        expected.shuffle(&mut CountingRng::new(31));
        assert_eq!(shuffled, expected);
        assert!(shuffler.draws() >= 11);
    }

    #[test]
    fn identity_shuffler_preserves_order() {
        let mut shuffler = IdentityShuffler;
        assert_eq!(shuffle(&mut shuffler, &[1, 2, 3, 4]), vec![1, 2, 3, 4]);
        assert_eq!(pick(&mut shuffler, 4), Some(3));
    }

    #[test]
    fn streams_are_reproducible_and_independent() {
        let mut first = RngStreams::from_user_seed(99);
        let mut second = RngStreams::from_user_seed(99);
        let items: Vec<u32> = (0..16).collect();
        assert_eq!(
            shuffle(&mut first.draw, &items),
            shuffle(&mut second.draw, &items)
        );
        assert_eq!(first.ability.draws(), 0);
        assert!(first.draw.draws() > 0);
        assert_ne!(derive_stream_seed(99, b"draw"), derive_stream_seed(99, b"ability"));
    }

    #[test]
    fn seeded_shuffle_is_roughly_uniform() {
        let mut shuffler = SeededShuffler::from_seed(2024);
        let mut first_slot = [0u32; 4];
        for _ in 0..4000 {
            let out = shuffle(&mut shuffler, &[0usize, 1, 2, 3]);
            first_slot[out[0]] += 1;
        }
        for count in first_slot {
            assert!((800..1200).contains(&count), "skewed count {count}");
        }
    }
}
