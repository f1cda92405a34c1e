//! Multiple-choice option selection.

use rand::seq::SliceRandom;
use rand::Rng;

/// Number of options presented per multiple-choice question.
pub const OPTION_COUNT: usize = 4;

/// Draw option indices for a multiple-choice question: the correct index plus
/// up to `k - 1` distinct distractors from the pool, in random order.
///
/// The result always contains `correct_idx` exactly once and no duplicates.
/// A pool of one yields just the correct index. `pool_size` must be at least
/// one and `correct_idx` within the pool.
pub fn pick_options<R: Rng>(
    rng: &mut R,
    pool_size: usize,
    correct_idx: usize,
    k: usize,
) -> Vec<usize> {
    debug_assert!(pool_size >= 1, "option pool must not be empty");
    debug_assert!(correct_idx < pool_size, "correct index out of pool bounds");

    if pool_size <= 1 {
        return vec![correct_idx];
    }

    let k = k.min(pool_size);
    let others: Vec<usize> = (0..pool_size).filter(|&i| i != correct_idx).collect();
    let mut opts: Vec<usize> = others.choose_multiple(rng, k - 1).copied().collect();
    opts.insert(0, correct_idx);
    opts.shuffle(rng);
    opts
}

/// Permute option indices and texts jointly, keeping each text aligned with
/// its index.
pub fn shuffle_paired<R: Rng>(rng: &mut R, indices: &mut [usize], texts: &mut [String]) {
    debug_assert_eq!(indices.len(), texts.len());
    let mut order: Vec<usize> = (0..indices.len()).collect();
    order.shuffle(rng);

    let old_indices = indices.to_vec();
    let old_texts = texts.to_vec();
    for (slot, &src) in order.iter().enumerate() {
        indices[slot] = old_indices[src];
        texts[slot] = old_texts[src].clone();
    }
}
