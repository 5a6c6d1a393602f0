//! Shuffle selection
//!
//! Shuffle never reorders the queue. Each step draws the next index
//! uniformly from the positions not yet visited in the current pass.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Draw uniformly from `0..len` minus `current` and minus `visited`
///
/// Returns `None` once every other position has been visited.
pub fn pick_unvisited<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    visited: &HashSet<usize>,
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = (0..len)
        .filter(|index| Some(*index) != current && !visited.contains(index))
        .collect();
    candidates.choose(rng).copied()
}

/// Draw uniformly from `0..len` minus `current`
///
/// Used when a pass is exhausted and repeats are allowed again.
pub fn pick_any_other<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    pick_unvisited(len, current, &HashSet::new(), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_picks_current() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pick = pick_any_other(4, Some(2), &mut rng).unwrap();
            assert_ne!(pick, 2);
            assert!(pick < 4);
        }
    }

    #[test]
    fn skips_visited_positions() {
        let mut rng = StdRng::seed_from_u64(11);
        let visited: HashSet<usize> = [0, 1, 3].into_iter().collect();

        for _ in 0..50 {
            assert_eq!(pick_unvisited(5, Some(2), &visited, &mut rng), Some(4));
        }
    }

    #[test]
    fn exhausted_pass_yields_none() {
        let mut rng = StdRng::seed_from_u64(3);
        let visited: HashSet<usize> = [0, 1].into_iter().collect();

        assert_eq!(pick_unvisited(3, Some(2), &visited, &mut rng), None);
        assert_eq!(pick_any_other(1, Some(0), &mut rng), None);
        assert_eq!(pick_any_other(0, None, &mut rng), None);
    }

    #[test]
    fn every_candidate_is_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(pick_any_other(5, Some(0), &mut rng).unwrap());
        }
        assert_eq!(seen, [1, 2, 3, 4].into_iter().collect());
    }
}
