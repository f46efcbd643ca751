use rand::Rng;
use std::cmp::Ordering;

/// Binary tournament: draw two distinct indices, the fitter one wins.
///
/// On a tie the second candidate wins. `fitness` must hold at least two entries.
pub fn tournament_selection<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    debug_assert!(n >= 2, "tournament needs two candidates");
    let first = rng.gen_range(0..n);
    // Draw from the n-1 remaining slots so the candidates are always distinct.
    let mut second = rng.gen_range(0..n - 1);
    if second >= first {
        second += 1;
    }

    if fitness[first] > fitness[second] {
        first
    } else {
        second
    }
}

/// Indices of the `count` largest fitness values, best first.
///
/// Ties keep their original index order.
pub fn elite_indices(fitness: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    // Stable sort keeps equal fitness values in index order.
    order.sort_by(|&a, &b| descending(fitness[a], fitness[b]));
    order.truncate(count);
    order
}

/// Position and value of the largest fitness, first occurrence on ties.
pub fn best_index(fitness: &[f64]) -> Option<(usize, f64)> {
    fitness
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, f)| match best {
            Some((_, b)) if f <= b => best,
            _ => Some((i, f)),
        })
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_elite_indices_break_ties_by_index() {
        let fitness = [1.0, 5.0, 3.0, 5.0, 5.0, -2.0];
        assert_eq!(elite_indices(&fitness, 4), vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_elite_indices_zero_count() {
        assert!(elite_indices(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_tournament_picks_distinct_candidates() {
        // With two entries the candidates are always {0, 1}, so the fitter one always wins.
        let fitness = [0.5, 9.0];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(tournament_selection(&fitness, &mut rng), 1);
        }
    }

    #[test]
    fn test_tournament_never_selects_worst() {
        let fitness = [3.0, -10.0, 4.0, 2.0];
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            assert_ne!(tournament_selection(&fitness, &mut rng), 1);
        }
    }

    #[test]
    fn test_best_index_first_occurrence() {
        assert_eq!(best_index(&[2.0, 7.0, 7.0]), Some((1, 7.0)));
        assert_eq!(best_index(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }
}
