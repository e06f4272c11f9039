//! Maximal marginal relevance selection.

use super::cosine_similarity;

/// Greedily pick up to `k` of `candidates`, trading relevance to `query`
/// against similarity to what was already picked.
///
/// Each step takes the candidate maximising
/// `lambda * sim(query, c) - (1 - lambda) * max(sim(c, picked))`.
/// The first pick is always the most relevant candidate. Returns indices
/// into `candidates` in selection order; earlier candidates win ties.
pub fn select(query: &[f32], candidates: &[&[f32]], k: usize, lambda: f32) -> Vec<usize> {
    let k = k.min(candidates.len());
    if k == 0 {
        return Vec::new();
    }

    let relevance: Vec<f32> = candidates
        .iter()
        .map(|c| cosine_similarity(query, c))
        .collect();

    // Highest similarity to any selected candidate, per candidate.
    let mut redundancy = vec![f32::NEG_INFINITY; candidates.len()];
    let mut selected: Vec<usize> = Vec::with_capacity(k);

    while selected.len() < k {
        let mut best: Option<(usize, f32)> = None;
        for (i, &rel) in relevance.iter().enumerate() {
            if selected.contains(&i) {
                continue;
            }
            let score = if selected.is_empty() {
                rel
            } else {
                lambda * rel - (1.0 - lambda) * redundancy[i]
            };
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((i, score)),
            }
        }

        let Some((chosen, _)) = best else { break };
        selected.push(chosen);

        for (i, candidate) in candidates.iter().enumerate() {
            let sim = cosine_similarity(candidate, candidates[chosen]);
            if sim > redundancy[i] {
                redundancy[i] = sim;
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pick_is_most_relevant() {
        let query = [1.0, 0.0];
        let a = [0.5, 0.5];
        let b = [1.0, 0.1];
        let picked = select(&query, &[&a, &b], 1, 0.5);
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn test_duplicates_are_penalised() {
        let query = [1.0, 1.0, 0.0];
        let a = [1.0, 0.9, 0.0];
        let a_dup = [1.0, 0.9, 0.0];
        let b = [0.2, 1.0, 0.3];
        let picked = select(&query, &[&a, &a_dup, &b], 2, 0.5);
        assert_eq!(picked, vec![0, 2]);
    }

    #[test]
    fn test_lambda_one_is_pure_relevance() {
        let query = [1.0, 0.0];
        let a = [1.0, 0.0];
        let a_dup = [1.0, 0.0];
        let b = [0.0, 1.0];
        let picked = select(&query, &[&a, &a_dup, &b], 2, 1.0);
        assert_eq!(picked, vec![0, 1]);
    }

    #[test]
    fn test_k_larger_than_pool() {
        let query = [1.0];
        let a = [1.0];
        let picked = select(&query, &[&a], 4, 0.5);
        assert_eq!(picked, vec![0]);
        assert!(select(&query, &[], 4, 0.5).is_empty());
        assert!(select(&query, &[&a], 0, 0.5).is_empty());
    }
}
