//! Token sampling — temperature scaling plus nucleus (top-p) cutoff over
//! raw logits.
//!
//! Operates on plain `f32` slices so it stays independent of the inference
//! backend's token types; the caller maps the chosen index back to a token.

use rand::Rng;

/// Pick the index of the next token from a logit distribution.
///
/// Temperature 0 (or below) is greedy argmax. Otherwise logits are scaled by
/// `1/temperature`, softmaxed, restricted to the smallest set of tokens whose
/// cumulative probability reaches `top_p`, and sampled from the remaining
/// mass.
pub fn sample_index<R: Rng>(logits: &[f32], temperature: f32, top_p: f32, rng: &mut R) -> usize {
    debug_assert!(!logits.is_empty(), "cannot sample from an empty vocabulary");
    if logits.len() <= 1 {
        return 0;
    }
    if temperature <= 0.0 {
        return argmax(logits);
    }

    // Temperature scaling + numerically stable softmax.
    let scaled: Vec<f32> = logits.iter().map(|&l| l / temperature).collect();
    let max_logit = scaled.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let mut probs: Vec<f32> = scaled.iter().map(|&l| (l - max_logit).exp()).collect();
    let sum: f32 = probs.iter().sum();
    for p in &mut probs {
        *p /= sum;
    }

    // Nucleus cutoff: keep the smallest high-probability prefix whose mass
    // reaches top_p (always at least one token).
    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_by(|&a, &b| {
        probs[b]
            .partial_cmp(&probs[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept = Vec::new();
    let mut mass = 0.0_f32;
    for &idx in &order {
        kept.push(idx);
        mass += probs[idx];
        if mass >= top_p {
            break;
        }
    }

    // Sample within the kept mass.
    let r = rng.gen::<f32>() * mass;
    let mut acc = 0.0_f32;
    for &idx in &kept {
        acc += probs[idx];
        if r < acc {
            return idx;
        }
    }
    *kept.last().expect("nucleus always keeps at least one token")
}

fn argmax(logits: &[f32]) -> usize {
    let mut best = 0;
    for (i, &l) in logits.iter().enumerate() {
        if l > logits[best] {
            best = i;
        }
    }
    best
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_zero_temperature_is_greedy() {
        let logits = vec![0.1, 3.0, -1.0, 2.9];
        let mut rng = rng();
        for _ in 0..50 {
            assert_eq!(sample_index(&logits, 0.0, 0.95, &mut rng), 1);
        }
    }

    #[test]
    fn test_single_token_vocabulary() {
        let mut rng = rng();
        assert_eq!(sample_index(&[1.0], 0.7, 0.95, &mut rng), 0);
    }

    #[test]
    fn test_tight_nucleus_keeps_only_the_top_token() {
        // Index 2 holds essentially all probability mass; with a small
        // top_p the nucleus is exactly that one token.
        let logits = vec![0.0, 0.0, 20.0, 0.0];
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(sample_index(&logits, 0.7, 0.5, &mut rng), 2);
        }
    }

    #[test]
    fn test_sampling_only_returns_valid_indices() {
        let logits = vec![1.0, 1.1, 0.9, 1.05];
        let mut rng = rng();
        for _ in 0..200 {
            let idx = sample_index(&logits, 1.0, 0.95, &mut rng);
            assert!(idx < logits.len());
        }
    }

    #[test]
    fn test_uniform_logits_reach_multiple_tokens() {
        let logits = vec![1.0; 8];
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(sample_index(&logits, 1.0, 1.0, &mut rng));
        }
        assert!(seen.len() > 1, "uniform distribution collapsed to one token");
    }

    #[test]
    fn test_low_temperature_concentrates_on_the_mode() {
        let logits = vec![1.0, 2.0, 1.5];
        let mut rng = rng();
        let hits = (0..200)
            .filter(|_| sample_index(&logits, 0.1, 1.0, &mut rng) == 1)
            .count();
        assert!(hits > 190, "expected near-greedy behavior, got {hits}/200");
    }
}
