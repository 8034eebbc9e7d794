use lottomix_db::models::{Draw, Pool};

use super::NumberScores;

/// Somme des poids `exp(-decay * i)` des tirages contenant chaque numéro,
/// i = 0 pour le tirage le plus récent.
pub fn recency_weights(draws: &[Draw], pool: Pool, size: usize, decay: f64) -> Vec<f64> {
    let mut weights = vec![0.0f64; size];

    for (i, draw) in draws.iter().enumerate() {
        let weight = (-decay * i as f64).exp();
        for &n in pool.numbers_from(draw) {
            let idx = (n as usize).wrapping_sub(1);
            if idx < size {
                weights[idx] += weight;
            }
        }
    }

    weights
}

pub fn recency_scores(draws: &[Draw], pool: Pool, size: usize, decay: f64) -> NumberScores {
    NumberScores::max_normalized(&recency_weights(draws, pool, size, decay))
}
