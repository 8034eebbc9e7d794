use lottomix_db::models::{Draw, Pool};

use super::NumberScores;

/// Nombre de tirages contenant chaque numéro (index = numéro - 1).
pub fn count_occurrences(draws: &[Draw], pool: Pool, size: usize) -> Vec<u32> {
    let mut counts = vec![0u32; size];

    for draw in draws {
        for &n in pool.numbers_from(draw) {
            let idx = (n as usize).wrapping_sub(1);
            if idx < size {
                counts[idx] += 1;
            }
        }
    }

    counts
}

/// Fréquence normalisée par le maximum : le numéro le plus sorti vaut 1.0.
pub fn frequency_scores(draws: &[Draw], pool: Pool, size: usize) -> NumberScores {
    let counts: Vec<f64> = count_occurrences(draws, pool, size)
        .into_iter()
        .map(|c| c as f64)
        .collect();
    NumberScores::max_normalized(&counts)
}
