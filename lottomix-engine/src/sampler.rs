use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use lottomix_db::error::LottoError;

use crate::analysis::NumberScores;

/// Seed effectif du run : celui de la configuration, sinon tiré au hasard.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random())
}

/// Tirage pondéré sans remise de `count` numéros parmi `candidates`.
/// Chaque poids reçoit `floor` en plus pour qu'aucun numéro ne soit exclu.
pub fn weighted_sample(
    candidates: &[(u8, f64)],
    count: usize,
    floor: f64,
    rng: &mut StdRng,
) -> Result<Vec<u8>, LottoError> {
    if count > candidates.len() {
        return Err(LottoError::InvalidTicket(format!(
            "{} numéros demandés pour {} candidats",
            count,
            candidates.len()
        )));
    }

    let mut available: Vec<(u8, f64)> = candidates
        .iter()
        .map(|&(n, w)| (n, w.max(0.0) + floor))
        .collect();
    let mut selected = Vec::with_capacity(count);

    for _ in 0..count {
        let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&weights)
            .map_err(|e| LottoError::InvalidTicket(format!("poids d'échantillonnage invalides : {}", e)))?;
        let idx = dist.sample(rng);
        selected.push(available.swap_remove(idx).0);
    }

    Ok(selected)
}

/// Numéro spécial tiré selon le score composite spécial.
pub fn select_special(scores: &NumberScores, floor: f64, rng: &mut StdRng) -> Result<u8, LottoError> {
    let candidates: Vec<(u8, f64)> = scores.iter().collect();
    weighted_sample(&candidates, 1, floor, rng)?
        .first()
        .copied()
        .ok_or_else(|| LottoError::InvalidTicket("aucun numéro spécial disponible".into()))
}

/// Classement décroissant où les scores à moins de `tolerance` d'écart
/// sont départagés au hasard.
///
/// Tri exact d'abord, puis mélange de chaque série de voisins dont l'écart
/// successif ne dépasse pas `tolerance`.
pub fn shuffled_ranking(scores: &NumberScores, tolerance: f64, rng: &mut StdRng) -> Vec<u8> {
    let mut numbers = scores.ranked();

    let mut start = 0;
    for end in 1..=numbers.len() {
        let run_ends = end == numbers.len()
            || scores.get(numbers[end - 1]) - scores.get(numbers[end]) > tolerance;
        if run_ends {
            numbers[start..end].shuffle(rng);
            start = end;
        }
    }
    numbers
}
