use super::NumberScores;

/// `wf * fréquence + wr * récence`, numéro par numéro.
pub fn composite_scores(
    frequency: &NumberScores,
    recency: &NumberScores,
    frequency_weight: f64,
    recency_weight: f64,
) -> NumberScores {
    let scores = frequency
        .as_slice()
        .iter()
        .zip(recency.as_slice())
        .map(|(&f, &r)| frequency_weight * f + recency_weight * r)
        .collect();
    NumberScores::new(scores)
}
