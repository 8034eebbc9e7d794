pub mod composite;
pub mod frequency;
pub mod hot_cold;
pub mod pairs;
pub mod recency;
pub mod summary;
pub mod trends;

use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;

use lottomix_db::history::DrawHistory;
use lottomix_db::models::{Draw, Pool, Variant};
use crate::config::EngineConfig;

use self::composite::composite_scores;
use self::frequency::frequency_scores;
use self::hot_cold::{HotCold, classify_hot_cold};
use self::pairs::{PairCounts, PairEntry};
use self::recency::recency_scores;

/// Score par numéro, indexé par `numéro - 1`, couvrant toute la plage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NumberScores {
    scores: Vec<f64>,
}

impl NumberScores {
    pub fn new(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    /// Divise par le maximum ; tout à zéro si aucun numéro n'a été vu.
    pub fn max_normalized(raw: &[f64]) -> Self {
        let max = raw.iter().cloned().fold(0.0f64, f64::max);
        let scores = if max > 0.0 {
            raw.iter().map(|&v| v / max).collect()
        } else {
            vec![0.0; raw.len()]
        };
        Self { scores }
    }

    pub fn get(&self, number: u8) -> f64 {
        match number {
            0 => 0.0,
            n => self.scores.get((n - 1) as usize).copied().unwrap_or(0.0),
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.scores.iter().enumerate().map(|(i, &s)| ((i + 1) as u8, s))
    }

    /// Classement décroissant, égalités départagées par numéro croissant.
    pub fn ranked(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = (1..=self.scores.len() as u8).collect();
        numbers.sort_by(|&a, &b| self.get(b).total_cmp(&self.get(a)).then(a.cmp(&b)));
        numbers
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSet {
    pub frequency: NumberScores,
    pub recency: NumberScores,
    pub composite: NumberScores,
}

impl ScoreSet {
    fn compute(draws: &[Draw], pool: Pool, variant: &Variant, decay: f64, config: &EngineConfig) -> Self {
        let size = pool.size(variant);
        let frequency = frequency_scores(draws, pool, size);
        let recency = recency_scores(draws, pool, size, decay);
        let composite = composite_scores(&frequency, &recency, config.frequency_weight, config.recency_weight);
        Self { frequency, recency, composite }
    }

    pub fn stats(&self) -> Vec<NumberStat> {
        self.composite
            .iter()
            .map(|(number, composite)| NumberStat {
                number,
                frequency: self.frequency.get(number),
                recency: self.recency.get(number),
                composite,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberStat {
    pub number: u8,
    pub frequency: f64,
    pub recency: f64,
    pub composite: f64,
}

/// Toutes les statistiques calculées sur un instantané de l'historique.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub variant: Variant,
    pub draws_analyzed: usize,
    pub regular: ScoreSet,
    pub special: ScoreSet,
    pub pairs: PairCounts,
    pub top_pairs: Vec<PairEntry>,
    pub hot_cold: HotCold,
}

/// Vue sérialisable destinée à l'affichage et à l'export JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub draws_analyzed: usize,
    pub numbers: Vec<NumberStat>,
    pub specials: Vec<NumberStat>,
    pub hot: Vec<u8>,
    pub cold: Vec<u8>,
    pub top_pairs: Vec<PairEntry>,
}

impl Analysis {
    /// draws[0] = tirage le plus récent.
    pub fn compute(draws: &[Draw], config: &EngineConfig) -> Self {
        let variant = config.variant;
        let regular = ScoreSet::compute(draws, Pool::Regular, &variant, config.decay, config);
        let special = ScoreSet::compute(draws, Pool::Special, &variant, config.special_decay, config);
        let pairs = PairCounts::from_draws(draws);
        let top_pairs = pairs.top(config.top_pairs);
        let hot_cold = classify_hot_cold(draws, &variant, config.hot_cold_window, config.hot_cold_fraction);

        debug!(
            draws = draws.len(),
            distinct_pairs = pairs.len(),
            "analyse calculée"
        );

        Self {
            variant,
            draws_analyzed: draws.len(),
            regular,
            special,
            pairs,
            top_pairs,
            hot_cold,
        }
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            draws_analyzed: self.draws_analyzed,
            numbers: self.regular.stats(),
            specials: self.special.stats(),
            hot: self.hot_cold.hot.clone(),
            cold: self.hot_cold.cold.clone(),
            top_pairs: self.top_pairs.clone(),
        }
    }
}

/// Historique synthétique reproductible, tirages uniformes, un tirage tous les 3 jours.
pub fn make_test_draws(n: usize, variant: &Variant, seed: u64) -> Vec<Draw> {
    let mut rng = StdRng::seed_from_u64(seed);
    let newest = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap_or_default();
    (0..n)
        .map(|i| {
            let numbers: Vec<u8> =
                rand::seq::index::sample(&mut rng, variant.regular_max as usize, variant.pick)
                    .into_iter()
                    .map(|idx| (idx + 1) as u8)
                    .collect();
            let special = rng.random_range(1..=variant.special_max);
            Draw::new(newest - Duration::days(3 * i as i64), numbers, special)
        })
        .collect()
}

pub fn make_history(n: usize, variant: &Variant, seed: u64) -> DrawHistory {
    DrawHistory::new(*variant, make_test_draws(n, variant, seed))
        .unwrap_or_else(|e| panic!("historique de test invalide : {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_normalized() {
        let scores = NumberScores::max_normalized(&[2.0, 4.0, 0.0, 1.0]);
        assert_eq!(scores.as_slice(), &[0.5, 1.0, 0.0, 0.25]);
        assert_eq!(scores.get(2), 1.0);
        assert_eq!(scores.get(0), 0.0);
        assert_eq!(scores.get(99), 0.0);
    }

    #[test]
    fn test_max_normalized_all_zero() {
        let scores = NumberScores::max_normalized(&[0.0; 5]);
        assert!(scores.as_slice().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_ranked_ties_by_number() {
        let scores = NumberScores::new(vec![0.5, 0.9, 0.5, 0.1, 0.9]);
        assert_eq!(scores.ranked(), vec![2, 5, 1, 3, 4]);
    }

    #[test]
    fn test_make_test_draws_valid() {
        for variant in [Variant::ISRAELI, Variant::POWERBALL, Variant::MEGA_MILLIONS] {
            let history = make_history(120, &variant, 3);
            assert_eq!(history.len(), 120);
        }
    }

    #[test]
    fn test_analysis_covers_full_range() {
        let config = EngineConfig::default();
        let history = make_history(200, &config.variant, 11);
        let analysis = Analysis::compute(history.draws(), &config);
        assert_eq!(analysis.regular.composite.len(), 37);
        assert_eq!(analysis.special.composite.len(), 7);
        assert_eq!(analysis.top_pairs.len(), config.top_pairs);
        assert_eq!(analysis.draws_analyzed, 200);

        let report = analysis.report();
        assert_eq!(report.numbers.len(), 37);
        assert_eq!(report.specials.len(), 7);
        assert_eq!(report.hot.len(), 7);
        assert_eq!(report.cold.len(), 7);
    }

    #[test]
    fn test_composite_blends_both_signals() {
        let config = EngineConfig::default();
        let history = make_history(80, &config.variant, 5);
        let analysis = Analysis::compute(history.draws(), &config);
        for stat in analysis.regular.stats() {
            let expected = 0.6 * stat.frequency + 0.4 * stat.recency;
            assert!((stat.composite - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_report_serializes_to_json() {
        let config = EngineConfig::default();
        let history = make_history(30, &config.variant, 1);
        let report = Analysis::compute(history.draws(), &config).report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["numbers"].as_array().unwrap().len(), 37);
        assert!(json["top_pairs"][0]["pair"].is_array());
        assert!(json["top_pairs"][0]["count"].is_u64());
    }
}
