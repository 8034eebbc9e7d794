use rand::rngs::StdRng;

use lottomix_db::error::LottoError;
use lottomix_db::models::Ticket;

use super::{with_attempts, TicketGenerator};
use crate::analysis::Analysis;
use crate::config::EngineConfig;
use crate::sampler::{select_special, weighted_sample};

/// Tirage pondéré sans remise, poids = score composite + plancher.
pub struct WeightedSelection {
    floor: f64,
    attempts: usize,
}

impl WeightedSelection {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            floor: config.sampling_floor,
            attempts: config.attempts_per_ticket,
        }
    }
}

impl TicketGenerator for WeightedSelection {
    fn name(&self) -> &str {
        "Weighted"
    }

    fn generate(&self, analysis: &Analysis, rng: &mut StdRng) -> Result<Ticket, LottoError> {
        let candidates: Vec<(u8, f64)> = analysis.regular.composite.iter().collect();
        with_attempts(self.name(), self.attempts, rng, |rng| {
            let numbers = weighted_sample(&candidates, analysis.variant.pick, self.floor, rng)?;
            let special = select_special(&analysis.special.composite, self.floor, rng)?;
            Ticket::new(numbers, special, &analysis.variant)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::make_history;
    use rand::SeedableRng;

    #[test]
    fn test_weighted_prefers_high_composite() {
        let config = EngineConfig::default();
        let history = make_history(200, &config.variant, 12);
        let analysis = Analysis::compute(history.draws(), &config);
        let ranking = analysis.regular.composite.ranked();
        let best = ranking[0];
        let worst = ranking[ranking.len() - 1];

        let generator = WeightedSelection::new(&config);
        let mut rng = StdRng::seed_from_u64(8);
        let (mut best_hits, mut worst_hits) = (0, 0);
        for _ in 0..2000 {
            let ticket = generator.generate(&analysis, &mut rng).unwrap();
            best_hits += ticket.numbers().contains(&best) as usize;
            worst_hits += ticket.numbers().contains(&worst) as usize;
        }
        assert!(best_hits > worst_hits, "meilleur {} vs pire {}", best_hits, worst_hits);
        // Le plancher garde chaque numéro atteignable
        assert!(worst_hits > 0);
    }

    #[test]
    fn test_weighted_same_seed_same_ticket() {
        let config = EngineConfig::default();
        let history = make_history(50, &config.variant, 2);
        let analysis = Analysis::compute(history.draws(), &config);
        let generator = WeightedSelection::new(&config);
        let a = generator.generate(&analysis, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = generator.generate(&analysis, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }
}
