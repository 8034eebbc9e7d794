use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;

use lottomix_db::error::LottoError;
use lottomix_db::models::Ticket;

use super::{with_attempts, TicketGenerator};
use crate::analysis::Analysis;
use crate::config::EngineConfig;
use crate::sampler::{select_special, shuffled_ranking};

/// Ancre la grille sur 1 ou 2 paires fréquentes, complète par le classement composite.
pub struct PairAnchored {
    floor: f64,
    tolerance: f64,
    attempts: usize,
}

impl PairAnchored {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            floor: config.sampling_floor,
            tolerance: config.tie_tolerance,
            attempts: config.attempts_per_ticket,
        }
    }

    fn build(&self, analysis: &Analysis, rng: &mut StdRng) -> Result<Ticket, LottoError> {
        let pick = analysis.variant.pick;
        let mut numbers: Vec<u8> = Vec::with_capacity(pick);

        let wanted = rng.random_range(1..=2);
        for entry in analysis.top_pairs.choose_multiple(rng, wanted) {
            let (a, b) = entry.pair;
            let fresh: Vec<u8> = [a, b].into_iter().filter(|n| !numbers.contains(n)).collect();
            // Une paire qui ferait déborder la grille est ignorée
            if numbers.len() + fresh.len() <= pick {
                numbers.extend(fresh);
            }
        }

        let ranking = shuffled_ranking(&analysis.regular.composite, self.tolerance, rng);
        for n in ranking {
            if numbers.len() == pick {
                break;
            }
            if !numbers.contains(&n) {
                numbers.push(n);
            }
        }

        let special = select_special(&analysis.special.composite, self.floor, rng)?;
        Ticket::new(numbers, special, &analysis.variant)
    }
}

impl TicketGenerator for PairAnchored {
    fn name(&self) -> &str {
        "PairAnchored"
    }

    fn generate(&self, analysis: &Analysis, rng: &mut StdRng) -> Result<Ticket, LottoError> {
        with_attempts(self.name(), self.attempts, rng, |rng| self.build(analysis, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::make_history;
    use lottomix_db::models::Variant;
    use rand::SeedableRng;

    #[test]
    fn test_contains_a_top_pair() {
        let config = EngineConfig::default();
        let history = make_history(200, &config.variant, 17);
        let analysis = Analysis::compute(history.draws(), &config);
        let generator = PairAnchored::new(&config);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let ticket = generator.generate(&analysis, &mut rng).unwrap();
            let anchored = analysis
                .top_pairs
                .iter()
                .any(|e| ticket.numbers().contains(&e.pair.0) && ticket.numbers().contains(&e.pair.1));
            assert!(anchored, "aucune paire du top dans {}", ticket);
        }
    }

    #[test]
    fn test_fill_follows_composite_ranking() {
        let config = EngineConfig::default();
        let history = make_history(200, &config.variant, 17);
        let analysis = Analysis::compute(history.draws(), &config);
        let top: Vec<u8> = analysis.regular.composite.ranked().into_iter().take(2).collect();
        let generator = PairAnchored::new(&config);
        let mut rng = StdRng::seed_from_u64(3);

        // Au plus 4 numéros viennent des paires : les 2 meilleurs scores sont toujours pris
        for _ in 0..50 {
            let ticket = generator.generate(&analysis, &mut rng).unwrap();
            assert!(top.iter().all(|n| ticket.numbers().contains(n)));
        }
    }

    #[test]
    fn test_without_pairs_uses_ranking() {
        let variant = Variant { pick: 1, regular_max: 10, special_max: 3 };
        let config = EngineConfig::with_variant(variant);
        let history = make_history(30, &variant, 5);
        let analysis = Analysis::compute(history.draws(), &config);
        assert!(analysis.top_pairs.is_empty());

        let ticket = PairAnchored::new(&config)
            .generate(&analysis, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(ticket.numbers(), &[analysis.regular.composite.ranked()[0]]);
    }
}
