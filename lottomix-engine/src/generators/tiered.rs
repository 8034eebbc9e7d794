use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;

use lottomix_db::error::LottoError;
use lottomix_db::models::Ticket;

use super::{with_attempts, TicketGenerator};
use crate::analysis::Analysis;
use crate::config::EngineConfig;
use crate::sampler::{select_special, shuffled_ranking};

/// Paliers de classement composite : quelques favoris, un milieu de tableau,
/// parfois un outsider.
pub struct TieredSelection {
    tier1_size: usize,
    tier2_size: usize,
    floor: f64,
    tolerance: f64,
    attempts: usize,
}

impl TieredSelection {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tier1_size: config.tier1_size,
            tier2_size: config.tier2_size,
            floor: config.sampling_floor,
            tolerance: config.tie_tolerance,
            attempts: config.attempts_per_ticket,
        }
    }

    fn build(&self, analysis: &Analysis, rng: &mut StdRng) -> Result<Ticket, LottoError> {
        let ranking = shuffled_ranking(&analysis.regular.composite, self.tolerance, rng);
        let end1 = self.tier1_size.min(ranking.len());
        let end2 = (self.tier1_size + self.tier2_size).min(ranking.len());
        let tiers = [&ranking[..end1], &ranking[end1..end2], &ranking[end2..]];

        let base = [rng.random_range(2..=3), 2, rng.random_range(0..=1)];
        let capacities = [tiers[0].len(), tiers[1].len(), tiers[2].len()];
        let quotas = adjust_quotas(base, analysis.variant.pick, capacities);

        let mut numbers = Vec::with_capacity(analysis.variant.pick);
        for (tier, &quota) in tiers.iter().zip(quotas.iter()) {
            numbers.extend(tier.choose_multiple(rng, quota).copied());
        }

        let special = select_special(&analysis.special.composite, self.floor, rng)?;
        Ticket::new(numbers, special, &analysis.variant)
    }
}

impl TicketGenerator for TieredSelection {
    fn name(&self) -> &str {
        "Tiered"
    }

    fn generate(&self, analysis: &Analysis, rng: &mut StdRng) -> Result<Ticket, LottoError> {
        with_attempts(self.name(), self.attempts, rng, |rng| self.build(analysis, rng))
    }
}

/// Ajuste les quotas de base pour qu'ils somment à `pick`.
///
/// Le dernier palier absorbe l'écart ; si les deux premiers dépassent déjà
/// `pick`, ils sont réduits (palier 2 d'abord). Un palier trop petit pour
/// son quota déverse le reste dans les paliers 3, 2 puis 1.
pub fn adjust_quotas(base: [usize; 3], pick: usize, capacities: [usize; 3]) -> [usize; 3] {
    let mut quotas = base;
    let head = quotas[0] + quotas[1];
    if head <= pick {
        quotas[2] = pick - head;
    } else {
        quotas[2] = 0;
        let mut excess = head - pick;
        for i in [1, 0] {
            let cut = excess.min(quotas[i]);
            quotas[i] -= cut;
            excess -= cut;
        }
    }

    for (quota, &capacity) in quotas.iter_mut().zip(capacities.iter()) {
        *quota = (*quota).min(capacity);
    }

    let mut deficit = pick.saturating_sub(quotas.iter().sum());
    for i in [2, 1, 0] {
        let room = capacities[i] - quotas[i];
        let extra = room.min(deficit);
        quotas[i] += extra;
        deficit -= extra;
    }
    quotas
}
