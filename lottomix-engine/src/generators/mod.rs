pub mod pair_anchored;
pub mod tiered;
pub mod weighted;

use rand::rngs::StdRng;
use tracing::debug;

use lottomix_db::error::LottoError;
use lottomix_db::models::Ticket;

use crate::analysis::Analysis;
use crate::config::EngineConfig;

pub use self::pair_anchored::PairAnchored;
pub use self::tiered::TieredSelection;
pub use self::weighted::WeightedSelection;

/// Stratégie produisant une grille par appel à partir de l'analyse.
pub trait TicketGenerator {
    fn name(&self) -> &str;
    /// Chaque appel consomme la source aléatoire : deux appels successifs
    /// peuvent renvoyer des grilles différentes.
    fn generate(&self, analysis: &Analysis, rng: &mut StdRng) -> Result<Ticket, LottoError>;
}

/// Rejoue `build` jusqu'à obtenir une grille valide.
/// Les erreurs non récupérables remontent immédiatement.
pub(crate) fn with_attempts<F>(
    name: &str,
    attempts: usize,
    rng: &mut StdRng,
    mut build: F,
) -> Result<Ticket, LottoError>
where
    F: FnMut(&mut StdRng) -> Result<Ticket, LottoError>,
{
    for attempt in 1..=attempts {
        match build(rng) {
            Ok(ticket) => return Ok(ticket),
            Err(e) if e.is_recoverable() => {
                debug!(strategy = name, attempt, error = %e, "tentative rejetée");
            }
            Err(e) => return Err(e),
        }
    }
    Err(LottoError::GenerationExhausted { strategy: name.to_string(), attempts })
}

/// Stratégies dans l'ordre de l'ensemble : la première sert aussi au complément.
pub fn all_generators(config: &EngineConfig) -> Vec<Box<dyn TicketGenerator>> {
    vec![
        Box::new(WeightedSelection::new(config)),
        Box::new(TieredSelection::new(config)),
        Box::new(PairAnchored::new(config)),
    ]
}
