pub mod analysis;
pub mod config;
pub mod generators;
pub mod orchestrator;
pub mod sampler;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use lottomix_db::error::LottoError;
use lottomix_db::history::DrawHistory;

use crate::analysis::{Analysis, AnalysisReport};
use crate::config::EngineConfig;
use crate::orchestrator::{Orchestrator, TicketBatch};

/// Analyse les `lookback` tirages les plus récents de l'historique.
pub fn analyze(history: &DrawHistory, config: &EngineConfig) -> Result<Analysis, LottoError> {
    config.validate()?;
    if history.variant() != config.variant {
        return Err(LottoError::Configuration(format!(
            "variante de l'historique ({}) différente de la configuration ({})",
            history.variant(),
            config.variant
        )));
    }
    Ok(Analysis::compute(history.recent(config.lookback), config))
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub analysis: Analysis,
    pub batch: TicketBatch,
    /// Seed effectivement utilisé, pour rejouer le run.
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub seed: u64,
    pub analysis: AnalysisReport,
    pub batch: TicketBatch,
}

impl Prediction {
    pub fn report(&self) -> PredictionReport {
        PredictionReport {
            seed: self.seed,
            analysis: self.analysis.report(),
            batch: self.batch.clone(),
        }
    }
}

/// Pipeline complet : analyse puis génération de `config.tickets` grilles.
/// Fonction pure de (historique, configuration, seed).
pub fn predict(history: &DrawHistory, config: &EngineConfig) -> Result<Prediction, LottoError> {
    let analysis = analyze(history, config)?;
    let seed = sampler::resolve_seed(config.seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let batch = Orchestrator::new(config).generate(&analysis, config.tickets, &mut rng);
    info!(seed, draws = analysis.draws_analyzed, produced = batch.produced(), "prédiction terminée");

    Ok(Prediction { analysis, batch, seed })
}
