use std::collections::HashSet;

use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use lottomix_db::models::Ticket;

use crate::analysis::Analysis;
use crate::config::EngineConfig;
use crate::generators::{all_generators, TicketGenerator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedTicket {
    pub strategy: String,
    /// Produite lors du complément final plutôt que pendant la part de la stratégie.
    pub backfill: bool,
    #[serde(flatten)]
    pub ticket: Ticket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketBatch {
    pub requested: usize,
    pub tickets: Vec<GeneratedTicket>,
    pub shortfall: usize,
}

impl TicketBatch {
    pub fn produced(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }
}

/// Répartit `total` grilles entre `n` stratégies, le reste aux premières.
pub fn allotments(total: usize, n: usize) -> Vec<usize> {
    if n == 0 {
        return vec![];
    }
    (0..n).map(|i| total / n + usize::from(i < total % n)).collect()
}

pub struct Orchestrator {
    generators: Vec<Box<dyn TicketGenerator>>,
    attempts_per_ticket: usize,
    backfill_attempts: usize,
}

impl Orchestrator {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_generators(all_generators(config), config)
    }

    /// Le premier générateur sert au complément.
    pub fn with_generators(generators: Vec<Box<dyn TicketGenerator>>, config: &EngineConfig) -> Self {
        Self {
            generators,
            attempts_per_ticket: config.attempts_per_ticket,
            backfill_attempts: config.backfill_attempts,
        }
    }

    pub fn generate(&self, analysis: &Analysis, target: usize, rng: &mut StdRng) -> TicketBatch {
        let mut seen: HashSet<Vec<u8>> = HashSet::new();
        let mut tickets: Vec<GeneratedTicket> = Vec::with_capacity(target);

        for (generator, share) in self.generators.iter().zip(allotments(target, self.generators.len())) {
            let mut produced = 0;
            let mut budget = share * self.attempts_per_ticket;
            while produced < share && budget > 0 {
                budget -= 1;
                match generator.generate(analysis, rng) {
                    Ok(ticket) => {
                        if seen.insert(ticket.key().to_vec()) {
                            tickets.push(GeneratedTicket {
                                strategy: generator.name().to_string(),
                                backfill: false,
                                ticket,
                            });
                            produced += 1;
                        }
                    }
                    Err(e) => debug!(strategy = generator.name(), error = %e, "échec de génération"),
                }
            }
            if produced < share {
                debug!(strategy = generator.name(), produced, share, "part incomplète");
            }
        }

        if let Some(backfill) = self.generators.first() {
            let mut budget = self.backfill_attempts;
            while tickets.len() < target && budget > 0 {
                budget -= 1;
                match backfill.generate(analysis, rng) {
                    Ok(ticket) => {
                        if seen.insert(ticket.key().to_vec()) {
                            tickets.push(GeneratedTicket {
                                strategy: backfill.name().to_string(),
                                backfill: true,
                                ticket,
                            });
                        }
                    }
                    Err(e) => debug!(strategy = backfill.name(), error = %e, "échec du complément"),
                }
            }
        }

        let shortfall = target.saturating_sub(tickets.len());
        if shortfall > 0 {
            warn!(requested = target, produced = tickets.len(), shortfall, "lot incomplet");
        } else {
            info!(requested = target, produced = tickets.len(), "lot de grilles généré");
        }

        TicketBatch { requested: target, tickets, shortfall }
    }
}
