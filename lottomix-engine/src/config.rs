use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use lottomix_db::error::LottoError;
use lottomix_db::models::Variant;

/// Paramètres immuables passés à chaque composant du pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub variant: Variant,
    /// Nombre de tirages récents analysés.
    pub lookback: usize,
    /// Facteur de décroissance exponentielle (numéros réguliers).
    pub decay: f64,
    /// Facteur de décroissance exponentielle (numéro spécial).
    pub special_decay: f64,
    pub frequency_weight: f64,
    pub recency_weight: f64,
    pub hot_cold_window: usize,
    pub hot_cold_fraction: f64,
    pub tickets: usize,
    pub top_pairs: usize,
    pub seed: Option<u64>,
    pub tier1_size: usize,
    pub tier2_size: usize,
    /// Plancher ajouté aux poids d'échantillonnage (aucun numéro à probabilité nulle).
    pub sampling_floor: f64,
    /// Écart de score en dessous duquel deux numéros sont départagés au hasard.
    pub tie_tolerance: f64,
    pub attempts_per_ticket: usize,
    pub backfill_attempts: usize,
    pub trend_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variant: Variant::ISRAELI,
            lookback: 200,
            decay: 0.02,
            special_decay: 0.03,
            frequency_weight: 0.6,
            recency_weight: 0.4,
            hot_cold_window: 50,
            hot_cold_fraction: 0.2,
            tickets: 12,
            top_pairs: 15,
            seed: None,
            tier1_size: 15,
            tier2_size: 15,
            sampling_floor: 0.01,
            tie_tolerance: 1e-9,
            attempts_per_ticket: 20,
            backfill_attempts: 200,
            trend_window: 20,
        }
    }
}

impl EngineConfig {
    pub fn with_variant(variant: Variant) -> Self {
        Self { variant, ..Self::default() }
    }

    /// Rejette toute configuration incohérente avant le moindre calcul.
    pub fn validate(&self) -> Result<(), LottoError> {
        self.variant.validate()?;

        let weights = [self.frequency_weight, self.recency_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(LottoError::Configuration(format!(
                "poids négatifs ou invalides ({}, {})",
                self.frequency_weight, self.recency_weight
            )));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(LottoError::Configuration(format!(
                "les poids fréquence/récence doivent sommer à 1 (somme = {})",
                sum
            )));
        }

        for (name, value) in [("decay", self.decay), ("special_decay", self.special_decay)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LottoError::Configuration(format!("{} doit être > 0 (reçu {})", name, value)));
            }
        }

        if !(self.hot_cold_fraction > 0.0 && self.hot_cold_fraction <= 0.5) {
            return Err(LottoError::Configuration(format!(
                "hot_cold_fraction hors de ]0, 0.5] (reçu {})",
                self.hot_cold_fraction
            )));
        }

        if !self.sampling_floor.is_finite() || self.sampling_floor <= 0.0 {
            return Err(LottoError::Configuration("sampling_floor doit être > 0".into()));
        }
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(LottoError::Configuration("tie_tolerance doit être >= 0".into()));
        }

        let counts = [
            ("lookback", self.lookback),
            ("hot_cold_window", self.hot_cold_window),
            ("tickets", self.tickets),
            ("top_pairs", self.top_pairs),
            ("tier1_size", self.tier1_size),
            ("attempts_per_ticket", self.attempts_per_ticket),
            ("trend_window", self.trend_window),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, v)| *v == 0) {
            return Err(LottoError::Configuration(format!("{} doit être au moins 1", name)));
        }

        Ok(())
    }
}

pub fn save_config(config: &EngineConfig, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire la configuration {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
    let config: EngineConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration illisible {:?}", path))?;
    Ok(config)
}
