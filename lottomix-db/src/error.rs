use thiserror::Error;

/// Erreurs typées du pipeline d'analyse.
///
/// `InvalidHistory` et `Configuration` interrompent le calcul.
/// `GenerationExhausted` est récupérée par l'orchestrateur et ne remonte
/// que sous forme de déficit de grilles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LottoError {
    #[error("historique invalide : {0}")]
    InvalidHistory(String),

    #[error("grille invalide : {0}")]
    InvalidTicket(String),

    #[error("configuration invalide : {0}")]
    Configuration(String),

    #[error("stratégie {strategy} : aucune grille valide après {attempts} tentatives")]
    GenerationExhausted { strategy: String, attempts: usize },
}

impl LottoError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LottoError::GenerationExhausted { .. } | LottoError::InvalidTicket(_))
    }
}
