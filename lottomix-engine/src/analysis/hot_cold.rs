use serde::Serialize;

use lottomix_db::models::{Draw, Pool, Variant};

use super::frequency::count_occurrences;

/// Numéros chauds et froids sur la fenêtre récente, triés par ordre croissant.
/// Sert uniquement au rapport : les générateurs ne le consomment pas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotCold {
    pub window: usize,
    pub hot: Vec<u8>,
    pub cold: Vec<u8>,
}

pub fn classify_hot_cold(draws: &[Draw], variant: &Variant, window: usize, fraction: f64) -> HotCold {
    let recent = &draws[..window.min(draws.len())];
    let size = Pool::Regular.size(variant);
    let counts = count_occurrences(recent, Pool::Regular, size);

    let cutoff = ((size as f64 * fraction).floor() as usize).max(1).min(size / 2);

    // Un seul classement : fréquence décroissante, égalités par numéro croissant
    let mut ranking: Vec<u8> = (1..=size as u8).collect();
    ranking.sort_by(|&a, &b| {
        counts[(b - 1) as usize]
            .cmp(&counts[(a - 1) as usize])
            .then(a.cmp(&b))
    });

    let mut hot: Vec<u8> = ranking[..cutoff].to_vec();
    let mut cold: Vec<u8> = ranking[size - cutoff..].to_vec();
    hot.sort_unstable();
    cold.sort_unstable();

    HotCold {
        window: recent.len(),
        hot,
        cold,
    }
}
