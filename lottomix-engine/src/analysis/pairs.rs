use std::collections::BTreeMap;

use serde::Serialize;

use lottomix_db::models::Draw;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairEntry {
    pub pair: (u8, u8),
    pub count: u32,
}

/// Co-occurrences des paires non ordonnées, stockées sous forme canonique `a < b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairCounts {
    counts: BTreeMap<(u8, u8), u32>,
}

fn canonical(a: u8, b: u8) -> (u8, u8) {
    if a <= b { (a, b) } else { (b, a) }
}

impl PairCounts {
    pub fn from_draws(draws: &[Draw]) -> Self {
        let mut counts = BTreeMap::new();
        for draw in draws {
            let numbers = &draw.numbers;
            for i in 0..numbers.len() {
                for j in (i + 1)..numbers.len() {
                    *counts.entry(canonical(numbers[i], numbers[j])).or_insert(0) += 1;
                }
            }
        }
        Self { counts }
    }

    pub fn get(&self, a: u8, b: u8) -> u32 {
        self.counts.get(&canonical(a, b)).copied().unwrap_or(0)
    }

    /// Nombre de paires distinctes observées.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Les `m` paires les plus fréquentes, par compte décroissant puis
    /// premier élément croissant, puis second élément croissant.
    /// Seules les paires observées au moins une fois sont classées.
    pub fn top(&self, m: usize) -> Vec<PairEntry> {
        let mut entries: Vec<PairEntry> = self
            .counts
            .iter()
            .map(|(&pair, &count)| PairEntry { pair, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.pair.cmp(&b.pair)));
        entries.truncate(m);
        entries
    }
}
