use chrono::NaiveDate;
use serde::Serialize;

use lottomix_db::history::DrawHistory;
use lottomix_db::models::Pool;

use super::frequency::count_occurrences;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberCount {
    pub number: u8,
    pub count: u32,
    /// Part des tirages de la même boule : `count / (tirages · k)` pour les
    /// numéros réguliers, `count / tirages` pour le spécial, en %.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_draws: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Plus petit et plus grand numéro régulier effectivement tirés.
    pub number_range: Option<(u8, u8)>,
    pub most_common: Vec<NumberCount>,
    pub least_common: Vec<NumberCount>,
    pub most_common_special: Vec<NumberCount>,
}

fn to_counts(counts: &[u32], slots: usize) -> Vec<NumberCount> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| NumberCount {
            number: (i + 1) as u8,
            count,
            percentage: if slots == 0 { 0.0 } else { count as f64 / slots as f64 * 100.0 },
        })
        .collect()
}

pub fn summarize(history: &DrawHistory, top: usize, top_special: usize) -> SummaryStats {
    let variant = history.variant();
    let draws = history.draws();

    let regular = count_occurrences(draws, Pool::Regular, Pool::Regular.size(&variant));
    let special = count_occurrences(draws, Pool::Special, Pool::Special.size(&variant));

    // Fréquence décroissante, égalités par numéro croissant
    let mut most_common = to_counts(&regular, draws.len() * variant.pick);
    most_common.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));

    let mut least_common = most_common.clone();
    least_common.sort_by(|a, b| a.count.cmp(&b.count).then(a.number.cmp(&b.number)));
    least_common.truncate(top);
    most_common.truncate(top);

    let mut most_common_special = to_counts(&special, draws.len());
    most_common_special.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
    most_common_special.truncate(top_special);

    let observed = draws.iter().flat_map(|d| d.numbers.iter().copied());
    let number_range = observed.clone().min().zip(observed.max());

    let range = history.date_range();

    SummaryStats {
        total_draws: draws.len(),
        first_date: range.map(|(oldest, _)| oldest),
        last_date: range.map(|(_, newest)| newest),
        number_range,
        most_common,
        least_common,
        most_common_special,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::make_history;
    use chrono::NaiveDate;
    use lottomix_db::models::{Draw, Variant};

    #[test]
    fn test_summary_counts() {
        let d = |day: u32, numbers: [u8; 6], special: u8| {
            Draw::new(NaiveDate::from_ymd_opt(2024, 2, day).unwrap(), numbers.to_vec(), special)
        };
        let history = DrawHistory::new(
            Variant::ISRAELI,
            vec![
                d(1, [1, 2, 3, 4, 5, 6], 3),
                d(4, [1, 2, 3, 10, 11, 12], 3),
                d(8, [1, 20, 21, 22, 23, 24], 5),
            ],
        )
        .unwrap();

        let summary = summarize(&history, 10, 5);
        assert_eq!(summary.total_draws, 3);
        assert_eq!(summary.first_date.unwrap().to_string(), "2024-02-01");
        assert_eq!(summary.last_date.unwrap().to_string(), "2024-02-08");
        assert_eq!(summary.number_range, Some((1, 24)));

        let pairs = |counts: &[NumberCount]| counts.iter().map(|c| (c.number, c.count)).collect::<Vec<_>>();
        assert_eq!(pairs(&summary.most_common)[..3], [(1, 3), (2, 2), (3, 2)]);
        assert_eq!(summary.most_common.len(), 10);
        // 3 occurrences sur 3 tirages de 6 numéros
        assert!((summary.most_common[0].percentage - 3.0 / 18.0 * 100.0).abs() < 1e-9);
        // Les numéros jamais sortis sont les moins fréquents
        assert_eq!(pairs(&summary.least_common)[0], (7, 0));
        assert_eq!(summary.least_common[0].percentage, 0.0);
        assert_eq!(pairs(&summary.most_common_special)[..2], [(3, 2), (5, 1)]);
        assert!((summary.most_common_special[0].percentage - 2.0 / 3.0 * 100.0).abs() < 1e-9);
        assert_eq!(summary.most_common_special.len(), 5);
    }

    #[test]
    fn test_summary_lengths() {
        let history = make_history(60, &Variant::MEGA_MILLIONS, 8);
        let summary = summarize(&history, 10, 5);
        assert_eq!(summary.most_common.len(), 10);
        assert_eq!(summary.least_common.len(), 10);
        let full = summarize(&history, 70, 25);
        let total: u32 = full.most_common.iter().map(|c| c.count).sum();
        assert_eq!(total as usize, 60 * 5);
        let percent: f64 = full.most_common.iter().map(|c| c.percentage).sum();
        assert!((percent - 100.0).abs() < 1e-9);
        let (low, high) = summary.number_range.unwrap();
        assert!(1 <= low && low <= high && high <= 70);
    }

    #[test]
    fn test_summary_empty() {
        let history = DrawHistory::new(Variant::ISRAELI, vec![]).unwrap();
        let summary = summarize(&history, 10, 5);
        assert_eq!(summary.total_draws, 0);
        assert!(summary.first_date.is_none());
        assert!(summary.number_range.is_none());
        assert!(summary.most_common.iter().all(|c| c.percentage == 0.0));
    }
}
