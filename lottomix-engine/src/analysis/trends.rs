use chrono::NaiveDate;
use serde::Serialize;

use lottomix_db::history::DrawHistory;
use lottomix_db::models::Pool;

use super::frequency::count_occurrences;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub number: u8,
    /// (date, taux d'apparition glissant), ordre chronologique.
    pub points: Vec<(NaiveDate, f64)>,
}

/// Moyenne glissante de présence des `top` numéros les plus fréquents.
/// Un point par tirage dès que la fenêtre est pleine.
pub fn rolling_trends(history: &DrawHistory, top: usize, window: usize) -> Vec<TrendSeries> {
    let variant = history.variant();
    let size = Pool::Regular.size(&variant);
    let counts = count_occurrences(history.draws(), Pool::Regular, size);

    let mut leaders: Vec<u8> = (1..=size as u8).filter(|&n| counts[(n - 1) as usize] > 0).collect();
    leaders.sort_by(|&a, &b| counts[(b - 1) as usize].cmp(&counts[(a - 1) as usize]).then(a.cmp(&b)));
    leaders.truncate(top);

    // Ordre chronologique : draws[0] est le plus récent, on inverse
    let chronological: Vec<_> = history.draws().iter().rev().collect();
    if window == 0 || chronological.len() < window {
        return leaders.into_iter().map(|number| TrendSeries { number, points: vec![] }).collect();
    }

    leaders
        .into_iter()
        .map(|number| {
            let present: Vec<u32> = chronological.iter().map(|d| d.contains(number) as u32).collect();
            let mut sum: u32 = present[..window].iter().sum();
            let mut points = Vec::with_capacity(present.len() - window + 1);
            points.push((chronological[window - 1].date, sum as f64 / window as f64));
            for i in window..present.len() {
                sum = sum + present[i] - present[i - window];
                points.push((chronological[i].date, sum as f64 / window as f64));
            }
            TrendSeries { number, points }
        })
        .collect()
}
