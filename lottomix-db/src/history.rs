use chrono::NaiveDate;

use crate::error::LottoError;
use crate::models::{Draw, Variant, validate_draw};

/// Historique validé, trié du plus récent au plus ancien, sans date en double.
/// Lecture seule une fois construit.
#[derive(Debug, Clone)]
pub struct DrawHistory {
    variant: Variant,
    draws: Vec<Draw>,
}

impl DrawHistory {
    pub fn new(variant: Variant, mut draws: Vec<Draw>) -> Result<Self, LottoError> {
        variant.validate()?;
        for draw in &draws {
            validate_draw(draw, &variant)?;
        }

        draws.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(pair) = draws.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(LottoError::InvalidHistory(format!("date en double : {}", pair[0].date)));
        }

        Ok(Self { variant, draws })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// draws[0] = tirage le plus récent.
    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Les `n` tirages les plus récents.
    pub fn recent(&self, n: usize) -> &[Draw] {
        &self.draws[..n.min(self.draws.len())]
    }

    /// (plus ancien, plus récent)
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.draws.last(), self.draws.first()) {
            (Some(oldest), Some(newest)) => Some((oldest.date, newest.date)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(date: &str, numbers: [u8; 6], special: u8) -> Draw {
        Draw::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), numbers.to_vec(), special)
    }

    #[test]
    fn test_sorted_newest_first() {
        let history = DrawHistory::new(
            Variant::ISRAELI,
            vec![
                draw("2024-01-01", [1, 2, 3, 4, 5, 6], 1),
                draw("2024-01-05", [7, 8, 9, 10, 11, 12], 2),
                draw("2024-01-03", [13, 14, 15, 16, 17, 18], 3),
            ],
        )
        .unwrap();
        let dates: Vec<String> = history.draws().iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-05", "2024-01-03", "2024-01-01"]);
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let result = DrawHistory::new(
            Variant::ISRAELI,
            vec![
                draw("2024-01-01", [1, 2, 3, 4, 5, 6], 1),
                draw("2024-01-01", [7, 8, 9, 10, 11, 12], 2),
            ],
        );
        assert!(matches!(result, Err(LottoError::InvalidHistory(_))));
    }

    #[test]
    fn test_invalid_draw_rejected() {
        let result = DrawHistory::new(Variant::ISRAELI, vec![draw("2024-01-01", [1, 2, 3, 4, 5, 40], 1)]);
        assert!(matches!(result, Err(LottoError::InvalidHistory(_))));
    }

    #[test]
    fn test_invalid_variant_is_configuration_error() {
        let variant = Variant { pick: 40, regular_max: 37, special_max: 7 };
        assert!(matches!(DrawHistory::new(variant, vec![]), Err(LottoError::Configuration(_))));
    }

    #[test]
    fn test_recent_and_date_range() {
        let history = DrawHistory::new(
            Variant::ISRAELI,
            vec![
                draw("2024-01-01", [1, 2, 3, 4, 5, 6], 1),
                draw("2024-01-02", [1, 2, 3, 4, 5, 6], 1),
                draw("2024-01-03", [1, 2, 3, 4, 5, 6], 1),
            ],
        )
        .unwrap();
        assert_eq!(history.recent(2).len(), 2);
        assert_eq!(history.recent(10).len(), 3);

        let (oldest, newest) = history.date_range().unwrap();
        assert_eq!(oldest.to_string(), "2024-01-01");
        assert_eq!(newest.to_string(), "2024-01-03");
        assert_eq!(history.recent(1)[0].date.to_string(), "2024-01-03");
    }

    #[test]
    fn test_empty_history() {
        let history = DrawHistory::new(Variant::POWERBALL, vec![]).unwrap();
        assert!(history.is_empty());
        assert!(history.date_range().is_none());
    }
}
