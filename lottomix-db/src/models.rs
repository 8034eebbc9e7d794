use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LottoError;

/// Forme d'une loterie : `pick` numéros réguliers dans `[1, regular_max]`
/// et un numéro spécial dans `[1, special_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub pick: usize,
    pub regular_max: u8,
    pub special_max: u8,
}

impl Variant {
    pub const ISRAELI: Variant = Variant { pick: 6, regular_max: 37, special_max: 7 };
    pub const POWERBALL: Variant = Variant { pick: 5, regular_max: 69, special_max: 26 };
    pub const MEGA_MILLIONS: Variant = Variant { pick: 5, regular_max: 70, special_max: 25 };

    pub fn validate(&self) -> Result<(), LottoError> {
        if self.regular_max < 2 {
            return Err(LottoError::Configuration(format!(
                "plage des numéros réguliers trop petite (R={})",
                self.regular_max
            )));
        }
        if self.special_max == 0 {
            return Err(LottoError::Configuration("plage du numéro spécial vide (S=0)".into()));
        }
        if self.pick == 0 {
            return Err(LottoError::Configuration("k doit être au moins 1".into()));
        }
        if self.pick > self.regular_max as usize {
            return Err(LottoError::Configuration(format!(
                "k={} dépasse R={}",
                self.pick, self.regular_max
            )));
        }
        Ok(())
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::ISRAELI
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} numéros (1-{}) + 1 spécial (1-{})", self.pick, self.regular_max, self.special_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LotteryKind {
    #[default]
    Israeli,
    Powerball,
    #[value(name = "megamillions")]
    #[serde(rename = "megamillions")]
    MegaMillions,
}

impl LotteryKind {
    /// Clé de stockage en base.
    pub fn slug(&self) -> &'static str {
        match self {
            LotteryKind::Israeli => "israeli",
            LotteryKind::Powerball => "powerball",
            LotteryKind::MegaMillions => "megamillions",
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            LotteryKind::Israeli => Variant::ISRAELI,
            LotteryKind::Powerball => Variant::POWERBALL,
            LotteryKind::MegaMillions => Variant::MEGA_MILLIONS,
        }
    }

    pub fn special_label(&self) -> &'static str {
        match self {
            LotteryKind::Israeli => "Spécial",
            LotteryKind::Powerball => "Powerball",
            LotteryKind::MegaMillions => "Mega Ball",
        }
    }
}

impl std::fmt::Display for LotteryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LotteryKind::Israeli => write!(f, "Loto israélien"),
            LotteryKind::Powerball => write!(f, "Powerball"),
            LotteryKind::MegaMillions => write!(f, "Mega Millions"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
    pub special: u8,
}

impl Draw {
    pub fn new(date: NaiveDate, numbers: Vec<u8>, special: u8) -> Self {
        Self { date, numbers, special }
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    Regular,
    Special,
}

impl Pool {
    pub fn size(&self, variant: &Variant) -> usize {
        match self {
            Pool::Regular => variant.regular_max as usize,
            Pool::Special => variant.special_max as usize,
        }
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Regular => &draw.numbers,
            Pool::Special => std::slice::from_ref(&draw.special),
        }
    }
}

/// Grille candidate : numéros réguliers triés par ordre croissant + un spécial.
///
/// Le dédoublonnage se fait sur `numbers` seul (voir `Ticket::key`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Ticket {
    #[serde(rename = "regular_numbers")]
    numbers: Vec<u8>,
    #[serde(rename = "special_number")]
    special: u8,
}

impl Ticket {
    pub fn new(mut numbers: Vec<u8>, special: u8, variant: &Variant) -> Result<Self, LottoError> {
        numbers.sort_unstable();
        check_combination(&numbers, special, variant).map_err(LottoError::InvalidTicket)?;
        Ok(Self { numbers, special })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn special(&self) -> u8 {
        self.special
    }

    /// Clé d'égalité structurelle utilisée pour le dédoublonnage.
    pub fn key(&self) -> &[u8] {
        &self.numbers
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let numbers = self
            .numbers
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        write!(f, "{} | {:2}", numbers, self.special)
    }
}

/// Vérifie taille, bornes et unicité d'une combinaison.
pub fn check_combination(numbers: &[u8], special: u8, variant: &Variant) -> Result<(), String> {
    if numbers.len() != variant.pick {
        return Err(format!("{} numéros au lieu de {}", numbers.len(), variant.pick));
    }
    for &n in numbers {
        if n < 1 || n > variant.regular_max {
            return Err(format!("numéro {} hors limites (1-{})", n, variant.regular_max));
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                return Err(format!("numéro en double : {}", numbers[i]));
            }
        }
    }
    if special < 1 || special > variant.special_max {
        return Err(format!("numéro spécial {} hors limites (1-{})", special, variant.special_max));
    }
    Ok(())
}

pub fn validate_draw(draw: &Draw, variant: &Variant) -> Result<(), LottoError> {
    check_combination(&draw.numbers, draw.special, variant)
        .map_err(|msg| LottoError::InvalidHistory(format!("tirage du {} : {}", draw.date, msg)))
}
