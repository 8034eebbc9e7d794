use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};
use textplots::Plot;

use crate::import::ImportResult;
use lottomix_db::models::{Draw, LotteryKind};
use lottomix_engine::analysis::hot_cold::HotCold;
use lottomix_engine::analysis::pairs::PairEntry;
use lottomix_engine::analysis::summary::{NumberCount, SummaryStats};
use lottomix_engine::analysis::trends::TrendSeries;
use lottomix_engine::analysis::NumberStat;
use lottomix_engine::orchestrator::TicketBatch;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw], lottery: LotteryKind) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Numéros", lottery.special_label()]);
    for draw in draws {
        let mut sorted = draw.numbers.clone();
        sorted.sort();
        table.add_row(vec![
            draw.date.format("%d/%m/%Y").to_string(),
            join_numbers(&sorted),
            format!("{:2}", draw.special),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_summary(summary: &SummaryStats, lottery: LotteryKind) {
    println!("\n📋 {} : {} tirages", lottery, summary.total_draws);
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!("   du {} au {}", first.format("%d/%m/%Y"), last.format("%d/%m/%Y"));
    }
    if let Some((low, high)) = summary.number_range {
        println!("   numéros tirés de {} à {}", low, high);
    }

    let format_counts = |counts: &[NumberCount]| {
        counts
            .iter()
            .map(|c| format!("{} ({}, {:.2}%)", c.number, c.count, c.percentage))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut table = new_table(vec!["", "Numéros (occurrences)"]);
    table.add_row(vec!["Plus fréquents".to_string(), format_counts(&summary.most_common)]);
    table.add_row(vec!["Moins fréquents".to_string(), format_counts(&summary.least_common)]);
    table.add_row(vec![
        format!("{} fréquents", lottery.special_label()),
        format_counts(&summary.most_common_special),
    ]);
    println!("{table}");
}

/// Tableau trié par score composite décroissant ; chauds en vert, froids en rouge.
pub fn display_number_stats(title: &str, stats: &[NumberStat], hot_cold: Option<&HotCold>) {
    println!("\n── {} ──", title);
    let mut table = new_table(vec!["Numéro", "Fréquence", "Récence", "Composite", "Tag"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.composite.total_cmp(&a.composite).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        let (tag, color) = match hot_cold {
            Some(hc) if hc.hot.contains(&stat.number) => ("Chaud", Color::Green),
            Some(hc) if hc.cold.contains(&stat.number) => ("Froid", Color::Red),
            _ => ("", Color::White),
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)),
            Cell::new(format!("{:.4}", stat.frequency)),
            Cell::new(format!("{:.4}", stat.recency)),
            Cell::new(format!("{:.4}", stat.composite)),
            Cell::new(tag).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_hot_cold(hot_cold: &HotCold) {
    println!("\n🔥 Chauds ({} derniers tirages) : {}", hot_cold.window, join_numbers(&hot_cold.hot));
    println!("❄️  Froids ({} derniers tirages) : {}", hot_cold.window, join_numbers(&hot_cold.cold));
}

pub fn display_pairs(pairs: &[PairEntry]) {
    if pairs.is_empty() {
        println!("Aucune paire observée.");
        return;
    }

    println!("\n🔗 Paires les plus fréquentes\n");
    let mut table = new_table(vec!["#", "Paire", "Occurrences"]);
    for (i, entry) in pairs.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            format!("{:2} - {:2}", entry.pair.0, entry.pair.1),
            entry.count.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_trends(trends: &[TrendSeries], window: usize) {
    println!("\n📈 Tendance glissante ({} tirages)\n", window);

    for series in trends {
        if series.points.is_empty() {
            println!("  {:2} : historique trop court", series.number);
            continue;
        }

        let points: Vec<(f32, f32)> = series
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, rate))| (i as f32, *rate as f32))
            .collect();
        let x_max = (points.len().max(2) - 1) as f32;

        println!("  Numéro {} :", series.number);
        let shape = textplots::Shape::Lines(&points);
        let mut chart = textplots::Chart::new_with_y_range(120, 30, 0.0, x_max, 0.0, 1.0);
        println!("{}", chart.lineplot(&shape));
    }
}

pub fn display_batch(batch: &TicketBatch, lottery: LotteryKind, seed: u64) {
    println!("\n🎲 Grilles suggérées (seed {})\n", seed);

    let mut table = new_table(vec!["#", "Numéros", lottery.special_label(), "Stratégie"]);
    for (i, generated) in batch.tickets.iter().enumerate() {
        let strategy = if generated.backfill {
            format!("{} (complément)", generated.strategy)
        } else {
            generated.strategy.clone()
        };
        table.add_row(vec![
            format!("{}", i + 1),
            join_numbers(generated.ticket.numbers()),
            format!("{:2}", generated.ticket.special()),
            strategy,
        ]);
    }
    println!("{table}");

    if !batch.is_complete() {
        println!(
            "\n⚠️  {} grilles demandées, {} uniques produites : il en manque {}.",
            batch.requested,
            batch.produced(),
            batch.shortfall
        );
    }
}
