mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lottomix_db::db::{count_draws, db_path, fetch_last_draws, load_history, migrate, open_db};
use lottomix_db::history::DrawHistory;
use lottomix_db::models::LotteryKind;
use lottomix_db::rusqlite::Connection;
use lottomix_engine::analysis::summary::summarize;
use lottomix_engine::analysis::trends::rolling_trends;
use lottomix_engine::config::{EngineConfig, load_config, save_config};
use lottomix_engine::{analyze, predict};
use crate::display::{
    display_batch, display_draws, display_hot_cold, display_import_summary, display_number_stats,
    display_pairs, display_summary, display_trends,
};

/// Nombre de numéros suivis dans le graphique de tendance.
const TREND_NUMBERS: usize = 5;

#[derive(Parser)]
#[command(name = "lottomix", about = "Analyse statistique et suggestions de grilles de loterie")]
struct Cli {
    /// Loterie concernée
    #[arg(short, long, global = true, default_value = "israeli")]
    lottery: LotteryKind,

    /// Fichier de configuration JSON (les options de la ligne de commande priment)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV (date,n1..nk,spécial)
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short = 'n', long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques (scores, chauds/froids, résumé, tendances)
    Stats {
        /// Nombre de tirages récents analysés
        #[arg(short = 'w', long)]
        lookback: Option<usize>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Afficher les paires les plus fréquentes
    Pairs {
        /// Nombre de paires à afficher
        #[arg(short, long)]
        top: Option<usize>,

        /// Nombre de tirages récents analysés
        #[arg(short = 'w', long)]
        lookback: Option<usize>,
    },

    /// Suggérer des grilles
    Predict {
        /// Nombre de grilles à suggérer
        #[arg(short, long)]
        tickets: Option<usize>,

        /// Nombre de tirages récents analysés
        #[arg(short = 'w', long)]
        lookback: Option<usize>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Écrire la configuration par défaut dans un fichier JSON
    Config {
        /// Fichier de sortie
        #[arg(short, long, default_value = "lottomix.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let lottery = cli.lottery;

    if let Command::Config { output } = &cli.command {
        return cmd_config(lottery, output);
    }

    let config = base_config(cli.config.as_deref(), lottery)?;
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file, lottery),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, lottery, last),
        Command::Stats { lookback, json } => {
            let config = EngineConfig { lookback: lookback.unwrap_or(config.lookback), ..config };
            cmd_stats(&conn, lottery, &config, json)
        }
        Command::Pairs { top, lookback } => {
            let config = EngineConfig {
                top_pairs: top.unwrap_or(config.top_pairs),
                lookback: lookback.unwrap_or(config.lookback),
                ..config
            };
            cmd_pairs(&conn, lottery, &config)
        }
        Command::Predict { tickets, lookback, seed, json } => {
            let config = EngineConfig {
                tickets: tickets.unwrap_or(config.tickets),
                lookback: lookback.unwrap_or(config.lookback),
                seed: seed.or(config.seed),
                ..config
            };
            cmd_predict(&conn, lottery, &config, json)
        }
        Command::Config { .. } => Ok(()),
    }
}

/// Configuration du fichier s'il est fourni, sinon valeurs par défaut.
/// La variante suit toujours la loterie choisie.
fn base_config(path: Option<&Path>, lottery: LotteryKind) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if path.is_some() && config.variant != lottery.variant() {
        tracing::warn!(
            file = %config.variant,
            lottery = %lottery.variant(),
            "variante du fichier ignorée au profit de la loterie choisie"
        );
    }
    Ok(EngineConfig { variant: lottery.variant(), ..config })
}

/// Historique complet de la loterie, ou `None` si la base est vide.
fn full_history(conn: &Connection, lottery: LotteryKind) -> Result<Option<DrawHistory>> {
    let n = count_draws(conn, lottery)?;
    if n == 0 {
        println!("Base vide pour {}. Lancez d'abord : lottomix import --lottery {} --file <csv>", lottery, lottery.slug());
        return Ok(None);
    }
    let history = load_history(conn, lottery, lottery.variant(), n)?;
    Ok(Some(history))
}

fn cmd_import(conn: &Connection, file: &Path, lottery: LotteryKind) -> Result<()> {
    let result = import::import_csv(conn, file, lottery)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, lottery: LotteryKind, last: u32) -> Result<()> {
    if count_draws(conn, lottery)? == 0 {
        println!("Base vide pour {}. Lancez d'abord : lottomix import", lottery);
        return Ok(());
    }
    let draws = fetch_last_draws(conn, lottery, last)?;
    display_draws(&draws, lottery);
    Ok(())
}

fn cmd_stats(conn: &Connection, lottery: LotteryKind, config: &EngineConfig, json: bool) -> Result<()> {
    let Some(history) = full_history(conn, lottery)? else {
        return Ok(());
    };
    let analysis = analyze(&history, config)?;
    let summary = summarize(&history, 10, 5);
    let trends = rolling_trends(&history, TREND_NUMBERS, config.trend_window);

    if json {
        let out = serde_json::json!({
            "summary": summary,
            "analysis": analysis.report(),
            "trends": trends,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    display_summary(&summary, lottery);
    println!("\n📊 Scores sur les {} derniers tirages", analysis.draws_analyzed);
    display_number_stats(
        &format!("Numéros (1-{})", config.variant.regular_max),
        &analysis.regular.stats(),
        Some(&analysis.hot_cold),
    );
    display_number_stats(
        &format!("{} (1-{})", lottery.special_label(), config.variant.special_max),
        &analysis.special.stats(),
        None,
    );
    display_hot_cold(&analysis.hot_cold);
    display_trends(&trends, config.trend_window);
    Ok(())
}

fn cmd_pairs(conn: &Connection, lottery: LotteryKind, config: &EngineConfig) -> Result<()> {
    let Some(history) = full_history(conn, lottery)? else {
        return Ok(());
    };
    let analysis = analyze(&history, config)?;
    display_pairs(&analysis.top_pairs);
    Ok(())
}

fn cmd_predict(conn: &Connection, lottery: LotteryKind, config: &EngineConfig, json: bool) -> Result<()> {
    let Some(history) = full_history(conn, lottery)? else {
        return Ok(());
    };
    let prediction = predict(&history, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction.report())?);
        return Ok(());
    }

    display_number_stats(
        &format!("Numéros (1-{})", config.variant.regular_max),
        &prediction.analysis.regular.stats(),
        Some(&prediction.analysis.hot_cold),
    );
    display_batch(&prediction.batch, lottery, prediction.seed);
    Ok(())
}

fn cmd_config(lottery: LotteryKind, output: &Path) -> Result<()> {
    let config = EngineConfig::with_variant(lottery.variant());
    save_config(&config, output)
        .with_context(|| format!("Échec de l'écriture de {:?}", output))?;
    println!("Configuration par défaut ({}) écrite dans {}", lottery, output.display());
    Ok(())
}
