use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;

use crate::history::DrawHistory;
use crate::models::{Draw, LotteryKind, Variant};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    lottery   TEXT NOT NULL,
    date      TEXT NOT NULL,
    numbers   TEXT NOT NULL,
    special   INTEGER NOT NULL,
    PRIMARY KEY (lottery, date)
);
";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lottomix.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

fn encode_numbers(numbers: &[u8]) -> String {
    numbers.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(",")
}

fn decode_numbers(raw: &str) -> Result<Vec<u8>> {
    raw.split(',')
        .map(|s| {
            s.trim()
                .parse::<u8>()
                .with_context(|| format!("Numéro illisible en base : '{}'", s))
        })
        .collect()
}

pub fn insert_draw(conn: &Connection, lottery: LotteryKind, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (lottery, date, numbers, special) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            lottery.slug(),
            draw.date.format(DATE_FORMAT).to_string(),
            encode_numbers(&draw.numbers),
            draw.special,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

pub fn fetch_last_draws(conn: &Connection, lottery: LotteryKind, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT date, numbers, special FROM draws
         WHERE lottery = ?1 ORDER BY date DESC LIMIT ?2"
    )?;
    let rows = stmt.query_map(rusqlite::params![lottery.slug(), limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u8>(2)?,
        ))
    })?.collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(date, numbers, special)| {
            let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .with_context(|| format!("Date illisible en base : '{}'", date))?;
            Ok(Draw::new(date, decode_numbers(&numbers)?, special))
        })
        .collect()
}

/// Charge et valide les `limit` derniers tirages d'une loterie.
pub fn load_history(conn: &Connection, lottery: LotteryKind, variant: Variant, limit: u32) -> Result<DrawHistory> {
    let draws = fetch_last_draws(conn, lottery, limit)?;
    let history = DrawHistory::new(variant, draws)
        .with_context(|| format!("Historique {} incohérent avec la variante {}", lottery, variant))?;
    Ok(history)
}

pub fn count_draws(conn: &Connection, lottery: LotteryKind) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE lottery = ?1",
        [lottery.slug()],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(date: &str) -> Draw {
        Draw::new(
            NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            vec![3, 11, 17, 22, 30, 36],
            4,
        )
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn, LotteryKind::Israeli).unwrap(), 0);

        insert_draw(&conn, LotteryKind::Israeli, &test_draw("2024-01-01")).unwrap();
        assert_eq!(count_draws(&conn, LotteryKind::Israeli).unwrap(), 1);
        assert_eq!(count_draws(&conn, LotteryKind::Powerball).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = memory_db();

        let inserted = insert_draw(&conn, LotteryKind::Israeli, &test_draw("2024-01-01")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, LotteryKind::Israeli, &test_draw("2024-01-01")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn, LotteryKind::Israeli).unwrap(), 1);
    }

    #[test]
    fn test_same_date_other_lottery() {
        let conn = memory_db();
        insert_draw(&conn, LotteryKind::Israeli, &test_draw("2024-01-01")).unwrap();
        let inserted = insert_draw(&conn, LotteryKind::MegaMillions, &test_draw("2024-01-01")).unwrap();
        assert!(inserted);
    }

    #[test]
    fn test_fetch_order_and_roundtrip() {
        let conn = memory_db();

        insert_draw(&conn, LotteryKind::Israeli, &test_draw("2024-01-01")).unwrap();
        insert_draw(&conn, LotteryKind::Israeli, &test_draw("2024-01-05")).unwrap();
        insert_draw(&conn, LotteryKind::Israeli, &test_draw("2024-01-03")).unwrap();

        let draws = fetch_last_draws(&conn, LotteryKind::Israeli, 10).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].date.to_string(), "2024-01-05");
        assert_eq!(draws[1].date.to_string(), "2024-01-03");
        assert_eq!(draws[2].date.to_string(), "2024-01-01");
        assert_eq!(draws[0].numbers, vec![3, 11, 17, 22, 30, 36]);
        assert_eq!(draws[0].special, 4);

        let limited = fetch_last_draws(&conn, LotteryKind::Israeli, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_load_history_validates_variant() {
        let conn = memory_db();
        insert_draw(&conn, LotteryKind::Israeli, &test_draw("2024-01-01")).unwrap();

        let history = load_history(&conn, LotteryKind::Israeli, Variant::ISRAELI, 10).unwrap();
        assert_eq!(history.len(), 1);

        // 6 numéros ne correspondent pas au format Powerball (5 numéros)
        assert!(load_history(&conn, LotteryKind::Israeli, Variant::POWERBALL, 10).is_err());
    }
}
