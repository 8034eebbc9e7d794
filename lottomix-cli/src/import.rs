use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use lottomix_db::rusqlite::Connection;
use std::path::Path;

use lottomix_db::db::insert_draw;
use lottomix_db::models::{Draw, LotteryKind, Variant, validate_draw};

/// Accepte `AAAA-MM-JJ` ou `JJ/MM/AAAA`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .with_context(|| format!("Format de date invalide: '{}'", raw))
}

/// Ligne attendue : `date,n1,...,nk,spécial`.
fn parse_record(record: &csv::StringRecord, variant: &Variant) -> Result<Draw> {
    let expected = variant.pick + 2;
    if record.len() != expected {
        bail!("{} champs au lieu de {}", record.len(), expected);
    }

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = record.get(idx).map(str::trim).unwrap_or_default();
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (colonne {})", s, idx + 1))
    };

    let date = parse_date(record.get(0).unwrap_or_default())?;
    let numbers = (1..=variant.pick).map(|i| get_u8(i)).collect::<Result<Vec<u8>>>()?;
    let special = get_u8(variant.pick + 1)?;

    let draw = Draw::new(date, numbers, special);
    validate_draw(&draw, variant)?;
    Ok(draw)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path, lottery: LotteryKind) -> Result<ImportResult> {
    let variant = lottery.variant();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for record_result in reader.records() {
        result.total_records += 1;
        // +1 pour l'en-tête
        let line = result.total_records + 1;
        match record_result {
            Ok(record) => {
                match parse_record(&record, &variant) {
                    Ok(draw) => {
                        match insert_draw(&tx, lottery, &draw) {
                            Ok(true) => result.inserted += 1,
                            Ok(false) => result.skipped += 1,
                            Err(e) => {
                                eprintln!("Erreur insertion ligne {}: {:#}", line, e);
                                result.errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("Erreur parsing ligne {}: {:#}", line, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", line, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    tracing::info!(
        lottery = lottery.slug(),
        inserted = result.inserted,
        skipped = result.skipped,
        errors = result.errors,
        "import CSV terminé"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottomix_db::db::{count_draws, fetch_last_draws, migrate};
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("17/02/2026").unwrap().to_string(), "2026-02-17");
        assert_eq!(parse_date("2020-01-01").unwrap().to_string(), "2020-01-01");
        assert!(parse_date("2020/01/01").is_err());
        assert!(parse_date("31/02/2024").is_err());
    }

    #[test]
    fn test_import_counts() {
        let file = write_csv(
            "date,n1,n2,n3,n4,n5,n6,special\n\
             2024-01-02,1,2,3,4,5,6,7\n\
             05/01/2024,10,11,12,13,14,37,1\n\
             2024-01-02,8,9,10,11,12,13,2\n\
             2024-01-09,1,2,3,4,5,40,1\n\
             2024-01-12,1,2,3,4,5,6\n",
        );
        let conn = memory_db();
        let result = import_csv(&conn, file.path(), LotteryKind::Israeli).unwrap();
        assert_eq!(
            result,
            ImportResult { total_records: 5, inserted: 2, skipped: 1, errors: 2 }
        );
        assert_eq!(count_draws(&conn, LotteryKind::Israeli).unwrap(), 2);

        let draws = fetch_last_draws(&conn, LotteryKind::Israeli, 10).unwrap();
        assert_eq!(draws[0].date.to_string(), "2024-01-05");
        assert_eq!(draws[0].numbers, vec![10, 11, 12, 13, 14, 37]);
    }

    #[test]
    fn test_import_is_idempotent() {
        let file = write_csv("date,n1,n2,n3,n4,n5,pb\n2024-03-02,5,17,23,44,69,26\n");
        let conn = memory_db();
        import_csv(&conn, file.path(), LotteryKind::Powerball).unwrap();
        let again = import_csv(&conn, file.path(), LotteryKind::Powerball).unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(again.skipped, 1);
    }

    #[test]
    fn test_missing_file() {
        let conn = memory_db();
        let dir = tempfile::tempdir().unwrap();
        assert!(import_csv(&conn, &dir.path().join("absent.csv"), LotteryKind::Israeli).is_err());
    }
}
