use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Channel, DrawRecord, Period};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS active_history (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    channel   TEXT NOT NULL,
    period    TEXT NOT NULL,
    number    INTEGER NOT NULL,
    drawn_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_active_channel_period ON active_history (channel, period);

CREATE TABLE IF NOT EXISTS annual_log (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    channel   TEXT NOT NULL,
    number    INTEGER NOT NULL,
    drawn_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_annual_drawn_at ON annual_log (drawn_at);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("arrastre.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("No se pudo crear el directorio {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("No se pudo abrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Falló la migración del esquema")?;
    Ok(())
}

/// Registra una aparición: inserta en el historial activo y en el registro
/// anual dentro de una misma transacción. Si cualquiera de las dos
/// escrituras falla, ninguna queda visible.
pub fn append_record(conn: &Connection, record: &DrawRecord) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .context("No se pudo iniciar la transacción")?;
    tx.execute(
        "INSERT INTO active_history (channel, period, number, drawn_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            record.channel.as_str(),
            record.period().to_string(),
            record.number,
            record.drawn_at.to_string(),
        ],
    )
    .context("Error al escribir el historial activo")?;
    tx.execute(
        "INSERT INTO annual_log (channel, number, drawn_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            record.channel.as_str(),
            record.number,
            record.drawn_at.to_string(),
        ],
    )
    .context("Error al escribir el registro anual")?;
    tx.commit().context("No se pudo confirmar el registro")?;
    Ok(())
}

/// Historial activo de un canal y período, en orden de registro.
pub fn fetch_active_history(
    conn: &Connection,
    channel: Channel,
    period: Period,
) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(
        "SELECT number, drawn_at FROM active_history
         WHERE channel = ?1 AND period = ?2 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(
            rusqlite::params![channel.as_str(), period.to_string()],
            |row| Ok((row.get::<_, u8>(0)?, row.get::<_, String>(1)?)),
        )?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(number, date)| {
            let drawn_at = date
                .parse()
                .with_context(|| format!("Fecha inválida en la base: '{}'", date))?;
            Ok(DrawRecord {
                channel,
                number,
                drawn_at,
            })
        })
        .collect()
}

/// Registro anual de un año, en orden de inserción. Solo alimenta la
/// auditoría y la exportación; el clasificador nunca lo lee.
pub fn fetch_annual_log(conn: &Connection, year: i32) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(
        "SELECT channel, number, drawn_at FROM annual_log
         WHERE drawn_at >= ?1 AND drawn_at <= ?2 ORDER BY id",
    )?;
    let start = format!("{:04}-01-01", year);
    let end = format!("{:04}-12-31", year);
    let rows = stmt
        .query_map(rusqlite::params![start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u8>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(channel, number, date)| {
            let channel = Channel::parse(&channel)?;
            let drawn_at = date
                .parse()
                .with_context(|| format!("Fecha inválida en la base: '{}'", date))?;
            Ok(DrawRecord {
                channel,
                number,
                drawn_at,
            })
        })
        .collect()
}

/// Vacía el historial activo de un canal y período. No toca el registro
/// anual. Devuelve cuántos registros se eliminaron.
pub fn reset_active_history(conn: &Connection, channel: Channel, period: Period) -> Result<usize> {
    let removed = conn
        .execute(
            "DELETE FROM active_history WHERE channel = ?1 AND period = ?2",
            rusqlite::params![channel.as_str(), period.to_string()],
        )
        .context("Error al vaciar el historial activo")?;
    Ok(removed)
}

pub fn count_active(conn: &Connection, channel: Channel, period: Period) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM active_history WHERE channel = ?1 AND period = ?2",
        rusqlite::params![channel.as_str(), period.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn count_annual(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM annual_log", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(channel: Channel, number: u8, date: &str) -> DrawRecord {
        DrawRecord {
            channel,
            number,
            drawn_at: date.parse().unwrap(),
        }
    }

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_append_and_fetch() {
        let conn = setup();
        append_record(&conn, &record(Channel::Nacional, 7, "2026-08-10")).unwrap();

        let period = Period { year: 2026, month: 8 };
        let history = fetch_active_history(&conn, Channel::Nacional, period).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].number, 7);
        assert_eq!(history[0].channel, Channel::Nacional);
        assert_eq!(history[0].drawn_at.to_string(), "2026-08-10");
    }

    #[test]
    fn test_append_mirrors_annual_log() {
        let conn = setup();
        append_record(&conn, &record(Channel::Leidsa, 42, "2026-08-10")).unwrap();
        append_record(&conn, &record(Channel::Nacional, 42, "2026-08-11")).unwrap();

        assert_eq!(count_annual(&conn).unwrap(), 2);
        let log = fetch_annual_log(&conn, 2026).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].channel, Channel::Leidsa);
        assert_eq!(log[1].channel, Channel::Nacional);
    }

    #[test]
    fn test_fetch_preserves_insertion_order() {
        let conn = setup();
        // Fechas a propósito fuera de orden: manda el orden de registro.
        append_record(&conn, &record(Channel::Loteka, 10, "2026-08-05")).unwrap();
        append_record(&conn, &record(Channel::Loteka, 20, "2026-08-01")).unwrap();
        append_record(&conn, &record(Channel::Loteka, 30, "2026-08-03")).unwrap();

        let period = Period { year: 2026, month: 8 };
        let history = fetch_active_history(&conn, Channel::Loteka, period).unwrap();
        let numbers: Vec<u8> = history.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![10, 20, 30]);
    }

    #[test]
    fn test_fetch_filters_channel_and_period() {
        let conn = setup();
        append_record(&conn, &record(Channel::Nacional, 1, "2026-08-10")).unwrap();
        append_record(&conn, &record(Channel::Leidsa, 2, "2026-08-10")).unwrap();
        append_record(&conn, &record(Channel::Nacional, 3, "2026-07-31")).unwrap();

        let august = Period { year: 2026, month: 8 };
        let history = fetch_active_history(&conn, Channel::Nacional, august).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].number, 1);
    }

    #[test]
    fn test_reset_only_clears_target_channel() {
        let conn = setup();
        append_record(&conn, &record(Channel::Nacional, 7, "2026-08-10")).unwrap();
        append_record(&conn, &record(Channel::Leidsa, 7, "2026-08-10")).unwrap();

        let period = Period { year: 2026, month: 8 };
        let removed = reset_active_history(&conn, Channel::Nacional, period).unwrap();
        assert_eq!(removed, 1);

        assert!(fetch_active_history(&conn, Channel::Nacional, period).unwrap().is_empty());
        assert_eq!(fetch_active_history(&conn, Channel::Leidsa, period).unwrap().len(), 1);
        // El registro anual queda intacto.
        assert_eq!(count_annual(&conn).unwrap(), 2);
    }

    #[test]
    fn test_reset_only_clears_target_period() {
        let conn = setup();
        append_record(&conn, &record(Channel::Nacional, 7, "2026-07-15")).unwrap();
        append_record(&conn, &record(Channel::Nacional, 7, "2026-08-10")).unwrap();

        let july = Period { year: 2026, month: 7 };
        let august = Period { year: 2026, month: 8 };
        reset_active_history(&conn, Channel::Nacional, august).unwrap();

        assert!(fetch_active_history(&conn, Channel::Nacional, august).unwrap().is_empty());
        assert_eq!(fetch_active_history(&conn, Channel::Nacional, july).unwrap().len(), 1);
    }

    #[test]
    fn test_append_rolls_back_on_partial_failure() {
        let conn = setup();
        // Sin la tabla del registro anual, la segunda escritura falla y la
        // transacción revierte la primera.
        conn.execute("DROP TABLE annual_log", []).unwrap();
        let result = append_record(&conn, &record(Channel::Nacional, 7, "2026-08-10"));
        assert!(result.is_err());

        migrate(&conn).unwrap();
        let period = Period { year: 2026, month: 8 };
        assert_eq!(count_active(&conn, Channel::Nacional, period).unwrap(), 0);
        assert_eq!(count_annual(&conn).unwrap(), 0);
    }

    #[test]
    fn test_annual_log_filters_by_year() {
        let conn = setup();
        append_record(&conn, &record(Channel::Nacional, 7, "2025-12-31")).unwrap();
        append_record(&conn, &record(Channel::Nacional, 8, "2026-01-01")).unwrap();

        let log = fetch_annual_log(&conn, 2026).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].number, 8);
    }

    #[test]
    fn test_count_active() {
        let conn = setup();
        let period = Period { year: 2026, month: 8 };
        assert_eq!(count_active(&conn, Channel::Loteka, period).unwrap(), 0);
        append_record(&conn, &record(Channel::Loteka, 55, "2026-08-02")).unwrap();
        assert_eq!(count_active(&conn, Channel::Loteka, period).unwrap(), 1);
    }
}
