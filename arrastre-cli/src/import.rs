use anyhow::{Context, Result};
use arrastre_db::rusqlite::Connection;
use chrono::NaiveDate;
use std::path::Path;

use arrastre_db::db::append_record;
use arrastre_db::models::{Channel, DrawRecord, parse_number};

/// Fecha de planilla "DD/MM/AAAA".
fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .with_context(|| format!("Formato de fecha inválido: '{}' (se espera DD/MM/AAAA)", raw))
}

fn parse_record(record: &csv::StringRecord) -> Result<DrawRecord> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Falta el campo en el índice {}", idx))
    };

    let channel = Channel::parse(&get(0)?)?;
    let number = parse_number(&get(1)?)?;
    let drawn_at = parse_date(&get(2)?)?;

    Ok(DrawRecord {
        channel,
        number,
        drawn_at,
    })
}

pub struct ImportResult {
    pub total_rows: u32,
    pub inserted: u32,
    pub errors: u32,
}

/// Carga masiva desde un CSV `canal;numero;fecha` (con encabezado).
/// Cada fila pasa por la misma validación que la entrada interactiva y se
/// inserta con el mismo registro doble atómico; una fila mala se cuenta y
/// no detiene las demás.
pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir {:?}", path))?;

    let mut result = ImportResult {
        total_rows: 0,
        inserted: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_rows += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => match append_record(conn, &draw) {
                    Ok(()) => result.inserted += 1,
                    Err(e) => {
                        eprintln!("Error al insertar la línea {}: {}", result.total_rows, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    eprintln!("Error al interpretar la línea {}: {}", result.total_rows, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Error al leer la línea {}: {}", result.total_rows, e);
                result.errors += 1;
            }
        }
    }

    Ok(result)
}
