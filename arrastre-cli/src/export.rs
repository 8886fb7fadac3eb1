use anyhow::{Context, Result};
use arrastre_db::rusqlite::Connection;
use std::path::Path;

use arrastre_db::db::fetch_annual_log;

/// Vuelca el registro anual de un año a un archivo JSON legible.
/// Devuelve cuántos registros se exportaron.
pub fn export_annual(conn: &Connection, year: i32, path: &Path) -> Result<usize> {
    let records = fetch_annual_log(conn, year)?;
    let json = serde_json::to_string_pretty(&records)
        .context("No se pudo serializar el registro anual")?;
    std::fs::write(path, json).with_context(|| format!("No se pudo escribir {:?}", path))?;
    Ok(records.len())
}
