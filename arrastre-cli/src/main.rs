mod display;
mod export;
mod import;
mod interactive;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

use arrastre_db::db::{
    append_record, count_active, db_path, fetch_active_history, fetch_annual_log, migrate, open_db,
    reset_active_history,
};
use arrastre_db::models::{Channel, DrawRecord, Period, canonical_number, parse_number};
use arrastre_engine::carry::arrastres_canonicos;
use arrastre_engine::classify::{classify, summarize};
use crate::display::{
    display_annual, display_carries, display_channels, display_history, display_import_summary,
    display_status, display_summary,
};

#[derive(Parser)]
#[command(name = "arrastre", about = "Seguimiento de quinielas y cálculo de arrastres")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calcular los arrastres de un número base
    Carries {
        /// Número base (00-99)
        numero: String,
    },

    /// Estado de un número en el período actual
    Status {
        /// Canal del sorteo
        canal: Channel,

        /// Número a consultar (00-99)
        numero: String,

        /// Fecha de referencia (AAAA-MM-DD, por defecto hoy)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Resumen de todos los números vistos en el período
    Summary {
        /// Canal del sorteo
        canal: Channel,

        /// Fecha de referencia (AAAA-MM-DD, por defecto hoy)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Registrar la salida de un número
    Register {
        /// Canal del sorteo
        canal: Channel,

        /// Número que salió (00-99)
        numero: String,

        /// Fecha del sorteo (AAAA-MM-DD, por defecto hoy)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Historial activo de un canal en orden de registro
    History {
        /// Canal del sorteo
        canal: Channel,

        /// Período a listar (AAAA-MM, por defecto el mes en curso)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Consultar el registro anual
    Annual {
        /// Año a consultar (por defecto el año en curso)
        #[arg(short, long)]
        year: Option<i32>,

        /// Limitar a un canal
        #[arg(short, long)]
        canal: Option<Channel>,

        /// Mostrar solo los últimos N registros
        #[arg(short, long)]
        last: Option<usize>,
    },

    /// Vaciar el historial activo de un canal y período
    Reset {
        /// Canal del sorteo
        canal: Channel,

        /// Período a vaciar (AAAA-MM, por defecto el mes en curso)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Listar los canales disponibles
    Channels,

    /// Importar registros desde un archivo CSV (canal;numero;fecha)
    Import {
        /// Ruta del archivo CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Exportar el registro anual a JSON
    Export {
        /// Año a exportar (por defecto el año en curso)
        #[arg(short, long)]
        year: Option<i32>,

        /// Archivo de salida (por defecto anual_<año>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mostrar la ruta de la base de datos
    DbPath,

    /// Modo interactivo
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Carries { numero } => cmd_carries(parse_number(&numero)?),
        Command::Status { canal, numero, date } => {
            cmd_status(&conn, canal, parse_number(&numero)?, resolve_date(date.as_deref())?)
        }
        Command::Summary { canal, date } => {
            cmd_summary(&conn, canal, resolve_date(date.as_deref())?)
        }
        Command::Register { canal, numero, date } => {
            cmd_register(&conn, canal, parse_number(&numero)?, resolve_date(date.as_deref())?)
        }
        Command::History { canal, period } => {
            cmd_history(&conn, canal, resolve_period(period.as_deref())?)
        }
        Command::Annual { year, canal, last } => {
            cmd_annual(&conn, resolve_year(year), canal, last)
        }
        Command::Reset { canal, period } => {
            cmd_reset(&conn, canal, resolve_period(period.as_deref())?)
        }
        Command::Channels => {
            display_channels();
            Ok(())
        }
        Command::Import { file } => cmd_import(&conn, &file),
        Command::Export { year, output } => cmd_export(&conn, resolve_year(year), output),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::Interactive => interactive::run_interactive(&conn),
    }
}

fn resolve_date(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Fecha inválida: '{}' (se espera AAAA-MM-DD)", raw)),
        None => Ok(Local::now().date_naive()),
    }
}

fn resolve_period(arg: Option<&str>) -> Result<Period> {
    match arg {
        Some(raw) => Period::parse(raw),
        None => Ok(Period::from_date(Local::now().date_naive())),
    }
}

fn resolve_year(arg: Option<i32>) -> i32 {
    arg.unwrap_or_else(|| Local::now().date_naive().year())
}

pub(crate) fn cmd_carries(numero: u8) -> Result<()> {
    display_carries(numero, &arrastres_canonicos(numero));
    Ok(())
}

pub(crate) fn cmd_status(
    conn: &arrastre_db::rusqlite::Connection,
    canal: Channel,
    numero: u8,
    today: NaiveDate,
) -> Result<()> {
    let period = Period::from_date(today);
    let history = fetch_active_history(conn, canal, period)?;
    let status = classify(&history, numero, today);
    display_status(canal, &status, today);
    Ok(())
}

pub(crate) fn cmd_summary(
    conn: &arrastre_db::rusqlite::Connection,
    canal: Channel,
    today: NaiveDate,
) -> Result<()> {
    let period = Period::from_date(today);
    let history = fetch_active_history(conn, canal, period)?;
    if history.is_empty() {
        println!("Sin registros activos para {} en {}.", canal.label(), period);
        return Ok(());
    }
    let statuses = summarize(&history, today);
    display_summary(canal, period, &statuses, history.len());
    Ok(())
}

pub(crate) fn cmd_register(
    conn: &arrastre_db::rusqlite::Connection,
    canal: Channel,
    numero: u8,
    date: NaiveDate,
) -> Result<()> {
    let record = DrawRecord {
        channel: canal,
        number: numero,
        drawn_at: date,
    };
    append_record(conn, &record)?;
    println!(
        "Registrado {} en {} con fecha {}.",
        canonical_number(numero),
        canal.label(),
        date
    );

    // Relectura inmediata: el estado mostrado ya incluye el registro nuevo.
    let history = fetch_active_history(conn, canal, record.period())?;
    let status = classify(&history, numero, date);
    display_status(canal, &status, date);
    Ok(())
}

pub(crate) fn cmd_history(
    conn: &arrastre_db::rusqlite::Connection,
    canal: Channel,
    period: Period,
) -> Result<()> {
    let records = fetch_active_history(conn, canal, period)?;
    if records.is_empty() {
        println!("Sin registros activos para {} en {}.", canal.label(), period);
        return Ok(());
    }
    display_history(canal, period, &records);
    Ok(())
}

fn cmd_annual(
    conn: &arrastre_db::rusqlite::Connection,
    year: i32,
    canal: Option<Channel>,
    last: Option<usize>,
) -> Result<()> {
    let mut records = fetch_annual_log(conn, year)?;
    if let Some(c) = canal {
        records.retain(|r| r.channel == c);
    }
    if records.is_empty() {
        println!("Sin registros anuales para {}.", year);
        return Ok(());
    }
    if let Some(n) = last {
        if records.len() > n {
            records = records.split_off(records.len() - n);
        }
    }
    display_annual(year, &records);
    Ok(())
}

pub(crate) fn cmd_reset(
    conn: &arrastre_db::rusqlite::Connection,
    canal: Channel,
    period: Period,
) -> Result<()> {
    let n = count_active(conn, canal, period)?;
    if n == 0 {
        println!("Sin registros activos para {} en {}.", canal.label(), period);
        return Ok(());
    }

    println!(
        "Se eliminarán {} registros activos de {} en {}. El registro anual no se toca.",
        n,
        canal.label(),
        period
    );
    let confirm = prompt("¿Confirmar el reinicio? (s/n): ")?;
    if confirm.to_lowercase() == "s" {
        let removed = reset_active_history(conn, canal, period)?;
        println!("Período reiniciado: {} registros eliminados.", removed);
    } else {
        println!("Reinicio cancelado.");
    }

    Ok(())
}

fn cmd_import(conn: &arrastre_db::rusqlite::Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_export(
    conn: &arrastre_db::rusqlite::Connection,
    year: i32,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(format!("anual_{}.json", year)));
    let count = export::export_annual(conn, year, &path)?;
    println!("Exportados {} registros de {} a {}.", count, year, path.display());
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Error de lectura")?;
    Ok(input.trim().to_string())
}
