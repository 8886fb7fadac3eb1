use anyhow::Result;
use chrono::{Local, NaiveDate};

use arrastre_db::models::{Channel, Period, canonical_number, parse_number};

use crate::prompt;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Carries,
    Status,
    Register,
    History,
    Summary,
    Reset,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "arrastres" | "carries" | "arr" => Some(InteractiveCommand::Carries),
        "2" | "estado" | "status" | "est" => Some(InteractiveCommand::Status),
        "3" | "registrar" | "register" | "reg" => Some(InteractiveCommand::Register),
        "4" | "historial" | "history" | "hist" => Some(InteractiveCommand::History),
        "5" | "resumen" | "summary" | "res" => Some(InteractiveCommand::Summary),
        "6" | "reiniciar" | "reset" => Some(InteractiveCommand::Reset),
        "7" | "salir" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Modo interactivo ──");
    println!("  1. arrastres  Arrastres de un número");
    println!("  2. estado     Estado de un número");
    println!("  3. registrar  Registrar una salida");
    println!("  4. historial  Historial del período");
    println!("  5. resumen    Resumen del período");
    println!("  6. reiniciar  Reiniciar el período");
    println!("  7. salir      Salir");
    println!();
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn prompt_number() -> Result<u8> {
    loop {
        let input = prompt("Número (00-99): ")?;
        match parse_number(&input) {
            Ok(n) => return Ok(n),
            Err(e) => println!("{e:#}. Intente de nuevo."),
        }
    }
}

fn prompt_channel() -> Result<Channel> {
    let options = Channel::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    loop {
        let input = prompt(&format!("Canal ({}): ", options))?;
        match Channel::parse(&input) {
            Ok(c) => return Ok(c),
            Err(e) => println!("{e:#}. Intente de nuevo."),
        }
    }
}

fn prompt_date(today: NaiveDate) -> Result<NaiveDate> {
    loop {
        let input = prompt_with_default("Fecha (AAAA-MM-DD)", &today.to_string())?;
        match input.parse() {
            Ok(d) => return Ok(d),
            Err(_) => println!("Fecha inválida: '{}'. Intente de nuevo.", input),
        }
    }
}

fn prompt_period(today: NaiveDate) -> Result<Period> {
    let default = Period::from_date(today).to_string();
    loop {
        let input = prompt_with_default("Período (AAAA-MM)", &default)?;
        match Period::parse(&input) {
            Ok(p) => return Ok(p),
            Err(e) => println!("{e:#}. Intente de nuevo."),
        }
    }
}

fn cmd_carries_interactive() -> Result<()> {
    let number = prompt_number()?;
    super::cmd_carries(number)
}

fn cmd_status_interactive(conn: &arrastre_db::rusqlite::Connection) -> Result<()> {
    let channel = prompt_channel()?;
    let number = prompt_number()?;
    super::cmd_status(conn, channel, number, Local::now().date_naive())
}

fn cmd_register_interactive(conn: &arrastre_db::rusqlite::Connection) -> Result<()> {
    println!("Registro de una salida\n");

    let channel = prompt_channel()?;
    let number = prompt_number()?;
    let today = Local::now().date_naive();
    let date = prompt_date(today)?;

    println!("\nRegistro a insertar:");
    println!(
        "  Canal: {}  Número: {}  Fecha: {}",
        channel.label(),
        canonical_number(number),
        date
    );

    let confirm = prompt("\n¿Confirmar el registro? (s/n): ")?;
    if confirm.to_lowercase() == "s" {
        super::cmd_register(conn, channel, number, date)
    } else {
        println!("Registro cancelado.");
        Ok(())
    }
}

fn cmd_history_interactive(conn: &arrastre_db::rusqlite::Connection) -> Result<()> {
    let channel = prompt_channel()?;
    let period = prompt_period(Local::now().date_naive())?;
    super::cmd_history(conn, channel, period)
}

fn cmd_summary_interactive(conn: &arrastre_db::rusqlite::Connection) -> Result<()> {
    let channel = prompt_channel()?;
    super::cmd_summary(conn, channel, Local::now().date_naive())
}

fn cmd_reset_interactive(conn: &arrastre_db::rusqlite::Connection) -> Result<()> {
    let channel = prompt_channel()?;
    let period = prompt_period(Local::now().date_naive())?;
    super::cmd_reset(conn, channel, period)
}

pub fn run_interactive(conn: &arrastre_db::rusqlite::Connection) -> Result<()> {
    println!("¡Bienvenido al modo interactivo de arrastre!");

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("¡Hasta luego!");
                break;
            }
            Some(InteractiveCommand::Carries) => {
                if let Err(e) = cmd_carries_interactive() {
                    println!("Error: {e:#}");
                }
            }
            Some(InteractiveCommand::Status) => {
                if let Err(e) = cmd_status_interactive(conn) {
                    println!("Error: {e:#}");
                }
            }
            Some(InteractiveCommand::Register) => {
                if let Err(e) = cmd_register_interactive(conn) {
                    println!("Error: {e:#}");
                }
            }
            Some(InteractiveCommand::History) => {
                if let Err(e) = cmd_history_interactive(conn) {
                    println!("Error: {e:#}");
                }
            }
            Some(InteractiveCommand::Summary) => {
                if let Err(e) = cmd_summary_interactive(conn) {
                    println!("Error: {e:#}");
                }
            }
            Some(InteractiveCommand::Reset) => {
                if let Err(e) = cmd_reset_interactive(conn) {
                    println!("Error: {e:#}");
                }
            }
            None => {
                println!(
                    "Comando desconocido: '{}'. Escriba un número (1-7) o el nombre de un comando.",
                    input
                );
            }
        }
    }

    Ok(())
}
