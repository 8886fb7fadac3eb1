use chrono::NaiveDate;
use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use arrastre_db::models::{Channel, DrawRecord, Period, canonical_number};
use arrastre_engine::classify::{Heat, NumberStatus};

pub fn display_carries(base: u8, carries: &[String; 3]) {
    println!("\n🎲 Arrastres de {}\n", canonical_number(base));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Número", "+25", "+50", "+75"]);

    table.add_row(vec![
        Cell::new(canonical_number(base)).fg(Color::Cyan),
        Cell::new(&carries[0]),
        Cell::new(&carries[1]),
        Cell::new(&carries[2]),
    ]);

    println!("{table}");
}

pub fn display_status(channel: Channel, status: &NumberStatus, today: NaiveDate) {
    println!(
        "\n📊 Estado de {} en {} al {}\n",
        canonical_number(status.number),
        channel.label(),
        today
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Número", "Apariciones", "Estado", "Enfriamiento"]);

    table.add_row(status_row(status));
    println!("{table}");
}

pub fn display_summary(channel: Channel, period: Period, statuses: &[NumberStatus], total: usize) {
    println!(
        "\n📊 Resumen de {} en {} ({} registros)\n",
        channel.label(),
        period,
        total
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Número", "Apariciones", "Estado", "Enfriamiento"]);

    for status in statuses {
        table.add_row(status_row(status));
    }
    println!("{table}");
}

fn status_row(status: &NumberStatus) -> Vec<Cell> {
    vec![
        Cell::new(canonical_number(status.number)),
        Cell::new(status.count.to_string()),
        Cell::new(status.heat.to_string()).fg(heat_color(status.heat)),
        Cell::new(cooldown_text(status.cooldown_days)),
    ]
}

fn heat_color(heat: Heat) -> Color {
    match heat {
        Heat::Cold => Color::Blue,
        Heat::Rising => Color::Yellow,
        Heat::Hot => Color::Green,
        Heat::Burnt => Color::Red,
    }
}

fn cooldown_text(days: Option<i64>) -> String {
    match days {
        None => "—".to_string(),
        Some(1) => "1 día".to_string(),
        Some(d) => format!("{} días", d),
    }
}

pub fn display_history(channel: Channel, period: Period, records: &[DrawRecord]) {
    if records.is_empty() {
        println!("Sin registros que mostrar.");
        return;
    }

    println!("\n── Historial de {} en {} ──", channel.label(), period);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Número", "Fecha"]);

    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            canonical_number(record.number),
            record.drawn_at.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_annual(year: i32, records: &[DrawRecord]) {
    if records.is_empty() {
        println!("Sin registros que mostrar.");
        return;
    }

    println!("\n── Registro anual {} ──", year);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Canal", "Número", "Fecha"]);

    for record in records {
        table.add_row(vec![
            record.channel.label().to_string(),
            canonical_number(record.number),
            record.drawn_at.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_channels() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Canal", "Lotería", "Hora del sorteo"]);

    for channel in Channel::ALL {
        table.add_row(vec![channel.as_str(), channel.label(), channel.draw_time()]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Importación terminada:");
    println!("  Líneas leídas : {}", result.total_rows);
    println!("  Insertadas    : {}", result.inserted);
    if result.errors > 0 {
        println!("  Errores       : {}", result.errors);
    }
}
