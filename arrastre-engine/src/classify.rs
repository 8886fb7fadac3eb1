use arrastre_db::models::DrawRecord;
use chrono::NaiveDate;

/// Ventana de enfriamiento tras la última aparición de un número.
pub const COOLDOWN_DAYS: i64 = 7;

/// Temperatura de un número según sus apariciones en el período.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heat {
    Cold,
    Rising,
    Hot,
    Burnt,
}

impl Heat {
    /// 0 apariciones es frío, 1 subiendo, 2 caliente y de 3 en adelante
    /// quemado: el techo no distingue entre 3 y más.
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Heat::Cold,
            1 => Heat::Rising,
            2 => Heat::Hot,
            _ => Heat::Burnt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Heat::Cold => "FRÍO",
            Heat::Rising => "SUBIENDO",
            Heat::Hot => "CALIENTE",
            Heat::Burnt => "QUEMADO",
        }
    }
}

impl std::fmt::Display for Heat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberStatus {
    pub number: u8,
    pub count: u32,
    pub heat: Heat,
    /// Días restantes de enfriamiento. `None` cuando el número nunca
    /// apareció en el período (no hay fecha de referencia).
    pub cooldown_days: Option<i64>,
}

/// Clasifica un número contra el historial activo de un canal. Función
/// pura: el mismo historial, número y fecha producen siempre el mismo
/// resultado, sin importar el orden de los registros.
pub fn classify(history: &[DrawRecord], number: u8, today: NaiveDate) -> NumberStatus {
    let count = history.iter().filter(|r| r.number == number).count() as u32;
    let last_seen = history
        .iter()
        .filter(|r| r.number == number)
        .map(|r| r.drawn_at)
        .max();

    let cooldown_days = last_seen.map(|seen| {
        let elapsed = (today - seen).num_days();
        (COOLDOWN_DAYS - elapsed).max(0)
    });

    NumberStatus {
        number,
        count,
        heat: Heat::from_count(count),
        cooldown_days,
    }
}

/// Estado de cada número visto en el período, ordenado por apariciones
/// descendentes y, a igual cuenta, por número ascendente.
pub fn summarize(history: &[DrawRecord], today: NaiveDate) -> Vec<NumberStatus> {
    let mut numbers: Vec<u8> = history.iter().map(|r| r.number).collect();
    numbers.sort_unstable();
    numbers.dedup();

    let mut statuses: Vec<NumberStatus> = numbers
        .into_iter()
        .map(|n| classify(history, n, today))
        .collect();
    statuses.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
    statuses
}
