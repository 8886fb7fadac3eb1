use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Canales de sorteo seguidos por la aplicación. La lista es fija: ningún
/// cálculo depende de ella más allá de la búsqueda y la validación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    LaPrimera,
    QuinielaReal,
    GanaMas,
    Loteka,
    Leidsa,
    Nacional,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::LaPrimera,
        Channel::QuinielaReal,
        Channel::GanaMas,
        Channel::Loteka,
        Channel::Leidsa,
        Channel::Nacional,
    ];

    /// Identificador estable usado en la base de datos y en los CSV.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::LaPrimera => "la-primera",
            Channel::QuinielaReal => "quiniela-real",
            Channel::GanaMas => "gana-mas",
            Channel::Loteka => "loteka",
            Channel::Leidsa => "leidsa",
            Channel::Nacional => "nacional",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Channel::LaPrimera => "La Primera",
            Channel::QuinielaReal => "Quiniela Real",
            Channel::GanaMas => "Gana Más",
            Channel::Loteka => "Quiniela Loteka",
            Channel::Leidsa => "Quiniela Leidsa",
            Channel::Nacional => "Lotería Nacional",
        }
    }

    /// Hora local del sorteo.
    pub fn draw_time(&self) -> &'static str {
        match self {
            Channel::LaPrimera => "12:00 PM",
            Channel::QuinielaReal => "12:55 PM",
            Channel::GanaMas => "2:30 PM",
            Channel::Loteka => "7:55 PM",
            Channel::Leidsa => "8:55 PM",
            Channel::Nacional => "9:00 PM",
        }
    }

    pub fn parse(input: &str) -> Result<Channel> {
        let needle = input.trim().to_lowercase();
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .with_context(|| format!("Canal desconocido: '{}'", input.trim()))
    }
}

/// Período contable (mes calendario) al que pertenece un historial activo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn from_date(date: NaiveDate) -> Period {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Interpreta "AAAA-MM", por ejemplo "2026-08".
    pub fn parse(input: &str) -> Result<Period> {
        let parts: Vec<&str> = input.trim().split('-').collect();
        if parts.len() != 2 {
            bail!("Período inválido: '{}' (se espera AAAA-MM)", input);
        }
        let year: i32 = parts[0]
            .parse()
            .with_context(|| format!("Año inválido en el período '{}'", input))?;
        let month: u32 = parts[1]
            .parse()
            .with_context(|| format!("Mes inválido en el período '{}'", input))?;
        if !(1..=12).contains(&month) {
            bail!("Mes fuera de rango en el período '{}'", input);
        }
        Ok(Period { year, month })
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Una aparición de un número en un canal. Los registros nunca se modifican
/// después de creados: el historial solo crece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub channel: Channel,
    pub number: u8,
    pub drawn_at: NaiveDate,
}

impl DrawRecord {
    /// Período contable del registro, derivado siempre de `drawn_at`.
    pub fn period(&self) -> Period {
        Period::from_date(self.drawn_at)
    }
}

/// Forma canónica de dos dígitos ("00" a "99").
pub fn canonical_number(number: u8) -> String {
    format!("{:02}", number)
}

/// Normaliza la entrada del usuario a un número de quiniela.
/// Acepta "7" o "07"; rechaza todo lo que no sea un entero entre 00 y 99.
pub fn parse_number(input: &str) -> Result<u8> {
    let s = input.trim();
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        bail!("Número inválido: '{}' (se espera un valor entre 00 y 99)", input);
    }
    let number: u8 = s.parse()?;
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_normalizes() {
        assert_eq!(parse_number("7").unwrap(), 7);
        assert_eq!(parse_number("07").unwrap(), 7);
        assert_eq!(parse_number("00").unwrap(), 0);
        assert_eq!(parse_number("99").unwrap(), 99);
        assert_eq!(parse_number("  23  ").unwrap(), 23);
    }

    #[test]
    fn test_parse_number_rejects_invalid() {
        assert!(parse_number("100").is_err());
        assert!(parse_number("-1").is_err());
        assert!(parse_number("").is_err());
        assert!(parse_number("   ").is_err());
        assert!(parse_number("7a").is_err());
        assert!(parse_number("3.5").is_err());
        assert!(parse_number("siete").is_err());
    }

    #[test]
    fn test_canonical_number_pads() {
        assert_eq!(canonical_number(0), "00");
        assert_eq!(canonical_number(7), "07");
        assert_eq!(canonical_number(99), "99");
    }

    #[test]
    fn test_canonical_parse_roundtrip() {
        for n in 0..=99u8 {
            assert_eq!(parse_number(&canonical_number(n)).unwrap(), n);
        }
    }

    #[test]
    fn test_channel_ids_roundtrip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::parse(channel.as_str()).unwrap(), channel);
        }
    }

    #[test]
    fn test_channel_parse_trims_and_lowercases() {
        assert_eq!(Channel::parse(" Nacional ").unwrap(), Channel::Nacional);
        assert_eq!(Channel::parse("GANA-MAS").unwrap(), Channel::GanaMas);
    }

    #[test]
    fn test_channel_parse_unknown() {
        assert!(Channel::parse("powerball").is_err());
        assert!(Channel::parse("").is_err());
    }

    #[test]
    fn test_channel_serde_matches_as_str() {
        for channel in Channel::ALL {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{}\"", channel.as_str()));
        }
    }

    #[test]
    fn test_period_display_pads_month() {
        let period = Period { year: 2026, month: 8 };
        assert_eq!(period.to_string(), "2026-08");
    }

    #[test]
    fn test_period_parse_ok() {
        assert_eq!(Period::parse("2026-08").unwrap(), Period { year: 2026, month: 8 });
        assert_eq!(Period::parse("2026-8").unwrap(), Period { year: 2026, month: 8 });
        assert_eq!(Period::parse(" 2025-12 ").unwrap(), Period { year: 2025, month: 12 });
    }

    #[test]
    fn test_period_parse_invalid() {
        assert!(Period::parse("2026").is_err());
        assert!(Period::parse("2026-13").is_err());
        assert!(Period::parse("2026-00").is_err());
        assert!(Period::parse("08-2026").is_err());
        assert!(Period::parse("agosto").is_err());
    }

    #[test]
    fn test_period_from_date() {
        let date: NaiveDate = "2026-08-24".parse().unwrap();
        assert_eq!(Period::from_date(date), Period { year: 2026, month: 8 });
    }

    #[test]
    fn test_record_period_follows_drawn_at() {
        let record = DrawRecord {
            channel: Channel::Loteka,
            number: 55,
            drawn_at: "2025-01-31".parse().unwrap(),
        };
        assert_eq!(record.period(), Period { year: 2025, month: 1 });
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = DrawRecord {
            channel: Channel::GanaMas,
            number: 7,
            drawn_at: "2026-08-24".parse().unwrap(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"gana-mas\""));
        assert!(json.contains("\"2026-08-24\""));
        let back: DrawRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
