use arrastre_db::models::canonical_number;

/// Desplazamientos fijos que definen los arrastres de un número base.
pub const OFFSETS: [u16; 3] = [25, 50, 75];

/// Los tres arrastres de un número base: base+25, base+50 y base+75,
/// siempre módulo 100.
pub fn arrastres(base: u8) -> [u8; 3] {
    // Se ensancha a u16 para que la suma nunca desborde antes del módulo.
    OFFSETS.map(|offset| ((base as u16 + offset) % 100) as u8)
}

/// Arrastres en forma canónica de dos dígitos, listos para mostrar.
pub fn arrastres_canonicos(base: u8) -> [String; 3] {
    arrastres(base).map(canonical_number)
}
