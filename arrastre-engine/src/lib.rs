pub mod carry;
pub mod classify;
