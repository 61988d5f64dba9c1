//! Property-based tests for coercion and resolution guarantees

mod coercion;
mod resolution;
