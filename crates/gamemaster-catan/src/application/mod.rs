//! Application layer for Catan.

pub mod spinner;
