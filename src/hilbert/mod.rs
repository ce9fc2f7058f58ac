//! Hilbert module - discrete configuration spaces for spin systems.

mod spin;

pub use spin::{Configuration, SpinHilbert, MAX_ENUMERABLE_SITES};
