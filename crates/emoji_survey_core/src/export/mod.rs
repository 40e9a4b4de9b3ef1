//! Response export formats.

pub mod csv;
