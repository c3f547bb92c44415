//! CSV decoder module
//!
//! Turns CSV bytes read from object storage into a [`Batch`](crate::batch::Batch).
//!
//! # Overview
//!
//! Cells are mapped the way a dataframe reader would map them: NA tokens
//! become missing, and with type inference enabled integers, floats and
//! booleans are recognized per cell. Everything else stays a string for the
//! normalizer to coerce.

mod decoders;
mod types;

pub use decoders::{parse_cell, CsvDecoder, NA_VALUES};
pub use types::DecoderConfig;
