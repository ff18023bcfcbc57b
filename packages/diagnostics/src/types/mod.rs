//! Data types for readings, extracted fields and pipeline results.

pub mod config;
pub mod fields;
pub mod outcome;
pub mod reading;
