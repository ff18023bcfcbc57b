//! Core trait abstractions for the diagnostics library.
//!
//! These traits define the interfaces that applications implement
//! to provide storage and the fallback extraction service.

pub mod extractor;
pub mod store;
