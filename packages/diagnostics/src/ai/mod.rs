//! Fallback service implementations.
//!
//! Reference implementations of the `FieldExtractor` trait. Applications
//! can use these directly or bring their own.

mod openai;

pub use openai::{response_schema, OpenAiFieldExtractor};
