//! Built-in record provider implementations
//!
//! - [`NullProvider`]: accepts updates without applying them

pub mod null;

pub use null::{NullProvider, NullProviderFactory};
