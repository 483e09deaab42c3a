//! Initialization of the process wide observability stack: a `tracing`
//! subscriber for structured logs and a panic hook that routes panics through
//! it.

pub mod panic_hook;
pub mod tracing;
