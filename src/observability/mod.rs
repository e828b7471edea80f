//! Observability wiring.

pub mod logging;
