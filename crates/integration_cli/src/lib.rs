//! azdo-connect library exports for integration testing.
//!
//! This module exposes the command implementations so they can be driven against
//! in-memory stores in tests.

pub mod commands;
pub mod config;
pub mod errors;
pub mod session;

#[cfg(test)]
mod test_support;
