//! Outbound adapters implementing the driven ports.

pub mod mqtt;
pub mod persistence;
