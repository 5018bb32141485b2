//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for outbound mail and object storage.

pub mod mail;
pub mod storage;
