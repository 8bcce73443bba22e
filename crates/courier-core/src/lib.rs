//! # courier-core
//!
//! Core types, traits, configuration, and error handling for the Courier bridge.

pub mod config;
pub mod error;
pub mod invocation;
pub mod message;
pub mod traits;
