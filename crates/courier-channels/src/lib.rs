//! # courier-channels
//!
//! Messaging platform integrations for Courier.

pub mod notifier;
pub mod telegram;
pub mod utils;
