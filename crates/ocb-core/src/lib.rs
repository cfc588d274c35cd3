//! Core domain + application logic for the originality check bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the Copyleaks
//! API live in adapter crates; the remote scanner is a port (trait) so the
//! review pipeline can be exercised without network access.

pub mod config;
pub mod docx;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod ports;
pub mod review;
pub mod similarity;
pub mod store;

pub use errors::{Error, Result};
