//! Telegram adapter (teloxide).
//!
//! Wires the review pipeline to Telegram updates, served either over a
//! webhook (with a plain health-check route next to it) or long polling.

pub mod handlers;
pub mod router;
