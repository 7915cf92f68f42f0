//! Integration tests for bfx-bot.
//!
//! Commands run end to end against an in-process venue.

pub mod common;
