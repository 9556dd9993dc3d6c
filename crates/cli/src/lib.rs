//! Terminal output helpers for feedlens
//!
//! - Status lines and headers
//! - Human-readable durations, counts, relative times
//! - Spinners that stay quiet when stderr is not a terminal

#![warn(missing_docs)]

pub mod output;
pub mod progress;
