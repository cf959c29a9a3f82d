//! CLI utilities for droidconf
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Error and finding reports
//! - Output format selection

#![warn(missing_docs)]

pub mod output;
