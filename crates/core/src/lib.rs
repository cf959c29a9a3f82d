//! Core utilities for droidconf
//!
//! This crate provides shared functionality used by the descriptor resolver
//! and the command-line tool:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Configuration**: TOML tool configuration (toolchain values, signing registry)
//! - **Validation**: error and warning findings tied to fields
//! - **Properties**: Java `.properties` reading for Flutter `local.properties`

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod properties;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};
