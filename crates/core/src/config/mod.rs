//! Tool configuration loading and schema definitions
//!
//! The tool configuration supplies everything a build descriptor refers to
//! but does not define itself: toolchain values and the signing registry.

mod loader;
mod schema;

pub use loader::{expand_path, Config, CONFIG_CANDIDATES};
pub use schema::*;
