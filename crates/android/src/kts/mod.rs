//! Kotlin DSL (`build.gradle.kts`) support
//!
//! Reads the declarative subset of the Gradle Kotlin DSL that Android app
//! modules use: nested configuration blocks, property assignments, setter
//! calls, `plugins { }` and `dependencies { }`. Arbitrary Kotlin (control
//! flow, lambdas) is out of scope and is either skipped or reported as a
//! syntax error. String templates are always a syntax error.

mod lexer;
mod reader;
mod render;
mod syntax;

pub use reader::parse;
pub use render::render;
