//! Subcommand implementations.
//!
//! - [`compile`] - convert a package into one CommonJS file
//! - [`schema`] - print the config file JSON schema

pub mod compile;
pub mod schema;

pub use compile::execute as compile_execute;
pub use schema::execute as schema_execute;
