//! The pieces behind `graphql-codegen`: downloading a schema through
//! introspection, loading and validating it, binding operation documents
//! against it, and emitting typed Rust for every operation.
//!
//! [`pipeline::download_schema`] and [`pipeline::run_codegen`] drive the
//! two end-to-end flows; the modules below are usable on their own.

mod atomic_write;
pub mod config;
pub mod emitter;
mod error;
pub mod fetcher;
mod file_reader;
pub mod loc;
pub mod operation;
pub mod pipeline;
pub mod schema;

pub use config::CodegenOptions;
pub use config::CustomScalarFormat;
pub use config::OutputFormat;
pub use config::SchemaDownloadOptions;
pub use error::CodegenError;
pub use error::Result;
pub use error::SchemaValidationError;
pub use error::SyntaxError;

#[cfg(test)]
mod tests;
