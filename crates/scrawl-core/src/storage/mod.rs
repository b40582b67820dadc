//! SQLite storage layer
//!
//! Schema definition and versioning for the on-disk database. The
//! [`crate::store::Store`] owns the connection; this module only shapes
//! what lives inside it.

pub mod schema;

pub use schema::{get_schema_version, init_schema, needs_init, SCHEMA_VERSION};
