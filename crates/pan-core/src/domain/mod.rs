//! Domain layer for the configuration store.
//!
//! Everything here is pure: no file-system access and no global state.  The
//! option tree is a plain `serde_json::Map`, so these modules are mostly small
//! functions over borrowed maps and values.
//!
//! - [`path`] splits a dotted option path into its section segments and leaf name.
//! - [`tree`] walks an option tree along such a path.
//! - [`coerce`] converts an untrusted JSON value to the type of its default.
//! - [`defaults`] holds the built-in defaults tree.
//! - [`identity`] describes the host application (version and config home).

pub mod coerce;
pub mod defaults;
pub mod identity;
pub mod path;
pub mod tree;
