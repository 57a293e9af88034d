//! # pan-core
//!
//! Configuration store for Pan Transit: a nested tree of options layered on
//! top of a tree of schema defaults, addressable with dotted paths such as
//! `"providers.digitransit.region"`, and persisted as a single JSON document.
//!
//! # Architecture overview
//!
//! - **`domain`** – Pure types and algorithms with no I/O: dotted-path
//!   splitting, tree navigation, type coercion against defaults, the built-in
//!   defaults and the host-supplied [`AppIdentity`].
//!
//! - **`application`** – The [`ConfigurationStore`] itself: get/set/add/remove,
//!   provider schema registration and the validating merge used when loading
//!   untrusted JSON.
//!
//! - **`infrastructure`** – File-system adapters: reading and writing the
//!   JSON document and resolving the platform config-home directory.
//!
//! # Example
//!
//! ```rust
//! use pan_core::{AppIdentity, ConfigurationStore};
//! use serde_json::json;
//!
//! let identity = AppIdentity::new("/tmp/pan-transit", "1.0.0");
//! let mut store = ConfigurationStore::new(identity);
//! let schema = json!({"region": "helsinki", "favorites": []});
//! store.register_provider("hsl", schema.as_object().cloned().unwrap()).unwrap();
//!
//! store.add("providers.hsl.favorites", "HSL:1040129").unwrap();
//! assert!(store.contains("providers.hsl.favorites", &json!("HSL:1040129")).unwrap());
//! assert_eq!(store.get("providers.hsl.region").unwrap(), json!("helsinki"));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::store::{ConfigError, ConfigurationStore};
pub use domain::coerce::{coerce, CoercionError};
pub use domain::identity::AppIdentity;
pub use domain::path::OptionPath;
pub use domain::tree::LookupError;
pub use infrastructure::storage::StoreError;

/// Re-exported so callers can build option trees without naming `serde_json`.
pub use serde_json::{Map, Value};

/// An option tree: option names mapped to scalars, sequences or nested trees.
pub type OptionTree = Map<String, Value>;
