//! The configuration store.
//!
//! [`ConfigurationStore`] keeps two option trees side by side:
//!
//! - the **defaults** tree, holding the canonical value (and so the type) of
//!   every known option, seeded from [`builtin_defaults`] and extended by
//!   provider registration;
//! - the **live** tree, a copy of the defaults at construction that is then
//!   mutated by `set`/`add`/`remove` and by loading persisted JSON.
//!
//! Every accessor hands out owned clones and every mutator takes ownership of
//! what it stores, so no caller ever holds a reference into either tree.
//!
//! # Trusted and untrusted writes
//!
//! [`ConfigurationStore::set`] stores whatever it is given.  Values coming
//! from disk go through [`ConfigurationStore::update`] instead, which coerces
//! each leaf to the type of its default and discards pairs that cannot be
//! converted, logging one warning per discarded pair.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::domain::coerce::coerce;
use crate::domain::defaults::{builtin_defaults, persisted_keys, PROVIDERS_KEY, VERSION_KEY};
use crate::domain::identity::AppIdentity;
use crate::domain::path::{self, OptionPath};
use crate::domain::tree::{self, admits_section, child_section, LookupError};
use crate::OptionTree;

/// Errors from typed access through [`ConfigurationStore::get_as`] and
/// [`ConfigurationStore::set_as`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The dotted path did not resolve.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The stored value does not have the requested Rust type, or the given
    /// Rust value has no JSON representation.
    #[error("option '{path}' has an incompatible type: {source}")]
    Type {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Option store with dotted-path access, layered over schema defaults.
///
/// Not synchronised: one owner reads and mutates it.  Embedders that share it
/// across threads wrap it in their own lock.
#[derive(Debug, Clone)]
pub struct ConfigurationStore {
    identity: AppIdentity,
    values: OptionTree,
    defaults: OptionTree,
    persisted_keys: Vec<String>,
}

impl ConfigurationStore {
    /// Creates a store holding the built-in defaults.
    pub fn new(identity: AppIdentity) -> Self {
        Self::with_defaults(identity, builtin_defaults())
    }

    /// Creates a store over a custom defaults tree.
    ///
    /// The top-level keys of `defaults`, plus `providers`, are the keys kept
    /// on write.
    pub fn with_defaults(identity: AppIdentity, defaults: OptionTree) -> Self {
        Self {
            identity,
            values: defaults.clone(),
            persisted_keys: persisted_keys(&defaults),
            defaults,
        }
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    /// Returns a copy of the value at `path`.
    ///
    /// A path naming a section returns a copy of the whole subtree.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if a segment is absent or an intermediate
    /// segment is not a section.
    pub fn get(&self, path: &str) -> Result<Value, LookupError> {
        let option = OptionPath::parse(path)?;
        tree::leaf(&self.values, &option).cloned()
    }

    /// Returns a copy of the default value at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), resolved against the defaults tree.
    pub fn get_default(&self, path: &str) -> Result<Value, LookupError> {
        let option = OptionPath::parse(path)?;
        tree::leaf(&self.defaults, &option).cloned()
    }

    /// Returns the value at `path` converted to `T`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Lookup`] if the path does not resolve,
    /// [`ConfigError::Type`] if the value does not deserialize as `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let value = self.get(path)?;
        serde_json::from_value(value).map_err(|source| ConfigError::Type {
            path: path.to_string(),
            source,
        })
    }

    /// Stores `value` at `path`, creating missing sections along the way.
    ///
    /// The value replaces whatever was there without any type check.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotATree`] if an intermediate segment holds a
    /// leaf.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), LookupError> {
        let option = OptionPath::parse(path)?;
        tree::section_mut(&mut self.values, &option, true)?
            .insert(option.name().to_string(), value.into());
        Ok(())
    }

    /// Serializes `value` and stores it at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Type`] if `value` cannot be represented as JSON, or
    /// [`ConfigError::Lookup`] as for [`set`](Self::set).
    pub fn set_as<T: Serialize + ?Sized>(&mut self, path: &str, value: &T) -> Result<(), ConfigError> {
        let value = serde_json::to_value(value).map_err(|source| ConfigError::Type {
            path: path.to_string(),
            source,
        })?;
        self.set(path, value)?;
        Ok(())
    }

    /// Appends `item` to the sequence at `path` unless an equal item is
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the path does not resolve or the leaf is not
    /// a sequence.
    pub fn add(&mut self, path: &str, item: impl Into<Value>) -> Result<(), LookupError> {
        let option = OptionPath::parse(path)?;
        let sequence = tree::sequence_mut(&mut self.values, &option)?;
        let item = item.into();
        if !sequence.contains(&item) {
            sequence.push(item);
        }
        Ok(())
    }

    /// Removes the first item equal to `item` from the sequence at `path`.
    ///
    /// Does nothing if no equal item is present.
    ///
    /// # Errors
    ///
    /// As for [`add`](Self::add).
    pub fn remove(&mut self, path: &str, item: &Value) -> Result<(), LookupError> {
        let option = OptionPath::parse(path)?;
        let sequence = tree::sequence_mut(&mut self.values, &option)?;
        if let Some(index) = sequence.iter().position(|x| x == item) {
            sequence.remove(index);
        }
        Ok(())
    }

    /// Returns `true` if the sequence at `path` holds an item equal to `item`.
    ///
    /// # Errors
    ///
    /// As for [`add`](Self::add).
    pub fn contains(&self, path: &str, item: &Value) -> Result<bool, LookupError> {
        let option = OptionPath::parse(path)?;
        Ok(tree::sequence(&self.values, &option)?.contains(item))
    }

    /// Declares default option values for provider `name`.
    ///
    /// The values become reachable under `providers.<name>`.  Existing live
    /// values and existing defaults are never overwritten; only missing
    /// entries are filled in, independently in each tree.
    ///
    /// ```rust
    /// use pan_core::{AppIdentity, ConfigurationStore};
    /// use serde_json::json;
    ///
    /// let mut store = ConfigurationStore::new(AppIdentity::new("/tmp", "1.0"));
    /// let schema = |v: i64| json!({"a": v}).as_object().cloned().unwrap();
    /// store.register_provider("x", schema(1)).unwrap();
    /// store.register_provider("x", schema(2)).unwrap();
    /// assert_eq!(store.get("providers.x.a").unwrap(), json!(1));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotATree`] if a section in `values` collides
    /// with an existing leaf of the same name.  Neither tree is changed then.
    pub fn register_provider(&mut self, name: &str, values: OptionTree) -> Result<(), LookupError> {
        let mut providers = Map::new();
        providers.insert(name.to_string(), Value::Object(values));
        let mut root = Map::new();
        root.insert(PROVIDERS_KEY.to_string(), Value::Object(providers));

        let mut live = self.values.clone();
        let mut defaults = self.defaults.clone();
        let mut trail = Vec::new();
        register(&root, &mut live, &mut defaults, &mut trail)?;
        self.values = live;
        self.defaults = defaults;
        Ok(())
    }

    /// Merges an untrusted document into the live tree.
    ///
    /// Sections are merged recursively, creating missing sections in both the
    /// live and the defaults tree.  Each leaf with a known default is coerced
    /// to the default's type first; leaves without a default are stored as
    /// they are.  A pair that cannot be coerced is discarded with a warning
    /// and the merge carries on.
    ///
    /// Returns the dotted paths of the discarded pairs.
    pub fn update(&mut self, document: &OptionTree) -> Vec<String> {
        let mut trail = Vec::new();
        let mut discarded = Vec::new();
        merge(
            document,
            &mut self.values,
            &mut self.defaults,
            &mut trail,
            &mut discarded,
        );
        discarded
    }

    /// Returns a copy of the whole live tree.
    pub fn snapshot(&self) -> OptionTree {
        self.values.clone()
    }

    /// Returns a copy of the whole defaults tree.
    pub fn defaults(&self) -> OptionTree {
        self.defaults.clone()
    }

    /// Builds the document that gets persisted: a copy of the live tree
    /// without unknown top-level keys, stamped with the application version.
    pub fn to_persisted(&self) -> OptionTree {
        let mut out = self.snapshot();
        out.retain(|key, _| self.persisted_keys.iter().any(|known| known == key));
        out.insert(
            VERSION_KEY.to_string(),
            Value::from(self.identity.version()),
        );
        out
    }
}

/// Fills gaps in `live` and `defaults` from `values`, recursing into sections.
fn register(
    values: &OptionTree,
    live: &mut OptionTree,
    defaults: &mut OptionTree,
    trail: &mut Vec<String>,
) -> Result<(), LookupError> {
    for (name, value) in values {
        match value {
            Value::Object(section) => {
                trail.push(name.clone());
                if !admits_section(live, name) || !admits_section(defaults, name) {
                    return Err(LookupError::NotATree {
                        path: path::join(trail.as_slice()),
                        key: name.clone(),
                    });
                }
                match (child_section(live, name), child_section(defaults, name)) {
                    (Some(live_child), Some(default_child)) => {
                        register(section, live_child, default_child, trail)?;
                    }
                    _ => {
                        return Err(LookupError::NotATree {
                            path: path::join(trail.as_slice()),
                            key: name.clone(),
                        })
                    }
                }
                trail.pop();
            }
            _ => {
                live.entry(name.clone()).or_insert_with(|| value.clone());
                defaults.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
    }
    Ok(())
}

/// Merges `incoming` into `live`, validating leaves against `defaults`.
fn merge(
    incoming: &OptionTree,
    live: &mut OptionTree,
    defaults: &mut OptionTree,
    trail: &mut Vec<String>,
    discarded: &mut Vec<String>,
) {
    for (name, value) in incoming {
        trail.push(name.clone());
        match value {
            Value::Object(section) => {
                // Both sides are checked first so a discarded pair creates nothing.
                let children = if admits_section(live, name) && admits_section(defaults, name) {
                    child_section(live, name).zip(child_section(defaults, name))
                } else {
                    None
                };
                match children {
                    Some((live_child, default_child)) => {
                        merge(section, live_child, default_child, trail, discarded);
                    }
                    None => {
                        let full = path::join(trail.as_slice());
                        warn!(
                            path = %full,
                            value = %value,
                            "discarding bad option-value pair: section collides with an existing option"
                        );
                        discarded.push(full);
                    }
                }
            }
            _ => {
                let accepted = match defaults.get(name) {
                    Some(reference) => coerce(value, reference),
                    None => Ok(value.clone()),
                };
                match accepted {
                    Ok(accepted) => {
                        live.insert(name.clone(), accepted);
                    }
                    Err(error) => {
                        let full = path::join(trail.as_slice());
                        warn!(
                            path = %full,
                            value = %value,
                            %error,
                            "discarding bad option-value pair"
                        );
                        discarded.push(full);
                    }
                }
            }
        }
        trail.pop();
    }
}
