//! Built-in option defaults.
//!
//! The defaults tree is the authority on the *type* of every known option:
//! values loaded from disk are coerced to the kind of their default before
//! they are stored.

use serde_json::Value;

use crate::OptionTree;

/// Top-level section holding provider-specific option trees.
pub const PROVIDERS_KEY: &str = "providers";

/// Key stamped into the persisted document with the application version.
pub const VERSION_KEY: &str = "version";

/// Minutes ahead of now for which departures are listed.
pub const DEFAULT_DEPARTURE_TIME_CUTOFF: i64 = 10;
/// Radius in metres within which favorite stops are highlighted.
pub const DEFAULT_FAVORITE_HIGHLIGHT_RADIUS: i64 = 1000;
/// Transit data provider selected on first run.
pub const DEFAULT_PROVIDER: &str = "digitransit";
/// Unit system for distances.
pub const DEFAULT_UNITS: &str = "metric";

/// Returns a fresh copy of the built-in defaults tree.
///
/// | Key                         | Default         |
/// |-----------------------------|-----------------|
/// | `departure_time_cutoff`     | `10`            |
/// | `favorite_highlight_radius` | `1000`          |
/// | `provider`                  | `"digitransit"` |
/// | `units`                     | `"metric"`      |
pub fn builtin_defaults() -> OptionTree {
    let mut tree = OptionTree::new();
    tree.insert(
        "departure_time_cutoff".to_string(),
        Value::from(DEFAULT_DEPARTURE_TIME_CUTOFF),
    );
    tree.insert(
        "favorite_highlight_radius".to_string(),
        Value::from(DEFAULT_FAVORITE_HIGHLIGHT_RADIUS),
    );
    tree.insert("provider".to_string(), Value::from(DEFAULT_PROVIDER));
    tree.insert("units".to_string(), Value::from(DEFAULT_UNITS));
    tree
}

/// Top-level keys that survive a write: every key of `defaults` plus
/// [`PROVIDERS_KEY`].
pub fn persisted_keys(defaults: &OptionTree) -> Vec<String> {
    let mut keys: Vec<String> = defaults.keys().cloned().collect();
    if !defaults.contains_key(PROVIDERS_KEY) {
        keys.push(PROVIDERS_KEY.to_string());
    }
    keys
}
