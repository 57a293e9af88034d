//! Structural navigation over option trees.
//!
//! An option tree is a `serde_json::Map`; a section is a nested
//! `Value::Object`.  Walking a dotted path requires every intermediate segment
//! to resolve to a section.  Anything else is a [`LookupError`], which callers
//! treat as a programming error rather than bad data.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::path::OptionPath;
use crate::OptionTree;

/// A dotted path that does not resolve in an option tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The path string was empty.
    #[error("empty option path")]
    EmptyPath,

    /// A segment of the path is absent.
    #[error("no option '{key}' while resolving '{path}'")]
    MissingKey { path: String, key: String },

    /// An intermediate segment resolved to a leaf instead of a section.
    #[error("option '{key}' is not a section while resolving '{path}'")]
    NotATree { path: String, key: String },

    /// The leaf exists but is not a sequence.
    #[error("option '{path}' is not a sequence")]
    NotASequence { path: String },
}

impl LookupError {
    fn missing(path: &OptionPath<'_>, key: &str) -> Self {
        Self::MissingKey {
            path: path.as_str().to_string(),
            key: key.to_string(),
        }
    }

    fn not_a_tree(path: &OptionPath<'_>, key: &str) -> Self {
        Self::NotATree {
            path: path.as_str().to_string(),
            key: key.to_string(),
        }
    }
}

/// Resolves the section that holds the leaf of `path`.
pub fn section<'t>(root: &'t OptionTree, path: &OptionPath<'_>) -> Result<&'t OptionTree, LookupError> {
    let mut node = root;
    for key in path.sections() {
        node = match node.get(*key) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(LookupError::not_a_tree(path, key)),
            None => return Err(LookupError::missing(path, key)),
        };
    }
    Ok(node)
}

/// Mutable variant of [`section`].
///
/// With `create` set, missing intermediate sections are inserted as empty
/// trees.  Existing leaves are never replaced.
pub fn section_mut<'t>(
    root: &'t mut OptionTree,
    path: &OptionPath<'_>,
    create: bool,
) -> Result<&'t mut OptionTree, LookupError> {
    let mut node = root;
    for key in path.sections() {
        if create && !node.contains_key(*key) {
            node.insert((*key).to_string(), Value::Object(Map::new()));
        }
        node = match node.get_mut(*key) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(LookupError::not_a_tree(path, key)),
            None => return Err(LookupError::missing(path, key)),
        };
    }
    Ok(node)
}

/// Resolves the leaf value at `path`.
pub fn leaf<'t>(root: &'t OptionTree, path: &OptionPath<'_>) -> Result<&'t Value, LookupError> {
    section(root, path)?
        .get(path.name())
        .ok_or_else(|| LookupError::missing(path, path.name()))
}

/// Resolves the sequence stored at `path`.
pub fn sequence<'t>(root: &'t OptionTree, path: &OptionPath<'_>) -> Result<&'t Vec<Value>, LookupError> {
    leaf(root, path)?
        .as_array()
        .ok_or_else(|| LookupError::NotASequence {
            path: path.as_str().to_string(),
        })
}

/// Mutable variant of [`sequence`].
pub fn sequence_mut<'t>(
    root: &'t mut OptionTree,
    path: &OptionPath<'_>,
) -> Result<&'t mut Vec<Value>, LookupError> {
    section_mut(root, path, false)?
        .get_mut(path.name())
        .ok_or_else(|| LookupError::missing(path, path.name()))?
        .as_array_mut()
        .ok_or_else(|| LookupError::NotASequence {
            path: path.as_str().to_string(),
        })
}

/// Returns whether `name` in `tree` is a section or absent, so that
/// [`child_section`] would yield a section without replacing an option.
pub fn admits_section(tree: &OptionTree, name: &str) -> bool {
    matches!(tree.get(name), None | Some(Value::Object(_)))
}

/// Returns the child section `name` of `tree`, inserting an empty one if absent.
///
/// Returns `None` when `name` already holds a leaf.
pub fn child_section<'t>(tree: &'t mut OptionTree, name: &str) -> Option<&'t mut OptionTree> {
    tree.entry(name.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
}
