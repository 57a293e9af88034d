//! Dotted option paths.
//!
//! `"providers.digitransit.region"` addresses the leaf `region` inside the
//! section `digitransit` inside the top-level section `providers`.  Every
//! segment but the last names a nested tree; the last names the leaf.

use crate::domain::tree::LookupError;

/// Separator between the segments of a dotted path.
pub const SEPARATOR: char = '.';

/// A parsed dotted option path, borrowing from the original string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPath<'a> {
    full: &'a str,
    sections: Vec<&'a str>,
    name: &'a str,
}

impl<'a> OptionPath<'a> {
    /// Splits `path` into section segments and the leaf name.
    ///
    /// Segments are taken verbatim; no trimming or escaping is applied.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::EmptyPath`] for the empty string.
    pub fn parse(path: &'a str) -> Result<Self, LookupError> {
        if path.is_empty() {
            return Err(LookupError::EmptyPath);
        }
        let mut sections: Vec<&str> = path.split(SEPARATOR).collect();
        // `split` always yields at least one item for a non-empty string.
        let name = sections.pop().unwrap_or(path);
        Ok(Self {
            full: path,
            sections,
            name,
        })
    }

    /// The path exactly as given.
    pub fn as_str(&self) -> &'a str {
        self.full
    }

    /// Section segments leading to the leaf, outermost first.
    pub fn sections(&self) -> &[&'a str] {
        &self.sections
    }

    /// The final segment.
    pub fn name(&self) -> &'a str {
        self.name
    }
}

/// Joins path segments back into a dotted path.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}
