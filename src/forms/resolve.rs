//! Reference resolution between fields of one form

use super::field::FieldHandle;

/// Maps a reference path to a field handle within a form scope
#[cfg_attr(test, mockall::automock)]
pub trait Resolve {
    /// Resolve `path` as seen from the field identified by `origin`
    fn resolve(&self, origin: &str, path: &str) -> Option<FieldHandle>;
}

/// Scope for fields that are not attached to any form
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Resolve for Detached {
    fn resolve(&self, _origin: &str, _path: &str) -> Option<FieldHandle> {
        None
    }
}
