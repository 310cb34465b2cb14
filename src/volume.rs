//! Volume prefixes and path classification.
//!
//! Classification is a plain string comparison: `/ext/` is a sub-path, not the
//! external volume, and `/EXT` is not recognized at all.

/// Root of the virtual filesystem.
pub const ROOT_PATH: &str = "/";
/// Internal flash store.
pub const INT_PATH_PREFIX: &str = "/int";
/// Removable card.
pub const EXT_PATH_PREFIX: &str = "/ext";
/// Whichever volume the storage service prefers (the card for the local backend).
pub const ANY_PATH_PREFIX: &str = "/any";

/// Volume roots visited when an aggregate operation targets `/`.
pub const VOLUME_ROOTS: [&str; 2] = [INT_PATH_PREFIX, EXT_PATH_PREFIX];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumePath<'a> {
    Root,
    Internal,
    External,
    AnyVolume,
    Sub(&'a str),
}

impl<'a> VolumePath<'a> {
    pub fn classify(path: &'a str) -> Self {
        match path {
            ROOT_PATH => VolumePath::Root,
            INT_PATH_PREFIX => VolumePath::Internal,
            EXT_PATH_PREFIX => VolumePath::External,
            ANY_PATH_PREFIX => VolumePath::AnyVolume,
            other => VolumePath::Sub(other),
        }
    }

    /// True for the three volume prefixes themselves.
    pub fn is_volume(&self) -> bool {
        matches!(
            self,
            VolumePath::Internal | VolumePath::External | VolumePath::AnyVolume
        )
    }
}
