//! Folder picker results

/// Outcome of a folder picker interaction
///
/// A cancelled picker is represented by the caller passing no selection at
/// all. A selection without a path is a malformed result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSelection {
    path: Option<String>,
}

impl FolderSelection {
    /// A selection carrying `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A selection that carries no path
    pub fn empty() -> Self {
        Self::default()
    }

    /// The selected path, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl From<Option<String>> for FolderSelection {
    fn from(path: Option<String>) -> Self {
        Self { path }
    }
}
