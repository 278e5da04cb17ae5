use std::path::{Component, Path, PathBuf};

/// Resolves command arguments against the editor's current directory.
pub struct PathResolver<'a> {
    base_dir: &'a Path,
}

impl<'a> PathResolver<'a> {
    pub fn new(base_dir: &'a Path) -> Self {
        Self { base_dir }
    }

    /// Joins `path` onto the base directory (absolute paths replace it) and
    /// normalises the result lexically. Symlinks are not resolved.
    pub fn resolve(&self, path: &str) -> PathBuf {
        normalize(&self.base_dir.join(path))
    }

    /// Like [`resolve`](Self::resolve), but only yields paths naming an
    /// existing directory.
    pub fn resolve_dir(&self, path: &str) -> Option<PathBuf> {
        let resolved = self.resolve(path);
        resolved.is_dir().then_some(resolved)
    }
}

/// Removes `.` components and folds `..` into its parent without touching the
/// filesystem. `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(name) => normalized.push(name),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
