//! Path helpers shared by the path argument family and `Context`

use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep leading '..' components, they cannot be resolved lexically
                if matches!(components.last(), None | Some(Component::ParentDir)) {
                    components.push(component);
                } else if !matches!(components.last(), Some(Component::RootDir)) {
                    components.pop();
                }
            }
            _ => {
                components.push(component);
            }
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

/// Expand a leading `~` (alone or followed by a separator) to `home`
///
/// Paths without a leading `~`, `~user` forms, and any path when no home
/// directory is known are returned unchanged.
#[must_use]
pub fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(raw);
    };

    if raw == "~" {
        return home.to_path_buf();
    }

    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}
