//! Object file discovery.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Extension of the object files collected by [`find_objects`].
pub const OBJECT_EXTENSION: &str = "o";

/// True if any component of `path` below `base` starts with a dot.
///
/// `.` and `..` are not hidden.
pub fn is_hidden(path: &Path, base: &Path) -> bool {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Recursively collects `*.o` files under `base`, sorted by path.
///
/// Hidden files and directories are skipped unless `include_hidden` is set.
pub fn find_objects(base: &Path, include_hidden: bool) -> Result<Vec<PathBuf>> {
    let mut objects = Vec::new();
    walk(base, base, include_hidden, &mut objects)?;
    objects.sort();
    Ok(objects)
}

fn walk(base: &Path, dir: &Path, include_hidden: bool, objects: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !include_hidden && is_hidden(&path, base) {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(base, &path, include_hidden, objects)?;
        } else if path.extension().map(|e| e == OBJECT_EXTENSION).unwrap_or(false) {
            objects.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_hidden() {
        let base = Path::new("build");
        assert!(is_hidden(Path::new("build/.cache/a.o"), base));
        assert!(is_hidden(Path::new("build/kernel/.a.o"), base));
        assert!(!is_hidden(Path::new("build/kernel/a.o"), base));
    }

    #[test]
    fn test_hidden_base_is_not_hidden() {
        let base = Path::new("./.build");
        assert!(!is_hidden(Path::new("./.build/kernel/a.o"), base));
        assert!(!is_hidden(Path::new("../out/a.o"), Path::new("/")));
    }

    #[test]
    fn test_find_objects() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("kernel/vga")).unwrap();
        fs::create_dir_all(base.join(".git")).unwrap();
        fs::write(base.join("kernel/main.o"), b"").unwrap();
        fs::write(base.join("kernel/vga/putc.o"), b"").unwrap();
        fs::write(base.join("kernel/main.d"), b"").unwrap();
        fs::write(base.join(".git/stale.o"), b"").unwrap();

        let found = find_objects(base, false).unwrap();
        assert_eq!(
            found,
            vec![base.join("kernel/main.o"), base.join("kernel/vga/putc.o")]
        );

        let all = find_objects(base, true).unwrap();
        assert_eq!(all.len(), 3);
    }
}
