use std::path::{Component, Path, PathBuf};

/// Converts `path` under `base` into a record name: relative, `/`-separated,
/// without a leading slash.
///
/// Returns `None` when `path` is not below `base` or is `base` itself.
#[must_use]
pub fn record_name(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Strips leading slashes so names from any source compare equal.
#[must_use]
pub fn normalize_name(name: &str) -> &str {
    name.trim_start_matches('/')
}

/// The path a record name has on the installed system, e.g. `/etc/fstab`.
#[must_use]
pub fn system_path(name: &str) -> String {
    format!("/{}", normalize_name(name))
}

/// Joins a record name onto `base` (the scope root or the mirror directory).
#[must_use]
pub fn join_name(base: &Path, name: &str) -> PathBuf {
    base.join(normalize_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_name_under_root() {
        assert_eq!(
            record_name(Path::new("/etc/pacman.conf"), Path::new("/")),
            Some("etc/pacman.conf".to_string())
        );
        assert_eq!(
            record_name(Path::new("/mnt/sys/etc/fstab"), Path::new("/mnt/sys")),
            Some("etc/fstab".to_string())
        );
    }

    #[test]
    fn test_record_name_outside_or_equal_base() {
        assert_eq!(record_name(Path::new("/mnt"), Path::new("/mnt")), None);
        assert_eq!(record_name(Path::new("/etc/x"), Path::new("/usr")), None);
    }

    #[test]
    fn test_join_name_never_escapes_to_absolute() {
        assert_eq!(
            join_name(Path::new("/mnt/sys"), "/etc/fstab"),
            PathBuf::from("/mnt/sys/etc/fstab")
        );
        assert_eq!(system_path("etc/fstab"), "/etc/fstab");
        assert_eq!(system_path("/etc/fstab"), "/etc/fstab");
    }
}
