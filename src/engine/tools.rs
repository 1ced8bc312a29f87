//! Path utilities

use std::path::{Path, PathBuf};

/// Path as it should appear in records and output. Under a `.` root the leading `./` is dropped,
/// so `./a.txt` reads `a.txt`; the root itself stays `.`.
pub fn display_path(path: &Path, root: &Path) -> PathBuf {
    if root != Path::new(".") {
        return path.to_path_buf();
    }
    match path.strip_prefix(".") {
        Ok(rest) if rest.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rest) => rest.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_strips_dot_prefix() {
        let root = Path::new(".");
        assert_eq!(display_path(Path::new("./a.txt"), root), PathBuf::from("a.txt"));
        assert_eq!(display_path(Path::new("./d/b.zip"), root), PathBuf::from("d/b.zip"));
        assert_eq!(display_path(Path::new("."), root), PathBuf::from("."));
    }

    #[test]
    fn display_path_keeps_other_roots() {
        let root = Path::new("/data");
        assert_eq!(
            display_path(Path::new("/data/a.txt"), root),
            PathBuf::from("/data/a.txt")
        );
    }
}
