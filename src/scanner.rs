/// Discovery of leaf files in the catalog tree.
///
/// The storage tree is created exclusively by this tool, so it contains no
/// symlink cycles; the walk still uses an owned stack of pending directories
/// rather than call recursion, which keeps depth bounded by heap and not by
/// the call stack.
use std::fs;
use std::path::{Path, PathBuf};

/// Collects every file under `root` whose name matches `target`,
/// case-insensitively.
///
/// A missing root yields an empty list rather than an error: an absent
/// catalog and an empty catalog look the same at this layer. Unreadable
/// subdirectories are skipped. The traversal is read-only and the order of
/// the returned paths follows the filesystem; callers must not rely on it.
///
/// # Examples
///
/// ```no_run
/// use nutrikeep::scanner::scan;
/// use std::path::Path;
///
/// let leaves = scan(Path::new("nutrition_catalog"), "items.csv");
/// for leaf in leaves {
///     println!("{}", leaf.display());
/// }
/// ```
pub fn scan(root: &Path, target: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if !root.is_dir() {
        return found;
    }

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if entry
                .file_name()
                .to_string_lossy()
                .eq_ignore_ascii_case(target)
            {
                found.push(path);
            }
        }
    }
    found
}
