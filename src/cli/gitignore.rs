//! Keep the vault directory out of version control.

use std::fs;
use std::io;
use std::path::Path;

/// Make sure `.gitignore` in `project_dir` lists `entry`.
///
/// Returns `Ok(true)` when the line was added, `Ok(false)` when it was
/// already there.  The file is created if missing.
pub fn ensure_ignored(project_dir: &Path, entry: &str) -> io::Result<bool> {
    let path = project_dir.join(".gitignore");
    let mut content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let bare = entry.trim_end_matches('/');
    if content
        .lines()
        .map(str::trim)
        .any(|line| line == entry || line == bare)
    {
        return Ok(false);
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(entry);
    content.push('\n');
    fs::write(&path, content)?;
    Ok(true)
}
