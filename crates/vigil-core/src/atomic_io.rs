use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::time_utils::current_unix_timestamp;

/// Dot-prefixed sibling path the writer stages into before the rename.
/// The pid/timestamp suffix keeps concurrent writers off each other's
/// staging files.
fn staging_path(target: &Path, parent_dir: &Path) -> PathBuf {
    let target_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("snapshot");
    parent_dir.join(format!(
        ".{target_name}.pending-{}-{}",
        std::process::id(),
        current_unix_timestamp()
    ))
}

/// Writes `content` to `path` via a staged sibling file and a rename, so
/// readers never observe a truncated document.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("output path cannot be empty");
    }
    if path.is_dir() {
        bail!("output path '{}' is a directory, not a file", path.display());
    }

    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            parent_dir.display()
        )
    })?;

    let staged = staging_path(path, parent_dir);
    std::fs::write(&staged, content)
        .with_context(|| format!("failed to stage output at {}", staged.display()))?;
    std::fs::rename(&staged, path).with_context(|| {
        format!(
            "failed to move staged output {} into place at {}",
            staged.display(),
            path.display()
        )
    })?;
    Ok(())
}
