//! Logged filesystem side effects used by resources

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Write `data` to `path` and set its permission bits
pub fn write_file(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    log::info!(
        "write {} ({} bytes, mode {:o})",
        path.display(),
        data.len(),
        mode
    );

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {}", parent.display()))?;
    }
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))?;
    set_mode(path, mode)
}

/// Remove a file or symlink
pub fn remove_file(path: &Path) -> Result<()> {
    log::debug!("rm {}", path.display());
    fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))
}

/// Remove a directory and everything below it
pub fn remove_dir(path: &Path) -> Result<()> {
    log::debug!("rm -rf {}", path.display());
    fs::remove_dir_all(path).with_context(|| format!("Failed to remove {}", path.display()))
}

/// Create a directory and its parents
pub fn create_dir(path: &Path) -> Result<()> {
    log::debug!("mkdir -p {}", path.display());
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Create a symlink at `link` pointing to `source`
///
/// An existing symlink at `link` is replaced; any other existing file is an
/// error.
pub fn symlink(source: &Path, link: &Path) -> Result<()> {
    log::debug!("ln -s {} {}", source.display(), link.display());

    if link.is_symlink() {
        fs::remove_file(link).with_context(|| {
            format!("Failed to remove existing symlink: {}", link.display())
        })?;
    } else if link.exists() {
        anyhow::bail!("{} exists and is not a symlink", link.display());
    }

    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {}", parent.display()))?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(source, link).with_context(|| {
        format!(
            "Failed to create symlink: {} -> {}",
            link.display(),
            source.display()
        )
    })?;

    #[cfg(not(unix))]
    anyhow::bail!("Symlinks not supported on this platform");

    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
