//! Capability-based filesystem helpers shared by the Roamer binaries.
//!
//! Paths are UTF-8 (`camino`) and every access goes through a `cap-std`
//! directory handle opened on the path's parent, so the helpers never touch
//! anything outside the directory that holds the target.
#![forbid(unsafe_code)]

use std::{io, path::Component};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Read the whole file at `path` as UTF-8 text.
///
/// # Errors
/// Returns the underlying I/O error when the parent directory or the file
/// cannot be opened, or when the contents are not valid UTF-8.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = parent_dir_and_name(path)?;
    dir.read_to_string(name)
}

/// What a path refers to on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Nothing exists at the path, or its parent directory is missing.
    Missing,
    /// A regular file.
    File,
    /// A directory or other non-file entry.
    Other,
}

/// Inspect `path` without following it outside its parent directory.
///
/// # Errors
/// Returns I/O errors other than "not found", such as permission failures.
pub fn classify(path: &Utf8Path) -> io::Result<PathKind> {
    let (dir, name) = match parent_dir_and_name(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(PathKind::Missing),
        Err(err) => return Err(err),
    };
    match dir.metadata(name) {
        Ok(meta) if meta.is_file() => Ok(PathKind::File),
        Ok(_) => Ok(PathKind::Other),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
        Err(err) => Err(err),
    }
}

/// Create every missing directory above `path`.
///
/// Paths without a parent, and the filesystem root, need no work.
///
/// # Errors
/// Returns the underlying I/O error when a directory cannot be created.
pub fn create_parent_dirs(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (anchor, relative) = anchored(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    anchor.create_dir_all(&relative)
}

/// Open the directory containing `path` and return it with the file name.
fn parent_dir_and_name(path: &Utf8Path) -> io::Result<(Dir, &str)> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} does not name a file"),
        )
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `path` into an ambient anchor directory and the remainder below it.
///
/// Absolute paths anchor at the root (or the Windows drive prefix); relative
/// paths anchor at the working directory.
fn anchored(path: &Utf8Path) -> io::Result<(Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let anchor = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let drive = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(drive).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if anchor.as_str() == "." {
        path.to_path_buf()
    } else {
        path.strip_prefix(&anchor)
            .map_err(|_| io::Error::other(format!("cannot strip {anchor} from {path}")))?
            .to_path_buf()
    };
    let dir = Dir::open_ambient_dir(&anchor, ambient_authority())?;
    Ok((dir, relative))
}
