//! Filesystem helpers shared across `merge-descriptors` modules.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::CliError;

fn io_error(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Opens the directory containing `path` and returns it with the file name.
fn open_parent(path: &Utf8Path) -> Result<(Dir, &str), CliError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::NotAFile(path.to_path_buf()))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error(parent))?;
    Ok((dir, file_name))
}

/// Reads `path` into a string.
pub fn read_to_string(path: &Utf8Path) -> Result<String, CliError> {
    let (dir, file_name) = open_parent(path)?;
    dir.read_to_string(file_name).map_err(io_error(path))
}

/// Writes `contents` to `path`, replacing any existing file.
pub fn write(path: &Utf8Path, contents: &str) -> Result<(), CliError> {
    let (dir, file_name) = open_parent(path)?;
    dir.write(file_name, contents).map_err(io_error(path))
}
