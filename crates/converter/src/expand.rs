//! Input path expansion.

use std::path::{Path, PathBuf};

use tgsrender_common::error::{TgsError, TgsResult};
use tgsrender_container::is_sticker_path;

/// Expand command-line paths into a flat list of files.
///
/// Files are kept as given, whatever their extension. Each directory is
/// replaced in place by its immediate `.tgs` children, sorted by name;
/// subdirectories are not descended. A path that cannot be inspected
/// fails the whole expansion.
pub fn expand_inputs<P: AsRef<Path>>(paths: &[P]) -> TgsResult<Vec<PathBuf>> {
    let mut expanded = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| TgsError::from_io_at(e, path))?;
        if metadata.is_dir() {
            let children = sticker_children(path)?;
            tracing::debug!(
                dir = %path.display(),
                count = children.len(),
                "Expanded directory"
            );
            expanded.extend(children);
        } else {
            expanded.push(path.to_path_buf());
        }
    }
    Ok(expanded)
}

fn sticker_children(dir: &Path) -> TgsResult<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if is_sticker_path(&path) && !entry.file_type()?.is_dir() {
            children.push(path);
        }
    }
    children.sort();
    Ok(children)
}
