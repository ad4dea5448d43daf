use super::key::KeyNormalizer;
use super::types::LocalEntry;
use super::ManifestError;
use std::path::Path;
use walkdir::WalkDir;

/// Build the manifest of every regular file below `root`.
///
/// Symlinks are followed; a link loop or any unreadable entry aborts the
/// build instead of being skipped. Entries are sorted by `relative_key`.
pub fn build_local_manifest(
    root: &Path,
    normalizer: &KeyNormalizer,
) -> Result<Vec<LocalEntry>, ManifestError> {
    let metadata = match std::fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ManifestError::NotFound(root.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_dir() {
        return Err(ManifestError::NotADirectory(root.to_path_buf()));
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = entry?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        entries.push(LocalEntry {
            absolute_path: path.to_path_buf(),
            relative_key: relative_key(root, path, normalizer)?,
        });
    }

    entries.sort_by(|a, b| a.relative_key.cmp(&b.relative_key));
    Ok(entries)
}

/// `/`-separated path of `path` relative to `root`
fn relative_key(
    root: &Path,
    path: &Path,
    normalizer: &KeyNormalizer,
) -> Result<String, ManifestError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ManifestError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;
    let relative = relative
        .to_str()
        .ok_or_else(|| ManifestError::NonUtf8Path(path.to_path_buf()))?;

    Ok(normalizer.to_key_path(relative))
}
