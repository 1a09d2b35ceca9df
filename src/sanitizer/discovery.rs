use log::debug;
use std::path::{Path, PathBuf};

/// Keeps the candidates that currently exist, in the order given.
pub fn discover_candidates<P: AsRef<Path>>(candidates: &[P]) -> Vec<PathBuf> {
    let mut found = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let path: &Path = candidate.as_ref();
        if path.exists() {
            found.push(path.to_path_buf());
        } else {
            debug!("Skipping missing candidate {}", path.display());
        }
    }

    found
}
