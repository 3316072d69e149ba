use crate::types::{Descriptor, ImageReference};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Walks `root` and collects an image reference from every descriptor named
/// `file_name`. Descriptors that cannot be parsed or declare no image are
/// logged and skipped; I/O failures abort the scan.
pub fn scan_descriptors(root: &Path, file_name: &str) -> Result<Vec<ImageReference>> {
    let mut images = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() || entry.file_name() != file_name {
            continue;
        }

        let path = entry.path();
        let contents = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match parse_descriptor(&contents, path) {
            Ok(image) => {
                debug!("{} declares {}", path.display(), image);
                images.push(image);
            }
            Err(e) => warn!("{:#}", e),
        }
    }

    Ok(images)
}

/// Parses raw descriptor bytes; bad encoding is reported like bad JSON.
pub fn parse_descriptor(contents: &[u8], path: &Path) -> Result<ImageReference> {
    let descriptor: Descriptor = serde_json::from_slice(contents)
        .with_context(|| format!("Invalid descriptor {}", path.display()))?;

    if descriptor.image.is_empty() {
        bail!("No Docker image used for '{}' in {}", descriptor.id, path.display());
    }

    ImageReference::parse(&descriptor.image, path)
        .with_context(|| format!("Invalid image in {}", path.display()))
}
