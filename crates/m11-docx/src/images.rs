//! Image extraction
//!
//! Runs once per document before the body is streamed: every internal image
//! relationship is resolved to a file path and keyed by its relationship id.
//! Paragraph classification then only needs the id → path lookup.

use crate::archive::{extract_file, Relationships};
use crate::error::Result;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Directory that relationship targets of the main part are relative to
const PART_DIRECTORY: &str = "word";

/// Relationship id → extracted image path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMap {
    paths: HashMap<String, PathBuf>,
}

impl ImageMap {
    /// Create an empty map
    #[inline]
    #[must_use = "creates an empty image map"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the path for a relationship id
    pub fn insert(&mut self, rel_id: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(rel_id.into(), path.into());
    }

    /// Path of the image behind `rel_id`
    #[inline]
    #[must_use = "returns the image path, if known"]
    pub fn get(&self, rel_id: &str) -> Option<&Path> {
        self.paths.get(rel_id).map(PathBuf::as_path)
    }

    /// Whether `rel_id` is a known image relationship
    #[inline]
    #[must_use = "returns whether the id is a known image"]
    pub fn contains(&self, rel_id: &str) -> bool {
        self.paths.contains_key(rel_id)
    }

    /// Number of images
    #[inline]
    #[must_use = "returns the image count"]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no image was extracted
    #[inline]
    #[must_use = "returns whether the map is empty"]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All extracted image paths
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.values().map(PathBuf::as_path)
    }
}

/// Resolve a relationship target to an archive path.
///
/// Targets are relative to `word/`; a leading `/` makes them package-absolute.
#[must_use = "returns the archive path"]
pub fn archive_path(target: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let relative = match target.strip_prefix('/') {
        Some(absolute) => absolute,
        None => {
            segments.push(PART_DIRECTORY);
            target
        }
    };
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// File name for `archive_path` inside the image directory
fn destination_name(
    archive_path: &str,
    rel_id: &str,
    taken: &mut HashMap<OsString, String>,
) -> OsString {
    let plain = Path::new(archive_path)
        .file_name()
        .map_or_else(|| OsString::from(rel_id), ToOwned::to_owned);
    let name = match taken.get(&plain) {
        Some(owner) if owner != archive_path => {
            let mut renamed = OsString::from(format!("{rel_id}_"));
            renamed.push(&plain);
            log::debug!(
                "Image name {} already used by {owner}, writing {archive_path} as {}",
                plain.to_string_lossy(),
                renamed.to_string_lossy()
            );
            renamed
        }
        _ => plain,
    };
    taken.insert(name.clone(), archive_path.to_string());
    name
}

/// Extract every internal image relationship.
///
/// With `image_dir` set, image bytes are written to `image_dir/<file name>`
/// (the directory is created if needed). When two archive paths share a file
/// name, the later relationship (by id) is written as `<id>_<file name>`. Without it, nothing is written and
/// each id maps to the image's archive path. Relationships whose target is
/// missing from the archive are logged and left out of the map.
///
/// # Errors
///
/// Returns an error if an image cannot be read from the archive or written to
/// `image_dir`.
pub fn extract_images<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &Relationships,
    image_dir: Option<&Path>,
) -> Result<ImageMap> {
    let mut images = ImageMap::new();
    if let Some(dir) = image_dir {
        fs::create_dir_all(dir)?;
    }

    let mut internal: Vec<_> = relationships.internal_images().collect();
    internal.sort_by(|a, b| a.id.cmp(&b.id));
    let mut taken = HashMap::new();

    for rel in internal {
        let path = archive_path(&rel.target);
        if archive.by_name(&path).is_err() {
            log::warn!("Image {} for relationship {} not found in archive", path, rel.id);
            continue;
        }

        let destination = match image_dir {
            Some(dir) => {
                let destination = dir.join(destination_name(&path, &rel.id, &mut taken));
                let bytes = extract_file(archive, &path)?;
                fs::write(&destination, bytes)?;
                log::debug!("Extracted {} to {}", path, destination.display());
                destination
            }
            None => PathBuf::from(&path),
        };
        images.insert(rel.id.clone(), destination);
    }

    log::debug!("Resolved {} image relationships", images.len());
    Ok(images)
}
