//! Directory scanning into a per-directory, per-lens sample index
//!
//! Walks a directory tree, runs the metadata extractor on every eligible
//! photo and files each usable (focal length, aperture) pair under the
//! directory it was found in and the lens that took it.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::constants::summary::ROOT_LABEL;
use crate::error::{LensError, Result};
use crate::metadata::{ExifExtractor, LensMetadata};

/// One usable photo: the focal length and aperture it was taken at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensSample {
    /// Focal length in millimetres
    pub focal_length_mm: f64,
    /// Aperture f-number
    pub aperture: f64,
}

impl LensSample {
    pub fn new(focal_length_mm: f64, aperture: f64) -> Self {
        Self {
            focal_length_mm,
            aperture,
        }
    }
}

/// All samples taken with one lens inside one directory
#[derive(Debug, Clone, PartialEq)]
pub struct LensBucket {
    pub lens: String,
    pub samples: Vec<LensSample>,
}

/// All lens buckets of one directory, in first-encounter order
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryBucket {
    /// Path relative to the scan root, `"."` for the root itself
    pub label: String,
    pub lenses: Vec<LensBucket>,
}

/// Directory → lens → samples index built by one scan
///
/// Both levels keep the order in which keys were first seen. Lookups go
/// through hash maps of positions so inserting stays constant-time however
/// many directories and lenses a library has.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanIndex {
    directories: Vec<DirectoryBucket>,
    /// Directory label → position in `directories`
    directory_pos: HashMap<String, usize>,
    /// Per directory, lens → position in its `lenses`
    lens_pos: Vec<HashMap<String, usize>>,
}

impl ScanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample under `directory` / `lens`, creating either key on first use
    pub fn insert(&mut self, directory: &str, lens: &str, sample: LensSample) {
        let dir_idx = match self.directory_pos.get(directory) {
            Some(&idx) => idx,
            None => {
                let idx = self.directories.len();
                self.directories.push(DirectoryBucket {
                    label: directory.to_string(),
                    lenses: Vec::new(),
                });
                self.directory_pos.insert(directory.to_string(), idx);
                self.lens_pos.push(HashMap::new());
                idx
            }
        };

        let lenses = &mut self.directories[dir_idx].lenses;
        let positions = &mut self.lens_pos[dir_idx];
        match positions.get(lens) {
            Some(&idx) => lenses[idx].samples.push(sample),
            None => {
                positions.insert(lens.to_string(), lenses.len());
                lenses.push(LensBucket {
                    lens: lens.to_string(),
                    samples: vec![sample],
                });
            }
        }
    }

    pub fn directories(&self) -> &[DirectoryBucket] {
        &self.directories
    }

    /// Samples recorded for a lens in a directory
    pub fn samples(&self, directory: &str, lens: &str) -> Option<&[LensSample]> {
        let dir_idx = *self.directory_pos.get(directory)?;
        let lens_idx = *self.lens_pos[dir_idx].get(lens)?;
        Some(&self.directories[dir_idx].lenses[lens_idx].samples)
    }

    /// Samples of every directory merged per lens, lenses in first-encounter order
    pub fn samples_by_lens(&self) -> Vec<(&str, Vec<LensSample>)> {
        let mut merged: Vec<(&str, Vec<LensSample>)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for bucket in self.directories.iter().flat_map(|d| d.lenses.iter()) {
            match positions.get(bucket.lens.as_str()) {
                Some(&idx) => merged[idx].1.extend_from_slice(&bucket.samples),
                None => {
                    positions.insert(bucket.lens.as_str(), merged.len());
                    merged.push((bucket.lens.as_str(), bucket.samples.clone()));
                }
            }
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// Number of samples across all directories and lenses
    pub fn total_images(&self) -> usize {
        self.directories
            .iter()
            .flat_map(|d| d.lenses.iter())
            .map(|b| b.samples.len())
            .sum()
    }
}

/// Source of per-file lens metadata used by the scanner
pub trait MetadataSource {
    /// Read metadata from one eligible file; `None` means "no data"
    fn read(&self, path: &Path) -> Option<LensMetadata>;
}

impl MetadataSource for ExifExtractor {
    fn read(&self, path: &Path) -> Option<LensMetadata> {
        ExifExtractor::extract(path)
    }
}

/// Recursive photo directory scanner
pub struct DirectoryScanner<S = ExifExtractor> {
    source: S,
}

impl DirectoryScanner<ExifExtractor> {
    /// Create a scanner reading EXIF metadata
    pub fn new() -> Self {
        Self {
            source: ExifExtractor,
        }
    }
}

impl Default for DirectoryScanner<ExifExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MetadataSource> DirectoryScanner<S> {
    /// Create a scanner reading metadata from a custom source
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Scan `root` recursively
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidDirectory`] if `root` is not a directory.
    /// A tree without usable photos yields an empty index, not an error.
    pub fn scan(&self, root: &Path) -> Result<ScanIndex> {
        if !root.is_dir() {
            return Err(LensError::InvalidDirectory {
                path: root.to_path_buf(),
            });
        }

        info!(root = %root.display(), "Scanning for photos");

        let mut index = ScanIndex::new();
        let mut eligible = 0usize;
        let mut skipped = 0usize;

        // Files before subdirectories, each group by name
        let walker = WalkDir::new(root).sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            if !is_photo_file(&entry) {
                continue;
            }
            eligible += 1;

            let usable = self
                .source
                .read(entry.path())
                .and_then(|metadata| metadata.usable_values().map(|v| (metadata.lens_model, v)));

            match usable {
                Some((lens, (focal, aperture))) => {
                    let label = directory_label(root, &entry);
                    index.insert(&label, &lens, LensSample::new(focal, aperture));
                }
                None => {
                    skipped += 1;
                    debug!(path = %entry.path().display(), "Skipping photo without usable lens data");
                }
            }
        }

        info!(
            eligible,
            skipped,
            images = index.total_images(),
            directories = index.directories().len(),
            "Scan complete"
        );

        Ok(index)
    }
}

/// Scan `root` with the EXIF extractor
pub fn scan_directory(root: &Path) -> Result<ScanIndex> {
    DirectoryScanner::new().scan(root)
}

/// Eligible regular file, or a symlink resolving to one
///
/// Directory symlinks are listed but never descended into.
fn is_photo_file(entry: &DirEntry) -> bool {
    let is_file = entry.file_type().is_file()
        || (entry.path_is_symlink() && entry.path().is_file());
    is_file && ExifExtractor::is_supported(entry.path())
}

/// Label of the directory containing `entry`, relative to `root`
fn directory_label(root: &Path, entry: &DirEntry) -> String {
    let parent = entry.path().parent().unwrap_or(root);
    match parent.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => ROOT_LABEL.to_string(),
        Ok(relative) => relative.display().to_string(),
        Err(_) => parent.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    use crate::constants::lens::UNKNOWN_LENS;

    /// Metadata keyed by file name, standing in for real EXIF blocks
    struct FakeSource {
        by_name: HashMap<String, LensMetadata>,
    }

    impl FakeSource {
        fn new(entries: &[(&str, &str, Option<f64>, Option<f64>)]) -> Self {
            let by_name = entries
                .iter()
                .map(|(name, lens, focal, aperture)| {
                    (
                        name.to_string(),
                        LensMetadata {
                            lens_model: lens.to_string(),
                            focal_length_mm: *focal,
                            aperture: *aperture,
                        },
                    )
                })
                .collect();
            Self { by_name }
        }
    }

    impl MetadataSource for FakeSource {
        fn read(&self, path: &Path) -> Option<LensMetadata> {
            let name = path.file_name()?.to_str()?;
            self.by_name.get(name).cloned()
        }
    }

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_index_insert_keeps_first_encounter_order() {
        let mut index = ScanIndex::new();
        index.insert("b", "Lens Z", LensSample::new(50.0, 1.8));
        index.insert("a", "Lens Y", LensSample::new(35.0, 2.0));
        index.insert("b", "Lens X", LensSample::new(85.0, 1.4));
        index.insert("b", "Lens Z", LensSample::new(50.0, 2.8));

        let labels: Vec<_> = index.directories().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a"]);

        let lenses: Vec<_> = index.directories()[0].lenses.iter().map(|b| b.lens.as_str()).collect();
        assert_eq!(lenses, vec!["Lens Z", "Lens X"]);

        assert_eq!(index.samples("b", "Lens Z").map(<[_]>::len), Some(2));
        assert_eq!(index.samples("a", "Lens Z"), None);
        assert_eq!(index.total_images(), 4);
    }

    #[test]
    fn test_samples_by_lens_merges_directories() {
        let mut index = ScanIndex::new();
        index.insert("one", "Lens A", LensSample::new(24.0, 4.0));
        index.insert("two", "Lens B", LensSample::new(50.0, 1.8));
        index.insert("two", "Lens A", LensSample::new(70.0, 4.0));

        let merged = index.samples_by_lens();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].0, "Lens A");
        assert_eq!(merged[0].1.len(), 2);
        assert_eq!(merged[1].0, "Lens B");
        assert_eq!(merged[1].1, vec![LensSample::new(50.0, 1.8)]);
    }

    #[test]
    fn test_scan_buckets_by_directory_and_lens() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "root.jpg");
        touch(dir.path(), "trip/a.JPG");
        touch(dir.path(), "trip/b.jpeg");
        touch(dir.path(), "trip/notes.txt");

        let source = FakeSource::new(&[
            ("root.jpg", "Lens A", Some(35.0), Some(2.0)),
            ("a.JPG", "Lens A", Some(50.0), Some(1.8)),
            ("b.jpeg", "Lens B", Some(200.0), Some(5.6)),
            ("notes.txt", "Lens C", Some(10.0), Some(1.0)),
        ]);

        let index = DirectoryScanner::with_source(source).scan(dir.path()).unwrap();

        assert_eq!(index.samples(".", "Lens A"), Some(&[LensSample::new(35.0, 2.0)][..]));
        assert_eq!(index.samples("trip", "Lens A"), Some(&[LensSample::new(50.0, 1.8)][..]));
        assert_eq!(index.samples("trip", "Lens B"), Some(&[LensSample::new(200.0, 5.6)][..]));
        assert_eq!(index.total_images(), 3);
    }

    #[test]
    fn test_unusable_records_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "unknown.jpg");
        touch(dir.path(), "no_focal.jpg");
        touch(dir.path(), "no_aperture.jpg");
        touch(dir.path(), "unreadable.jpg");

        let source = FakeSource::new(&[
            ("unknown.jpg", UNKNOWN_LENS, Some(50.0), Some(1.8)),
            ("no_focal.jpg", "Lens A", None, Some(1.8)),
            ("no_aperture.jpg", "Lens A", Some(50.0), None),
        ]);

        let index = DirectoryScanner::with_source(source).scan(dir.path()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.total_images(), 0);
    }

    #[test]
    fn test_scan_rejects_non_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = touch(dir.path(), "photo.jpg");

        let result = DirectoryScanner::new().scan(&file);
        assert!(matches!(result, Err(LensError::InvalidDirectory { .. })));

        let result = scan_directory(&dir.path().join("missing"));
        assert!(matches!(result, Err(LensError::InvalidDirectory { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_photos_are_read() {
        use std::os::unix::fs::symlink;

        let photos = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let target = touch(elsewhere.path(), "photo.jpg");
        touch(elsewhere.path(), "album/inside.jpg");

        symlink(&target, photos.path().join("link.jpg")).unwrap();
        symlink(elsewhere.path().join("album"), photos.path().join("album")).unwrap();
        symlink(photos.path().join("missing.jpg"), photos.path().join("dangling.jpg")).unwrap();

        let source = FakeSource::new(&[
            ("link.jpg", "Lens A", Some(50.0), Some(1.8)),
            ("inside.jpg", "Lens B", Some(85.0), Some(1.4)),
            ("dangling.jpg", "Lens C", Some(35.0), Some(2.0)),
        ]);
        let index = DirectoryScanner::with_source(source).scan(photos.path()).unwrap();

        assert_eq!(index.samples(".", "Lens A"), Some(&[LensSample::new(50.0, 1.8)][..]));
        assert_eq!(index.total_images(), 1);
    }

    #[test]
    fn test_empty_directories_do_not_appear() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        touch(dir.path(), "shots/x.jpg");

        let source = FakeSource::new(&[("x.jpg", "Lens A", Some(28.0), Some(2.8))]);
        let index = DirectoryScanner::with_source(source).scan(dir.path()).unwrap();

        let labels: Vec<_> = index.directories().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["shots"]);
    }
}
