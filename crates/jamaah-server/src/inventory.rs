//! File inventory for the dashboard's data and image directories.
//!
//! Every operation re-reads the filesystem; there is no cache to keep in
//! sync. Missing directories, unreadable entries and malformed JSON are
//! logged and turned into empty or partial results, never errors. A
//! partial listing is always a valid answer for the API.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{Datelike, Local};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::DashboardConfig;

/// Extensions (case-insensitive) recognised as slideshow images.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// URL prefix under which image `src` paths are published.
pub const IMAGES_URL_PREFIX: &str = "images";

/// Top-level key marking a document as prayer-time data.
const PRAYER_TIMES_KEY: &str = "prayer_times";

/// Extension of data files.
const DATA_EXTENSION: &str = "json";

/// One JSON file in the data directory, as reported by `/api/data-status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataFileRecord {
    /// File name, e.g. `jamaah_times_2024_12.json`.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, seconds since the Unix epoch.
    pub modified: f64,
}

/// One slideshow image, as reported by `/api/images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    /// Path relative to the dashboard page, e.g. `images/sunset.jpg`.
    pub src: String,
    /// Human-readable caption derived from the file name.
    pub caption: String,
}

/// Shape classification of a parsed data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// An object with `prayer_times` or at least one object-valued entry.
    Valid,
    /// Parsed, but the top-level value is not an object.
    NotAnObject,
    /// An object with neither `prayer_times` nor a per-date mapping.
    MissingSchedule,
}

/// Classify a parsed JSON document.
pub fn classify_document(value: &Value) -> DocumentShape {
    let Some(map) = value.as_object() else {
        return DocumentShape::NotAnObject;
    };
    if map.contains_key(PRAYER_TIMES_KEY) || map.values().any(Value::is_object) {
        DocumentShape::Valid
    } else {
        DocumentShape::MissingSchedule
    }
}

/// File name for a month's data, e.g. `jamaah_times_2024_03.json`.
pub fn data_file_name(prefix: &str, year: i32, month: u32) -> String {
    format!("{prefix}_{year}_{month:02}.{DATA_EXTENSION}")
}

/// Derive a caption from an image file name.
///
/// Separators (`_`, `-`) become spaces, anything after a further `.` in
/// the stem is dropped, and the result is title-cased:
/// `sunset_beach.jpg` gives `Sunset Beach`.
pub fn caption_from_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(file_name);
    let spaced = stem.replace(['_', '-'], " ");
    let head = spaced.split('.').next().unwrap_or_default();
    title_case(head)
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn has_json_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == DATA_EXTENSION)
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Regular files in `dir` (dotfiles included), sorted by name. Missing or unreadable
/// directories yield an empty list.
fn regular_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Directory not found");
            return Vec::new();
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Failed to read directory");
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let path = entry.path();
            path.is_file().then_some((name, path))
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

/// Read-only view over the data and images directories.
#[derive(Debug, Clone)]
pub struct Inventory {
    data_dir: PathBuf,
    images_dir: PathBuf,
    file_prefix: String,
    max_images: usize,
}

impl Inventory {
    /// Create an inventory over the given directories with the default
    /// file prefix and image cap.
    pub fn new(data_dir: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        let defaults = DashboardConfig::default().inventory;
        Self {
            data_dir: data_dir.into(),
            images_dir: images_dir.into(),
            file_prefix: defaults.file_prefix,
            max_images: defaults.max_images,
        }
    }

    /// Build the inventory described by a dashboard configuration.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            data_dir: config.paths.data_dir.clone(),
            images_dir: config.paths.images_dir.clone(),
            file_prefix: config.inventory.file_prefix.clone(),
            max_images: config.inventory.max_images,
        }
    }

    /// Override the monthly file prefix.
    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Override the image cap.
    #[must_use]
    pub fn with_max_images(mut self, max_images: usize) -> Self {
        self.max_images = max_images;
        self
    }

    /// The data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The images directory.
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    fn json_files(&self) -> Vec<(String, PathBuf)> {
        regular_files(&self.data_dir)
            .into_iter()
            .filter(|(name, _)| has_json_extension(name))
            .collect()
    }

    /// One record per `*.json` file in the data directory, sorted by name.
    pub fn list_data_files(&self) -> Vec<DataFileRecord> {
        self.json_files()
            .into_iter()
            .filter_map(|(name, path)| {
                let metadata = match fs::metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!(file = %name, error = %e, "Failed to stat data file");
                        return None;
                    }
                };
                let modified = metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map_or(0.0, |d| d.as_secs_f64());
                Some(DataFileRecord {
                    name,
                    size: metadata.len(),
                    modified,
                })
            })
            .collect()
    }

    /// Names of data files that parse as JSON and look like prayer-time
    /// documents. Every failure is logged; the scan always completes.
    pub fn validate_data_files(&self) -> BTreeSet<String> {
        let mut valid = BTreeSet::new();

        for (name, path) in self.json_files() {
            let contents = match fs::read(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    error!(file = %name, error = %e, "Error reading data file");
                    continue;
                }
            };

            match serde_json::from_slice::<Value>(&contents) {
                Ok(value) => match classify_document(&value) {
                    DocumentShape::Valid => {
                        info!(
                            file = %name,
                            size_kb = contents.len().div_ceil(1024),
                            "Valid JSON data file"
                        );
                        valid.insert(name);
                    }
                    DocumentShape::NotAnObject => {
                        warn!(file = %name, "Invalid JSON (not an object)");
                    }
                    DocumentShape::MissingSchedule => {
                        warn!(file = %name, "Invalid structure: no prayer_times or dated entries");
                    }
                },
                Err(e) => {
                    error!(file = %name, error = %e, "JSON syntax error in data file");
                }
            }
        }

        valid
    }

    /// Up to `max_images` images from the images directory, sorted by file
    /// name. A missing directory is created empty.
    pub fn list_images(&self) -> Vec<ImageEntry> {
        if !self.images_dir.exists() {
            warn!(dir = %self.images_dir.display(), "Images directory not found, creating it");
            if let Err(e) = self.ensure_images_dir() {
                warn!(dir = %self.images_dir.display(), error = %e, "Failed to create images directory");
            }
            return Vec::new();
        }

        let images: Vec<ImageEntry> = regular_files(&self.images_dir)
            .into_iter()
            .filter(|(name, _)| has_image_extension(name))
            .take(self.max_images)
            .map(|(name, _)| ImageEntry {
                caption: caption_from_file_name(&name),
                src: format!("{IMAGES_URL_PREFIX}/{name}"),
            })
            .collect();

        debug!(count = images.len(), "Listed slideshow images");
        images
    }

    /// Create the images directory if it does not exist.
    pub fn ensure_images_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.images_dir)
    }

    /// Name of the data file for the current local month.
    pub fn current_month_file_name(&self) -> String {
        let today = Local::now().date_naive();
        data_file_name(&self.file_prefix, today.year(), today.month())
    }

    /// Whether the data file for the current local month exists.
    pub fn current_month_file_exists(&self) -> bool {
        self.data_dir.join(self.current_month_file_name()).is_file()
    }

    /// Resolve a client-supplied data file name to a path inside the data
    /// directory.
    ///
    /// The name must be a single plain path component ending in `.json`,
    /// must name a regular file, and its canonical path must stay under
    /// the canonical data directory (symlinks pointing elsewhere are
    /// refused).
    pub fn resolve_data_file(&self, name: &str) -> Option<PathBuf> {
        let candidate = Path::new(name);
        let mut components = candidate.components();
        let single_component = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_component || !has_json_extension(name) {
            return None;
        }

        let path = self.data_dir.join(candidate);
        if !path.is_file() {
            return None;
        }

        let root = self.data_dir.canonicalize().ok()?;
        let resolved = path.canonicalize().ok()?;
        resolved.starts_with(&root).then_some(resolved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn inventory(root: &TempDir) -> Inventory {
        Inventory::new(root.path().join("data"), root.path().join("images"))
    }

    #[test]
    fn missing_data_dir_lists_nothing() {
        let root = TempDir::new().unwrap();
        let inv = inventory(&root);
        assert!(inv.list_data_files().is_empty());
        assert!(inv.validate_data_files().is_empty());
        assert!(!inv.current_month_file_exists());
    }

    #[test]
    fn data_files_sorted_with_sizes() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        write(&data, "jamaah_times_2025_01.json", "{}");
        write(&data, "jamaah_times_2024_12.json", "{\"a\": {}}");
        write(&data, "notes.txt", "not json");
        write(&data, ".hidden.json", "{}");
        fs::create_dir(data.join("nested.json")).unwrap();

        let files = inventory(&root).list_data_files();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                ".hidden.json",
                "jamaah_times_2024_12.json",
                "jamaah_times_2025_01.json"
            ]
        );
        assert_eq!(files.get(1).map(|f| f.size), Some(9));
        assert_eq!(files.get(2).map(|f| f.size), Some(2));
        assert!(files.iter().all(|f| f.modified > 0.0));
    }

    #[test]
    fn classify_document_shapes() {
        use serde_json::json;
        assert_eq!(
            classify_document(&json!({"prayer_times": []})),
            DocumentShape::Valid
        );
        assert_eq!(
            classify_document(&json!({"2024-12-01": {"fajr": "05:30"}})),
            DocumentShape::Valid
        );
        assert_eq!(
            classify_document(&json!({"mosque": "Central", "year": 2024})),
            DocumentShape::MissingSchedule
        );
        assert_eq!(classify_document(&json!({})), DocumentShape::MissingSchedule);
        assert_eq!(classify_document(&json!([1, 2])), DocumentShape::NotAnObject);
        assert_eq!(classify_document(&json!("text")), DocumentShape::NotAnObject);
    }

    #[test]
    fn validation_keeps_only_well_shaped_documents() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        write(&data, "a.json", r#"{"prayer_times": {"fajr": "05:00"}}"#);
        write(&data, "b.json", r#"{"2024-12-01": {"fajr": "05:30"}}"#);
        write(&data, "c.json", r#"{"name": "flat"}"#);
        write(&data, "d.json", "[1, 2, 3]");
        write(&data, "e.json", "{ not json");

        let valid = inventory(&root).validate_data_files();
        let expected: BTreeSet<String> = ["a.json", "b.json"].map(String::from).into();
        assert_eq!(valid, expected);
    }

    #[test]
    fn dotfile_data_counts_as_valid() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        write(&data, ".hidden.json", r#"{"prayer_times": {}}"#);

        let inv = inventory(&root);
        let valid = inv.validate_data_files();
        assert!(valid.contains(".hidden.json"));
        assert_eq!(inv.list_data_files().len(), 1);
        assert!(inv.resolve_data_file(".hidden.json").is_some());
    }

    #[test]
    fn malformed_files_still_listed_in_status() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        write(&data, "broken.json", "{");

        let inv = inventory(&root);
        assert_eq!(inv.list_data_files().len(), 1);
        assert!(inv.validate_data_files().is_empty());
    }

    #[test]
    fn captions_from_file_names() {
        assert_eq!(caption_from_file_name("sunset_beach.jpg"), "Sunset Beach");
        assert_eq!(caption_from_file_name("Morning-Prayer.png"), "Morning Prayer");
        assert_eq!(caption_from_file_name("MASJID_al-noor.webp"), "Masjid Al Noor");
        assert_eq!(caption_from_file_name("eid.2024.jpeg"), "Eid");
        assert_eq!(caption_from_file_name("hall2view.jpg"), "Hall2View");
    }

    #[test]
    fn list_images_creates_missing_dir() {
        let root = TempDir::new().unwrap();
        let inv = inventory(&root);
        assert!(inv.list_images().is_empty());
        assert!(root.path().join("images").is_dir());
    }

    #[test]
    fn list_images_filters_and_captions() {
        let root = TempDir::new().unwrap();
        let images = root.path().join("images");
        fs::create_dir(&images).unwrap();
        write(&images, "sunset_beach.jpg", "");
        write(&images, "Morning-Prayer.png", "");
        write(&images, "LOUD.JPG", "");
        write(&images, "animation.gif", "");
        write(&images, "readme.txt", "");

        let listed = inventory(&root).list_images();
        assert_eq!(
            listed,
            vec![
                ImageEntry {
                    src: String::from("images/LOUD.JPG"),
                    caption: String::from("Loud"),
                },
                ImageEntry {
                    src: String::from("images/Morning-Prayer.png"),
                    caption: String::from("Morning Prayer"),
                },
                ImageEntry {
                    src: String::from("images/sunset_beach.jpg"),
                    caption: String::from("Sunset Beach"),
                },
            ]
        );
    }

    #[test]
    fn list_images_is_capped() {
        let root = TempDir::new().unwrap();
        let images = root.path().join("images");
        fs::create_dir(&images).unwrap();
        for i in 0..25 {
            write(&images, &format!("slide_{i:02}.webp"), "");
        }

        let inv = inventory(&root);
        let listed = inv.list_images();
        assert_eq!(listed.len(), 20);
        assert_eq!(
            listed.first().map(|i| i.src.as_str()),
            Some("images/slide_00.webp")
        );
        assert_eq!(inv.with_max_images(3).list_images().len(), 3);
    }

    #[test]
    fn data_file_name_pads_month() {
        assert_eq!(
            data_file_name("jamaah_times", 2024, 3),
            "jamaah_times_2024_03.json"
        );
        assert_eq!(data_file_name("times", 2025, 12), "times_2025_12.json");
    }

    #[test]
    fn current_month_file_detected() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        let inv = inventory(&root).with_file_prefix("mosque");
        assert!(!inv.current_month_file_exists());

        let name = inv.current_month_file_name();
        assert!(name.starts_with("mosque_"));
        write(&data, &name, "{}");
        assert!(inv.current_month_file_exists());
    }

    #[test]
    fn resolve_data_file_rules() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        write(&data, "jamaah_times_2024_12.json", "{}");
        write(&data, "notes.txt", "");
        write(root.path(), "secret.json", "{}");

        let inv = inventory(&root);
        assert!(inv.resolve_data_file("jamaah_times_2024_12.json").is_some());
        assert!(inv.resolve_data_file("missing.json").is_none());
        assert!(inv.resolve_data_file("notes.txt").is_none());
        assert!(inv.resolve_data_file("../secret.json").is_none());
        assert!(inv.resolve_data_file("..").is_none());
        assert!(inv.resolve_data_file("").is_none());
        assert!(inv.resolve_data_file("/etc/passwd.json").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_refuses_symlink_out_of_data_dir() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        write(root.path(), "outside.json", "{}");
        std::os::unix::fs::symlink(root.path().join("outside.json"), data.join("link.json"))
            .unwrap();

        assert!(inventory(&root).resolve_data_file("link.json").is_none());
    }

    #[test]
    fn listings_are_idempotent() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        let images = root.path().join("images");
        fs::create_dir(&data).unwrap();
        fs::create_dir(&images).unwrap();
        write(&data, "a.json", "{}");
        write(&images, "one.png", "");

        let inv = inventory(&root);
        assert_eq!(inv.list_data_files(), inv.list_data_files());
        assert_eq!(inv.list_images(), inv.list_images());
        assert_eq!(inv.validate_data_files(), inv.validate_data_files());
    }
}
