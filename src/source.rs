// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Motion source discovery.
//!
//! Resolves a command-line source string into an ordered list of `.npy` motion files,
//! each paired with the exercise slug derived from its file stem.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Where to find motion arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionSource {
    /// A single `.npy` file.
    File(PathBuf),
    /// Every `.npy` file directly inside a directory.
    Directory(PathBuf),
    /// Simple glob of the form `dir/*.npy`.
    Glob(String),
}

/// One discovered motion file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionEntry {
    /// Exercise identifier, the file stem.
    pub slug: String,
    /// Path of the `.npy` file.
    pub path: PathBuf,
}

impl MotionEntry {
    /// Build an entry from a path, deriving the slug from its stem.
    #[must_use]
    pub fn from_path(path: PathBuf) -> Self {
        Self {
            slug: slug_for(&path),
            path,
        }
    }
}

/// Exercise slug for a motion file: its stem, or `"motion"` when there is none.
#[must_use]
pub fn slug_for(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "motion".to_string(), |s| s.to_string_lossy().to_string())
}

impl MotionSource {
    /// Check if this source may yield more than one file.
    #[must_use]
    pub const fn is_batch(&self) -> bool {
        matches!(self, Self::Directory(_) | Self::Glob(_))
    }

    /// Resolve to motion files sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if a file or directory does not exist or cannot be listed.
    pub fn collect(&self) -> Result<Vec<MotionEntry>> {
        let paths = match self {
            Self::File(path) => {
                if !path.is_file() {
                    return Err(PipelineError::IoError(format!(
                        "File not found: {}",
                        path.display()
                    )));
                }
                vec![path.clone()]
            }
            Self::Directory(dir) => Self::collect_from_dir(dir, "npy")?,
            Self::Glob(pattern) => Self::collect_from_glob(pattern)?,
        };
        Ok(paths.into_iter().map(MotionEntry::from_path).collect())
    }

    fn collect_from_dir(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(PipelineError::IoError(format!(
                "Directory not found: {}",
                dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
            })
            .collect();

        paths.sort();
        Ok(paths)
    }

    /// Only `dir/*.ext` patterns are supported.
    fn collect_from_glob(pattern: &str) -> Result<Vec<PathBuf>> {
        let Some(star_pos) = pattern.find('*') else {
            return Ok(vec![PathBuf::from(pattern)]);
        };

        let dir_part = &pattern[..star_pos];
        let dir = if dir_part.is_empty() {
            Path::new(".")
        } else {
            Path::new(dir_part.trim_end_matches('/').trim_end_matches('\\'))
        };
        let extension = pattern[star_pos..].strip_prefix("*.").unwrap_or("npy");
        Self::collect_from_dir(dir, extension)
    }
}

impl From<&str> for MotionSource {
    fn from(s: &str) -> Self {
        if s.contains('*') {
            return Self::Glob(s.to_string());
        }
        let path = PathBuf::from(s);
        if path.is_dir() {
            Self::Directory(path)
        } else {
            Self::File(path)
        }
    }
}

impl From<PathBuf> for MotionSource {
    fn from(path: PathBuf) -> Self {
        path.to_string_lossy().as_ref().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_source_from_string() {
        assert!(matches!(MotionSource::from("motion.npy"), MotionSource::File(_)));
        assert!(matches!(MotionSource::from("data/*.npy"), MotionSource::Glob(_)));

        let dir = tempfile::tempdir().unwrap();
        let source = MotionSource::from(dir.path().to_path_buf());
        assert!(matches!(source, MotionSource::Directory(_)));
        assert!(source.is_batch());
    }

    #[test]
    fn test_collect_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "squat.npy");
        touch(dir.path(), "bench-dips.npy");
        touch(dir.path(), "notes.txt");
        std::fs::create_dir(dir.path().join("nested.npy")).unwrap();

        let entries = MotionSource::Directory(dir.path().to_path_buf()).collect().unwrap();
        let slugs: Vec<&str> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["bench-dips", "squat"]);
    }

    #[test]
    fn test_collect_glob() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.npy");
        touch(dir.path(), "b.json");

        let pattern = format!("{}/*.npy", dir.path().display());
        let entries = MotionSource::from(pattern.as_str()).collect().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slug, "a");
    }

    #[test]
    fn test_collect_missing() {
        assert!(MotionSource::File(PathBuf::from("/nonexistent/x.npy")).collect().is_err());
        assert!(MotionSource::Directory(PathBuf::from("/nonexistent")).collect().is_err());
    }

    #[test]
    fn test_slug_for() {
        assert_eq!(slug_for(Path::new("data/ab-walk-outs.npy")), "ab-walk-outs");
    }
}
