//! Frame-sequence manifests.
//!
//! A sequence is a directory of stills named `<prefix><n>.<ext>` where `n`
//! runs from 1 to N. Frame slot `i` holds file number `i + 1`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use turntable_common::error::{TurntableError, TurntableResult};

/// File naming scheme for a frame sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceNaming {
    /// File name prefix, e.g. `threesixty_`.
    pub prefix: String,
    /// File extension without the dot.
    pub extension: String,
}

impl Default for SequenceNaming {
    fn default() -> Self {
        Self {
            prefix: "threesixty_".to_string(),
            extension: "jpg".to_string(),
        }
    }
}

impl SequenceNaming {
    /// File name for zero-based frame slot `index`.
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{}.{}", self.prefix, index + 1, self.extension)
    }

    /// Zero-based slot for a file name following this scheme.
    pub fn slot_of(&self, file_name: &str) -> Option<usize> {
        let number = file_name
            .strip_prefix(&self.prefix)?
            .strip_suffix(&self.extension)?
            .strip_suffix('.')?;
        match number.parse::<usize>() {
            Ok(n) if n >= 1 => Some(n - 1),
            _ => None,
        }
    }
}

/// The resolved list of frame files for one sequence, in slot order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceManifest {
    /// Directory holding the frames.
    pub root: PathBuf,
    /// Naming scheme used to resolve the files.
    pub naming: SequenceNaming,
    /// One path per slot.
    pub frames: Vec<PathBuf>,
}

/// Result of scanning a directory for a sequence.
#[derive(Debug, Clone, Default)]
pub struct SequenceScan {
    /// Slots whose file exists.
    pub present: Vec<usize>,
    /// Slots whose file is missing.
    pub missing: Vec<usize>,
    /// Files matching the prefix/extension but numbered beyond the sequence.
    pub extra: Vec<PathBuf>,
}

impl SequenceScan {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

impl SequenceManifest {
    /// Expected manifest for `total_frames` stills in `root`, without
    /// touching the filesystem.
    pub fn expected(root: impl Into<PathBuf>, naming: SequenceNaming, total_frames: usize) -> Self {
        let root = root.into();
        let frames = (0..total_frames)
            .map(|i| root.join(naming.file_name(i)))
            .collect();
        Self {
            root,
            naming,
            frames,
        }
    }

    /// Resolve a manifest from disk, failing if the directory or any frame
    /// is missing.
    pub fn resolve(root: &Path, naming: SequenceNaming, total_frames: usize) -> TurntableResult<Self> {
        if !root.is_dir() {
            return Err(TurntableError::FileNotFound {
                path: root.to_path_buf(),
            });
        }

        let manifest = Self::expected(root, naming, total_frames);
        let scan = manifest.scan()?;
        if !scan.is_complete() {
            let first = scan.missing[0];
            return Err(TurntableError::sequence(format!(
                "{} of {} frames missing in {} (first: {})",
                scan.missing.len(),
                total_frames,
                root.display(),
                manifest.naming.file_name(first)
            )));
        }

        tracing::debug!(root = %root.display(), frames = total_frames, "Sequence resolved");
        Ok(manifest)
    }

    /// Check which expected frames exist and report stray numbered files.
    pub fn scan(&self) -> TurntableResult<SequenceScan> {
        let mut scan = SequenceScan::default();
        for (slot, path) in self.frames.iter().enumerate() {
            if path.is_file() {
                scan.present.push(slot);
            } else {
                scan.missing.push(slot);
            }
        }

        if self.root.is_dir() {
            for entry in std::fs::read_dir(&self.root)? {
                let entry = entry?;
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                if let Some(slot) = self.naming.slot_of(name) {
                    if slot >= self.frames.len() {
                        scan.extra.push(entry.path());
                    }
                }
            }
            scan.extra.sort();
        }

        Ok(scan)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("turntable-seq-{tag}-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_file_names_are_one_based() {
        let naming = SequenceNaming::default();
        assert_eq!(naming.file_name(0), "threesixty_1.jpg");
        assert_eq!(naming.file_name(179), "threesixty_180.jpg");
    }

    #[test]
    fn test_slot_of_rejects_foreign_names() {
        let naming = SequenceNaming::default();
        assert_eq!(naming.slot_of("threesixty_12.jpg"), Some(11));
        assert_eq!(naming.slot_of("threesixty_0.jpg"), None);
        assert_eq!(naming.slot_of("threesixty_12.png"), None);
        assert_eq!(naming.slot_of("other_12.jpg"), None);
        assert_eq!(naming.slot_of("threesixty_x.jpg"), None);
    }

    #[test]
    fn test_resolve_complete_sequence() {
        let dir = temp_dir("complete");
        let naming = SequenceNaming::default();
        for i in 0..4 {
            std::fs::write(dir.join(naming.file_name(i)), b"jpg").unwrap();
        }

        let manifest = SequenceManifest::resolve(&dir, naming, 4).unwrap();
        assert_eq!(manifest.len(), 4);
        assert!(manifest.frames[3].ends_with("threesixty_4.jpg"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_resolve_reports_missing_frames() {
        let dir = temp_dir("missing");
        let naming = SequenceNaming::default();
        std::fs::write(dir.join(naming.file_name(0)), b"jpg").unwrap();

        let err = SequenceManifest::resolve(&dir, naming, 3).unwrap_err();
        assert!(matches!(err, TurntableError::Sequence { .. }));
        assert!(err.to_string().contains("threesixty_2.jpg"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_scan_finds_extra_frames() {
        let dir = temp_dir("extra");
        let naming = SequenceNaming::default();
        for i in 0..3 {
            std::fs::write(dir.join(naming.file_name(i)), b"jpg").unwrap();
        }

        let scan = SequenceManifest::expected(&dir, naming, 2).scan().unwrap();
        assert!(scan.is_complete());
        assert_eq!(scan.present, vec![0, 1]);
        assert_eq!(scan.extra.len(), 1);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_resolve_missing_directory() {
        let err = SequenceManifest::resolve(
            Path::new("/nonexistent/turntable/frames"),
            SequenceNaming::default(),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, TurntableError::FileNotFound { .. }));
    }
}
