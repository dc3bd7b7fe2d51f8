//! Diagram artifact resolution by filesystem recency.
//!
//! The external tool writes images into the shared output directory on its
//! own schedule; the resolver infers "the result" as the most recently
//! modified image file. Two caveats are part of the contract: concurrent
//! generations into the same directory can race on recency, and an exact
//! mtime tie resolves to whichever entry the directory listing yields
//! first.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Extensions treated as diagram images.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "svg"];

/// A resolved diagram image.
#[derive(Debug, Clone)]
pub struct DiagramArtifact {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Latest image in `dir`, or `None` when nothing matched.
///
/// A miss is informational, not an error: the tool may write its file
/// after exiting, so callers report "not found yet" and move on.
pub fn latest_artifact(dir: &Path) -> Result<Option<DiagramArtifact>> {
    if !dir.exists() {
        return Ok(None);
    }

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list output directory {}", dir.display()))?;

    let mut latest: Option<DiagramArtifact> = None;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if !is_image(&path) {
            continue;
        }
        // Entries can vanish between listing and stat; skip those.
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        // Strictly newer only: on a tie the earlier-listed entry stays.
        if latest.as_ref().is_none_or(|cur| modified > cur.modified) {
            latest = Some(DiagramArtifact { path, modified });
        }
    }

    if let Some(ref artifact) = latest {
        debug!(path = %artifact.path.display(), "resolved latest diagram artifact");
    }
    Ok(latest)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str, mtime: SystemTime) {
        let path = dir.join(name);
        fs::write(&path, b"data").unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(mtime).unwrap();
    }

    #[test]
    fn test_missing_directory_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("never-created");
        assert!(latest_artifact(&gone).unwrap().is_none());
    }

    #[test]
    fn test_empty_directory_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(latest_artifact(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn test_non_image_files_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        fs::write(tmp.path().join("tool.log"), b"x").unwrap();
        assert!(latest_artifact(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn test_latest_mtime_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        touch(tmp.path(), "a.png", base + Duration::from_secs(1));
        touch(tmp.path(), "b.png", base + Duration::from_secs(3));
        touch(tmp.path(), "c.png", base + Duration::from_secs(2));

        let artifact = latest_artifact(tmp.path()).unwrap().unwrap();
        assert_eq!(artifact.path.file_name().unwrap(), "b.png");
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let tmp = tempfile::tempdir().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        touch(tmp.path(), "diagram.PNG", base);
        let artifact = latest_artifact(tmp.path()).unwrap().unwrap();
        assert_eq!(artifact.path.file_name().unwrap(), "diagram.PNG");
    }

    #[test]
    fn test_mixed_extensions_compete_on_recency() {
        let tmp = tempfile::tempdir().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        touch(tmp.path(), "old.svg", base);
        touch(tmp.path(), "new.jpg", base + Duration::from_secs(5));
        let artifact = latest_artifact(tmp.path()).unwrap().unwrap();
        assert_eq!(artifact.path.file_name().unwrap(), "new.jpg");
    }
}
