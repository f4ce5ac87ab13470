use std::ffi::OsString;
use std::path::{Path, PathBuf};

use dlbench_tool::ToolKind;
use tracing::{trace, warn};

/// The output file of a trial plus every sidecar a tool may leave next to it.
///
/// Claiming removes them all, and so does dropping the guard, on every exit
/// path including unwinding.
#[derive(Debug)]
pub struct Artifacts {
    paths: Vec<PathBuf>,
}

impl Artifacts {
    pub fn for_output(output: &Path) -> Self {
        let sidecars = ToolKind::ALL
            .into_iter()
            .filter_map(ToolKind::sidecar_suffix)
            .map(|suffix| {
                let mut path = OsString::from(output.as_os_str());
                path.push(suffix);
                PathBuf::from(path)
            });

        Self {
            paths: std::iter::once(output.to_path_buf()).chain(sidecars).collect(),
        }
    }

    /// Guard over the artifacts of `output`, starting from a clean slate.
    pub fn claim(output: &Path) -> Self {
        let artifacts = Self::for_output(output);
        artifacts.clear();
        artifacts
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn clear(&self) {
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => trace!(path = %path.display(), "removed artifact"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove artifact"),
            }
        }
    }
}

impl Drop for Artifacts {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_paths() {
        let artifacts = Artifacts::for_output(Path::new("/tmp/test_dl.dat"));
        assert_eq!(
            artifacts.paths(),
            [
                PathBuf::from("/tmp/test_dl.dat"),
                PathBuf::from("/tmp/test_dl.dat.hydra"),
                PathBuf::from("/tmp/test_dl.dat.aria2"),
            ]
        );
    }

    #[test]
    fn test_claim_removes_leftovers() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.dat");
        std::fs::write(&output, b"stale").unwrap();
        std::fs::write(dir.path().join("out.dat.aria2"), b"stale").unwrap();

        let artifacts = Artifacts::claim(&output);
        assert!(artifacts.paths().iter().all(|p| !p.exists()));
    }

    #[test]
    fn test_cleanup_on_drop() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.dat");

        let artifacts = Artifacts::claim(&output);
        std::fs::write(&output, b"data").unwrap();
        std::fs::write(dir.path().join("out.dat.hydra"), b"ctl").unwrap();
        drop(artifacts);

        assert!(!output.exists());
        assert!(!dir.path().join("out.dat.hydra").exists());
    }

    #[test]
    fn test_cleanup_on_unwind() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.dat");

        let result = std::panic::catch_unwind(|| {
            let _artifacts = Artifacts::claim(&output);
            std::fs::write(&output, b"partial").unwrap();
            panic!("tool crashed");
        });

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_unrelated_files_survive() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.dat");
        let other = dir.path().join("keep.dat");
        std::fs::write(&other, b"keep").unwrap();

        drop(Artifacts::claim(&output));
        assert!(other.exists());
    }
}
