use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use log::{
    debug,
    warn,
};
use tempfile::NamedTempFile;

use crate::error::{
    NetError,
    Result,
};

/// Output written to a temporary file beside its destination, not yet
/// visible under the destination name.
#[derive(Debug)]
pub struct StagedFile {
    tmp:    NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Creates the temporary file in the directory of `target`. Fails when
    /// that directory does not exist or is not writable.
    pub fn new<P: AsRef<Path>>(target: P) -> Result<Self> {
        let target = target.as_ref();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir).map_err(|e| NetError::storage(target, e))?;
        Ok(Self {
            tmp,
            target: target.to_path_buf(),
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn as_file_mut(&mut self) -> &mut File {
        self.tmp.as_file_mut()
    }

    /// Renames the temporary file over the destination.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { tmp, target } = self;
        tmp.persist(&target)
            .map_err(|e| NetError::storage(&target, e.error))?;
        debug!("Committed {}", target.display());
        Ok(target)
    }
}

/// Commits every staged file. If one rename fails, files already committed
/// by this call are removed and the remaining temporaries are discarded.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<()> {
    let mut committed = Vec::with_capacity(staged.len());
    for file in staged {
        match file.commit() {
            Ok(path) => committed.push(path),
            Err(err) => {
                for path in committed {
                    if let Err(e) = std::fs::remove_file(&path) {
                        warn!("Could not roll back {}: {}", path.display(), e);
                    }
                }
                return Err(err);
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn invisible_until_committed() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("out.txt");

        let mut staged = StagedFile::new(&target)?;
        staged.as_file_mut().write_all(b"payload")?;
        assert!(!target.exists());

        staged.commit()?;
        assert_eq!(std::fs::read(&target)?, b"payload");
        Ok(())
    }

    #[test]
    fn dropped_stage_leaves_nothing() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("out.txt");
        drop(StagedFile::new(&target)?);

        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn missing_directory_fails_to_stage() {
        let err = StagedFile::new("no/such/dir/out.txt").unwrap_err();
        assert!(matches!(err, NetError::Storage { .. }));
    }

    #[test]
    fn failed_commit_rolls_back_earlier_files() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("first.txt");
        // A non-empty directory cannot be replaced by a file.
        let blocked = dir.path().join("blocked");
        std::fs::create_dir(&blocked)?;
        std::fs::write(blocked.join("keep"), b"x")?;

        let staged = vec![StagedFile::new(&first)?, StagedFile::new(&blocked)?];
        assert!(commit_all(staged).is_err());
        assert!(!first.exists());
        assert!(blocked.is_dir());
        Ok(())
    }
}
