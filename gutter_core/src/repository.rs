//! Work tree discovery built on top of libgit2.

use std::path::{Component, Path, PathBuf};

use git2::{ErrorClass, ErrorCode, Repository as GitRepository};

use crate::{Error, Result};

/// Working tree enclosing a tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkTree {
    root: PathBuf,
}

impl WorkTree {
    /// Discover the working tree containing `file`.
    ///
    /// The file itself does not need to exist, only its parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be canonicalized, is
    /// not inside a git repository, or belongs to a bare repository.
    pub fn discover(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let parent = file.parent().unwrap_or(file);
        let canonical = canonicalize(parent)?;

        let repo = match GitRepository::discover(&canonical) {
            Ok(repo) => repo,
            Err(err)
                if err.class() == ErrorClass::Repository && err.code() == ErrorCode::NotFound =>
            {
                return Err(Error::NotARepository {
                    path: display_path(&canonical),
                })
            }
            Err(err) => return Err(Error::from(err)),
        };

        let workdir = repo.workdir().ok_or_else(|| Error::BareRepository {
            path: display_path(&canonical),
        })?;

        Ok(Self {
            root: canonicalize(workdir)?,
        })
    }

    /// Absolute path to the working tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `HEAD` points at a branch without commits.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or `HEAD` is
    /// unreadable.
    pub fn is_unborn(&self) -> Result<bool> {
        let repo = GitRepository::open(&self.root)?;
        let unborn = match repo.head() {
            Ok(_) => Ok(false),
            Err(err) if err.code() == ErrorCode::UnbornBranch => Ok(true),
            Err(err) => Err(Error::from(err)),
        };
        unborn
    }

    /// Path of `file` relative to the root, with `/` separators.
    ///
    /// Returns `None` if the file lies outside the working tree.
    #[must_use]
    pub fn relative_path(&self, file: &Path) -> Option<String> {
        let name = file.file_name()?;
        let parent = file.parent().and_then(|parent| canonicalize(parent).ok())?;
        let absolute = parent.join(name);
        let relative = absolute.strip_prefix(&self.root).ok()?;

        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join("/"))
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|source| Error::Io {
        path: display_path(path),
        source,
    })
}

fn display_path(path: &Path) -> String {
    path.to_path_buf()
        .into_os_string()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discovers_root_from_nested_file() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        GitRepository::init(temp.path())?;
        let nested = temp.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).expect("create dirs");

        let file = nested.join("lib.rs");
        let work_tree = WorkTree::discover(&file)?;

        assert_eq!(work_tree.root(), canonicalize(temp.path())?.as_path());
        assert_eq!(
            work_tree.relative_path(&file).as_deref(),
            Some("src/deep/lib.rs")
        );
        Ok(())
    }

    #[test]
    fn fresh_repository_is_unborn() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        let repo = GitRepository::init(temp.path())?;
        std::fs::write(temp.path().join("a.txt"), "a\n").expect("write file");
        let work_tree = WorkTree::discover(temp.path().join("a.txt"))?;
        assert!(work_tree.is_unborn()?);

        let mut index = repo.index()?;
        index.add_path(Path::new("a.txt"))?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let signature = git2::Signature::now("Test", "test@example.com")?;
        repo.commit(Some("HEAD"), &signature, &signature, "Initial", &tree, &[])?;
        assert!(!work_tree.is_unborn()?);
        Ok(())
    }

    #[test]
    fn file_outside_repository_is_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let err = WorkTree::discover(temp.path().join("notes.txt"));
        assert!(matches!(err, Err(Error::NotARepository { .. })));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let temp = TempDir::new().expect("tempdir");
        let err = WorkTree::discover(temp.path().join("absent").join("file.txt"));
        assert!(matches!(err, Err(Error::Io { .. })));
    }

    #[test]
    fn bare_repository_is_rejected() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        GitRepository::init_bare(temp.path())?;
        let err = WorkTree::discover(temp.path().join("config"));
        assert!(matches!(err, Err(Error::BareRepository { .. })));
        Ok(())
    }

    #[test]
    fn relative_path_outside_root_is_none() -> Result<()> {
        let repo_dir = TempDir::new().expect("tempdir");
        let other = TempDir::new().expect("tempdir");
        GitRepository::init(repo_dir.path())?;

        let work_tree = WorkTree::discover(repo_dir.path().join("a.txt"))?;
        assert!(work_tree.relative_path(&other.path().join("b.txt")).is_none());
        Ok(())
    }
}
