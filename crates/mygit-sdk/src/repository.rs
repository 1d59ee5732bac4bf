use std::fs;
use std::path::{Path, PathBuf};

use mygit_store::{LooseObjectStore, Object, ObjectKind, Tree};
use mygit_types::ObjectId;
use tracing::{debug, info};

use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};

/// Conventional name of the repository metadata directory.
pub const DEFAULT_GIT_DIR: &str = ".git";

/// A repository rooted at an explicit git directory.
///
/// ```text
/// <git_dir>/
///   HEAD          ref: refs/heads/<default_branch>
///   objects/      loose object store
///   refs/
/// ```
#[derive(Debug)]
pub struct Repository {
    git_dir: PathBuf,
    config: RepoConfig,
    store: LooseObjectStore,
}

impl Repository {
    /// Create the directory skeleton and `HEAD`, then open the repository.
    ///
    /// Re-running `init` on an existing repository is safe: directories are
    /// reused and an existing `HEAD` is left untouched.
    pub fn init(git_dir: impl AsRef<Path>) -> SdkResult<Self> {
        let git_dir = git_dir.as_ref();
        let config = RepoConfig::load(git_dir)?;
        Self::init_with_config(git_dir, config)
    }

    pub fn init_with_config(git_dir: impl AsRef<Path>, config: RepoConfig) -> SdkResult<Self> {
        let git_dir = git_dir.as_ref();
        for dir in [git_dir.to_path_buf(), git_dir.join("objects"), git_dir.join("refs")] {
            fs::create_dir_all(&dir)?;
        }

        let head = git_dir.join("HEAD");
        if !head.exists() {
            fs::write(&head, format!("ref: refs/heads/{}\n", config.default_branch))?;
        }

        info!(git_dir = %git_dir.display(), branch = %config.default_branch, "initialized repository");
        Ok(Self::from_parts(git_dir, config))
    }

    /// Open an existing repository.
    pub fn open(git_dir: impl AsRef<Path>) -> SdkResult<Self> {
        let git_dir = git_dir.as_ref();
        if !git_dir.join("objects").is_dir() {
            return Err(SdkError::NotInitialized(git_dir.display().to_string()));
        }
        let config = RepoConfig::load(git_dir)?;
        debug!(git_dir = %git_dir.display(), "opened repository");
        Ok(Self::from_parts(git_dir, config))
    }

    fn from_parts(git_dir: &Path, config: RepoConfig) -> Self {
        let store = LooseObjectStore::with_config(git_dir.join("objects"), config.store.clone());
        Self {
            git_dir: git_dir.to_path_buf(),
            config,
            store,
        }
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn store(&self) -> &LooseObjectStore {
        &self.store
    }

    /// The symbolic reference stored in `HEAD`, e.g. `refs/heads/main`.
    pub fn head_ref(&self) -> SdkResult<String> {
        let text = fs::read_to_string(self.git_dir.join("HEAD"))?;
        let target = text
            .trim_end()
            .strip_prefix("ref: ")
            .ok_or_else(|| SdkError::Config(format!("HEAD is not symbolic: {:?}", text.trim_end())))?;
        Ok(target.to_string())
    }

    // ---- Object commands ----

    /// Address `content` as an object of `kind`, writing it when `write` is set.
    pub fn hash_object(&self, kind: ObjectKind, content: &[u8], write: bool) -> SdkResult<ObjectId> {
        if write {
            return Ok(self.store.put(kind, content)?);
        }
        kind.validate()?;
        Ok(kind.hasher().hash(content))
    }

    /// Read a file from disk and hash it as a blob.
    pub fn hash_file(&self, path: impl AsRef<Path>, write: bool) -> SdkResult<ObjectId> {
        let content = fs::read(path.as_ref())?;
        self.hash_object(ObjectKind::Blob, &content, write)
    }

    /// Resolve a full or abbreviated address.
    pub fn resolve(&self, address: &str) -> SdkResult<ObjectId> {
        Ok(self.store.resolve(address)?)
    }

    /// Look up an object by full or abbreviated address.
    pub fn cat_file(&self, address: &str) -> SdkResult<Object> {
        let id = self.resolve(address)?;
        Ok(self.store.get(&id)?)
    }

    /// Read a tree and sort its entries by name for listing.
    pub fn ls_tree(&self, address: &str) -> SdkResult<Tree> {
        let id = self.resolve(address)?;
        let mut tree = self.store.read_tree(&id)?;
        tree.sort_by_name();
        Ok(tree)
    }
}
