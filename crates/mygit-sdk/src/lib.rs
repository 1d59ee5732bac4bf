//! High-level repository API for mygit.
//!
//! Wraps repository bootstrap, configuration loading and the loose object
//! store behind a single [`Repository`] handle. This is the entry point used
//! by the `mygit` binary.

pub mod config;
pub mod error;
pub mod repository;

pub use config::{RepoConfig, CONFIG_FILE};
pub use error::{SdkError, SdkResult};
pub use repository::{Repository, DEFAULT_GIT_DIR};

// Re-export key types
pub use mygit_store::{EntryMode, Object, ObjectKind, StoreConfig, Tree, TreeEntry};
pub use mygit_types::ObjectId;
