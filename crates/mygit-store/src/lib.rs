//! Loose object storage for mygit.
//!
//! This crate implements the on-disk object database: every blob and tree is
//! stored as an immutable, zlib-compressed file named by the SHA-1 of its
//! canonical encoding, laid out like git's `.git/objects/` directory.
//!
//! # Modules
//!
//! - [`object`] -- canonical encoding (`<kind> <size>\0<payload>`) and decoding
//! - [`tree`] -- packed tree entry format
//! - [`loose`] -- [`LooseObjectStore`], the filesystem store
//! - [`config`] -- [`StoreConfig`]
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; the address is derived from content.
//! 2. Writes land through a temporary file and a rename.
//! 3. The store root is always explicit. Nothing reads the process working
//!    directory.
//! 4. Parse failures surface as [`StoreError::MalformedObject`], never as
//!    silently truncated content.

pub mod config;
pub mod cursor;
pub mod error;
pub mod loose;
pub mod object;
pub mod tree;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use loose::{LooseObjectStore, MIN_PREFIX_LEN};
pub use object::{decode, encode, Object, ObjectKind};
pub use tree::{decode_tree, encode_tree, EntryMode, Tree, TreeEntry};
