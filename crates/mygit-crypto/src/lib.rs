//! Content hashing for mygit.
//!
//! Object addresses are SHA-1 digests of the canonical object encoding. The
//! hasher wraps an established implementation; there is no custom
//! cryptography here.

pub mod hasher;

pub use hasher::ContentHasher;
