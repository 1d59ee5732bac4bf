//! Foundation types for mygit.
//!
//! Every other mygit crate depends on `mygit-types` for the object address
//! type and its hex encoding rules.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (20-byte SHA-1 digest)
//! - [`TypeError`] -- Failures while parsing identifiers

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::{ObjectId, HEX_LEN, RAW_LEN};
