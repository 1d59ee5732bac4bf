//! Tree payload format.
//!
//! A tree payload is a run of entries packed back-to-back with no count
//! prefix and no separator between entries:
//!
//! ```text
//! <mode ASCII digits> SP <name bytes> NUL <20-byte raw object id>
//! ```
//!
//! Decoding walks the payload with a [`ByteCursor`] and must land exactly on
//! the end of the buffer.

use std::borrow::Cow;

use mygit_types::{ObjectId, RAW_LEN};
use serde::{Deserialize, Serialize};

use crate::cursor::ByteCursor;
use crate::error::{StoreError, StoreResult};
use crate::object::{Object, ObjectKind};

/// Well-known file modes for a tree entry.
///
/// Decoding never depends on this; it is only used for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (100644).
    Regular,
    /// Executable file (100755).
    Executable,
    /// Symbolic link (120000).
    Symlink,
    /// Subtree / directory (40000).
    Directory,
    /// Submodule commit reference (160000).
    Gitlink,
}

impl EntryMode {
    /// Octal mode value.
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Directory => 0o040000,
            Self::Gitlink => 0o160000,
        }
    }

    /// Parse from an octal mode value.
    pub fn from_mode_bits(bits: u32) -> Option<Self> {
        match bits {
            0o100644 => Some(Self::Regular),
            0o100755 => Some(Self::Executable),
            0o120000 => Some(Self::Symlink),
            0o040000 => Some(Self::Directory),
            0o160000 => Some(Self::Gitlink),
            _ => None,
        }
    }

    /// Parse from the ASCII mode text stored in a tree entry.
    pub fn from_mode_str(mode: &str) -> Option<Self> {
        u32::from_str_radix(mode, 8).ok().and_then(Self::from_mode_bits)
    }

    /// Mode text as written into tree payloads (no leading zero).
    pub fn as_tree_str(&self) -> String {
        format!("{:o}", self.mode_bits())
    }

    /// The kind of object an entry with this mode points at.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Directory => ObjectKind::Tree,
            Self::Gitlink => ObjectKind::Commit,
            Self::Regular | Self::Executable | Self::Symlink => ObjectKind::Blob,
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Mode text exactly as stored (e.g. `"100644"`, `"40000"`).
    pub mode: String,
    /// Entry name. Never contains NUL.
    pub name: Vec<u8>,
    /// ID of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: impl Into<String>, name: impl Into<Vec<u8>>, object_id: ObjectId) -> Self {
        Self {
            mode: mode.into(),
            name: name.into(),
            object_id,
        }
    }

    /// Create an entry from a well-known mode.
    pub fn with_mode(mode: EntryMode, name: impl Into<Vec<u8>>, object_id: ObjectId) -> Self {
        Self::new(mode.as_tree_str(), name, object_id)
    }

    /// The well-known mode, if the stored text is one.
    pub fn entry_mode(&self) -> Option<EntryMode> {
        EntryMode::from_mode_str(&self.mode)
    }

    /// Name for display; invalid UTF-8 is replaced.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Mode text left-padded with zeros to six digits.
    pub fn padded_mode(&self) -> String {
        format!("{:0>6}", self.mode)
    }

    /// Kind of the referenced object, inferred from the mode.
    ///
    /// Unknown modes are reported as blobs.
    pub fn object_kind(&self) -> ObjectKind {
        self.entry_mode()
            .map(|m| m.object_kind())
            .unwrap_or(ObjectKind::Blob)
    }
}

/// Decode a tree payload into its entries, in storage order.
pub fn decode_tree(payload: &[u8]) -> StoreResult<Vec<TreeEntry>> {
    let mut cursor = ByteCursor::new(payload);
    let mut entries = Vec::new();

    while !cursor.is_empty() {
        let offset = cursor.position();

        let mode = cursor.take_until(b' ').ok_or_else(|| {
            StoreError::malformed(format!("tree entry at offset {offset}: mode not terminated"))
        })?;
        let mode = std::str::from_utf8(mode).map_err(|_| {
            StoreError::malformed(format!("tree entry at offset {offset}: mode is not ASCII"))
        })?;

        let name = cursor.take_until(0).ok_or_else(|| {
            StoreError::malformed(format!("tree entry at offset {offset}: name not terminated"))
        })?;

        let raw = cursor.take(RAW_LEN).ok_or_else(|| {
            StoreError::malformed(format!(
                "tree entry at offset {offset}: truncated object id ({} of {RAW_LEN} bytes)",
                cursor.remaining().len()
            ))
        })?;

        entries.push(TreeEntry {
            mode: mode.to_string(),
            name: name.to_vec(),
            object_id: ObjectId::from_raw(raw)?,
        });
    }

    Ok(entries)
}

/// Encode entries into a tree payload, in the order given.
pub fn encode_tree<'a>(entries: impl IntoIterator<Item = &'a TreeEntry>) -> Vec<u8> {
    let mut out = Vec::new();
    for entry in entries {
        out.extend_from_slice(entry.mode.as_bytes());
        out.push(b' ');
        out.extend_from_slice(&entry.name);
        out.push(0);
        out.extend_from_slice(entry.object_id.as_bytes());
    }
    out
}

/// Directory listing object.
///
/// Entries stay in storage order. Sorting for presentation is a separate,
/// explicit step ([`Tree::sort_by_name`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the payload of a tree object.
    pub fn from_payload(payload: &[u8]) -> StoreResult<Self> {
        Ok(Self::new(decode_tree(payload)?))
    }

    /// Decode from an [`Object`], checking its kind.
    pub fn from_object(obj: &Object) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Tree {
            return Err(StoreError::UnexpectedKind {
                id: obj.compute_id(),
                expected: ObjectKind::Tree,
                actual: obj.kind.clone(),
            });
        }
        Self::from_payload(&obj.data)
    }

    /// Convert into an [`Object`] for storage.
    pub fn to_object(&self) -> Object {
        Object::new(ObjectKind::Tree, encode_tree(&self.entries))
    }

    /// Sort entries byte-wise by name.
    pub fn sort_by_name(&mut self) {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Look up an entry by name.
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&TreeEntry> {
        let name = name.as_ref();
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a TreeEntry;
    type IntoIter = std::slice::Iter<'a, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
