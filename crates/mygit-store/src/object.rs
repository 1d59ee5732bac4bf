use std::str::FromStr;

use mygit_crypto::ContentHasher;
use mygit_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::cursor::ByteCursor;
use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
///
/// The four git kinds have named variants; any other header tag is carried
/// verbatim in [`ObjectKind::Other`]. Equality and hashing go through the
/// tag text, so `Other("blob")` and `Blob` are the same kind.
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    /// Raw content (file contents, arbitrary data).
    Blob,
    /// Directory listing: packed (mode, name, id) entries.
    Tree,
    /// Commit object. Stored and read opaquely.
    Commit,
    /// Annotated tag object. Stored and read opaquely.
    Tag,
    /// Any other tag, stored and read opaquely.
    Other(String),
}

impl ObjectKind {
    /// Map a header tag to a kind without validating it.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "blob" => Self::Blob,
            "tree" => Self::Tree,
            "commit" => Self::Commit,
            "tag" => Self::Tag,
            other => Self::Other(other.to_string()),
        }
    }

    /// The ASCII tag written into the object header.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
            Self::Other(tag) => tag,
        }
    }

    /// The hasher that addresses objects of this kind.
    pub fn hasher(&self) -> ContentHasher<'_> {
        ContentHasher::new(self.as_str())
    }

    /// A tag must be non-empty and free of the header delimiters.
    pub fn validate(&self) -> StoreResult<()> {
        let tag = self.as_str();
        if tag.is_empty() || tag.bytes().any(|b| b == b' ' || b == 0) {
            return Err(StoreError::InvalidKind(tag.to_string()));
        }
        Ok(())
    }
}

impl PartialEq for ObjectKind {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl std::hash::Hash for ObjectKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = Self::from_tag(s);
        kind.validate()?;
        Ok(kind)
    }
}

impl From<String> for ObjectKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// A decoded object: kind tag + payload + size.
///
/// `size` is the length declared in the header. Objects built with
/// [`Object::new`] always carry the true payload length; objects returned by
/// [`decode`] carry whatever the header said until [`Object::verify_size`]
/// confirms it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The payload bytes.
    pub data: Vec<u8>,
    /// The size recorded for `data`.
    pub size: u64,
}

impl Object {
    /// Create a new object from kind and payload.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Shorthand for a blob.
    pub fn blob(data: impl Into<Vec<u8>>) -> Self {
        Self::new(ObjectKind::Blob, data.into())
    }

    /// Compute the content address without storing anything.
    pub fn compute_id(&self) -> ObjectId {
        self.kind.hasher().hash(&self.data)
    }

    /// Canonical encoding of this object.
    pub fn encode(&self) -> Vec<u8> {
        encode(&self.kind, &self.data)
    }

    /// Check that the declared size matches the payload length.
    pub fn verify_size(&self) -> StoreResult<()> {
        if self.size != self.data.len() as u64 {
            return Err(StoreError::malformed(format!(
                "{} header declares {} bytes but payload has {}",
                self.kind,
                self.size,
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// Build the canonical form `<kind> <size>\0<payload>`.
///
/// The size is always taken from `payload`. The tag is written as-is; callers
/// that accept tags from outside call [`ObjectKind::validate`] first.
pub fn encode(kind: &ObjectKind, payload: &[u8]) -> Vec<u8> {
    let size = payload.len().to_string();
    let tag = kind.as_str();
    let mut out = Vec::with_capacity(tag.len() + size.len() + 2 + payload.len());
    out.extend_from_slice(tag.as_bytes());
    out.push(b' ');
    out.extend_from_slice(size.as_bytes());
    out.push(0);
    out.extend_from_slice(payload);
    out
}

/// Parse a canonical encoding back into an [`Object`].
///
/// The declared size is returned as-is; everything after the header NUL is
/// the payload. Call [`Object::verify_size`] when the two must agree. The
/// kind tag is not checked against a fixed set.
pub fn decode(bytes: &[u8]) -> StoreResult<Object> {
    let mut cursor = ByteCursor::new(bytes);

    let tag = cursor
        .take_until(b' ')
        .ok_or_else(|| StoreError::malformed("object header has no space after kind"))?;
    let kind = ObjectKind::from_tag(&String::from_utf8_lossy(tag));

    let size = cursor
        .take_until(0)
        .ok_or_else(|| StoreError::malformed("object header is not NUL-terminated"))?;
    let size = parse_size(size)?;

    Ok(Object {
        kind,
        data: cursor.take_rest().to_vec(),
        size,
    })
}

fn parse_size(field: &[u8]) -> StoreResult<u64> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(StoreError::malformed(format!(
            "object size {:?} is not a decimal integer",
            String::from_utf8_lossy(field)
        )));
    }
    // All-digit input only fails to parse on overflow.
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| StoreError::malformed("object size overflows u64"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_blob_header() {
        assert_eq!(encode(&ObjectKind::Blob, b"hello\n"), b"blob 6\0hello\n");
        assert_eq!(encode(&ObjectKind::Tree, b""), b"tree 0\0");
    }

    #[test]
    fn decode_blob() {
        let obj = decode(b"blob 6\0hello\n").unwrap();
        assert_eq!(obj.kind, ObjectKind::Blob);
        assert_eq!(obj.size, 6);
        assert_eq!(obj.data, b"hello\n");
        obj.verify_size().unwrap();
    }

    #[test]
    fn payload_may_contain_nul_and_spaces() {
        let payload = b"a b\0c\0\0 d".to_vec();
        let obj = decode(&encode(&ObjectKind::Blob, &payload)).unwrap();
        assert_eq!(obj.data, payload);
        assert_eq!(obj.size, payload.len() as u64);
    }

    #[test]
    fn compute_id_matches_known_digest() {
        let obj = Object::blob(b"hello\n".to_vec());
        assert_eq!(
            obj.compute_id().to_hex(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
        assert_eq!(
            mygit_crypto::ContentHasher::hash_encoded(&obj.encode()),
            obj.compute_id()
        );
    }

    #[test]
    fn missing_space_is_malformed() {
        let err = decode(b"blob6\0hello").unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject(_)));
    }

    #[test]
    fn missing_nul_is_malformed() {
        let err = decode(b"blob 6hello").unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject(_)));
    }

    #[test]
    fn non_numeric_size_is_malformed() {
        let cases: [&[u8]; 4] = [b"blob x\0", b"blob -1\0", b"blob +1\0a", b"blob \0"];
        for bad in cases {
            let err = decode(bad).unwrap_err();
            assert!(matches!(err, StoreError::MalformedObject(_)), "{bad:?}");
        }
    }

    #[test]
    fn oversized_size_is_malformed() {
        let err = decode(b"blob 99999999999999999999999\0").unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject(_)));
    }

    #[test]
    fn custom_kind_decodes() {
        let obj = decode(b"note 3\0abc").unwrap();
        assert_eq!(obj.kind, ObjectKind::Other("note".into()));
        assert_eq!(obj.kind.as_str(), "note");
        assert_eq!(obj.size, 3);
        assert_eq!(obj.data, b"abc");
        obj.verify_size().unwrap();
    }

    #[test]
    fn custom_kind_encodes_and_hashes_by_tag() {
        let kind = ObjectKind::from_tag("note");
        assert_eq!(encode(&kind, b"abc"), b"note 3\0abc");
        let obj = Object::new(kind, b"abc".to_vec());
        assert_eq!(
            obj.compute_id(),
            mygit_crypto::ContentHasher::hash_encoded(b"note 3\0abc")
        );
    }

    #[test]
    fn known_tags_normalize() {
        assert_eq!(ObjectKind::from_tag("tree"), ObjectKind::Tree);
        assert!(matches!(ObjectKind::from_tag("tree"), ObjectKind::Tree));
        assert_eq!(ObjectKind::Other("blob".into()), ObjectKind::Blob);
    }

    #[test]
    fn tags_with_delimiters_are_rejected() {
        for bad in ["", "two words", "nul\0tag"] {
            assert!(matches!(
                bad.parse::<ObjectKind>(),
                Err(StoreError::InvalidKind(_))
            ));
        }
        assert_eq!("note".parse::<ObjectKind>().unwrap().as_str(), "note");
    }

    #[test]
    fn kind_serializes_as_tag() {
        let json = serde_json::to_string(&ObjectKind::Other("note".into())).unwrap();
        assert_eq!(json, "\"note\"");
        let kind: ObjectKind = serde_json::from_str("\"tree\"").unwrap();
        assert!(matches!(kind, ObjectKind::Tree));
    }

    #[test]
    fn decode_trusts_header_but_verify_rejects_mismatch() {
        let obj = decode(b"blob 10\0short").unwrap();
        assert_eq!(obj.size, 10);
        assert_eq!(obj.data, b"short");
        assert!(matches!(
            obj.verify_size(),
            Err(StoreError::MalformedObject(_))
        ));
    }

    #[test]
    fn kind_display_and_parse() {
        for kind in [
            ObjectKind::Blob,
            ObjectKind::Tree,
            ObjectKind::Commit,
            ObjectKind::Tag,
        ] {
            assert_eq!(kind.as_str().parse::<ObjectKind>().unwrap(), kind);
            assert_eq!(format!("{kind}"), kind.as_str());
        }
    }

    #[test]
    fn different_kinds_produce_different_ids() {
        let data = b"same data".to_vec();
        let blob = Object::new(ObjectKind::Blob, data.clone());
        let tree = Object::new(ObjectKind::Tree, data);
        assert_ne!(blob.compute_id(), tree.compute_id());
    }

    fn any_kind() -> impl Strategy<Value = ObjectKind> {
        prop_oneof![
            Just(ObjectKind::Blob),
            Just(ObjectKind::Tree),
            Just(ObjectKind::Commit),
            Just(ObjectKind::Tag),
            "[a-z]{1,8}".prop_map(|tag| ObjectKind::from_tag(&tag)),
        ]
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            kind in any_kind(),
            payload in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let obj = decode(&encode(&kind, &payload)).unwrap();
            prop_assert_eq!(&obj.kind, &kind);
            prop_assert_eq!(obj.size, payload.len() as u64);
            prop_assert_eq!(obj.data, payload);
        }
    }
}
