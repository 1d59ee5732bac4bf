use mygit_types::ObjectId;

/// Kind-tagged SHA-1 content hasher.
///
/// Each hasher carries an object kind tag (`"blob"`, `"tree"`, ...). Hashing a
/// payload feeds the canonical header `<tag> <len>\0` followed by the payload
/// into SHA-1, so a blob and a tree with identical bytes produce different
/// addresses. The header is streamed into the digest; the payload is never
/// copied.
#[derive(Clone, Copy, Debug)]
pub struct ContentHasher<'a> {
    tag: &'a str,
}

impl ContentHasher<'static> {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self { tag: "blob" };
    /// Hasher for tree objects.
    pub const TREE: Self = Self { tag: "tree" };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self { tag: "commit" };
    /// Hasher for annotated tag objects.
    pub const TAG: Self = Self { tag: "tag" };
}

impl<'a> ContentHasher<'a> {
    /// Create a hasher with a custom kind tag.
    pub const fn new(tag: &'a str) -> Self {
        Self { tag }
    }

    /// Hash a payload as an object of this hasher's kind.
    pub fn hash(&self, payload: &[u8]) -> ObjectId {
        let mut sha = sha1_smol::Sha1::new();
        sha.update(self.tag.as_bytes());
        sha.update(b" ");
        sha.update(payload.len().to_string().as_bytes());
        sha.update(b"\0");
        sha.update(payload);
        ObjectId::from_hash(sha.digest().bytes())
    }

    /// Verify that a payload produces the expected object ID.
    pub fn verify(&self, payload: &[u8], expected: &ObjectId) -> bool {
        self.hash(payload) == *expected
    }

    /// SHA-1 of bytes that are already in canonical encoded form.
    pub fn hash_encoded(encoded: &[u8]) -> ObjectId {
        ObjectId::from_hash(sha1_smol::Sha1::from(encoded).digest().bytes())
    }

    /// The kind tag used by this hasher.
    pub fn tag(&self) -> &'a str {
        self.tag
    }
}
