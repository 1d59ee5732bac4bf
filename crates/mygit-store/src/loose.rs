use std::fs;
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use mygit_types::{ObjectId, HEX_LEN};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::object::{self, Object, ObjectKind};
use crate::tree::Tree;

/// Shortest abbreviated address accepted by [`LooseObjectStore::resolve`].
pub const MIN_PREFIX_LEN: usize = 4;

/// Filesystem store of individually compressed objects.
///
/// Layout: `<root>/<first 2 hex chars>/<remaining 38 hex chars>`, each file
/// holding the zlib-compressed canonical encoding of one object. The root
/// directory must already exist; it is created by repository bootstrap.
#[derive(Clone, Debug)]
pub struct LooseObjectStore {
    root: PathBuf,
    config: StoreConfig,
}

impl LooseObjectStore {
    /// Create a store over an existing objects directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, StoreConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: StoreConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// The objects directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the file holding `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.fanout();
        self.root.join(dir).join(file)
    }

    /// Returns `true` if a file exists for `id`.
    pub fn exists(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Encode, hash, compress and persist a payload. Returns its address.
    pub fn put(&self, kind: ObjectKind, payload: &[u8]) -> StoreResult<ObjectId> {
        kind.validate()?;
        let encoded = object::encode(&kind, payload);
        let id = mygit_crypto::ContentHasher::hash_encoded(&encoded);
        let path = self.object_path(&id);

        if self.config.skip_existing && path.is_file() {
            debug!(%id, %kind, "object already present");
            return Ok(id);
        }

        let compressed = self.compress(&encoded)?;
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::InvalidAddress(path.display().to_string()))?;
        ensure_dir(dir)?;

        // Stage next to the destination so the rename stays on one filesystem.
        let mut staged = tempfile::Builder::new()
            .prefix(".tmp-obj-")
            .tempfile_in(dir)?;
        staged.write_all(&compressed)?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|e| e.error)?;

        debug!(
            %id,
            %kind,
            size = payload.len(),
            compressed = compressed.len(),
            "object written"
        );
        Ok(id)
    }

    /// Store an already-built [`Object`].
    pub fn put_object(&self, obj: &Object) -> StoreResult<ObjectId> {
        self.put(obj.kind.clone(), &obj.data)
    }

    /// Read the decompressed canonical encoding of `id`.
    pub fn read_raw(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_hex()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut encoded = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut encoded)
            .map_err(|e| StoreError::MalformedObject(format!("{id}: zlib stream: {e}")))?;
        Ok(encoded)
    }

    /// Read and decode `id`.
    ///
    /// The declared size is checked against the payload; a mismatch is a
    /// malformed object.
    pub fn get(&self, id: &ObjectId) -> StoreResult<Object> {
        let encoded = self.read_raw(id)?;
        let obj = object::decode(&encoded).map_err(|e| with_id(e, id))?;
        obj.verify_size().map_err(|e| with_id(e, id))?;
        debug!(%id, kind = %obj.kind, size = obj.size, "object read");
        Ok(obj)
    }

    /// Read `id` and require it to be of `kind`.
    pub fn get_kind(&self, id: &ObjectId, kind: ObjectKind) -> StoreResult<Object> {
        let obj = self.get(id)?;
        if obj.kind != kind {
            return Err(StoreError::UnexpectedKind {
                id: *id,
                expected: kind,
                actual: obj.kind,
            });
        }
        Ok(obj)
    }

    /// Read and decode a tree object.
    pub fn read_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        let obj = self.get_kind(id, ObjectKind::Tree)?;
        Tree::from_payload(&obj.data).map_err(|e| with_id(e, id))
    }

    /// Turn a full or abbreviated hex address into an [`ObjectId`].
    ///
    /// A full 40-character address is parsed without touching the disk. A
    /// shorter one is matched against the fan-out directory and must
    /// identify exactly one object.
    pub fn resolve(&self, address: &str) -> StoreResult<ObjectId> {
        let address = address.trim();
        if address.len() == HEX_LEN {
            return Ok(ObjectId::from_hex(address)?);
        }
        if address.len() < MIN_PREFIX_LEN || address.len() > HEX_LEN {
            return Err(StoreError::InvalidAddress(format!(
                "{address:?}: expected {MIN_PREFIX_LEN} to {HEX_LEN} hex characters"
            )));
        }
        if !address.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StoreError::InvalidAddress(format!("{address:?}: not hex")));
        }

        let prefix = address.to_ascii_lowercase();
        let dir_name = &prefix[..2];
        let dir = self.root.join(dir_name);

        let listing = match fs::read_dir(&dir) {
            Ok(listing) => listing,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(prefix));
            }
            Err(e) => return Err(e.into()),
        };

        let mut candidates = Vec::new();
        for entry in listing {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.len() != HEX_LEN - 2 {
                continue;
            }
            match ObjectId::from_hex(&format!("{dir_name}{name}")) {
                Ok(id) if id.matches_prefix(&prefix) => candidates.push(id),
                _ => {}
            }
        }
        candidates.sort();

        debug!(%prefix, matches = candidates.len(), "resolved object prefix");
        match candidates.len() {
            0 => Err(StoreError::NotFound(prefix)),
            1 => Ok(candidates[0]),
            _ => Err(StoreError::AmbiguousPrefix { prefix, candidates }),
        }
    }

    fn compress(&self, encoded: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.config.compression());
        encoder.write_all(encoded)?;
        encoder.finish()
    }
}

/// Create a fan-out directory, tolerating a concurrent creator.
fn ensure_dir(dir: &Path) -> io::Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

fn with_id(err: StoreError, id: &ObjectId) -> StoreError {
    match err {
        StoreError::MalformedObject(reason) => StoreError::MalformedObject(format!("{id}: {reason}")),
        other => other,
    }
}
