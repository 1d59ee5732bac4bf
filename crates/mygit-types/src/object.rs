use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a raw object address in bytes.
pub const RAW_LEN: usize = 20;

/// Length of a hex-encoded object address.
pub const HEX_LEN: usize = RAW_LEN * 2;

/// Content-addressed identifier for any stored object.
///
/// An `ObjectId` is the SHA-1 digest of an object's canonical encoding
/// (`<kind> <size>\0<payload>`). Identical encodings always produce the same
/// `ObjectId`, which is what makes loose objects deduplicatable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; RAW_LEN]);

impl ObjectId {
    /// Create an `ObjectId` from a pre-computed digest.
    pub const fn from_hash(hash: [u8; RAW_LEN]) -> Self {
        Self(hash)
    }

    /// Create an `ObjectId` from a raw byte slice, as found inside tree entries.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; RAW_LEN] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: RAW_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// The null object ID (all zeros).
    pub const fn null() -> Self {
        Self([0u8; RAW_LEN])
    }

    /// Returns `true` if this is the null object ID.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; RAW_LEN]
    }

    /// The raw 20-byte digest.
    pub fn as_bytes(&self) -> &[u8; RAW_LEN] {
        &self.0
    }

    /// Hex-encoded string representation (40 lowercase characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 7 characters).
    pub fn short_hex(&self) -> String {
        let mut s = self.to_hex();
        s.truncate(7);
        s
    }

    /// Split the hex form into the fan-out directory name and the file name.
    pub fn fanout(&self) -> (String, String) {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);
        (dir.to_string(), file.to_string())
    }

    /// Returns `true` if the hex form of this ID begins with `prefix`.
    ///
    /// Comparison is case-insensitive.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let hex = self.to_hex();
        prefix.len() <= hex.len() && hex[..prefix.len()].eq_ignore_ascii_case(prefix)
    }

    /// Parse from a 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: HEX_LEN,
                actual: s.len(),
            });
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_raw(&bytes)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; RAW_LEN]> for ObjectId {
    fn from(bytes: [u8; RAW_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<ObjectId> for [u8; RAW_LEN] {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HELLO: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    #[test]
    fn null_is_all_zeros() {
        let null = ObjectId::null();
        assert!(null.is_null());
        assert_eq!(null.as_bytes(), &[0u8; RAW_LEN]);
    }

    #[test]
    fn parse_known_hex() {
        let id = ObjectId::from_hex(HELLO).unwrap();
        assert_eq!(id.as_bytes()[0], 0xce);
        assert_eq!(id.as_bytes()[19], 0x4a);
        assert_eq!(id.to_hex(), HELLO);
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let id = ObjectId::from_hex(&HELLO.to_uppercase()).unwrap();
        assert_eq!(id.to_hex(), HELLO);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = ObjectId::from_hex(&HELLO[..39]).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 40,
                actual: 39
            }
        );
    }

    #[test]
    fn non_hex_is_rejected() {
        let bad = "zz013625030ba8dba906f756967f9e9ca394464a";
        assert!(matches!(
            ObjectId::from_hex(bad),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(ObjectId::from_raw(&[0u8; 20]).is_ok());
        assert_eq!(
            ObjectId::from_raw(&[0u8; 19]).unwrap_err(),
            TypeError::InvalidLength {
                expected: 20,
                actual: 19
            }
        );
    }

    #[test]
    fn fanout_splits_two_and_thirty_eight() {
        let id = ObjectId::from_hex(HELLO).unwrap();
        let (dir, file) = id.fanout();
        assert_eq!(dir, "ce");
        assert_eq!(file.len(), 38);
        assert_eq!(format!("{dir}{file}"), HELLO);
    }

    #[test]
    fn prefix_matching() {
        let id = ObjectId::from_hex(HELLO).unwrap();
        assert!(id.matches_prefix("ce01"));
        assert!(id.matches_prefix("CE0136"));
        assert!(id.matches_prefix(HELLO));
        assert!(!id.matches_prefix("ce02"));
    }

    #[test]
    fn short_hex_is_7_chars() {
        let id = ObjectId::from_hex(HELLO).unwrap();
        assert_eq!(id.short_hex(), "ce01362");
        assert_eq!(format!("{id:?}"), "ObjectId(ce01362)");
    }

    #[test]
    fn display_is_full_hex() {
        let id = ObjectId::from_hex(HELLO).unwrap();
        assert_eq!(format!("{id}"), HELLO);
        assert_eq!(HELLO.parse::<ObjectId>().unwrap(), id);
    }

    #[test]
    fn serde_roundtrip() {
        let id = ObjectId::from_hex(HELLO).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn ordering_is_consistent() {
        let id1 = ObjectId::from_hash([0; RAW_LEN]);
        let id2 = ObjectId::from_hash([1; RAW_LEN]);
        assert!(id1 < id2);
    }

    proptest! {
        #[test]
        fn hex_roundtrip(bytes in proptest::array::uniform20(any::<u8>())) {
            let id = ObjectId::from_hash(bytes);
            prop_assert_eq!(ObjectId::from_hex(&id.to_hex()).unwrap(), id);
        }
    }
}
