//! Wire codec for serialized extended keys (i.e. `xprv` and `xpub`)

use crate::hash::checksum;
use crate::{ChildNumber, Error, ExtendedKeyAttrs, PublicKeyBytes, Result, Version};
use log::trace;
use zeroize::{Zeroize, Zeroizing};

/// Serialized extended key: the fixed 78-byte layout
/// `version || depth || parent fingerprint || child number || chain code || key`,
/// all big-endian.
///
/// This type carries no validation of its own beyond framing; interpreting
/// `key_bytes` as private or public material is left to
/// [`ExtendedKey`](crate::ExtendedKey).
#[derive(Clone, Debug)]
pub struct SerializedKey {
    /// 4-byte version (a.k.a. prefix) of the key.
    pub version: Version,

    /// Extended key attributes.
    pub attrs: ExtendedKeyAttrs,

    /// Key material: `0x00 || scalar` or a compressed point.
    pub key_bytes: PublicKeyBytes,
}

impl SerializedKey {
    /// Size of an extended key when deserialized into bytes from Base58.
    pub const BYTE_SIZE: usize = 78;

    /// Size of the base58check checksum trailer.
    pub const CHECKSUM_SIZE: usize = 4;

    /// Layout as 78 raw bytes.
    pub fn to_bytes(&self) -> Zeroizing<[u8; Self::BYTE_SIZE]> {
        let mut bytes = Zeroizing::new([0u8; Self::BYTE_SIZE]);
        bytes[..4].copy_from_slice(&self.version.to_be_bytes());
        bytes[4] = self.attrs.depth;
        bytes[5..9].copy_from_slice(&self.attrs.parent_fingerprint);
        bytes[9..13].copy_from_slice(&self.attrs.child_number.to_bytes());
        bytes[13..45].copy_from_slice(&self.attrs.chain_code);
        bytes[45..78].copy_from_slice(&self.key_bytes);
        bytes
    }

    /// Splits 78 raw bytes into their fields.
    pub fn from_bytes(bytes: &[u8; Self::BYTE_SIZE]) -> Self {
        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[..4]);
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&bytes[5..9]);
        let mut child_number = [0u8; 4];
        child_number.copy_from_slice(&bytes[9..13]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&bytes[13..45]);
        let mut key_bytes = [0u8; 33];
        key_bytes.copy_from_slice(&bytes[45..78]);

        let attrs = ExtendedKeyAttrs {
            depth: bytes[4],
            parent_fingerprint,
            child_number: ChildNumber::from_bytes(child_number),
            chain_code,
        };

        SerializedKey { version: Version::from_be_bytes(version), attrs, key_bytes }
    }

    /// Base58check encoding of the 78-byte layout.
    pub fn to_base58(&self) -> Zeroizing<String> {
        let bytes = self.to_bytes();
        Zeroizing::new(bs58::encode(&bytes[..]).with_check().into_string())
    }

    /// Decodes a base58check string.
    ///
    /// The decoded payload must be exactly 82 bytes ([`Error::InvalidKeyLength`])
    /// and its trailing 4 bytes must match the double SHA-256 checksum of the
    /// leading 78 ([`Error::BadChecksum`]).
    pub fn from_base58(base58: &str) -> Result<Self> {
        let decoded = Zeroizing::new(bs58::decode(base58).into_vec()?);
        if decoded.len() != Self::BYTE_SIZE + Self::CHECKSUM_SIZE {
            return Err(Error::InvalidKeyLength(decoded.len()));
        }

        let (payload, expected) = decoded.split_at(Self::BYTE_SIZE);
        if checksum(payload) != expected {
            return Err(Error::BadChecksum);
        }

        let mut bytes = Zeroizing::new([0u8; Self::BYTE_SIZE]);
        bytes.copy_from_slice(payload);
        let key = Self::from_bytes(&bytes);
        trace!("decoded extended key with version {:#010x} at depth {}", key.version, key.attrs.depth);
        Ok(key)
    }
}

impl Drop for SerializedKey {
    fn drop(&mut self) {
        self.key_bytes.zeroize();
        self.attrs.chain_code.zeroize();
    }
}
