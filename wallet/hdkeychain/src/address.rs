//!
//! Pay-to-pubkey-hash addresses.
//!

use crate::hash::{checksum, hash160};
use crate::{Error, NetworkParams, PublicKeyBytes, Result};
use core::{
    fmt::{self, Display},
    str::FromStr,
};

/// Base58check address: a network version byte followed by the hash160 of a
/// compressed public key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Address {
    version: u8,
    hash: [u8; 20],
}

impl Address {
    const BYTE_SIZE: usize = 21;

    pub fn new(version: u8, hash: [u8; 20]) -> Self {
        Self { version, hash }
    }

    /// Address of a compressed public key on `network`.
    pub fn from_public_key(public_key: &PublicKeyBytes, network: &NetworkParams) -> Self {
        Self::new(network.pubkey_hash_addr_id, hash160(public_key))
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// The hash160 this address commits to.
    pub fn hash160(&self) -> &[u8; 20] {
        &self.hash
    }

    pub fn is_for_net(&self, network: &NetworkParams) -> bool {
        self.version == network.pubkey_hash_addr_id
    }

    pub fn encode(&self) -> String {
        let mut bytes = [0u8; Self::BYTE_SIZE];
        bytes[0] = self.version;
        bytes[1..].copy_from_slice(&self.hash);
        bs58::encode(bytes).with_check().into_string()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(address: &str) -> Result<Self> {
        let decoded = bs58::decode(address).into_vec()?;
        if decoded.len() != Self::BYTE_SIZE + 4 {
            return Err(Error::InvalidKeyLength(decoded.len()));
        }
        let (payload, expected) = decoded.split_at(Self::BYTE_SIZE);
        if checksum(payload) != expected {
            return Err(Error::BadChecksum);
        }

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        Ok(Self::new(payload[0], hash))
    }
}
