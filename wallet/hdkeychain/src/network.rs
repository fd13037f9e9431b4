//!
//! Network parameters and the registry mapping extended key versions to
//! `(network, kind)` pairs.
//!

use crate::{Error, Result, Version};
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Whether an extended key version denotes private or public key material.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Private,
    Public,
}

/// The private/public version pair of a single network.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct VersionPair {
    pub private: Version,
    pub public: Version,
}

impl VersionPair {
    pub fn get(&self, kind: KeyKind) -> Version {
        match kind {
            KeyKind::Private => self.private,
            KeyKind::Public => self.public,
        }
    }
}

/// Per-network prefixes used when serializing extended keys and addresses.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Human readable network name, unique within a registry.
    pub name: String,

    /// Version of serialized extended private keys.
    pub hd_private_key_id: Version,

    /// Version of serialized extended public keys.
    pub hd_public_key_id: Version,

    /// Version byte of pay-to-pubkey-hash addresses.
    pub pubkey_hash_addr_id: u8,
}

impl NetworkParams {
    pub fn new<S: Into<String>>(name: S, hd_private_key_id: Version, hd_public_key_id: Version, pubkey_hash_addr_id: u8) -> Self {
        Self { name: name.into(), hd_private_key_id, hd_public_key_id, pubkey_hash_addr_id }
    }

    /// Main network (`xprv` / `xpub`).
    pub fn mainnet() -> Self {
        Self::new("mainnet", 0x0488_ade4, 0x0488_b21e, 0x00)
    }

    /// Test network 3 (`tprv` / `tpub`).
    pub fn testnet() -> Self {
        Self::new("testnet", 0x0435_8394, 0x0435_87cf, 0x6f)
    }

    /// Simulation network (`sprv` / `spub`).
    pub fn simnet() -> Self {
        Self::new("simnet", 0x0420_b900, 0x0420_bd3a, 0x3f)
    }

    /// Version used for keys of the given kind on this network.
    pub fn version(&self, kind: KeyKind) -> Version {
        self.versions().get(kind)
    }

    pub fn versions(&self) -> VersionPair {
        VersionPair { private: self.hd_private_key_id, public: self.hd_public_key_id }
    }

    /// Kind denoted by `version` on this network, if any.
    pub fn kind_of(&self, version: Version) -> Option<KeyKind> {
        if version == self.hd_private_key_id {
            Some(KeyKind::Private)
        } else if version == self.hd_public_key_id {
            Some(KeyKind::Public)
        } else {
            None
        }
    }
}

/// Registry of known networks.
///
/// Each registered network contributes exactly one private and one public
/// version; no two entries may share a version or a name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NetworkRegistry {
    #[serde(rename = "network", default)]
    networks: Vec<NetworkParams>,
}

static DEFAULT_REGISTRY: Lazy<NetworkRegistry> = Lazy::new(NetworkRegistry::default);

impl NetworkRegistry {
    /// Creates a registry with no networks.
    pub fn empty() -> Self {
        Self { networks: Vec::new() }
    }

    /// Shared registry of the built-in networks.
    pub fn global() -> &'static NetworkRegistry {
        &DEFAULT_REGISTRY
    }

    /// Parses a registry from a TOML document containing `[[network]]` tables.
    ///
    /// ```toml
    /// [[network]]
    /// name = "mainnet"
    /// hd_private_key_id = 0x0488ade4
    /// hd_public_key_id = 0x0488b21e
    /// pubkey_hash_addr_id = 0
    /// ```
    pub fn from_toml_str(config: &str) -> Result<Self> {
        let parsed: NetworkRegistry = toml::from_str(config)?;
        let mut registry = Self::empty();
        registry.extend(parsed.networks)?;
        Ok(registry)
    }

    /// Adds a network, rejecting duplicate names and versions.
    pub fn register(&mut self, params: NetworkParams) -> Result<()> {
        if params.hd_private_key_id == params.hd_public_key_id {
            return Err(Error::DuplicateVersion(params.hd_private_key_id));
        }
        if self.by_name(&params.name).is_some() {
            return Err(Error::DuplicateNetwork(params.name));
        }
        for version in [params.hd_private_key_id, params.hd_public_key_id] {
            if self.lookup(version).is_ok() {
                return Err(Error::DuplicateVersion(version));
            }
        }

        debug!(
            "registering network `{}` (private {:#010x}, public {:#010x})",
            params.name, params.hd_private_key_id, params.hd_public_key_id
        );
        self.networks.push(params);
        Ok(())
    }

    /// Registers every network yielded by `networks`.
    pub fn extend<I>(&mut self, networks: I) -> Result<()>
    where
        I: IntoIterator<Item = NetworkParams>,
    {
        networks.into_iter().try_for_each(|params| self.register(params))
    }

    /// Finds a network by name.
    pub fn by_name(&self, name: &str) -> Option<&NetworkParams> {
        self.networks.iter().find(|params| params.name == name)
    }

    /// Resolves a version to the network and key kind it denotes.
    pub fn lookup(&self, version: Version) -> Result<(&NetworkParams, KeyKind)> {
        self.networks
            .iter()
            .find_map(|params| params.kind_of(version).map(|kind| (params, kind)))
            .ok_or(Error::UnknownVersion(version))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkParams> + '_ {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self { networks: vec![NetworkParams::mainnet(), NetworkParams::testnet(), NetworkParams::simnet()] }
    }
}
