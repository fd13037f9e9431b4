//!
//! Hierarchical deterministic extended keys.
//!
//! An [`ExtendedKey`] holds either a private scalar or a public point
//! together with the chain code and the position attributes needed to
//! derive children (BIP32 `CKDpriv` / `CKDpub`) and to serialize the key
//! in the 78-byte base58check format.
//!
//! Derivation never mutates the parent. Every fallible operation returns a
//! typed [`Error`] and leaves the receiver untouched.
//!

use crate::curve::{Curve, Secp256k1};
use crate::hash::hash160;
use crate::network::{KeyKind, NetworkParams, NetworkRegistry, VersionPair};
use crate::seed::check_len;
use crate::xkey::SerializedKey;
use crate::{
    Address, ChainCode, ChildNumber, DerivationPath, Depth, Error, ExtendedKeyAttrs, HmacSha512, KeyFingerprint, PrivateKeyBytes,
    PublicKeyBytes, Result, Version, KEY_SIZE,
};
use core::{fmt, str::FromStr};
use hmac::Mac;
use log::trace;
use once_cell::sync::OnceCell;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

/// HMAC key used to derive the master key from a seed.
const MASTER_KEY_DOMAIN: &[u8] = b"Bitcoin seed";

#[derive(Clone)]
enum KeyMaterial {
    Private {
        secret: PrivateKeyBytes,
        /// Compressed public key, computed on first use.
        public_key: OnceCell<PublicKeyBytes>,
    },
    Public {
        point: PublicKeyBytes,
    },
    Zeroed,
}

impl KeyMaterial {
    fn private(secret: PrivateKeyBytes) -> Self {
        KeyMaterial::Private { secret, public_key: OnceCell::new() }
    }

    fn kind(&self) -> Option<KeyKind> {
        match self {
            KeyMaterial::Private { .. } => Some(KeyKind::Private),
            KeyMaterial::Public { .. } => Some(KeyKind::Public),
            KeyMaterial::Zeroed => None,
        }
    }

    /// 33-byte wire form: `0x00 || scalar` or the compressed point.
    fn key_bytes(&self) -> Zeroizing<PublicKeyBytes> {
        let mut bytes = Zeroizing::new([0u8; KEY_SIZE + 1]);
        match self {
            KeyMaterial::Private { secret, .. } => bytes[1..].copy_from_slice(secret),
            KeyMaterial::Public { point } => bytes.copy_from_slice(point),
            KeyMaterial::Zeroed => {}
        }
        bytes
    }
}

impl Zeroize for KeyMaterial {
    fn zeroize(&mut self) {
        match self {
            KeyMaterial::Private { secret, public_key } => {
                secret.zeroize();
                if let Some(public_key) = public_key.get_mut() {
                    public_key.zeroize();
                }
            }
            KeyMaterial::Public { point } => point.zeroize(),
            KeyMaterial::Zeroed => {}
        }
        *self = KeyMaterial::Zeroed;
    }
}

/// BIP32 extended key: private or public key material plus chain code,
/// depth, parent fingerprint, child number and network version.
///
/// Keys are created from a seed with [`ExtendedKey::new_master`] or parsed
/// from their base58check form with [`ExtendedKey::decode`] (or [`FromStr`],
/// which consults [`NetworkRegistry::global`]).
#[derive(Clone)]
pub struct ExtendedKey {
    versions: VersionPair,
    attrs: ExtendedKeyAttrs,
    material: KeyMaterial,
}

impl ExtendedKey {
    /// Derives the master key of `network` from `seed`.
    ///
    /// The seed must be between 16 and 64 bytes long. Fails with
    /// [`Error::InvalidDerivedScalar`] for the astronomically rare seed whose
    /// HMAC output is not a valid scalar; callers should use another seed.
    pub fn new_master<S: AsRef<[u8]>>(seed: S, network: &NetworkParams) -> Result<Self> {
        Self::new_master_with(&Secp256k1, seed, network)
    }

    /// [`ExtendedKey::new_master`] on an explicit curve backend.
    pub fn new_master_with<C: Curve, S: AsRef<[u8]>>(curve: &C, seed: S, network: &NetworkParams) -> Result<Self> {
        let seed = seed.as_ref();
        check_len(seed.len())?;

        let mut hmac = HmacSha512::new_from_slice(MASTER_KEY_DOMAIN)?;
        hmac.update(seed);
        let (secret, chain_code) = split_hmac(hmac);

        if !curve.is_valid_scalar(&secret) {
            return Err(Error::InvalidDerivedScalar);
        }

        trace!("created master key for network `{}`", network.name);
        Ok(Self {
            versions: network.versions(),
            attrs: ExtendedKeyAttrs { chain_code, ..Default::default() },
            material: KeyMaterial::private(*secret),
        })
    }

    /// Parses a base58check extended key, resolving its version against
    /// `registry`.
    ///
    /// Errors are reported in order: [`Error::Base58`],
    /// [`Error::InvalidKeyLength`], [`Error::BadChecksum`],
    /// [`Error::UnknownVersion`], then [`Error::InvalidPrivateKey`] or
    /// [`Error::InvalidPublicKey`] for key material that does not match the
    /// version.
    pub fn decode(encoded: &str, registry: &NetworkRegistry) -> Result<Self> {
        Self::decode_with(&Secp256k1, encoded, registry)
    }

    /// [`ExtendedKey::decode`] on an explicit curve backend.
    pub fn decode_with<C: Curve>(curve: &C, encoded: &str, registry: &NetworkRegistry) -> Result<Self> {
        let serialized = SerializedKey::from_base58(encoded)?;
        let (network, kind) = registry.lookup(serialized.version)?;

        let material = match kind {
            KeyKind::Private => {
                if serialized.key_bytes[0] != 0 {
                    return Err(Error::InvalidPrivateKey);
                }
                let mut secret = [0u8; KEY_SIZE];
                secret.copy_from_slice(&serialized.key_bytes[1..]);
                if !curve.is_valid_scalar(&secret) {
                    secret.zeroize();
                    return Err(Error::InvalidPrivateKey);
                }
                KeyMaterial::private(secret)
            }
            KeyKind::Public => {
                curve.validate_point(&serialized.key_bytes).map_err(|_| Error::InvalidPublicKey)?;
                KeyMaterial::Public { point: serialized.key_bytes }
            }
        };

        Ok(Self { versions: network.versions(), attrs: serialized.attrs.clone(), material })
    }

    /// Serializes this key as base58check.
    pub fn encode(&self) -> Result<Zeroizing<String>> {
        if self.is_zeroed() {
            return Err(Error::ZeroedKey);
        }
        Ok(self.to_serialized().to_base58())
    }

    fn to_serialized(&self) -> SerializedKey {
        SerializedKey { version: self.version(), attrs: self.attrs.clone(), key_bytes: *self.material.key_bytes() }
    }

    /// Derives the child at `child_number`.
    ///
    /// Private parents yield private children for any index. Public parents
    /// yield public children for normal indices and fail with
    /// [`Error::DeriveHardenedFromPublic`] for hardened ones. An index whose
    /// derivation is invalid fails with [`Error::InvalidDerivedScalar`] or
    /// [`Error::InvalidChild`]; callers should move on to the next index.
    pub fn derive_child(&self, child_number: impl Into<ChildNumber>) -> Result<Self> {
        self.derive_child_with(&Secp256k1, child_number)
    }

    /// [`ExtendedKey::derive_child`] on an explicit curve backend.
    pub fn derive_child_with<C: Curve>(&self, curve: &C, child_number: impl Into<ChildNumber>) -> Result<Self> {
        let child_number = child_number.into();
        let hardened = child_number.is_hardened();

        match &self.material {
            KeyMaterial::Zeroed => return Err(Error::ZeroedKey),
            KeyMaterial::Public { .. } if hardened => return Err(Error::DeriveHardenedFromPublic),
            _ => {}
        }
        // the 1-byte depth field wraps past 255
        let depth = self.attrs.depth.wrapping_add(1);
        let parent_public_key = self.public_key_bytes_with(curve)?;

        let mut hmac = HmacSha512::new_from_slice(&self.attrs.chain_code)?;
        match &self.material {
            KeyMaterial::Private { secret, .. } if hardened => {
                hmac.update(&[0]);
                hmac.update(secret);
            }
            _ => hmac.update(&parent_public_key),
        }
        hmac.update(&child_number.to_bytes());
        let (tweak, chain_code) = split_hmac(hmac);

        if !curve.is_valid_scalar(&tweak) {
            return Err(Error::InvalidDerivedScalar);
        }

        let material = match &self.material {
            KeyMaterial::Private { secret, .. } => KeyMaterial::private(curve.add_scalars(&tweak, secret)?),
            KeyMaterial::Public { point } => KeyMaterial::Public { point: curve.add_points(&curve.public_key(&tweak)?, point)? },
            KeyMaterial::Zeroed => return Err(Error::ZeroedKey),
        };

        trace!("derived child {child_number} at depth {depth}");
        Ok(Self {
            versions: self.versions,
            attrs: ExtendedKeyAttrs { depth, parent_fingerprint: fingerprint_of(&parent_public_key), child_number, chain_code },
            material,
        })
    }

    /// Derives every child along `path`, starting from this key.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.iter().try_fold(self.clone(), |key, child_number| key.derive_child(child_number))
    }

    /// Public counterpart of this key. Neutering a public key returns an
    /// identical copy.
    pub fn neuter(&self) -> Result<Self> {
        self.neuter_with(&Secp256k1)
    }

    /// [`ExtendedKey::neuter`] on an explicit curve backend.
    pub fn neuter_with<C: Curve>(&self, curve: &C) -> Result<Self> {
        match &self.material {
            KeyMaterial::Zeroed => Err(Error::ZeroedKey),
            KeyMaterial::Public { .. } => Ok(self.clone()),
            KeyMaterial::Private { .. } => Ok(Self {
                versions: self.versions,
                attrs: self.attrs.clone(),
                material: KeyMaterial::Public { point: self.public_key_bytes_with(curve)? },
            }),
        }
    }

    /// Returns `true` when this key's version belongs to `network`.
    pub fn is_for_net(&self, network: &NetworkParams) -> bool {
        network.kind_of(self.version()).is_some()
    }

    /// Rewrites the version to `network`'s version of the same kind. Nothing
    /// else changes. A zeroed key stays unversioned.
    pub fn set_net(&mut self, network: &NetworkParams) {
        if self.is_zeroed() {
            return;
        }
        self.versions = network.versions();
    }

    /// 4-byte serialization version.
    pub fn version(&self) -> Version {
        self.versions.get(self.material.kind().unwrap_or(KeyKind::Public))
    }

    pub fn depth(&self) -> Depth {
        self.attrs.depth
    }

    pub fn parent_fingerprint(&self) -> KeyFingerprint {
        self.attrs.parent_fingerprint
    }

    pub fn child_number(&self) -> ChildNumber {
        self.attrs.child_number
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.attrs.chain_code
    }

    pub fn attrs(&self) -> &ExtendedKeyAttrs {
        &self.attrs
    }

    pub fn is_private(&self) -> bool {
        matches!(self.material, KeyMaterial::Private { .. })
    }

    pub fn is_zeroed(&self) -> bool {
        matches!(self.material, KeyMaterial::Zeroed)
    }

    /// Compressed public key; computed once and cached for private keys.
    pub fn public_key_bytes(&self) -> Result<PublicKeyBytes> {
        self.public_key_bytes_with(&Secp256k1)
    }

    fn public_key_bytes_with<C: Curve>(&self, curve: &C) -> Result<PublicKeyBytes> {
        match &self.material {
            KeyMaterial::Private { secret, public_key } => Ok(*public_key.get_or_try_init(|| curve.public_key(secret))?),
            KeyMaterial::Public { point } => {
                curve.validate_point(point)?;
                Ok(*point)
            }
            KeyMaterial::Zeroed => Err(Error::EmptyPublicKey),
        }
    }

    /// First 4 bytes of the hash160 of the compressed public key.
    pub fn fingerprint(&self) -> Result<KeyFingerprint> {
        Ok(fingerprint_of(&self.public_key_bytes()?))
    }

    pub fn ec_public_key(&self) -> Result<secp256k1::PublicKey> {
        secp256k1::PublicKey::from_slice(&self.public_key_bytes()?).map_err(|_| Error::InvalidPublicKey)
    }

    pub fn ec_private_key(&self) -> Result<secp256k1::SecretKey> {
        match &self.material {
            KeyMaterial::Private { secret, .. } => secp256k1::SecretKey::from_slice(secret).map_err(|_| Error::InvalidPrivateKey),
            KeyMaterial::Public { .. } => Err(Error::NotPrivateKey),
            KeyMaterial::Zeroed => Err(Error::ZeroedKey),
        }
    }

    /// Pay-to-pubkey-hash address of this key on `network`.
    pub fn address(&self, network: &NetworkParams) -> Result<Address> {
        Ok(Address::from_public_key(&self.public_key_bytes()?, network))
    }

    /// Wipes all key material and attributes. Afterwards the key is only
    /// good for dropping: serialization and derivation fail with
    /// [`Error::ZeroedKey`], public key accessors with [`Error::EmptyPublicKey`].
    pub fn zero(&mut self) {
        self.material.zeroize();
        self.attrs.zeroize();
        self.versions = VersionPair::default();
    }
}

fn fingerprint_of(public_key: &PublicKeyBytes) -> KeyFingerprint {
    let mut fingerprint = KeyFingerprint::default();
    fingerprint.copy_from_slice(&hash160(public_key)[..4]);
    fingerprint
}

/// Splits the HMAC-SHA512 output into its left (scalar) and right (chain code) halves.
fn split_hmac(hmac: HmacSha512) -> (Zeroizing<PrivateKeyBytes>, ChainCode) {
    let mut output = hmac.finalize().into_bytes();
    let mut left = Zeroizing::new([0u8; KEY_SIZE]);
    let mut right = [0u8; KEY_SIZE];
    left.copy_from_slice(&output[..KEY_SIZE]);
    right.copy_from_slice(&output[KEY_SIZE..]);
    output.as_mut_slice().zeroize();
    (left, right)
}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        self.material.zeroize();
        self.attrs.chain_code.zeroize();
    }
}

impl ConstantTimeEq for ExtendedKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        let kind = |key: &Self| key.material.kind().map(|kind| kind as u8 + 1).unwrap_or(0);
        let mut res = 1u8;
        res &= self.version().ct_eq(&other.version()).unwrap_u8();
        res &= kind(self).ct_eq(&kind(other)).unwrap_u8();
        res &= self.attrs.depth.ct_eq(&other.attrs.depth).unwrap_u8();
        res &= self.attrs.parent_fingerprint[..].ct_eq(&other.attrs.parent_fingerprint[..]).unwrap_u8();
        res &= self.attrs.child_number.0.ct_eq(&other.attrs.child_number.0).unwrap_u8();
        res &= self.attrs.chain_code[..].ct_eq(&other.attrs.chain_code[..]).unwrap_u8();
        res &= self.material.key_bytes()[..].ct_eq(&other.material.key_bytes()[..]).unwrap_u8();
        res.into()
    }
}

impl PartialEq for ExtendedKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ExtendedKey {}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ExtendedKey");
        debug.field("version", &format_args!("{:#010x}", self.version())).field("attrs", &self.attrs);
        match &self.material {
            KeyMaterial::Private { .. } => debug.field("private_key", &"..."),
            KeyMaterial::Public { point } => debug.field("public_key", point),
            KeyMaterial::Zeroed => debug.field("zeroed", &true),
        };
        debug.finish()
    }
}

impl FromStr for ExtendedKey {
    type Err = Error;

    fn from_str(encoded: &str) -> Result<Self> {
        Self::decode(encoded, NetworkRegistry::global())
    }
}

impl Serialize for ExtendedKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for ExtendedKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<ExtendedKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ExtendedKeyVisitor;
        impl<'de> de::Visitor<'de> for ExtendedKeyVisitor {
            type Value = ExtendedKey;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a base58check encoded extended key")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                ExtendedKey::from_str(value).map_err(|err| de::Error::custom(err.to_string()))
            }
        }

        deserializer.deserialize_str(ExtendedKeyVisitor)
    }
}
