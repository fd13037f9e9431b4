//!
//! Error types emitted by extended key creation, derivation and encoding.
//!

use crate::curve::CurveError;
use crate::types::Version;
use thiserror::Error;

/// [`Error`](enum@Error) variants emitted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("seed length must be between 128 and 512 bits (got {0} bytes)")]
    InvalidSeedLength(usize),

    #[error("derived scalar is zero or not less than the curve order")]
    InvalidDerivedScalar,

    #[error("the extended key at this index is invalid")]
    InvalidChild,

    #[error("cannot derive a hardened key from a public key")]
    DeriveHardenedFromPublic,

    #[error("the provided serialized extended key length is invalid ({0} bytes)")]
    InvalidKeyLength(usize),

    #[error("bad extended key checksum")]
    BadChecksum,

    #[error("unknown hd key version {0:#010x}")]
    UnknownVersion(Version),

    #[error("zeroed extended key")]
    ZeroedKey,

    #[error("public key is empty")]
    EmptyPublicKey,

    #[error("unable to create private keys from a public extended key")]
    NotPrivateKey,

    #[error("invalid public key (not a point on the curve)")]
    InvalidPublicKey,

    #[error("invalid private key material")]
    InvalidPrivateKey,

    #[error("base58 -> {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("invalid child number `{0}`")]
    InvalidChildNumber(String),

    #[error("invalid derivation path `{0}`")]
    InvalidDerivationPath(String),

    #[error("network `{0}` is already registered")]
    DuplicateNetwork(String),

    #[error("hd key version {0:#010x} is already registered")]
    DuplicateVersion(Version),

    #[error("network configuration -> {0}")]
    Config(String),

    #[error("entropy source -> {0}")]
    Entropy(String),

    #[error("HMAC -> {0}")]
    Hmac(String),
}

impl From<CurveError> for Error {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::InvalidScalar => Error::InvalidDerivedScalar,
            CurveError::ZeroScalar | CurveError::PointAtInfinity => Error::InvalidChild,
            CurveError::InvalidPoint => Error::InvalidPublicKey,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<rand::Error> for Error {
    fn from(err: rand::Error) -> Self {
        Self::Entropy(err.to_string())
    }
}

impl From<hmac::digest::InvalidLength> for Error {
    fn from(err: hmac::digest::InvalidLength) -> Self {
        Self::Hmac(err.to_string())
    }
}
