//!
//! BIP32 hierarchical deterministic key chains.
//!
//! [`ExtendedKey`] derives private and public child keys from a master seed,
//! serializes them in the base58check `xprv` / `xpub` format and retargets
//! them between the networks known to a [`NetworkRegistry`].
//!
//! ```
//! use hdkeychain::{generate_seed, ExtendedKey, NetworkParams, RECOMMENDED_SEED_LEN};
//!
//! let seed = generate_seed(RECOMMENDED_SEED_LEN)?;
//! let master = ExtendedKey::new_master(&seed, &NetworkParams::mainnet())?;
//! let account = master.derive_path(&"m/44'/0'/0'".parse()?)?;
//! let xpub = account.neuter()?;
//! assert!(xpub.encode()?.starts_with("xpub"));
//! # Ok::<(), hdkeychain::Error>(())
//! ```
//!

mod address;
mod attrs;
mod child_number;
pub mod curve;
mod derivation_path;
mod error;
mod extended_key;
mod hash;
mod network;
mod result;
mod seed;
pub mod types;
mod xkey;

pub use address::Address;
pub use attrs::ExtendedKeyAttrs;
pub use child_number::ChildNumber;
pub use curve::{Curve, CurveError, Secp256k1};
pub use derivation_path::DerivationPath;
pub use error::Error;
pub use extended_key::ExtendedKey;
pub use hash::hash160;
pub use network::{KeyKind, NetworkParams, NetworkRegistry, VersionPair};
pub use result::Result;
pub use seed::{generate_seed, Seed, MAX_SEED_LEN, MIN_SEED_LEN, RECOMMENDED_SEED_LEN};
pub use types::*;
pub use xkey::SerializedKey;

pub use secp256k1;

/// First hardened child index (2^31).
pub const HARDENED_KEY_START: u32 = ChildNumber::HARDENED_FLAG;
