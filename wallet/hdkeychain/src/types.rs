use hmac::Hmac;
use sha2::Sha512;

/// Size of a private scalar or chain code in bytes.
pub const KEY_SIZE: usize = 32;

/// Chain code: extension for both private and public keys which provides an
/// additional 256-bits of entropy.
pub type ChainCode = [u8; KEY_SIZE];

/// Derivation depth.
pub type Depth = u8;

/// Key fingerprint: first 4 bytes of the hash160 of a compressed public key.
pub type KeyFingerprint = [u8; 4];

/// Serialized private scalar.
pub type PrivateKeyBytes = [u8; KEY_SIZE];

/// Serialized compressed public key (SEC1 tag byte followed by the x coordinate).
pub type PublicKeyBytes = [u8; KEY_SIZE + 1];

/// 4-byte extended key version (a.k.a. prefix), stored big-endian on the wire.
pub type Version = u32;

/// HMAC with SHA-512
pub type HmacSha512 = Hmac<Sha512>;
