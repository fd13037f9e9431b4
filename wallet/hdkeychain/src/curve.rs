//!
//! Elliptic curve adapter used by child key derivation.
//!
//! Derivation only ever needs a handful of group operations on serialized
//! values: modular scalar addition, scalar validity, scalar multiplication of
//! the generator and point addition. [`Curve`] exposes exactly those, which
//! keeps the CKD branching logic independent of the backend. [`Secp256k1`] is
//! the production backend built on the `secp256k1` crate.
//!

use crate::types::{PrivateKeyBytes, PublicKeyBytes};
use secp256k1::{PublicKey, Scalar, SecretKey};
use thiserror::Error;

/// Failures raised by [`Curve`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveError {
    /// Scalar is zero or not less than the group order.
    #[error("scalar is zero or out of range")]
    InvalidScalar,

    /// Sum of two scalars reduced to zero modulo the group order.
    #[error("scalar sum is zero")]
    ZeroScalar,

    /// Bytes do not encode a point on the curve.
    #[error("invalid curve point")]
    InvalidPoint,

    /// Point addition produced the point at infinity.
    #[error("point at infinity")]
    PointAtInfinity,
}

/// Group operations required by BIP32 child key derivation.
///
/// Every method is pure; implementations must not hold mutable state.
pub trait Curve {
    /// Returns `true` when `0 < scalar < n`.
    fn is_valid_scalar(&self, scalar: &PrivateKeyBytes) -> bool;

    /// Computes `(tweak + scalar) mod n`.
    ///
    /// `tweak` must satisfy `0 < tweak < n` and `scalar` must be a valid
    /// private scalar, else [`CurveError::InvalidScalar`]. A zero sum yields
    /// [`CurveError::ZeroScalar`].
    fn add_scalars(&self, tweak: &PrivateKeyBytes, scalar: &PrivateKeyBytes) -> Result<PrivateKeyBytes, CurveError>;

    /// Multiplies the generator by `scalar` and returns the compressed point.
    fn public_key(&self, scalar: &PrivateKeyBytes) -> Result<PublicKeyBytes, CurveError>;

    /// Adds two compressed points.
    fn add_points(&self, lhs: &PublicKeyBytes, rhs: &PublicKeyBytes) -> Result<PublicKeyBytes, CurveError>;

    /// Checks that `point` is a valid compressed encoding of a curve point.
    fn validate_point(&self, point: &PublicKeyBytes) -> Result<(), CurveError>;
}

/// secp256k1 backend using the library's global context.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1;

impl Secp256k1 {
    fn secret_key(scalar: &PrivateKeyBytes) -> Result<SecretKey, CurveError> {
        SecretKey::from_slice(scalar).map_err(|_| CurveError::InvalidScalar)
    }

    fn point(point: &PublicKeyBytes) -> Result<PublicKey, CurveError> {
        PublicKey::from_slice(point).map_err(|_| CurveError::InvalidPoint)
    }
}

impl Curve for Secp256k1 {
    fn is_valid_scalar(&self, scalar: &PrivateKeyBytes) -> bool {
        Self::secret_key(scalar).is_ok()
    }

    fn add_scalars(&self, tweak: &PrivateKeyBytes, scalar: &PrivateKeyBytes) -> Result<PrivateKeyBytes, CurveError> {
        if !self.is_valid_scalar(tweak) {
            return Err(CurveError::InvalidScalar);
        }
        let tweak = Scalar::from_be_bytes(*tweak).map_err(|_| CurveError::InvalidScalar)?;
        let secret_key = Self::secret_key(scalar)?;
        let sum = secret_key.add_tweak(&tweak).map_err(|_| CurveError::ZeroScalar)?;
        Ok(sum.secret_bytes())
    }

    fn public_key(&self, scalar: &PrivateKeyBytes) -> Result<PublicKeyBytes, CurveError> {
        let secret_key = Self::secret_key(scalar)?;
        Ok(PublicKey::from_secret_key_global(&secret_key).serialize())
    }

    fn add_points(&self, lhs: &PublicKeyBytes, rhs: &PublicKeyBytes) -> Result<PublicKeyBytes, CurveError> {
        let sum = Self::point(lhs)?.combine(&Self::point(rhs)?).map_err(|_| CurveError::PointAtInfinity)?;
        Ok(sum.serialize())
    }

    fn validate_point(&self, point: &PublicKeyBytes) -> Result<(), CurveError> {
        Self::point(point).map(|_| ())
    }
}
