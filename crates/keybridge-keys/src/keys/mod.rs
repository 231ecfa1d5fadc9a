//! Typed key representations and their structural parsers.

pub(crate) mod dh;
pub use dh::DhParameters;
pub(crate) mod dsa;
pub use dsa::{DsaParameters, DsaPrivateKey, DsaPublicKey};
pub(crate) mod ec;
pub use ec::{EcCurve, EcParameters, EcPrivateKey, EcPublicKey};
pub(crate) mod eddsa;
pub use eddsa::{EdCurve, EddsaPrivateKey, EddsaPublicKey};
pub(crate) mod rsa;
pub use rsa::{RsaPrivateKey, RsaPublicKey};

use const_oid::ObjectIdentifier;
use der::asn1::UintRef;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::oid;

/// Algorithm family of a key, as reported by classification.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    /// RSA
    Rsa,
    /// DSA
    Dsa,
    /// Elliptic-curve (Weierstrass form)
    Ec,
    /// Ed25519
    Ed25519,
    /// Ed448
    Ed448,
}

impl KeyKind {
    pub(crate) fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        match *oid {
            oid::RSA_ENCRYPTION => Some(Self::Rsa),
            oid::ID_DSA => Some(Self::Dsa),
            oid::ID_EC_PUBLIC_KEY => Some(Self::Ec),
            oid::ID_ED25519 => Some(Self::Ed25519),
            oid::ID_ED448 => Some(Self::Ed448),
            _ => None,
        }
    }
}

pub(crate) fn to_biguint(value: &UintRef<'_>) -> BigUint {
    BigUint::from_bytes_be(value.as_bytes())
}
