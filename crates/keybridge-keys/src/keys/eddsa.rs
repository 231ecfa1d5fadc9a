//! Edwards-curve key material.

use const_oid::ObjectIdentifier;
use der::{asn1::OctetStringRef, Decode};
use pkcs8::PrivateKeyInfo;
use serde::{Deserialize, Serialize};
use spki::SubjectPublicKeyInfoRef;
use zeroize::Zeroizing;

use crate::{error::ImportError, oid};

/// Edwards curves recognized by the importer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdCurve {
    /// Ed25519
    Ed25519,
    /// Ed448
    Ed448,
}

impl EdCurve {
    pub(crate) fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        match *oid {
            oid::ID_ED25519 => Some(Self::Ed25519),
            oid::ID_ED448 => Some(Self::Ed448),
            _ => None,
        }
    }

    /// Length of both the private seed and the public point encoding.
    pub fn key_size(self) -> usize {
        match self {
            Self::Ed25519 => 32,
            Self::Ed448 => 57,
        }
    }
}

/// EdDSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EddsaPublicKey {
    /// The curve
    pub curve: EdCurve,
    /// Encoded public point
    pub public: Vec<u8>,
}

/// EdDSA private key.
#[derive(Clone)]
pub struct EddsaPrivateKey {
    /// The curve
    pub curve: EdCurve,
    /// Private seed
    pub seed: Zeroizing<Vec<u8>>,
    /// Encoded public point, when the container carried one
    pub public: Option<Vec<u8>>,
}

// We manually implement these to make sure we don't print any sensitive data
impl std::fmt::Debug for EddsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EddsaPrivateKey")
            .field("curve", &self.curve)
            .finish()
    }
}

pub(crate) fn from_private_key_info(
    info: &PrivateKeyInfo<'_>,
) -> Result<EddsaPrivateKey, ImportError> {
    let curve = EdCurve::from_oid(&info.algorithm.oid).ok_or(ImportError::UnsupportedAlgorithm)?;
    // RFC 8410: the private key octets wrap a second OCTET STRING holding
    // the seed
    let seed = OctetStringRef::from_der(info.private_key)
        .map_err(|_| ImportError::MalformedStructure)?;
    if seed.as_bytes().len() != curve.key_size() {
        return Err(ImportError::MalformedStructure);
    }
    let public = match info.public_key {
        Some(point) => {
            if point.len() != curve.key_size() {
                return Err(ImportError::MalformedStructure);
            }
            Some(point.to_vec())
        }
        None => None,
    };
    Ok(EddsaPrivateKey {
        curve,
        seed: Zeroizing::new(seed.as_bytes().to_vec()),
        public,
    })
}

pub(crate) fn from_spki(spki: &SubjectPublicKeyInfoRef<'_>) -> Result<EddsaPublicKey, ImportError> {
    let curve = EdCurve::from_oid(&spki.algorithm.oid).ok_or(ImportError::UnsupportedAlgorithm)?;
    let point = spki
        .subject_public_key
        .as_bytes()
        .ok_or(ImportError::MalformedStructure)?;
    if point.len() != curve.key_size() {
        return Err(ImportError::MalformedStructure);
    }
    Ok(EddsaPublicKey {
        curve,
        public: point.to_vec(),
    })
}
