//! Elliptic-curve key material (Weierstrass form).

use const_oid::ObjectIdentifier;
use der::Decode;
use pkcs8::PrivateKeyInfo;
use serde::{Deserialize, Serialize};
use spki::SubjectPublicKeyInfoRef;
use zeroize::Zeroizing;

use crate::{error::ImportError, oid};

/// Named curves recognized by the importer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EcCurve {
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
    /// NIST P-521 (secp521r1)
    P521,
    /// secp256k1
    Secp256k1,
}

impl EcCurve {
    pub(crate) fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        match *oid {
            oid::SECP256R1 => Some(Self::P256),
            oid::SECP384R1 => Some(Self::P384),
            oid::SECP521R1 => Some(Self::P521),
            oid::SECP256K1 => Some(Self::Secp256k1),
            _ => None,
        }
    }

    /// Object identifier of the curve.
    pub fn oid(self) -> ObjectIdentifier {
        match self {
            Self::P256 => oid::SECP256R1,
            Self::P384 => oid::SECP384R1,
            Self::P521 => oid::SECP521R1,
            Self::Secp256k1 => oid::SECP256K1,
        }
    }

    /// Field element length in bytes.
    pub fn field_size(self) -> usize {
        match self {
            Self::P256 | Self::Secp256k1 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }

    /// SEC name of the curve.
    pub fn name(self) -> &'static str {
        match self {
            Self::P256 => "secp256r1",
            Self::P384 => "secp384r1",
            Self::P521 => "secp521r1",
            Self::Secp256k1 => "secp256k1",
        }
    }
}

/// EC domain parameters (named curve form).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcParameters {
    /// The named curve
    pub curve: EcCurve,
}

/// EC public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcPublicKey {
    /// The named curve
    pub curve: EcCurve,
    /// Uncompressed curve point, `04 || x || y`
    pub point: Vec<u8>,
}

/// EC private key.
#[derive(Clone)]
pub struct EcPrivateKey {
    /// The named curve
    pub curve: EcCurve,
    /// Secret scalar, big-endian
    pub d: Zeroizing<Vec<u8>>,
    /// Uncompressed public point, when the container carried one
    pub public: Option<Vec<u8>>,
}

// We manually implement these to make sure we don't print any sensitive data
impl std::fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcPrivateKey")
            .field("curve", &self.curve)
            .finish()
    }
}

fn validate_point(curve: EcCurve, point: &[u8]) -> Result<(), ImportError> {
    // Only the uncompressed form is accepted
    if point.len() != 2 * curve.field_size() + 1 || point.first() != Some(&0x04) {
        return Err(ImportError::MalformedStructure);
    }
    Ok(())
}

/// Parse a standalone `ECParameters` structure (named curve form).
pub(crate) fn parse_ec_parameters(der: &[u8]) -> Result<EcParameters, ImportError> {
    let curve_oid =
        ObjectIdentifier::from_der(der).map_err(|_| ImportError::MalformedStructure)?;
    let curve = EcCurve::from_oid(&curve_oid).ok_or(ImportError::UnsupportedAlgorithm)?;
    Ok(EcParameters { curve })
}

/// Parse a SEC1 `ECPrivateKey` structure.
///
/// `curve_hint` supplies the curve when it is carried by an enclosing
/// structure (the PKCS#8 AlgorithmIdentifier) instead of the key itself.
pub(crate) fn parse_sec1_private(
    der: &[u8],
    curve_hint: Option<EcCurve>,
) -> Result<EcPrivateKey, ImportError> {
    let key = sec1::EcPrivateKey::from_der(der).map_err(|_| ImportError::MalformedStructure)?;
    let curve = match curve_hint {
        Some(curve) => curve,
        None => {
            let curve_oid = key
                .parameters
                .as_ref()
                .and_then(|params| params.named_curve())
                .ok_or(ImportError::UnsupportedAlgorithm)?;
            EcCurve::from_oid(&curve_oid).ok_or(ImportError::UnsupportedAlgorithm)?
        }
    };
    if key.private_key.is_empty() || key.private_key.len() > curve.field_size() {
        return Err(ImportError::MalformedStructure);
    }
    let public = match key.public_key {
        Some(point) => {
            validate_point(curve, point)?;
            Some(point.to_vec())
        }
        None => None,
    };
    Ok(EcPrivateKey {
        curve,
        d: Zeroizing::new(key.private_key.to_vec()),
        public,
    })
}

pub(crate) fn from_private_key_info(info: &PrivateKeyInfo<'_>) -> Result<EcPrivateKey, ImportError> {
    let curve = curve_from_algorithm(&info.algorithm)?;
    parse_sec1_private(info.private_key, Some(curve))
}

pub(crate) fn from_spki(spki: &SubjectPublicKeyInfoRef<'_>) -> Result<EcPublicKey, ImportError> {
    let curve = curve_from_algorithm(&spki.algorithm)?;
    let point = spki
        .subject_public_key
        .as_bytes()
        .ok_or(ImportError::MalformedStructure)?;
    validate_point(curve, point)?;
    Ok(EcPublicKey {
        curve,
        point: point.to_vec(),
    })
}

pub(crate) fn curve_from_algorithm(
    algorithm: &spki::AlgorithmIdentifierRef<'_>,
) -> Result<EcCurve, ImportError> {
    if algorithm.oid != oid::ID_EC_PUBLIC_KEY {
        return Err(ImportError::UnsupportedAlgorithm);
    }
    let curve_oid = algorithm
        .parameters_oid()
        .map_err(|_| ImportError::MalformedStructure)?;
    EcCurve::from_oid(&curve_oid).ok_or(ImportError::UnsupportedAlgorithm)
}
