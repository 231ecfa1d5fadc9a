//! Per-category import operations.
//!
//! Every function resolves the input against its category's candidate
//! table, reverses an encryption convention when one applies, and
//! materializes exactly the requested key representation. A failing call
//! returns an error and nothing else; there is no partially-imported key
//! to observe.

use keybridge_pem::Block;
use pkcs8::{der::Decode, PrivateKeyInfo};
use spki::SubjectPublicKeyInfoRef;
use zeroize::Zeroizing;

use crate::{
    error::ImportError,
    format::{self, PayloadShape},
    gate,
    keys::{
        dh, dsa, ec, eddsa, rsa, DhParameters, DsaPrivateKey, DsaPublicKey, EcParameters,
        EcPrivateKey, EcPublicKey, EddsaPrivateKey, EddsaPublicKey, KeyKind, RsaPrivateKey,
        RsaPublicKey,
    },
};

fn resolve_cleartext(
    input: &str,
    candidates: &[format::FormatCandidate],
    password: Option<&str>,
) -> Result<(PayloadShape, Zeroizing<Vec<u8>>), ImportError> {
    let (shape, block) = format::resolve(input, candidates)?;
    gate::unlock(shape, block, password)
}

fn private_key_info(der: &[u8]) -> Result<PrivateKeyInfo<'_>, ImportError> {
    PrivateKeyInfo::from_der(der).map_err(|_| ImportError::MalformedStructure)
}

fn subject_public_key_info(der: &[u8]) -> Result<SubjectPublicKeyInfoRef<'_>, ImportError> {
    SubjectPublicKeyInfoRef::from_der(der).map_err(|_| ImportError::MalformedStructure)
}

/// Import an RSA public key.
pub fn import_rsa_public_key(input: &str) -> Result<RsaPublicKey, ImportError> {
    let (shape, der) = resolve_cleartext(input, format::RSA_PUBLIC, None)?;
    match shape {
        PayloadShape::RsaPublicPkcs1 => rsa::parse_pkcs1_public(&der),
        PayloadShape::SubjectPublicKeyInfo => rsa::from_spki(&subject_public_key_info(&der)?),
        _ => Err(ImportError::UnsupportedAlgorithm),
    }
}

/// Import an RSA private key, decrypting the container when needed.
pub fn import_rsa_private_key(
    input: &str,
    password: Option<&str>,
) -> Result<RsaPrivateKey, ImportError> {
    let (shape, der) = resolve_cleartext(input, format::RSA_PRIVATE, password)?;
    match shape {
        PayloadShape::RsaPrivatePkcs1 => rsa::parse_pkcs1_private(&der),
        PayloadShape::PrivateKeyInfo => rsa::from_private_key_info(&private_key_info(&der)?),
        _ => Err(ImportError::UnsupportedAlgorithm),
    }
}

/// Import a DSA public key.
pub fn import_dsa_public_key(input: &str) -> Result<DsaPublicKey, ImportError> {
    let (_, der) = resolve_cleartext(input, format::DSA_PUBLIC, None)?;
    dsa::from_spki(&subject_public_key_info(&der)?)
}

/// Import a DSA private key, decrypting the container when needed.
pub fn import_dsa_private_key(
    input: &str,
    password: Option<&str>,
) -> Result<DsaPrivateKey, ImportError> {
    let (shape, der) = resolve_cleartext(input, format::DSA_PRIVATE, password)?;
    match shape {
        PayloadShape::DsaPrivateOpenssl => dsa::parse_openssl_private(&der),
        PayloadShape::PrivateKeyInfo => dsa::from_private_key_info(&private_key_info(&der)?),
        _ => Err(ImportError::UnsupportedAlgorithm),
    }
}

/// Import EC domain parameters from any container that names a curve.
pub fn import_ec_parameters(
    input: &str,
    password: Option<&str>,
) -> Result<EcParameters, ImportError> {
    let (shape, der) = resolve_cleartext(input, format::EC_PARAMETERS, password)?;
    let curve = match shape {
        PayloadShape::EcDomainParameters => return ec::parse_ec_parameters(&der),
        PayloadShape::EcPrivateSec1 => ec::parse_sec1_private(&der, None)?.curve,
        PayloadShape::PrivateKeyInfo => {
            ec::curve_from_algorithm(&private_key_info(&der)?.algorithm)?
        }
        PayloadShape::SubjectPublicKeyInfo => {
            ec::curve_from_algorithm(&subject_public_key_info(&der)?.algorithm)?
        }
        _ => return Err(ImportError::UnsupportedAlgorithm),
    };
    Ok(EcParameters { curve })
}

/// Import an EC public key.
pub fn import_ec_public_key(input: &str) -> Result<EcPublicKey, ImportError> {
    let (_, der) = resolve_cleartext(input, format::EC_PUBLIC, None)?;
    ec::from_spki(&subject_public_key_info(&der)?)
}

/// Import an EC private key, decrypting the container when needed.
pub fn import_ec_private_key(
    input: &str,
    password: Option<&str>,
) -> Result<EcPrivateKey, ImportError> {
    let (shape, der) = resolve_cleartext(input, format::EC_PRIVATE, password)?;
    match shape {
        PayloadShape::EcPrivateSec1 => ec::parse_sec1_private(&der, None),
        PayloadShape::PrivateKeyInfo => ec::from_private_key_info(&private_key_info(&der)?),
        _ => Err(ImportError::UnsupportedAlgorithm),
    }
}

/// Import an EdDSA public key.
pub fn import_eddsa_public_key(input: &str) -> Result<EddsaPublicKey, ImportError> {
    let (_, der) = resolve_cleartext(input, format::EDDSA_PUBLIC, None)?;
    eddsa::from_spki(&subject_public_key_info(&der)?)
}

/// Import an EdDSA private key, decrypting the container when needed.
pub fn import_eddsa_private_key(
    input: &str,
    password: Option<&str>,
) -> Result<EddsaPrivateKey, ImportError> {
    let (_, der) = resolve_cleartext(input, format::EDDSA_PRIVATE, password)?;
    eddsa::from_private_key_info(&private_key_info(&der)?)
}

/// Import Diffie-Hellman domain parameters.
pub fn import_dh_parameters(input: &str) -> Result<DhParameters, ImportError> {
    let (_, der) = resolve_cleartext(input, format::DH_PARAMETERS, None)?;
    let params = dh::parse_dh_parameters(&der)?;
    log::debug!(
        "imported Diffie-Hellman parameters ({} bit modulus)",
        params.p.bits()
    );
    Ok(params)
}

/// Decode a certificate container to its DER encoding.
pub fn import_certificate(input: &str) -> Result<Vec<u8>, ImportError> {
    Ok(keybridge_pem::decode(input, "CERTIFICATE")?.der().to_vec())
}

/// Decode every certificate container in `input`, in order.
pub fn import_certificates(input: &str) -> Result<Vec<Vec<u8>>, ImportError> {
    let mut certificates = Vec::new();
    for block in Block::iter(input, "CERTIFICATE") {
        certificates.push(block?.der().to_vec());
    }
    if certificates.is_empty() {
        return Err(ImportError::NotFound);
    }
    Ok(certificates)
}

/// Decode a certificate revocation list container to its DER encoding.
pub fn import_crl(input: &str) -> Result<Vec<u8>, ImportError> {
    Ok(keybridge_pem::decode(input, "X509 CRL")?.der().to_vec())
}

/// Decode a certification request container to its DER encoding.
pub fn import_csr(input: &str) -> Result<Vec<u8>, ImportError> {
    Ok(keybridge_pem::decode(input, "CERTIFICATE REQUEST")?.der().to_vec())
}

/// Classify a public-key container without materializing the key.
pub fn public_key_kind(input: &str) -> Result<KeyKind, ImportError> {
    if keybridge_pem::decode(input, "RSA PUBLIC KEY").is_ok() {
        return Ok(KeyKind::Rsa);
    }
    let block =
        keybridge_pem::decode(input, "PUBLIC KEY").map_err(|_| ImportError::NotFound)?;
    let spki = subject_public_key_info(block.der())?;
    KeyKind::from_oid(&spki.algorithm.oid).ok_or(ImportError::UnsupportedAlgorithm)
}

/// Classify a private-key container without materializing the key.
///
/// Classification never needs a password: the algorithm-specific labels
/// already name their family, and the generic label's algorithm
/// identifier sits outside the encrypted octets.
pub fn private_key_kind(input: &str) -> Result<KeyKind, ImportError> {
    const LEGACY_LABELS: &[(&str, KeyKind)] = &[
        ("RSA PRIVATE KEY", KeyKind::Rsa),
        ("DSA PRIVATE KEY", KeyKind::Dsa),
        ("EC PRIVATE KEY", KeyKind::Ec),
    ];
    for (label, kind) in LEGACY_LABELS {
        if keybridge_pem::decode(input, label).is_ok() {
            return Ok(*kind);
        }
    }
    let block =
        keybridge_pem::decode(input, "PRIVATE KEY").map_err(|_| ImportError::NotFound)?;
    let info = private_key_info(block.der())?;
    KeyKind::from_oid(&info.algorithm.oid).ok_or(ImportError::UnsupportedAlgorithm)
}
