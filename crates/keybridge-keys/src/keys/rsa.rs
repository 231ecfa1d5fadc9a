//! RSA key material.

use der::Decode;
use num_bigint::BigUint;
use pkcs8::PrivateKeyInfo;
use spki::SubjectPublicKeyInfoRef;

use super::to_biguint;
use crate::{error::ImportError, oid};

/// RSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Modulus
    pub n: BigUint,
    /// Public exponent
    pub e: BigUint,
}

/// RSA private key with its CRT components.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    /// Modulus
    pub n: BigUint,
    /// Public exponent
    pub e: BigUint,
    /// Private exponent
    pub d: BigUint,
    /// First prime factor
    pub p: BigUint,
    /// Second prime factor
    pub q: BigUint,
    /// First CRT exponent, `d mod (p-1)`
    pub dp: BigUint,
    /// Second CRT exponent, `d mod (q-1)`
    pub dq: BigUint,
    /// CRT coefficient, `q^-1 mod p`
    pub qinv: BigUint,
}

// We manually implement these to make sure we don't print any sensitive data
impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey").finish()
    }
}

/// Parse a PKCS#1 `RSAPublicKey` structure.
pub(crate) fn parse_pkcs1_public(der: &[u8]) -> Result<RsaPublicKey, ImportError> {
    let key = pkcs1::RsaPublicKey::from_der(der).map_err(|_| ImportError::MalformedStructure)?;
    Ok(RsaPublicKey {
        n: to_biguint(&key.modulus),
        e: to_biguint(&key.public_exponent),
    })
}

/// Parse a PKCS#1 `RSAPrivateKey` structure.
pub(crate) fn parse_pkcs1_private(der: &[u8]) -> Result<RsaPrivateKey, ImportError> {
    let key = pkcs1::RsaPrivateKey::from_der(der).map_err(|_| ImportError::MalformedStructure)?;
    Ok(RsaPrivateKey {
        n: to_biguint(&key.modulus),
        e: to_biguint(&key.public_exponent),
        d: to_biguint(&key.private_exponent),
        p: to_biguint(&key.prime1),
        q: to_biguint(&key.prime2),
        dp: to_biguint(&key.exponent1),
        dq: to_biguint(&key.exponent2),
        qinv: to_biguint(&key.coefficient),
    })
}

pub(crate) fn from_private_key_info(
    info: &PrivateKeyInfo<'_>,
) -> Result<RsaPrivateKey, ImportError> {
    if info.algorithm.oid != oid::RSA_ENCRYPTION {
        return Err(ImportError::UnsupportedAlgorithm);
    }
    parse_pkcs1_private(info.private_key)
}

pub(crate) fn from_spki(spki: &SubjectPublicKeyInfoRef<'_>) -> Result<RsaPublicKey, ImportError> {
    if spki.algorithm.oid != oid::RSA_ENCRYPTION {
        return Err(ImportError::UnsupportedAlgorithm);
    }
    let bits = spki
        .subject_public_key
        .as_bytes()
        .ok_or(ImportError::MalformedStructure)?;
    parse_pkcs1_public(bits)
}
