//! DSA key material.

use der::{asn1::UintRef, AnyRef, Decode, Encode, Sequence};
use num_bigint::BigUint;
use pkcs8::PrivateKeyInfo;
use spki::SubjectPublicKeyInfoRef;

use super::to_biguint;
use crate::{error::ImportError, oid};

/// DSA domain parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DsaParameters {
    /// Prime modulus
    pub p: BigUint,
    /// Group order
    pub q: BigUint,
    /// Generator
    pub g: BigUint,
}

/// DSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DsaPublicKey {
    /// Domain parameters
    pub params: DsaParameters,
    /// Public value
    pub y: BigUint,
}

/// DSA private key.
#[derive(Clone, PartialEq, Eq)]
pub struct DsaPrivateKey {
    /// Domain parameters
    pub params: DsaParameters,
    /// Secret exponent
    pub x: BigUint,
    /// Public value, when the container carried one
    pub y: Option<BigUint>,
}

// We manually implement these to make sure we don't print any sensitive data
impl std::fmt::Debug for DsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DsaPrivateKey").finish()
    }
}

/// OpenSSL's traditional `DSAPrivateKey` sequence.
#[derive(Sequence)]
struct TradDsaPrivateKey<'a> {
    version: u8,
    p: UintRef<'a>,
    q: UintRef<'a>,
    g: UintRef<'a>,
    y: UintRef<'a>,
    x: UintRef<'a>,
}

/// `Dss-Parms` as carried in an AlgorithmIdentifier.
#[derive(Sequence)]
struct DssParms<'a> {
    p: UintRef<'a>,
    q: UintRef<'a>,
    g: UintRef<'a>,
}

/// Parse the traditional OpenSSL private key sequence.
pub(crate) fn parse_openssl_private(der: &[u8]) -> Result<DsaPrivateKey, ImportError> {
    let key = TradDsaPrivateKey::from_der(der).map_err(|_| ImportError::MalformedStructure)?;
    if key.version != 0 {
        return Err(ImportError::MalformedStructure);
    }
    Ok(DsaPrivateKey {
        params: DsaParameters {
            p: to_biguint(&key.p),
            q: to_biguint(&key.q),
            g: to_biguint(&key.g),
        },
        x: to_biguint(&key.x),
        y: Some(to_biguint(&key.y)),
    })
}

fn params_from_any(any: AnyRef<'_>) -> Result<DsaParameters, ImportError> {
    let der = any.to_der().map_err(|_| ImportError::MalformedStructure)?;
    let parms = DssParms::from_der(&der).map_err(|_| ImportError::MalformedStructure)?;
    Ok(DsaParameters {
        p: to_biguint(&parms.p),
        q: to_biguint(&parms.q),
        g: to_biguint(&parms.g),
    })
}

pub(crate) fn from_private_key_info(
    info: &PrivateKeyInfo<'_>,
) -> Result<DsaPrivateKey, ImportError> {
    if info.algorithm.oid != oid::ID_DSA {
        return Err(ImportError::UnsupportedAlgorithm);
    }
    let params = params_from_any(
        info.algorithm
            .parameters
            .ok_or(ImportError::MalformedStructure)?,
    )?;
    // The private key octets wrap a bare INTEGER
    let x = UintRef::from_der(info.private_key).map_err(|_| ImportError::MalformedStructure)?;
    Ok(DsaPrivateKey {
        params,
        x: to_biguint(&x),
        y: None,
    })
}

pub(crate) fn from_spki(spki: &SubjectPublicKeyInfoRef<'_>) -> Result<DsaPublicKey, ImportError> {
    if spki.algorithm.oid != oid::ID_DSA {
        return Err(ImportError::UnsupportedAlgorithm);
    }
    let params = params_from_any(
        spki.algorithm
            .parameters
            .ok_or(ImportError::MalformedStructure)?,
    )?;
    let bits = spki
        .subject_public_key
        .as_bytes()
        .ok_or(ImportError::MalformedStructure)?;
    let y = UintRef::from_der(bits).map_err(|_| ImportError::MalformedStructure)?;
    Ok(DsaPublicKey {
        params,
        y: to_biguint(&y),
    })
}
