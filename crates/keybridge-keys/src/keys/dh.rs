//! Diffie-Hellman domain parameters.

use der::{asn1::UintRef, Decode, Sequence};
use num_bigint::BigUint;

use super::to_biguint;
use crate::error::ImportError;

/// Diffie-Hellman domain parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DhParameters {
    /// Prime modulus
    pub p: BigUint,
    /// Generator
    pub g: BigUint,
}

/// PKCS#3 `DHParameter`. The optional private-value length is accepted and
/// ignored.
#[derive(Sequence)]
struct DhParameterDer<'a> {
    p: UintRef<'a>,
    g: UintRef<'a>,
    #[allow(dead_code)]
    private_value_length: Option<u32>,
}

pub(crate) fn parse_dh_parameters(der: &[u8]) -> Result<DhParameters, ImportError> {
    let params = DhParameterDer::from_der(der).map_err(|_| ImportError::MalformedStructure)?;
    Ok(DhParameters {
        p: to_biguint(&params.p),
        g: to_biguint(&params.g),
    })
}
