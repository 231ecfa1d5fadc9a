//! Candidate-table driven resolution of PEM container formats.
//!
//! Each key category owns a fixed, ordered list of labels it accepts. The
//! order is an authoritative priority, not a heuristic: candidates are
//! tried in list order and the first label whose armor decode succeeds is
//! the match. No candidate is retried and no two are tried concurrently.

use keybridge_pem::Block;

use crate::error::ImportError;

/// Structural interpretation of a matched container's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PayloadShape {
    /// PKCS#1 `RSAPrivateKey`
    RsaPrivatePkcs1,
    /// PKCS#1 `RSAPublicKey`
    RsaPublicPkcs1,
    /// OpenSSL's traditional `DSAPrivateKey` sequence
    DsaPrivateOpenssl,
    /// SEC1 `ECPrivateKey`
    EcPrivateSec1,
    /// PKCS#8 `PrivateKeyInfo`
    PrivateKeyInfo,
    /// PKCS#8 `EncryptedPrivateKeyInfo`
    EncryptedPrivateKeyInfo,
    /// X.509 `SubjectPublicKeyInfo`
    SubjectPublicKeyInfo,
    /// `ECParameters` (named curve form)
    EcDomainParameters,
    /// PKCS#3 `DHParameter`
    DhDomainParameters,
}

impl PayloadShape {
    /// Whether containers of this shape may carry the legacy
    /// `Proc-Type`/`DEK-Info` encryption headers.
    pub(crate) fn legacy_encryptable(self) -> bool {
        matches!(
            self,
            Self::RsaPrivatePkcs1 | Self::DsaPrivateOpenssl | Self::EcPrivateSec1
        )
    }
}

/// One entry of a category's priority list.
pub(crate) struct FormatCandidate {
    pub label: &'static str,
    pub shape: PayloadShape,
}

const fn candidate(label: &'static str, shape: PayloadShape) -> FormatCandidate {
    FormatCandidate { label, shape }
}

pub(crate) const RSA_PUBLIC: &[FormatCandidate] = &[
    candidate("RSA PUBLIC KEY", PayloadShape::RsaPublicPkcs1),
    candidate("PUBLIC KEY", PayloadShape::SubjectPublicKeyInfo),
];

pub(crate) const RSA_PRIVATE: &[FormatCandidate] = &[
    candidate("RSA PRIVATE KEY", PayloadShape::RsaPrivatePkcs1),
    candidate("PRIVATE KEY", PayloadShape::PrivateKeyInfo),
    candidate("ENCRYPTED PRIVATE KEY", PayloadShape::EncryptedPrivateKeyInfo),
];

pub(crate) const DSA_PUBLIC: &[FormatCandidate] =
    &[candidate("PUBLIC KEY", PayloadShape::SubjectPublicKeyInfo)];

pub(crate) const DSA_PRIVATE: &[FormatCandidate] = &[
    candidate("DSA PRIVATE KEY", PayloadShape::DsaPrivateOpenssl),
    candidate("PRIVATE KEY", PayloadShape::PrivateKeyInfo),
    candidate("ENCRYPTED PRIVATE KEY", PayloadShape::EncryptedPrivateKeyInfo),
];

pub(crate) const EC_PARAMETERS: &[FormatCandidate] = &[
    candidate("EC PARAMETERS", PayloadShape::EcDomainParameters),
    candidate("EC PRIVATE KEY", PayloadShape::EcPrivateSec1),
    candidate("PRIVATE KEY", PayloadShape::PrivateKeyInfo),
    candidate("PUBLIC KEY", PayloadShape::SubjectPublicKeyInfo),
];

pub(crate) const EC_PUBLIC: &[FormatCandidate] =
    &[candidate("PUBLIC KEY", PayloadShape::SubjectPublicKeyInfo)];

pub(crate) const EC_PRIVATE: &[FormatCandidate] = &[
    candidate("EC PRIVATE KEY", PayloadShape::EcPrivateSec1),
    candidate("PRIVATE KEY", PayloadShape::PrivateKeyInfo),
    candidate("ENCRYPTED PRIVATE KEY", PayloadShape::EncryptedPrivateKeyInfo),
];

pub(crate) const EDDSA_PUBLIC: &[FormatCandidate] =
    &[candidate("PUBLIC KEY", PayloadShape::SubjectPublicKeyInfo)];

pub(crate) const EDDSA_PRIVATE: &[FormatCandidate] = &[
    candidate("PRIVATE KEY", PayloadShape::PrivateKeyInfo),
    candidate("ENCRYPTED PRIVATE KEY", PayloadShape::EncryptedPrivateKeyInfo),
];

pub(crate) const DH_PARAMETERS: &[FormatCandidate] =
    &[candidate("DH PARAMETERS", PayloadShape::DhDomainParameters)];

/// Try every candidate label in priority order and decode the first match.
///
/// A candidate whose armor fails to decode for any reason simply does not
/// match; exhausting the list is [`ImportError::NotFound`].
pub(crate) fn resolve(
    input: &str,
    candidates: &[FormatCandidate],
) -> Result<(PayloadShape, Block), ImportError> {
    for candidate in candidates {
        if let Ok(block) = keybridge_pem::decode(input, candidate.label) {
            log::debug!("matched PEM label {:?}", candidate.label);
            return Ok((candidate.shape, block));
        }
    }
    Err(ImportError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_PKCS1: &str = include_str!("../resources/rsa512_pkcs1.pem");
    const RSA_PKCS8: &str = include_str!("../resources/rsa512_pkcs8.pem");
    const RSA_PKCS8_ENCRYPTED: &str = include_str!("../resources/rsa512_pkcs8_encrypted.pem");

    #[test]
    fn first_matching_candidate_wins() {
        let (shape, block) = resolve(RSA_PKCS1, RSA_PRIVATE).unwrap();
        assert_eq!(shape, PayloadShape::RsaPrivatePkcs1);
        assert_eq!(block.label(), "RSA PRIVATE KEY");
    }

    #[test]
    fn falls_through_to_later_candidates() {
        let (shape, _) = resolve(RSA_PKCS8, RSA_PRIVATE).unwrap();
        assert_eq!(shape, PayloadShape::PrivateKeyInfo);
        let (shape, _) = resolve(RSA_PKCS8_ENCRYPTED, RSA_PRIVATE).unwrap();
        assert_eq!(shape, PayloadShape::EncryptedPrivateKeyInfo);
    }

    #[test]
    fn no_candidate_matches() {
        assert_eq!(
            resolve("no armor here", RSA_PRIVATE).unwrap_err(),
            ImportError::NotFound
        );
        assert_eq!(
            resolve(RSA_PKCS1, DH_PARAMETERS).unwrap_err(),
            ImportError::NotFound
        );
    }

    #[test]
    fn corrupt_armor_is_not_a_match() {
        let corrupt = RSA_PKCS1.replacen('M', "*", 1);
        assert_eq!(
            resolve(&corrupt, RSA_PRIVATE).unwrap_err(),
            ImportError::NotFound
        );
    }
}
