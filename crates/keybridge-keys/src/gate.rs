//! Detection and reversal of the two encrypted-container conventions.
//!
//! Which convention applies is decided once, from the matched label: the
//! legacy `Proc-Type`/`DEK-Info` headers only ever apply to the
//! algorithm-specific legacy labels, and the PKCS#8 envelope only ever
//! applies to the `ENCRYPTED PRIVATE KEY` label. The two are never
//! combined.

use keybridge_pem::{Block, EncryptionHeader};
use zeroize::Zeroizing;

use crate::{error::ImportError, format::PayloadShape};

/// Encryption mechanism of a matched container.
pub(crate) enum Protection {
    /// The payload is cleartext.
    None,
    /// Legacy convention: parameters live in the container headers.
    LegacyHeader(EncryptionHeader),
    /// The payload is a self-describing `EncryptedPrivateKeyInfo` envelope.
    Enveloped,
}

/// Select the mechanism for a matched container.
pub(crate) fn detect(shape: PayloadShape, block: &Block) -> Result<Protection, ImportError> {
    if shape == PayloadShape::EncryptedPrivateKeyInfo {
        // The label itself implies encryption; nothing to inspect.
        return Ok(Protection::Enveloped);
    }
    if shape.legacy_encryptable() {
        if let Some(header) = block.encryption_header()? {
            return Ok(Protection::LegacyHeader(header));
        }
    }
    Ok(Protection::None)
}

/// Produce the cleartext payload of a matched container, decrypting it if
/// either convention applies.
///
/// Returns the payload together with its post-decryption shape: an
/// unwrapped envelope continues as a PKCS#8 `PrivateKeyInfo`.
pub(crate) fn unlock(
    shape: PayloadShape,
    block: Block,
    password: Option<&str>,
) -> Result<(PayloadShape, Zeroizing<Vec<u8>>), ImportError> {
    match detect(shape, &block)? {
        Protection::None => Ok((shape, block.into_der())),
        Protection::LegacyHeader(header) => {
            decrypt_legacy(&header, &block, password).map(|der| (shape, der))
        }
        Protection::Enveloped => {
            decrypt_enveloped(&block, password).map(|der| (PayloadShape::PrivateKeyInfo, der))
        }
    }
}

#[cfg(feature = "encrypted-keys")]
fn decrypt_legacy(
    header: &EncryptionHeader,
    block: &Block,
    password: Option<&str>,
) -> Result<Zeroizing<Vec<u8>>, ImportError> {
    // A missing password fails here, at invocation, not deeper in parsing.
    let password = password.ok_or(ImportError::Decryption)?;
    Ok(keybridge_pem::decrypt_block(header, password, block.der())?)
}

#[cfg(not(feature = "encrypted-keys"))]
fn decrypt_legacy(
    _header: &EncryptionHeader,
    _block: &Block,
    _password: Option<&str>,
) -> Result<Zeroizing<Vec<u8>>, ImportError> {
    Err(ImportError::EncryptionUnsupported)
}

#[cfg(feature = "encrypted-keys")]
fn decrypt_enveloped(
    block: &Block,
    password: Option<&str>,
) -> Result<Zeroizing<Vec<u8>>, ImportError> {
    use pkcs8::{der::Decode, pkcs5, EncryptedPrivateKeyInfo};

    // A malformed envelope is a structural defect, detected before any
    // cipher operation is attempted.
    let envelope = EncryptedPrivateKeyInfo::from_der(block.der())
        .map_err(|_| ImportError::MalformedStructure)?;
    let password = password.ok_or(ImportError::Decryption)?;
    let document = envelope
        .decrypt(password.as_bytes())
        .map_err(|err| match err {
            pkcs8::Error::EncryptedPrivateKey(pkcs5::Error::DecryptFailed) => {
                ImportError::Decryption
            }
            _ => ImportError::MalformedStructure,
        })?;
    Ok(Zeroizing::new(document.as_bytes().to_vec()))
}

#[cfg(not(feature = "encrypted-keys"))]
fn decrypt_enveloped(
    _block: &Block,
    _password: Option<&str>,
) -> Result<Zeroizing<Vec<u8>>, ImportError> {
    Err(ImportError::EncryptionUnsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_PKCS1: &str = include_str!("../resources/rsa512_pkcs1.pem");
    const RSA_LEGACY_ENCRYPTED: &str = include_str!("../resources/rsa512_legacy_encrypted.pem");
    const RSA_PKCS8_ENCRYPTED: &str = include_str!("../resources/rsa512_pkcs8_encrypted.pem");

    fn block(input: &str, label: &str) -> Block {
        keybridge_pem::decode(input, label).unwrap()
    }

    #[test]
    fn cleartext_container_passes_through() {
        let b = block(RSA_PKCS1, "RSA PRIVATE KEY");
        assert!(matches!(
            detect(PayloadShape::RsaPrivatePkcs1, &b).unwrap(),
            Protection::None
        ));
        let original = b.der().to_vec();
        let (shape, der) = unlock(PayloadShape::RsaPrivatePkcs1, b, Some("ignored")).unwrap();
        assert_eq!(shape, PayloadShape::RsaPrivatePkcs1);
        assert_eq!(&*der, &original);
    }

    #[test]
    fn legacy_header_selects_legacy_path() {
        let b = block(RSA_LEGACY_ENCRYPTED, "RSA PRIVATE KEY");
        assert!(matches!(
            detect(PayloadShape::RsaPrivatePkcs1, &b).unwrap(),
            Protection::LegacyHeader(_)
        ));
    }

    #[test]
    fn envelope_label_always_selects_wrapped_path() {
        let b = block(RSA_PKCS8_ENCRYPTED, "ENCRYPTED PRIVATE KEY");
        assert!(matches!(
            detect(PayloadShape::EncryptedPrivateKeyInfo, &b).unwrap(),
            Protection::Enveloped
        ));
    }

    #[cfg(feature = "encrypted-keys")]
    #[test]
    fn legacy_without_password_fails_at_invocation() {
        let b = block(RSA_LEGACY_ENCRYPTED, "RSA PRIVATE KEY");
        assert_eq!(
            unlock(PayloadShape::RsaPrivatePkcs1, b, None).unwrap_err(),
            ImportError::Decryption
        );
    }

    #[cfg(feature = "encrypted-keys")]
    #[test]
    fn envelope_unwraps_to_private_key_info() {
        let b = block(RSA_PKCS8_ENCRYPTED, "ENCRYPTED PRIVATE KEY");
        let (shape, der) =
            unlock(PayloadShape::EncryptedPrivateKeyInfo, b, Some("correct")).unwrap();
        assert_eq!(shape, PayloadShape::PrivateKeyInfo);
        assert_eq!(der[0], 0x30);
    }

    #[cfg(not(feature = "encrypted-keys"))]
    #[test]
    fn encrypted_containers_rejected_without_support() {
        let b = block(RSA_LEGACY_ENCRYPTED, "RSA PRIVATE KEY");
        assert_eq!(
            unlock(PayloadShape::RsaPrivatePkcs1, b, Some("correct")).unwrap_err(),
            ImportError::EncryptionUnsupported
        );
        let b = block(RSA_PKCS8_ENCRYPTED, "ENCRYPTED PRIVATE KEY");
        assert_eq!(
            unlock(PayloadShape::EncryptedPrivateKeyInfo, b, Some("correct")).unwrap_err(),
            ImportError::EncryptionUnsupported
        );
    }

    #[cfg(feature = "encrypted-keys")]
    #[test]
    fn garbage_envelope_is_structural_not_decryption() {
        let armored = keybridge_pem::encode("ENCRYPTED PRIVATE KEY", &[0x04, 0x02, 0xde, 0xad]);
        let b = block(&armored, "ENCRYPTED PRIVATE KEY");
        assert_eq!(
            unlock(PayloadShape::EncryptedPrivateKeyInfo, b, Some("correct")).unwrap_err(),
            ImportError::MalformedStructure
        );
    }
}
