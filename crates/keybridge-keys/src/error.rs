use keybridge_pem::PemError;
use thiserror::Error;

/// Single error classification reported per failed import call.
///
/// On any failure the call produces no key object at all; callers never
/// see partially-imported material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// No candidate container label matched the input.
    #[error("no PEM container with a recognized label was found")]
    NotFound,
    /// Wrong password or corrupt ciphertext. Without an integrity tag the
    /// two cannot be told apart, so they are reported as one kind.
    #[error("decryption failed: wrong password or corrupt ciphertext")]
    Decryption,
    /// The decoded payload violates the expected binary structure.
    #[error("malformed key structure")]
    MalformedStructure,
    /// Well-formed structure carrying an identifier outside the supported
    /// algorithm families.
    #[error("unsupported algorithm identifier")]
    UnsupportedAlgorithm,
    /// Encrypted-key support is disabled in this build.
    #[error("encrypted keys are not supported by this build")]
    EncryptionUnsupported,
}

impl From<PemError> for ImportError {
    fn from(err: PemError) -> Self {
        match err {
            PemError::LabelNotFound => ImportError::NotFound,
            PemError::MalformedArmor | PemError::MalformedHeader => ImportError::MalformedStructure,
            PemError::UnsupportedCipher(_) => ImportError::UnsupportedAlgorithm,
            PemError::Decryption => ImportError::Decryption,
        }
    }
}
