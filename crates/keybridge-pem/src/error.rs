use thiserror::Error;

/// Errors produced by the armor layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PemError {
    /// The input does not contain a container with the requested label.
    #[error("no PEM container with the requested label")]
    LabelNotFound,
    /// Markers were found but the body is not valid armor.
    #[error("malformed PEM armor")]
    MalformedArmor,
    /// An encapsulated header line violates its expected shape.
    #[error("malformed PEM header")]
    MalformedHeader,
    /// The `DEK-Info` header names a cipher this crate does not implement.
    #[error("unsupported PEM cipher: {0}")]
    UnsupportedCipher(String),
    /// Wrong password or corrupt ciphertext. The two are indistinguishable.
    #[error("PEM decryption failed")]
    Decryption,
}
