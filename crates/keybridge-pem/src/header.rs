use crate::error::PemError;

/// Cipher named by a `DEK-Info` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PemCipher {
    /// AES-128 in CBC mode
    Aes128Cbc,
    /// AES-192 in CBC mode
    Aes192Cbc,
    /// AES-256 in CBC mode
    Aes256Cbc,
    /// Single DES in CBC mode
    DesCbc,
    /// Triple DES (EDE, three keys) in CBC mode
    DesEde3Cbc,
}

impl PemCipher {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "AES-128-CBC" => Some(Self::Aes128Cbc),
            "AES-192-CBC" => Some(Self::Aes192Cbc),
            "AES-256-CBC" => Some(Self::Aes256Cbc),
            "DES-CBC" => Some(Self::DesCbc),
            "DES-EDE3-CBC" => Some(Self::DesEde3Cbc),
            _ => None,
        }
    }

    /// Key length in bytes.
    pub fn key_size(self) -> usize {
        match self {
            Self::Aes128Cbc => 16,
            Self::Aes192Cbc => 24,
            Self::Aes256Cbc => 32,
            Self::DesCbc => 8,
            Self::DesEde3Cbc => 24,
        }
    }

    /// Block (and IV) length in bytes.
    pub fn block_size(self) -> usize {
        match self {
            Self::Aes128Cbc | Self::Aes192Cbc | Self::Aes256Cbc => 16,
            Self::DesCbc | Self::DesEde3Cbc => 8,
        }
    }

    /// The name used in `DEK-Info` headers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aes128Cbc => "AES-128-CBC",
            Self::Aes192Cbc => "AES-192-CBC",
            Self::Aes256Cbc => "AES-256-CBC",
            Self::DesCbc => "DES-CBC",
            Self::DesEde3Cbc => "DES-EDE3-CBC",
        }
    }
}

/// Parameters of the legacy header encryption convention, as carried by a
/// `DEK-Info: <cipher>,<iv-hex>` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptionHeader {
    /// Cipher used to protect the body.
    pub cipher: PemCipher,
    /// Initialization vector; its first eight bytes double as the key
    /// derivation salt.
    pub iv: Vec<u8>,
}

impl EncryptionHeader {
    pub(crate) fn parse(dek_info: &str) -> Result<Self, PemError> {
        let (name, iv_hex) = dek_info.split_once(',').ok_or(PemError::MalformedHeader)?;
        let name = name.trim();
        let cipher = PemCipher::from_name(name)
            .ok_or_else(|| PemError::UnsupportedCipher(name.to_owned()))?;
        let iv = hex::decode(iv_hex.trim()).map_err(|_| PemError::MalformedHeader)?;
        if iv.len() != cipher.block_size() {
            return Err(PemError::MalformedHeader);
        }
        Ok(Self { cipher, iv })
    }
}
