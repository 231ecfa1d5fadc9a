//! Decryption of legacy header-encrypted PEM bodies.
//!
//! The key is derived from the password with the historical single-round
//! MD5 scheme: each round hashes the previous digest, the password and the
//! first eight IV bytes, and rounds are concatenated until the cipher's key
//! length is reached.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use md5::{Digest, Md5};
use zeroize::Zeroizing;

use crate::{
    error::PemError,
    header::{EncryptionHeader, PemCipher},
};

/// Decrypt a PEM body protected by the legacy header convention.
///
/// Fails with [`PemError::Decryption`] on a wrong password or corrupt
/// ciphertext; the padding check cannot tell the two apart.
pub fn decrypt_block(
    header: &EncryptionHeader,
    password: &str,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, PemError> {
    log::debug!("decrypting PEM body with {}", header.cipher.name());
    let key = derive_key(password, &header.iv, header.cipher.key_size());
    match header.cipher {
        PemCipher::Aes128Cbc => cbc_decrypt::<cbc::Decryptor<aes::Aes128>>(&key, header, ciphertext),
        PemCipher::Aes192Cbc => cbc_decrypt::<cbc::Decryptor<aes::Aes192>>(&key, header, ciphertext),
        PemCipher::Aes256Cbc => cbc_decrypt::<cbc::Decryptor<aes::Aes256>>(&key, header, ciphertext),
        PemCipher::DesCbc => cbc_decrypt::<cbc::Decryptor<des::Des>>(&key, header, ciphertext),
        PemCipher::DesEde3Cbc => {
            cbc_decrypt::<cbc::Decryptor<des::TdesEde3>>(&key, header, ciphertext)
        }
    }
}

fn cbc_decrypt<D: BlockDecryptMut + KeyIvInit>(
    key: &[u8],
    header: &EncryptionHeader,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, PemError> {
    let decryptor =
        D::new_from_slices(key, &header.iv).map_err(|_| PemError::MalformedHeader)?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| PemError::Decryption)
}

fn derive_key(password: &str, iv: &[u8], key_size: usize) -> Zeroizing<Vec<u8>> {
    // The salt is the leading eight bytes of the IV.
    let salt = iv.get(..8).unwrap_or(iv);
    let mut key = Zeroizing::new(Vec::with_capacity(key_size));
    let mut last = Zeroizing::new(Vec::new());
    while key.len() < key_size {
        let mut md5 = Md5::new();
        md5.update(&*last);
        md5.update(password.as_bytes());
        md5.update(salt);
        let digest = md5.finalize();
        let take = (key_size - key.len()).min(digest.len());
        key.extend_from_slice(&digest[..take]);
        *last = digest.to_vec();
    }
    key
}
