#![doc = include_str!("../README.md")]

mod block;
pub use block::{decode, encode, Block, Blocks};
#[cfg(feature = "encryption")]
mod decrypt;
#[cfg(feature = "encryption")]
pub use decrypt::decrypt_block;
mod error;
pub use error::PemError;
mod header;
pub use header::{EncryptionHeader, PemCipher};
