#![doc = include_str!("../README.md")]

mod error;
pub use error::ImportError;
mod format;
mod gate;
mod import;
pub use import::{
    import_certificate, import_certificates, import_crl, import_csr, import_dh_parameters,
    import_dsa_private_key, import_dsa_public_key, import_ec_parameters, import_ec_private_key,
    import_ec_public_key, import_eddsa_private_key, import_eddsa_public_key,
    import_rsa_private_key, import_rsa_public_key, private_key_kind, public_key_kind,
};
mod keys;
pub use keys::*;
mod oid;
