//! A library for signing URLs and payloads with a shared secret.
//!
//! A signed URL carries an HMAC-SHA1 of its own canonical form in a
//! `signature` query parameter, so any holder of the same secret can check
//! that the scheme, host, port, path and parameters were not altered. Expiry,
//! replay protection and key management are left to the caller.

mod canonical;
mod error;
mod mac;
mod signer;

pub use canonical::SIGNATURE_PARAM;
pub use error::{Result, SignerError};
pub use mac::{MacEngine, SIGNATURE_LEN};
pub use signer::Signer;
