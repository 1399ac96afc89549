use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::fmt;

type HmacSha1 = Hmac<Sha1>;

/// Length in hex characters of every signature produced by [`MacEngine`].
pub const SIGNATURE_LEN: usize = 40;

/// Keyed HMAC-SHA1 over arbitrary bytes.
///
/// The secret is absorbed into the HMAC state when the engine is built and is
/// not kept anywhere else. Every call works on a clone of that keyed state.
#[derive(Clone)]
pub struct MacEngine {
    keyed: HmacSha1,
}

impl MacEngine {
    /// Keys the engine with a text or byte secret; any length, including empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let keyed =
            HmacSha1::new_from_slice(secret.as_ref()).expect("HMAC can take key of any size");
        Self { keyed }
    }

    /// Signs `message`, returning the lowercase hex digest.
    pub fn sign(&self, message: &[u8]) -> String {
        let mut mac = self.keyed.clone();
        mac.update(message);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks `signature` against `message` in constant time.
    ///
    /// Anything that is not exactly [`SIGNATURE_LEN`] lowercase hex characters
    /// is rejected without touching the MAC.
    pub fn verify(&self, message: &[u8], signature: &str) -> bool {
        if !is_lower_hex(signature) {
            return false;
        }
        let Ok(tag) = hex::decode(signature) else {
            return false;
        };

        let mut mac = self.keyed.clone();
        mac.update(message);
        mac.verify_slice(&tag).is_ok()
    }
}

impl fmt::Debug for MacEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacEngine")
            .field("algorithm", &"HMAC-SHA1")
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn is_lower_hex(s: &str) -> bool {
    s.len() == SIGNATURE_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> MacEngine {
        MacEngine::new("my-secretive-secret")
    }

    #[test]
    fn test_sign_shape() {
        let sig = engine().sign(b"HMAC is fun!!");
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(sig.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }

    #[test]
    fn test_known_vector() {
        // RFC 2202, test case 2
        let engine = MacEngine::new("Jefe");
        assert_eq!(
            engine.sign(b"what do ya want for nothing?"),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let engine = engine();
        assert_eq!(engine.sign(b"message"), engine.sign(b"message"));
    }

    #[test]
    fn test_empty_message_and_empty_key() {
        let engine = MacEngine::new("");
        let sig = engine.sign(b"");
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(engine.verify(b"", &sig));
    }

    #[test]
    fn test_verify_rejects_tampered_message() {
        let engine = engine();
        let sig = engine.sign(b"HMAC is fun!!");
        assert!(engine.verify(b"HMAC is fun!!", &sig));
        assert!(!engine.verify(b"HMAC is fun!!!", &sig));
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let sig = engine().sign(b"message");
        assert!(!MacEngine::new("another-secret").verify(b"message", &sig));
    }

    #[test]
    fn test_verify_malformed_signature() {
        let engine = engine();
        let sig = engine.sign(b"message");

        assert!(!engine.verify(b"message", ""));
        assert!(!engine.verify(b"message", "not hex at all"));
        assert!(!engine.verify(b"message", &sig[..SIGNATURE_LEN - 2]));
        assert!(!engine.verify(b"message", &format!("{sig}00")));
        assert!(!engine.verify(b"message", &sig.to_uppercase()));
        assert!(!engine.verify(b"message", &"z".repeat(SIGNATURE_LEN)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", MacEngine::new("my-secretive-secret"));
        assert!(!debug.contains("my-secretive-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
